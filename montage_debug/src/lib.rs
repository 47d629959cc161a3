// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, tree dumps and JSON snapshots for montage diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](montage_core::trace::TraceSink)
//!   writing one line per capture event or pass summary.
//! - [`tree::dump_tree`]: an indented outline of a display tree.
//! - [`snapshot::snapshot`]: the same tree as a `serde_json` value, for
//!   golden files and tooling.

pub mod pretty;
pub mod snapshot;
pub mod tree;
