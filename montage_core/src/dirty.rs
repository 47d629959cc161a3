// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Montage uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! propagate invalidation through the render-transform links of the tree.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`TRANSFORM`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to render parent. World transforms are inherited, so marking
//!   a node marks every node rendered under it. Edges follow the *render*
//!   link, not the logical parent: children of a captured container are
//!   detached and evaluate relative to the capture origin.
//!
//! - **Local-only** — [`COLOR`] and [`CONTENT`] only report the marked node.
//!   Color propagation is a shallow push performed by the color setters
//!   themselves; [`CONTENT`] covers drawable, size, visibility and
//!   render-slot changes.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on the container whose child
//!   list changed.
//!
//! # Consumption
//!
//! [`SceneStore::evaluate`](crate::node::SceneStore::evaluate) drains every
//! channel once per render pass and reports the result as
//! [`FrameChanges`](crate::node::FrameChanges).

use understory_dirty::Channel;

/// Local transform or render link changed.
pub const TRANSFORM: Channel = Channel::new(0);

/// Own or inherited color changed.
pub const COLOR: Channel = Channel::new(1);

/// Drawable content, size, visibility or render slot changed.
pub const CONTENT: Channel = Channel::new(2);

/// Child list changed.
pub const TOPOLOGY: Channel = Channel::new(3);
