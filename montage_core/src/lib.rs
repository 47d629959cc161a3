// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree, pivots, hit testing and offscreen capture for 2D scenes.
//!
//! `montage_core` maintains a tree of display objects for a game renderer.
//! It is `no_std` compatible (with `alloc`) and stores nodes in a
//! struct-of-arrays arena addressed by generational handles.
//!
//! # Architecture
//!
//! ```text
//!   caller edits ──► SceneStore (tree + draw tables + captures)
//!                          │
//!                          ▼
//!               SceneStore::evaluate() ──► FrameChanges
//!                                               │
//!                 ┌─────────────────────────────┘
//!                 ▼
//!   montage_render::build_frame() ──► RenderPlans ──► Presenter::apply()
//! ```
//!
//! **[`node`]** — The arena ([`SceneStore`](node::SceneStore)) with quads
//! (rect-bounded leaves) and containers. Every structural edit on a container
//! updates its ordered child list and its mirrored draw-handle table together.
//!
//! **[`pivot`]** — Named anchor modes and the stateless anchor-point policy.
//!
//! **[`transform`]** — Position / rotation / scale / pivot local transform.
//!
//! **[`schedule`]** — The ordered set of render targets redrawn each pass.
//!
//! **[`dirty`]** — Dirty-tracking channels via `understory_dirty`.
//!
//! **[`backend`]** — The [`Presenter`](backend::Presenter) contract that
//! rendering backends implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) and the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper for capture lifecycle instrumentation.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod color;
pub mod config;
pub mod dirty;
pub mod error;
pub mod node;
pub mod pivot;
pub mod schedule;
pub mod trace;
pub mod transform;

pub use color::Color;
pub use config::{CoordinateSystem, SceneConfig};
pub use error::SceneError;
pub use node::{ContainerId, NodeId, QuadId, SceneStore};
pub use pivot::PivotMode;
