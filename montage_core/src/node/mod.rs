// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree data model.
//!
//! A *node* is a member of the display tree. Every node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that becomes stale when
//!   the node is disposed, preventing use-after-free bugs at the API level.
//!   Typed wrappers ([`QuadId`], [`ContainerId`]) carry the node kind.
//! - A logical parent and, separately, a *render parent*. The two agree
//!   except under an active offscreen capture, where the container's children
//!   are detached from the render chain and drawn relative to the capture
//!   origin instead.
//! - **Local properties** set by the caller: [`transform`](SceneStore::set_transform),
//!   [`color`](SceneStore::set_color), [`content`](SceneStore::set_content),
//!   size and pivot mode (quads), visibility and touchability.
//! - **Computed properties** produced by [`evaluate`](SceneStore::evaluate):
//!   `world_transform` (product of render-ancestor local transforms).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Node kinds
//!
//! - **Quads** are rect-bounded leaves with an intrinsic size. Their pivot
//!   follows a [`PivotMode`](crate::pivot::PivotMode) and is recomputed on
//!   resize unless the mode is `Custom`.
//! - **Containers** hold an ordered child list (index 0 is backmost) and a
//!   mirrored list of [`DrawHandle`]s. Every structural edit updates both in
//!   the same call, so the two are always index-aligned. A container's
//!   *render slot* ([`DrawSource`]) says what is drawn for it: nothing, the
//!   handle table, or a captured image.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **TRANSFORM** — propagates along render links, since world transforms
//!   are inherited.
//! - **COLOR** / **CONTENT** — local-only; only the modified node is marked.
//! - **TOPOLOGY** — marked on containers whose child list changed.

mod capture;
mod container;
mod evaluate;
mod geometry;
mod hit;
mod id;
mod store;
mod traverse;

pub use capture::{CaptureMode, CaptureState, CaptureViewport, OffscreenCapture};
pub use evaluate::{CaptureJob, FrameChanges, RenderTargetDesc};
pub use id::{Content, ContainerId, DrawableId, INVALID, NodeId, QuadId, RenderTargetId};
pub use store::{DrawHandle, DrawSource, NodeFlags, NodeKind, SceneStore};
pub use traverse::Children;
