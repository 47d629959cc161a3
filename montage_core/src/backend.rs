// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for rendering integrations.
//!
//! `montage_core` never touches a GPU. A backend owns the render targets and
//! the drawables, and consumes each pass through the [`Presenter`] trait:
//!
//! 1. Allocate every target in [`FrameChanges::allocated`], cleared to its
//!    `clear_color`.
//! 2. Draw each [`CaptureJob`](crate::node::CaptureJob) in
//!    [`FrameChanges::captures`] into its target, in schedule order.
//! 3. Draw the screen. Quads whose content is
//!    [`Content::Target`](crate::node::Content::Target) sample a target.
//! 4. Free every target in [`FrameChanges::released`].
//!
//! `montage_render` turns the store and a [`FrameChanges`] into flat draw
//! lists for steps 2 and 3.

use crate::node::{FrameChanges, SceneStore};

/// Applies an evaluated pass to a rendering backend.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(dt: f64) {
///     // Animate: edit the display tree.
///     store.set_rotation(spinner, store.rotation(spinner) + dt);
///
///     // Evaluate: drain dirty channels, emit capture jobs.
///     let changes = store.evaluate();
///
///     // Present: allocate, capture, draw, release.
///     presenter.apply(&store, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies `changes`, reading current node state from `store` as needed.
    fn apply(&mut self, store: &SceneStore, changes: &FrameChanges);
}
