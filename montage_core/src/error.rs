// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by structural edits.
//!
//! Only strict positional inserts, cycle-forming edits and attempts to
//! reparent a capture image fail. Removal and
//! swap operations treat missing references and out-of-range indices as
//! no-ops, capture sizes are clamped, and destroying an absent capture does
//! nothing.

use crate::node::NodeId;

/// A structural edit the tree could not apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// A positional insert was given an index outside `0..=len`.
    #[error("child index {index} is out of bounds for a container with {len} children")]
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Number of children at the time of the call.
        len: usize,
    },
    /// The node is the container itself or one of its ancestors.
    #[error("{0:?} cannot become a descendant of itself")]
    Cycle(NodeId),
    /// The node is a capture's image quad, which only its capture may place.
    #[error("{0:?} is owned by an offscreen capture")]
    CaptureImage(NodeId),
}
