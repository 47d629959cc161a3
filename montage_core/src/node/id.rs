// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node, drawable and render-target identity types.

use core::fmt;

/// Sentinel value indicating "no node" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`SceneStore`](super::SceneStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is disposed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}

/// A node known to be a rect-bounded leaf ("quad").
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadId(pub(crate) NodeId);

/// A node known to be a container.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub(crate) NodeId);

impl QuadId {
    /// Returns the untyped handle.
    #[inline]
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.0
    }
}

impl ContainerId {
    /// Returns the untyped handle.
    #[inline]
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.0
    }
}

impl From<QuadId> for NodeId {
    #[inline]
    fn from(id: QuadId) -> Self {
        id.0
    }
}

impl From<ContainerId> for NodeId {
    #[inline]
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

impl fmt::Debug for QuadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuadId({}@gen{})", self.0.idx, self.0.generation)
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({}@gen{})", self.0.idx, self.0.generation)
    }
}

/// An opaque reference to an externally owned drawable (sprite, mesh, text).
///
/// Drawables are created and managed by the rendering backend. A quad whose
/// content is a drawable presents it stretched over its rect.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId(pub u32);

impl fmt::Debug for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawableId({})", self.0)
    }
}

/// An offscreen render target minted by the store for a capture.
///
/// Backends learn about new targets through
/// [`FrameChanges::allocated`](super::FrameChanges::allocated) and drop them
/// when they show up in [`FrameChanges::released`](super::FrameChanges::released).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetId(pub u32);

impl fmt::Debug for RenderTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderTargetId({})", self.0)
    }
}

/// What a quad draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Content {
    /// An externally owned drawable.
    Drawable(DrawableId),
    /// The pixels of an offscreen render target.
    Target(RenderTargetId),
}
