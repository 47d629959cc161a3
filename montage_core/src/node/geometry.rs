// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local rects, bounds and projected extents.
//!
//! Geometry queries walk the *logical* tree on demand and never depend on
//! [`evaluate`](SceneStore::evaluate), so they hold for captured subtrees too.

use kurbo::{Affine, Rect};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use super::id::{INVALID, NodeId};
use super::store::{NodeKind, SceneStore};

impl SceneStore {
    /// Returns the node's local transform as a matrix.
    #[must_use]
    pub fn local_affine(&self, id: impl Into<NodeId>) -> Affine {
        self.transform(id).to_affine()
    }

    /// Returns the node's local bounding rect.
    ///
    /// For a quad this is `(0, 0, width, height)` regardless of the pivot.
    /// For a container it is the union of its children's [`bounds`], grown to
    /// include the origin, or [`Rect::ZERO`] without children.
    ///
    /// [`bounds`]: Self::bounds
    #[must_use]
    pub fn rect(&self, id: impl Into<NodeId>) -> Rect {
        let id = id.into();
        self.validate(id);
        self.rect_at(id.idx)
    }

    /// Returns the node's rect transformed into its parent's space, as an
    /// axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self, id: impl Into<NodeId>) -> Rect {
        let id = id.into();
        self.validate(id);
        self.bounds_at(id.idx)
    }

    /// Returns the node's width as seen by its parent.
    ///
    /// A quad with a parent reports the horizontal extent of its rotated and
    /// scaled box, `|sx·w·cos θ| + |sy·h·sin θ|`. This is the axis-aligned
    /// bound of the rotated rect, not an oriented extent. A quad without a
    /// parent reports its intrinsic width, and a container the width of its
    /// [`rect`](Self::rect).
    #[must_use]
    pub fn width(&self, id: impl Into<NodeId>) -> f64 {
        let id = id.into();
        self.validate(id);
        let i = id.idx as usize;
        match self.kind[i] {
            NodeKind::Container => self.rect_at(id.idx).width(),
            NodeKind::Quad if self.parent[i] == INVALID => self.size[i].width,
            NodeKind::Quad => {
                let rotation = self.transform[i].rotation;
                let (sin, cos) = (rotation.sin(), rotation.cos());
                let scale = self.transform[i].scale;
                let size = self.size[i];
                (scale.x * size.width * cos).abs() + (scale.y * size.height * sin).abs()
            }
        }
    }

    /// Returns the node's height as seen by its parent.
    ///
    /// The vertical counterpart of [`width`](Self::width):
    /// `|sx·w·sin θ| + |sy·h·cos θ|` for a parented quad.
    #[must_use]
    pub fn height(&self, id: impl Into<NodeId>) -> f64 {
        let id = id.into();
        self.validate(id);
        let i = id.idx as usize;
        match self.kind[i] {
            NodeKind::Container => self.rect_at(id.idx).height(),
            NodeKind::Quad if self.parent[i] == INVALID => self.size[i].height,
            NodeKind::Quad => {
                let rotation = self.transform[i].rotation;
                let (sin, cos) = (rotation.sin(), rotation.cos());
                let scale = self.transform[i].scale;
                let size = self.size[i];
                (scale.x * size.width * sin).abs() + (scale.y * size.height * cos).abs()
            }
        }
    }

    /// Returns the product of local transforms from the scene root down to
    /// this node, following logical parents.
    ///
    /// Unlike [`world_transform`](Self::world_transform) this is computed on
    /// demand and ignores capture detachment.
    #[must_use]
    pub fn scene_transform(&self, id: impl Into<NodeId>) -> Affine {
        let id = id.into();
        self.validate(id);
        self.scene_transform_at(id.idx)
    }

    pub(crate) fn scene_transform_at(&self, idx: u32) -> Affine {
        let mut affine = self.transform[idx as usize].to_affine();
        let mut cursor = self.parent[idx as usize];
        while cursor != INVALID {
            affine = self.transform[cursor as usize].to_affine() * affine;
            cursor = self.parent[cursor as usize];
        }
        affine
    }

    pub(crate) fn rect_at(&self, idx: u32) -> Rect {
        let i = idx as usize;
        match self.kind[i] {
            NodeKind::Quad => self.size[i].to_rect(),
            NodeKind::Container => {
                let children = &self.children[i];
                if children.is_empty() {
                    return Rect::ZERO;
                }
                // Starting from the zero rect keeps the origin inside.
                children
                    .iter()
                    .fold(Rect::ZERO, |acc, &child| acc.union(self.bounds_at(child)))
            }
        }
    }

    pub(crate) fn bounds_at(&self, idx: u32) -> Rect {
        self.transform[idx as usize]
            .to_affine()
            .transform_rect_bbox(self.rect_at(idx))
    }
}
