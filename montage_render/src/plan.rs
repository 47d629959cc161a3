// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of quads for one destination.

use alloc::vec::Vec;

use kurbo::{Affine, Size};
use montage_core::Color;
use montage_core::node::{
    CaptureJob, CaptureViewport, ContainerId, Content, DrawHandle, DrawSource, NodeId, QuadId,
    RenderTargetId, SceneStore,
};

/// A single quad to draw.
///
/// Items are produced in back-to-front order, matching the draw tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    /// The quad this item originates from.
    pub node: QuadId,
    /// What to draw: a drawable or another capture's target.
    pub content: Content,
    /// Intrinsic size; the quad covers `(0, 0, w, h)` in its local space.
    pub size: Size,
    /// Local-to-destination transform.
    pub world_transform: Affine,
    /// Own color times inherited tint.
    pub color: Color,
}

/// Where a plan is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PlanTarget {
    /// The main framebuffer.
    #[default]
    Screen,
    /// An offscreen capture target.
    Offscreen {
        /// Target to draw into.
        target: RenderTargetId,
        /// Maps the captured container's space onto the target.
        viewport: CaptureViewport,
    },
}

/// An ordered list of quads for a single destination.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Destination of this plan.
    pub target: PlanTarget,
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
}

impl RenderPlan {
    /// Creates an empty render plan for the given destination.
    #[must_use]
    pub fn new(target: PlanTarget) -> Self {
        Self {
            target,
            items: Vec::new(),
        }
    }

    /// Builds the screen plan for the tree under `root`.
    ///
    /// Invisible nodes are skipped along with their subtrees. A captured
    /// container contributes its image quad instead of its children.
    #[must_use]
    pub fn for_screen(store: &SceneStore, root: impl Into<NodeId>) -> Self {
        let mut plan = Self::new(PlanTarget::Screen);
        let root = root.into();
        match store.as_container(root) {
            Some(container) => plan.push_container(store, container),
            None => {
                if let Some(quad) = store.as_quad(root) {
                    plan.push_quad(store, quad);
                }
            }
        }
        plan
    }

    /// Builds the offscreen plan for a capture job.
    ///
    /// Walks the captured container's draw table directly. Its children are
    /// detached from the render chain, so their world transforms are already
    /// relative to the container; the job's viewport maps them onto the
    /// target.
    #[must_use]
    pub fn for_capture(store: &SceneStore, job: &CaptureJob) -> Self {
        let mut plan = Self::new(PlanTarget::Offscreen {
            target: job.target,
            viewport: job.viewport,
        });
        plan.push_table(store, job.container);
        plan
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push_container(&mut self, store: &SceneStore, container: ContainerId) {
        match store.render_slot(container) {
            None => {}
            Some(DrawSource::Table) => self.push_table(store, container),
            Some(DrawSource::Image(image)) => self.push_quad(store, image),
        }
    }

    fn push_table(&mut self, store: &SceneStore, container: ContainerId) {
        for handle in store.draw_table(container) {
            match *handle {
                DrawHandle::Leaf(quad) => self.push_quad(store, quad),
                DrawHandle::Group(group) => self.push_container(store, group),
            }
        }
    }

    fn push_quad(&mut self, store: &SceneStore, quad: QuadId) {
        if !store.is_visible(quad) {
            return;
        }
        let Some(content) = store.content(quad) else {
            return;
        };
        self.items.push(RenderItem {
            node: quad,
            content,
            size: store.size(quad),
            world_transform: store.world_transform(quad),
            color: store.effective_color(quad),
        });
    }
}
