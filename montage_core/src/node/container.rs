// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container child management.
//!
//! Every edit here touches the child list and the draw table of a container
//! together, keeping them equal in length and index-aligned.

use alloc::vec::Vec;
use core::ops::{Bound, RangeBounds};

use crate::dirty;
use crate::error::SceneError;

use super::id::{ContainerId, INVALID, NodeId};
use super::store::{DrawSource, NodeKind, SceneStore};
use super::traverse::Children;

impl SceneStore {
    /// Appends `node` as the frontmost child of `container`.
    ///
    /// A node that already has a parent is detached from it first. While the
    /// container has an active capture, the new child stays detached from the
    /// render chain and is only drawn into the capture.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Cycle`] if `node` is `container` or one of its
    /// ancestors, and [`SceneError::CaptureImage`] if `node` is owned by a
    /// capture.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child(
        &mut self,
        container: ContainerId,
        node: impl Into<NodeId>,
    ) -> Result<(), SceneError> {
        let node = node.into();
        let len = self.len_after_detach(container, node)?;
        self.insert_child(container.0.idx, node.idx, len);
        Ok(())
    }

    /// Inserts `node` at `index` in `container`'s child list.
    ///
    /// `index` counts children after `node` has been detached from its current
    /// parent, so moving a child within the same container uses its final
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::IndexOutOfBounds`] if `index` is greater than the
    /// number of children, and [`SceneError::Cycle`] or
    /// [`SceneError::CaptureImage`] as for [`add_child`](Self::add_child).
    /// The tree is unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child_at(
        &mut self,
        container: ContainerId,
        node: impl Into<NodeId>,
        index: usize,
    ) -> Result<(), SceneError> {
        let node = node.into();
        let len = self.len_after_detach(container, node)?;
        if index > len {
            return Err(SceneError::IndexOutOfBounds { index, len });
        }
        self.insert_child(container.0.idx, node.idx, index);
        Ok(())
    }

    /// Removes `node` from `container`, disposing its subtree if `dispose`.
    ///
    /// Returns `false` (and does nothing) if `node` is not a child of
    /// `container`.
    pub fn remove_child(
        &mut self,
        container: ContainerId,
        node: impl Into<NodeId>,
        dispose: bool,
    ) -> bool {
        let node = node.into();
        self.validate(container.0);
        self.validate(node);
        if self.parent[node.idx as usize] != container.0.idx {
            return false;
        }
        self.unlink_child(node.idx);
        if dispose {
            self.dispose_subtree(node.idx);
        }
        true
    }

    /// Removes the child at `index`, disposing its subtree if `dispose`.
    ///
    /// Out-of-range indices are a no-op returning `None`. The returned handle
    /// is stale when `dispose` is set.
    pub fn remove_child_at(
        &mut self,
        container: ContainerId,
        index: usize,
        dispose: bool,
    ) -> Option<NodeId> {
        let child = self.child_at(container, index)?;
        self.unlink_child(child.idx);
        if dispose {
            self.dispose_subtree(child.idx);
        }
        Some(child)
    }

    /// Removes every child whose index falls in `range`.
    ///
    /// The end of the range is clamped to the number of children; an empty or
    /// out-of-range selection removes nothing. Returns how many children were
    /// removed.
    pub fn remove_children(
        &mut self,
        container: ContainerId,
        range: impl RangeBounds<usize>,
        dispose: bool,
    ) -> usize {
        self.validate(container.0);
        let c = container.0.idx as usize;
        let len = self.children[c].len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return 0;
        }

        let removed: Vec<u32> = self.children[c].drain(start..end).collect();
        self.draw_table[c].drain(start..end);
        for &idx in &removed {
            self.parent[idx as usize] = INVALID;
            self.detach_render(idx);
        }
        self.dirty.mark(container.0.idx, dirty::TOPOLOGY);

        if dispose {
            for &idx in &removed {
                self.dispose_subtree(idx);
            }
        }
        removed.len()
    }

    /// Returns the position of `node` in `container`, or `None` if it is not
    /// a child.
    #[must_use]
    pub fn child_index(&self, container: ContainerId, node: impl Into<NodeId>) -> Option<usize> {
        let node = node.into();
        self.validate(container.0);
        self.validate(node);
        self.children[container.0.idx as usize]
            .iter()
            .position(|&idx| idx == node.idx)
    }

    /// Exchanges the positions of two children.
    ///
    /// No-op returning `false` unless both are children of `container`.
    pub fn swap_children(
        &mut self,
        container: ContainerId,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
    ) -> bool {
        match (
            self.child_index(container, a),
            self.child_index(container, b),
        ) {
            (Some(i), Some(j)) => self.swap_children_at(container, i, j),
            _ => false,
        }
    }

    /// Exchanges the children at two positions.
    ///
    /// No-op returning `false` if either index is out of range.
    pub fn swap_children_at(&mut self, container: ContainerId, i: usize, j: usize) -> bool {
        self.validate(container.0);
        let c = container.0.idx as usize;
        let len = self.children[c].len();
        if i >= len || j >= len {
            return false;
        }
        if i != j {
            self.children[c].swap(i, j);
            self.draw_table[c].swap(i, j);
            self.dirty.mark(container.0.idx, dirty::TOPOLOGY);
        }
        true
    }

    /// Returns the number of children of `container`.
    #[must_use]
    pub fn num_children(&self, container: ContainerId) -> usize {
        self.validate(container.0);
        self.children[container.0.idx as usize].len()
    }

    /// Returns the child at `index`, if any.
    #[must_use]
    pub fn child_at(&self, container: ContainerId, index: usize) -> Option<NodeId> {
        self.validate(container.0);
        self.children[container.0.idx as usize]
            .get(index)
            .map(|&idx| self.id_at(idx))
    }

    /// Returns the first child (back to front) named `name`.
    #[must_use]
    pub fn child_by_name(&self, container: ContainerId, name: &str) -> Option<NodeId> {
        self.children(container)
            .find(|&id| self.name[id.idx as usize].as_deref() == Some(name))
    }

    /// Iterates the children of `container`.
    ///
    /// Forward iteration runs back to front (draw order); use
    /// [`rev`](Iterator::rev) for front to back. The iterator is [`Clone`],
    /// so a sequence can be restarted from any point.
    #[must_use]
    pub fn children(&self, container: ContainerId) -> Children<'_> {
        self.validate(container.0);
        Children::new(self, &self.children[container.0.idx as usize])
    }

    /// Iterates the children of `container` that are of the given kind.
    pub fn children_of_kind(
        &self,
        container: ContainerId,
        kind: NodeKind,
    ) -> impl DoubleEndedIterator<Item = NodeId> + Clone + '_ {
        self.children(container)
            .filter(move |id| self.kind[id.idx as usize] == kind)
    }

    /// Shows or hides a node.
    ///
    /// Hiding a container empties its render slot so that nothing of its
    /// subtree is drawn; showing it restores the active source: the draw
    /// table, or the captured image while a capture exists. Setting the
    /// current value again does nothing.
    pub fn set_visible(&mut self, node: impl Into<NodeId>, visible: bool) {
        let node = node.into();
        self.validate(node);
        let i = node.idx as usize;
        if self.flags[i].visible == visible {
            return;
        }
        self.flags[i].visible = visible;
        if self.kind[i] == NodeKind::Container {
            let slot = visible.then(|| self.active_source(node.idx));
            self.render_slot[i] = slot;
        }
        self.dirty.mark(node.idx, dirty::CONTENT);
    }

    /// Detaches a node from its parent, disposes its subtree (including any
    /// capture), and frees it.
    ///
    /// Every handle into the subtree becomes stale. A capture's image quad is
    /// owned by the capture and is left alone; destroy the capture instead.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn dispose(&mut self, node: impl Into<NodeId>) {
        let node = node.into();
        self.validate(node);
        if self.is_capture_image_at(node.idx) {
            log::warn!("ignoring dispose of capture image {node:?}");
            return;
        }
        if self.parent[node.idx as usize] != INVALID {
            self.unlink_child(node.idx);
        }
        self.dispose_subtree(node.idx);
    }

    // -- Internal helpers --

    /// What a visible container draws.
    pub(crate) fn active_source(&self, idx: u32) -> DrawSource {
        match &self.capture[idx as usize] {
            Some(capture) => DrawSource::Image(capture.image),
            None => DrawSource::Table,
        }
    }

    /// Validates an insert and returns the child count `container` will have
    /// once `node` is detached from its current parent.
    fn len_after_detach(&self, container: ContainerId, node: NodeId) -> Result<usize, SceneError> {
        self.validate(container.0);
        self.validate(node);
        let c = container.0.idx;
        if self.is_capture_image_at(node.idx) {
            return Err(SceneError::CaptureImage(node));
        }

        // Walk up from the container; meeting `node` means a cycle.
        let mut cursor = c;
        while cursor != INVALID {
            if cursor == node.idx {
                return Err(SceneError::Cycle(node));
            }
            cursor = self.parent[cursor as usize];
        }

        let len = self.children[c as usize].len();
        Ok(if self.parent[node.idx as usize] == c {
            len - 1
        } else {
            len
        })
    }

    fn insert_child(&mut self, container: u32, child: u32, index: usize) {
        if self.parent[child as usize] != INVALID {
            self.unlink_child(child);
        }
        let c = container as usize;
        let handle = self.handle_at(child);
        self.children[c].insert(index, child);
        self.draw_table[c].insert(index, handle);
        self.parent[child as usize] = container;

        if self.capture[c].is_some() {
            self.detach_render(child);
        } else {
            self.attach_render(child, container);
        }
        self.dirty.mark(container, dirty::TOPOLOGY);
    }

    /// Removes `child` from its parent's lists and cuts both links.
    pub(crate) fn unlink_child(&mut self, child: u32) {
        let p = self.parent[child as usize];
        let pi = p as usize;
        if let Some(pos) = self.children[pi].iter().position(|&idx| idx == child) {
            self.children[pi].remove(pos);
            self.draw_table[pi].remove(pos);
        }
        self.parent[child as usize] = INVALID;
        self.detach_render(child);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Frees an already unlinked node and everything below it.
    fn dispose_subtree(&mut self, idx: u32) {
        let i = idx as usize;
        if self.kind[i] == NodeKind::Container {
            self.destroy_capture_at(idx);
            let children = core::mem::take(&mut self.children[i]);
            self.draw_table[i].clear();
            for &child in &children {
                self.parent[child as usize] = INVALID;
                self.detach_render(child);
                self.dispose_subtree(child);
            }
        }
        self.detach_render(idx);
        self.free(idx);
    }
}
