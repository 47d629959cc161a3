// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation and property management.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::color::Color;
use crate::config::SceneConfig;
use crate::dirty;
use crate::pivot::{PivotMode, anchor_point};
use crate::schedule::RenderSchedule;
use crate::trace::LifecycleEvent;
use crate::transform::Transform2d;

use super::capture::OffscreenCapture;
use super::evaluate::RenderTargetDesc;
use super::id::{Content, ContainerId, INVALID, NodeId, QuadId, RenderTargetId};

/// The two kinds of node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A rect-bounded leaf.
    Quad,
    /// An ordered parent of other nodes.
    Container,
}

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node (and, for containers, its subtree) is drawn.
    pub visible: bool,
    /// Whether touch hit tests may select the node.
    pub touchable: bool,
    /// Containers only: hit tests stop here instead of descending.
    pub hittable: bool,
    /// Opt-in to multiply-color propagation.
    ///
    /// On a container, color setters push the accumulated tint to its
    /// children; on a child, accepts that tint.
    pub multiply_color: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            visible: true,
            touchable: true,
            hittable: false,
            multiply_color: false,
        }
    }
}

/// A container's entry for one child in its draw table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawHandle {
    /// The child is a quad and draws itself.
    Leaf(QuadId),
    /// The child is a container; its own render slot and draw table stand in
    /// for its whole subtree.
    Group(ContainerId),
}

impl DrawHandle {
    /// The child this handle draws.
    #[inline]
    #[must_use]
    pub const fn node(self) -> NodeId {
        match self {
            Self::Leaf(id) => id.0,
            Self::Group(id) => id.0,
        }
    }
}

/// What an active render slot draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawSource {
    /// Draw the per-child handle table.
    Table,
    /// Draw the captured image quad in place of the children.
    Image(QuadId),
}

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Disposed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Quad-only fields (`size`, `pivot_mode`, `content`) and container-only
/// fields (`children`, `draw_table`, `render_slot`, `capture`) exist for
/// every slot and stay at their defaults for the other kind.
#[derive(Debug)]
pub struct SceneStore {
    pub(crate) config: SceneConfig,

    // -- Topology --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) parent: Vec<u32>,
    pub(crate) render_parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) draw_table: Vec<Vec<DrawHandle>>,
    pub(crate) render_slot: Vec<Option<DrawSource>>,

    // -- Local properties (set by callers) --
    pub(crate) transform: Vec<Transform2d>,
    pub(crate) size: Vec<Size>,
    pub(crate) pivot_mode: Vec<PivotMode>,
    pub(crate) color: Vec<Color>,
    pub(crate) inherited_color: Vec<Color>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) content: Vec<Option<Content>>,
    pub(crate) name: Vec<Option<String>>,
    pub(crate) capture: Vec<Option<OffscreenCapture>>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_transform: Vec<Affine>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Offscreen targets --
    pub(crate) schedule: RenderSchedule,
    pub(crate) next_target: u32,
    pub(crate) pass_index: u64,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    pub(crate) pending_allocated: Vec<RenderTargetDesc>,
    pub(crate) pending_released: Vec<RenderTargetId>,
    pub(crate) pending_events: Vec<LifecycleEvent>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Creates an empty store with the default (screen) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            config,
            kind: Vec::new(),
            parent: Vec::new(),
            render_parent: Vec::new(),
            children: Vec::new(),
            draw_table: Vec::new(),
            render_slot: Vec::new(),
            transform: Vec::new(),
            size: Vec::new(),
            pivot_mode: Vec::new(),
            color: Vec::new(),
            inherited_color: Vec::new(),
            flags: Vec::new(),
            content: Vec::new(),
            name: Vec::new(),
            capture: Vec::new(),
            world_transform: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            schedule: RenderSchedule::new(),
            next_target: 0,
            pass_index: 0,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            pending_allocated: Vec::new(),
            pending_released: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Returns the configuration the store was created with.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Returns the render schedule: targets redrawn by upcoming passes.
    #[must_use]
    pub fn schedule(&self) -> &RenderSchedule {
        &self.schedule
    }

    // -- Allocation API --

    /// Creates a new quad of the given intrinsic size.
    ///
    /// The quad starts with an identity transform, white color, no content,
    /// [`PivotMode::Custom`] with the pivot at the origin, and no parent.
    pub fn create_quad(&mut self, size: Size) -> QuadId {
        let id = self.alloc(NodeKind::Quad);
        self.size[id.idx as usize] = size;
        QuadId(id)
    }

    /// Creates a new, empty, visible container.
    pub fn create_container(&mut self) -> ContainerId {
        let id = self.alloc(NodeKind::Container);
        self.render_slot[id.idx as usize] = Some(DrawSource::Table);
        ContainerId(id)
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: impl Into<NodeId>) -> bool {
        let id = id.into();
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.alive[id.idx as usize]
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: impl Into<NodeId>) -> NodeKind {
        let id = id.into();
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Narrows a handle to a quad handle, if the node is a quad.
    #[must_use]
    pub fn as_quad(&self, id: NodeId) -> Option<QuadId> {
        (self.kind(id) == NodeKind::Quad).then_some(QuadId(id))
    }

    /// Narrows a handle to a container handle, if the node is a container.
    #[must_use]
    pub fn as_container(&self, id: NodeId) -> Option<ContainerId> {
        (self.kind(id) == NodeKind::Container).then_some(ContainerId(id))
    }

    /// Returns the logical parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: impl Into<NodeId>) -> Option<ContainerId> {
        let id = id.into();
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| ContainerId(self.id_at(p)))
    }

    /// Returns the node whose world transform this node inherits, if any.
    ///
    /// Equal to [`parent`](Self::parent) except for the children of a
    /// captured container (no render parent) and for capture images (the
    /// captured container, though they are not its children).
    #[must_use]
    pub fn render_parent(&self, id: impl Into<NodeId>) -> Option<NodeId> {
        let id = id.into();
        self.validate(id);
        let p = self.render_parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns the live nodes with neither a parent nor a render parent.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| {
                self.alive[idx as usize]
                    && self.parent[idx as usize] == INVALID
                    && self.render_parent[idx as usize] == INVALID
            })
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the local transform components of a node.
    #[must_use]
    pub fn transform(&self, id: impl Into<NodeId>) -> Transform2d {
        let id = id.into();
        self.validate(id);
        self.transform[id.idx as usize]
    }

    /// Returns the position of a node's pivot in its parent's space.
    #[must_use]
    pub fn position(&self, id: impl Into<NodeId>) -> Point {
        self.transform(id).position
    }

    /// Returns the rotation of a node in radians.
    #[must_use]
    pub fn rotation(&self, id: impl Into<NodeId>) -> f64 {
        self.transform(id).rotation
    }

    /// Returns the scale factors of a node.
    #[must_use]
    pub fn scale(&self, id: impl Into<NodeId>) -> Vec2 {
        self.transform(id).scale
    }

    /// Returns the local pivot point of a node.
    #[must_use]
    pub fn pivot(&self, id: impl Into<NodeId>) -> Point {
        self.transform(id).pivot
    }

    /// Returns the intrinsic (unscaled) size of a quad.
    #[must_use]
    pub fn size(&self, id: QuadId) -> Size {
        self.validate(id.0);
        self.size[id.0.idx as usize]
    }

    /// Returns the pivot mode of a quad.
    #[must_use]
    pub fn pivot_mode(&self, id: QuadId) -> PivotMode {
        self.validate(id.0);
        self.pivot_mode[id.0.idx as usize]
    }

    /// Returns what a quad draws.
    #[must_use]
    pub fn content(&self, id: QuadId) -> Option<Content> {
        self.validate(id.0);
        self.content[id.0.idx as usize]
    }

    /// Returns the node's own color.
    #[must_use]
    pub fn color(&self, id: impl Into<NodeId>) -> Color {
        let id = id.into();
        self.validate(id);
        self.color[id.idx as usize]
    }

    /// Returns the tint last pushed down by the parent (white if none).
    #[must_use]
    pub fn inherited_color(&self, id: impl Into<NodeId>) -> Color {
        let id = id.into();
        self.validate(id);
        self.inherited_color[id.idx as usize]
    }

    /// Returns own color times inherited tint.
    #[must_use]
    pub fn effective_color(&self, id: impl Into<NodeId>) -> Color {
        let id = id.into();
        self.validate(id);
        self.effective_color_at(id.idx)
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: impl Into<NodeId>) -> NodeFlags {
        let id = id.into();
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns whether the node is visible.
    #[must_use]
    pub fn is_visible(&self, id: impl Into<NodeId>) -> bool {
        self.flags(id).visible
    }

    /// Returns the node's name, if it has one.
    #[must_use]
    pub fn name(&self, id: impl Into<NodeId>) -> Option<&str> {
        let id = id.into();
        self.validate(id);
        self.name[id.idx as usize].as_deref()
    }

    /// Returns the computed world transform of a node.
    ///
    /// Follows render links, so children of a captured container report
    /// transforms relative to the capture origin. Only valid after
    /// [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn world_transform(&self, id: impl Into<NodeId>) -> Affine {
        let id = id.into();
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns a container's draw table, index-aligned with its children.
    #[must_use]
    pub fn draw_table(&self, id: ContainerId) -> &[DrawHandle] {
        self.validate(id.0);
        &self.draw_table[id.0.idx as usize]
    }

    /// Returns what is drawn for a container; `None` while it is hidden.
    #[must_use]
    pub fn render_slot(&self, id: ContainerId) -> Option<DrawSource> {
        self.validate(id.0);
        self.render_slot[id.0.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Replaces all local transform components of a node.
    ///
    /// Giving a quad a pivot different from its current one switches it to
    /// [`PivotMode::Custom`].
    pub fn set_transform(&mut self, id: impl Into<NodeId>, transform: Transform2d) {
        let id = id.into();
        self.validate(id);
        let i = id.idx as usize;
        if self.transform[i].pivot != transform.pivot {
            self.pivot_mode[i] = PivotMode::Custom;
        }
        self.transform[i] = transform;
        self.mark_transform(id.idx);
    }

    /// Moves a node's pivot to `position` in its parent's space.
    pub fn set_position(&mut self, id: impl Into<NodeId>, position: Point) {
        let id = id.into();
        self.validate(id);
        self.transform[id.idx as usize].position = position;
        self.mark_transform(id.idx);
    }

    /// Sets a node's rotation in radians.
    pub fn set_rotation(&mut self, id: impl Into<NodeId>, radians: f64) {
        let id = id.into();
        self.validate(id);
        self.transform[id.idx as usize].rotation = radians;
        self.mark_transform(id.idx);
    }

    /// Sets a node's scale factors.
    pub fn set_scale(&mut self, id: impl Into<NodeId>, scale: Vec2) {
        let id = id.into();
        self.validate(id);
        self.transform[id.idx as usize].scale = scale;
        self.mark_transform(id.idx);
    }

    /// Sets a literal pivot point.
    ///
    /// For quads this switches the pivot mode to [`PivotMode::Custom`], which
    /// freezes the point across later resizes.
    pub fn set_pivot(&mut self, id: impl Into<NodeId>, pivot: Point) {
        let id = id.into();
        self.validate(id);
        let i = id.idx as usize;
        self.pivot_mode[i] = PivotMode::Custom;
        self.transform[i].pivot = pivot;
        self.mark_transform(id.idx);
    }

    /// Sets the x coordinate of the pivot; see [`set_pivot`](Self::set_pivot).
    pub fn set_pivot_x(&mut self, id: impl Into<NodeId>, x: f64) {
        let id = id.into();
        let y = self.pivot(id).y;
        self.set_pivot(id, Point::new(x, y));
    }

    /// Sets the y coordinate of the pivot; see [`set_pivot`](Self::set_pivot).
    pub fn set_pivot_y(&mut self, id: impl Into<NodeId>, y: f64) {
        let id = id.into();
        let x = self.pivot(id).x;
        self.set_pivot(id, Point::new(x, y));
    }

    /// Replaces a quad's intrinsic size and re-anchors its pivot.
    pub fn set_size(&mut self, id: QuadId, size: Size) {
        self.validate(id.0);
        self.size[id.0.idx as usize] = size;
        self.reanchor(id.0.idx);
        self.dirty.mark(id.0.idx, dirty::CONTENT);
    }

    /// Sets a quad's pivot mode and re-anchors its pivot immediately.
    pub fn set_pivot_mode(&mut self, id: QuadId, mode: PivotMode) {
        self.validate(id.0);
        self.pivot_mode[id.0.idx as usize] = mode;
        self.reanchor(id.0.idx);
    }

    /// Sets what a quad draws.
    pub fn set_content(&mut self, id: QuadId, content: Option<Content>) {
        self.validate(id.0);
        self.content[id.0.idx as usize] = content;
        self.dirty.mark(id.0.idx, dirty::CONTENT);
    }

    /// Names a node, or clears its name with `None`.
    pub fn set_name(&mut self, id: impl Into<NodeId>, name: Option<&str>) {
        let id = id.into();
        self.validate(id);
        self.name[id.idx as usize] = name.map(String::from);
    }

    /// Sets whether touch hit tests may select the node.
    pub fn set_touchable(&mut self, id: impl Into<NodeId>, touchable: bool) {
        let id = id.into();
        self.validate(id);
        self.flags[id.idx as usize].touchable = touchable;
    }

    /// Makes hit tests stop at this container instead of descending.
    pub fn set_hittable(&mut self, id: ContainerId, hittable: bool) {
        self.validate(id.0);
        self.flags[id.0.idx as usize].hittable = hittable;
    }

    /// Opts a node in or out of multiply-color propagation.
    ///
    /// Opting out drops any tint the parent pushed down.
    pub fn set_multiply_color(&mut self, id: impl Into<NodeId>, enabled: bool) {
        let id = id.into();
        self.validate(id);
        let i = id.idx as usize;
        self.flags[i].multiply_color = enabled;
        if !enabled && self.inherited_color[i] != Color::WHITE {
            self.inherited_color[i] = Color::WHITE;
            self.dirty.mark(id.idx, dirty::COLOR);
        }
    }

    /// Sets a node's own color.
    ///
    /// On a container with multiply-color enabled, the accumulated color with
    /// rgb scaled by alpha is pushed one level down, to the children that opt
    /// in. The push is shallow: grandchildren are only reached when the child
    /// container's own color is set.
    pub fn set_color(&mut self, id: impl Into<NodeId>, color: Color) {
        let id = id.into();
        self.validate(id);
        self.color[id.idx as usize] = color;
        self.dirty.mark(id.idx, dirty::COLOR);
        self.push_multiply_color(id.idx);
    }

    /// Sets a node's own alpha, keeping rgb; see [`set_color`](Self::set_color).
    pub fn set_alpha(&mut self, id: impl Into<NodeId>, alpha: f32) {
        let id = id.into();
        let color = self.color(id).with_alpha(alpha);
        self.set_color(id, color);
    }

    // -- Raw-index accessors for backends --
    //
    // These accept raw slot indices (as found in `FrameChanges`) rather than
    // `NodeId` handles, skipping generation validation. Only use with indices
    // that came from `FrameChanges`.

    /// Returns the computed world transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_transform_at(&self, idx: u32) -> Affine {
        self.check_slot(idx);
        self.world_transform[idx as usize]
    }

    /// Returns own color times inherited tint at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_color_at(&self, idx: u32) -> Color {
        self.check_slot(idx);
        self.color[idx as usize] * self.inherited_color[idx as usize]
    }

    /// Returns the quad content at raw slot `idx` (`None` for containers).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn content_at(&self, idx: u32) -> Option<Content> {
        self.check_slot(idx);
        self.content[idx as usize]
    }

    /// Returns the current handle for raw slot `idx`, if the slot is live.
    #[must_use]
    pub fn node_at(&self, idx: u32) -> Option<NodeId> {
        (idx < self.len && self.alive[idx as usize]).then(|| self.id_at(idx))
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len
                && self.generation[id.idx as usize] == id.generation
                && self.alive[id.idx as usize],
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Builds the current handle for a slot.
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// The draw-table entry for the node at `idx`.
    pub(crate) fn handle_at(&self, idx: u32) -> DrawHandle {
        let id = self.id_at(idx);
        match self.kind[idx as usize] {
            NodeKind::Quad => DrawHandle::Leaf(QuadId(id)),
            NodeKind::Container => DrawHandle::Group(ContainerId(id)),
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.kind[i] = kind;
            self.parent[i] = INVALID;
            self.render_parent[i] = INVALID;
            self.children[i].clear();
            self.draw_table[i].clear();
            self.render_slot[i] = None;
            self.transform[i] = Transform2d::IDENTITY;
            self.size[i] = Size::ZERO;
            self.pivot_mode[i] = PivotMode::Custom;
            self.color[i] = Color::WHITE;
            self.inherited_color[i] = Color::WHITE;
            self.flags[i] = NodeFlags::default();
            self.content[i] = None;
            self.name[i] = None;
            self.capture[i] = None;
            self.world_transform[i] = Affine::IDENTITY;
            self.alive[i] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.kind.push(kind);
            self.parent.push(INVALID);
            self.render_parent.push(INVALID);
            self.children.push(Vec::new());
            self.draw_table.push(Vec::new());
            self.render_slot.push(None);
            self.transform.push(Transform2d::IDENTITY);
            self.size.push(Size::ZERO);
            self.pivot_mode.push(PivotMode::Custom);
            self.color.push(Color::WHITE);
            self.inherited_color.push(Color::WHITE);
            self.flags.push(NodeFlags::default());
            self.content.push(None);
            self.name.push(None);
            self.capture.push(None);
            self.world_transform.push(Affine::IDENTITY);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);

        self.id_at(idx)
    }

    /// Frees a slot. The node must already be unlinked from both parents
    /// and have no children.
    pub(crate) fn free(&mut self, idx: u32) {
        let i = idx as usize;
        debug_assert!(self.children[i].is_empty(), "freeing a non-empty container");

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.alive[i] = false;
        self.name[i] = None;
        self.content[i] = None;
        self.render_slot[i] = None;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    /// Links `child`'s world transform to `parent`'s.
    pub(crate) fn attach_render(&mut self, child: u32, parent: u32) {
        let old = self.render_parent[child as usize];
        if old == parent {
            return;
        }
        if old != INVALID {
            self.dirty.remove_dependency(child, old, dirty::TRANSFORM);
        }
        self.render_parent[child as usize] = parent;
        let _ = self.dirty.add_dependency(child, parent, dirty::TRANSFORM);
        self.mark_transform(child);
    }

    /// Cuts `child`'s render link; its world transform becomes its local one.
    pub(crate) fn detach_render(&mut self, child: u32) {
        let old = self.render_parent[child as usize];
        if old == INVALID {
            return;
        }
        self.dirty.remove_dependency(child, old, dirty::TRANSFORM);
        self.render_parent[child as usize] = INVALID;
        self.mark_transform(child);
    }

    fn mark_transform(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Recomputes a quad's pivot from its mode (no-op for `Custom`).
    fn reanchor(&mut self, idx: u32) {
        let i = idx as usize;
        if let Some(pivot) = anchor_point(self.pivot_mode[i], self.size[i], self.config.coordinates)
        {
            self.transform[i].pivot = pivot;
            self.mark_transform(idx);
        }
    }

    fn push_multiply_color(&mut self, idx: u32) {
        let i = idx as usize;
        if self.kind[i] != NodeKind::Container || !self.flags[i].multiply_color {
            return;
        }
        let tint = self.effective_color_at(idx).premultiplied();
        for k in 0..self.children[i].len() {
            let child = self.children[i][k];
            if self.flags[child as usize].multiply_color {
                self.inherited_color[child as usize] = tint;
                self.dirty.mark(child, dirty::COLOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoordinateSystem;

    #[test]
    fn create_and_dispose() {
        let mut store = SceneStore::new();
        let id = store.create_quad(Size::new(10.0, 10.0));
        assert!(store.is_alive(id));
        store.dispose(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = SceneStore::new();
        let id1 = store.create_quad(Size::ZERO);
        store.dispose(id1);
        let id2 = store.create_container();
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.node().index(), id2.node().index());
        assert_ne!(id1.node().generation(), id2.node().generation());
    }

    #[test]
    fn narrowing_matches_kind() {
        let mut store = SceneStore::new();
        let q = store.create_quad(Size::ZERO);
        let c = store.create_container();
        assert_eq!(store.as_quad(q.node()), Some(q));
        assert_eq!(store.as_container(q.node()), None);
        assert_eq!(store.as_container(c.node()), Some(c));
        assert_eq!(store.kind(c), NodeKind::Container);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn disposed_handle_panics_on_get_transform() {
        let mut store = SceneStore::new();
        let id = store.create_quad(Size::ZERO);
        store.dispose(id);
        let _ = store.world_transform(id);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn disposed_handle_panics_on_set_position() {
        let mut store = SceneStore::new();
        let id = store.create_quad(Size::ZERO);
        store.dispose(id);
        store.set_position(id, Point::new(1.0, 1.0));
    }

    #[test]
    fn center_pivot_follows_resize() {
        let mut store = SceneStore::new();
        let q = store.create_quad(Size::new(100.0, 50.0));
        store.set_pivot_mode(q, PivotMode::Center);
        assert_eq!(store.pivot(q), Point::new(50.0, 25.0));

        store.set_size(q, Size::new(200.0, 50.0));
        assert_eq!(store.pivot(q), Point::new(100.0, 25.0));

        store.set_pivot(q, Point::new(10.0, 10.0));
        assert_eq!(store.pivot_mode(q), PivotMode::Custom);
        store.set_size(q, Size::new(400.0, 400.0));
        assert_eq!(store.pivot(q), Point::new(10.0, 10.0));
    }

    #[test]
    fn pivot_axis_setters_freeze_mode() {
        let mut store = SceneStore::new();
        let q = store.create_quad(Size::new(40.0, 20.0));
        store.set_pivot_mode(q, PivotMode::TopRight);
        assert_eq!(store.pivot(q), Point::new(40.0, 0.0));

        store.set_pivot_y(q, 5.0);
        assert_eq!(store.pivot_mode(q), PivotMode::Custom);
        assert_eq!(store.pivot(q), Point::new(40.0, 5.0));

        store.set_pivot_x(q, 1.0);
        assert_eq!(store.pivot(q), Point::new(1.0, 5.0));
    }

    #[test]
    fn simulation_bottom_left_is_origin() {
        let mut store = SceneStore::with_config(SceneConfig::simulation());
        assert_eq!(store.config().coordinates, CoordinateSystem::Simulation);
        let q = store.create_quad(Size::new(30.0, 60.0));
        store.set_pivot_mode(q, PivotMode::BottomLeft);
        assert_eq!(store.pivot(q), Point::ORIGIN);
        store.set_pivot_mode(q, PivotMode::TopLeft);
        assert_eq!(store.pivot(q), Point::new(0.0, 60.0));
    }

    #[test]
    fn set_transform_with_new_pivot_goes_custom() {
        let mut store = SceneStore::new();
        let q = store.create_quad(Size::new(10.0, 10.0));
        store.set_pivot_mode(q, PivotMode::Center);

        let mut xf = store.transform(q);
        xf.position = Point::new(3.0, 3.0);
        store.set_transform(q, xf);
        assert_eq!(store.pivot_mode(q), PivotMode::Center);

        xf.pivot = Point::ORIGIN;
        store.set_transform(q, xf);
        assert_eq!(store.pivot_mode(q), PivotMode::Custom);
    }

    #[test]
    fn multiply_color_is_a_shallow_push() {
        let mut store = SceneStore::new();
        let outer = store.create_container();
        let inner = store.create_container();
        let leaf = store.create_quad(Size::new(1.0, 1.0));
        let plain = store.create_quad(Size::new(1.0, 1.0));
        store.add_child(outer, inner).unwrap();
        store.add_child(outer, plain).unwrap();
        store.add_child(inner, leaf).unwrap();
        for id in [outer.node(), inner.node(), leaf.node()] {
            store.set_multiply_color(id, true);
        }

        store.set_color(outer, Color::new(1.0, 0.5, 0.5, 0.5));
        let tint = Color::new(0.5, 0.25, 0.25, 0.5);
        assert_eq!(store.inherited_color(inner), tint);
        // Opted-out children and grandchildren are untouched.
        assert_eq!(store.inherited_color(plain), Color::WHITE);
        assert_eq!(store.inherited_color(leaf), Color::WHITE);

        // The inner container re-propagates when its own color is set.
        store.set_alpha(inner, 1.0);
        assert_eq!(store.inherited_color(leaf), tint.premultiplied());
    }

    #[test]
    fn opting_out_clears_tint() {
        let mut store = SceneStore::new();
        let c = store.create_container();
        let q = store.create_quad(Size::ZERO);
        store.add_child(c, q).unwrap();
        store.set_multiply_color(c, true);
        store.set_multiply_color(q, true);
        store.set_alpha(c, 0.5);
        assert_eq!(store.effective_color(q).a, 0.5);

        store.set_multiply_color(q, false);
        assert_eq!(store.effective_color(q), Color::WHITE);
    }

    #[test]
    fn names_round_trip() {
        let mut store = SceneStore::new();
        let q = store.create_quad(Size::ZERO);
        assert_eq!(store.name(q), None);
        store.set_name(q, Some("hero"));
        assert_eq!(store.name(q), Some("hero"));
        store.set_name(q, None);
        assert_eq!(store.name(q), None);
    }

    #[test]
    fn roots_skip_children() {
        let mut store = SceneStore::new();
        let a = store.create_container();
        let b = store.create_quad(Size::ZERO);
        let c = store.create_quad(Size::ZERO);
        store.add_child(a, c).unwrap();

        let roots = store.roots();
        assert!(roots.contains(&a.node()));
        assert!(roots.contains(&b.node()));
        assert!(!roots.contains(&c.node()));
    }
}
