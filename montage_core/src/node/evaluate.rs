// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass evaluation: dirty draining, world transforms and capture jobs.

use alloc::vec::Vec;
use core::mem;

use kurbo::Affine;

use crate::color::Color;
use crate::dirty;
use crate::trace::{CaptureRenderedEvent, PassSummary, Tracer};

use super::capture::{CaptureMode, CaptureState, CaptureViewport};
use super::id::{ContainerId, INVALID, RenderTargetId};
use super::store::SceneStore;

/// A render target the backend must allocate before drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTargetDesc {
    /// Identifier used by [`Content::Target`](super::Content::Target).
    pub id: RenderTargetId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color the target is cleared to before each capture.
    pub clear_color: Color,
}

/// One subtree to draw into an offscreen target this pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureJob {
    /// The captured container.
    pub container: ContainerId,
    /// Destination target.
    pub target: RenderTargetId,
    /// Region and orientation of the capture.
    pub viewport: CaptureViewport,
    /// Frozen jobs appear once; live jobs every pass.
    pub mode: CaptureMode,
}

/// Output of [`SceneStore::evaluate`]: what changed since the last pass.
///
/// Node entries are raw slot indices, valid for the `_at` accessors on
/// [`SceneStore`] until the next structural edit.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Slots whose world transform was recomputed.
    pub transforms: Vec<u32>,
    /// Slots whose own or inherited color changed.
    pub colors: Vec<u32>,
    /// Slots whose size, content or draw source changed.
    pub content: Vec<u32>,
    /// Slots allocated since the last pass.
    pub added: Vec<u32>,
    /// Slots freed since the last pass.
    pub removed: Vec<u32>,
    /// Whether any child list changed.
    pub topology_changed: bool,
    /// Targets created since the last pass.
    pub allocated: Vec<RenderTargetDesc>,
    /// Targets no longer referenced.
    pub released: Vec<RenderTargetId>,
    /// Captures to draw, in schedule order, before the screen.
    pub captures: Vec<CaptureJob>,
}

impl FrameChanges {
    /// Empties every list, keeping allocations.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.colors.clear();
        self.content.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
        self.allocated.clear();
        self.released.clear();
        self.captures.clear();
    }

    /// Returns `true` if nothing changed and nothing needs drawing offscreen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.colors.is_empty()
            && self.content.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
            && self.allocated.is_empty()
            && self.released.is_empty()
            && self.captures.is_empty()
    }
}

impl SceneStore {
    /// Runs one pass and returns what changed.
    ///
    /// See [`evaluate_into`](Self::evaluate_into).
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes, &mut Tracer::none());
        changes
    }

    /// Runs one pass, writing into a reusable `changes` buffer.
    ///
    /// The pass recomputes world transforms along render links, drains the
    /// color, content and topology channels, hands over allocation and
    /// lifecycle lists, and walks the [`RenderSchedule`] to emit capture jobs.
    /// Every scheduled capture becomes [`CaptureState::Committed`]; frozen
    /// ones leave the schedule.
    ///
    /// [`RenderSchedule`]: crate::schedule::RenderSchedule
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges, tracer: &mut Tracer<'_>) {
        changes.clear();
        let pass_index = self.pass_index;

        for event in &self.pending_events {
            tracer.lifecycle(event);
        }
        self.pending_events.clear();

        let mut transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        transforms.retain(|&idx| self.alive[idx as usize]);
        for &idx in &transforms {
            let i = idx as usize;
            let parent = self.render_parent[i];
            let parent_world = if parent == INVALID {
                Affine::IDENTITY
            } else {
                self.world_transform[parent as usize]
            };
            self.world_transform[i] = parent_world * self.transform[i].to_affine();
        }
        changes.transforms = transforms;

        changes.colors = self.drain_live(dirty::COLOR);
        changes.content = self.drain_live(dirty::CONTENT);
        let topology = self.drain_live(dirty::TOPOLOGY);

        mem::swap(&mut changes.added, &mut self.pending_added);
        mem::swap(&mut changes.removed, &mut self.pending_removed);
        mem::swap(&mut changes.allocated, &mut self.pending_allocated);
        mem::swap(&mut changes.released, &mut self.pending_released);
        changes.topology_changed =
            !topology.is_empty() || !changes.added.is_empty() || !changes.removed.is_empty();

        let scheduled: Vec<RenderTargetId> = self.schedule.iter().collect();
        for target in scheduled {
            let Some(owner) = self.capture_owner(target) else {
                log::warn!("scheduled {target:?} has no owning capture");
                self.schedule.remove(target);
                continue;
            };
            let container = ContainerId(self.id_at(owner));
            let Some(capture) = self.capture[owner as usize].as_mut() else {
                continue;
            };
            capture.state = CaptureState::Committed;
            let frozen = capture.mode == CaptureMode::Frozen;
            changes.captures.push(CaptureJob {
                container,
                target,
                viewport: capture.viewport,
                mode: capture.mode,
            });
            tracer.capture_rendered(&CaptureRenderedEvent {
                pass_index,
                container: container.node(),
                target,
                mode: capture.mode,
                committed: frozen,
            });
            if frozen {
                self.schedule.remove(target);
            }
        }

        tracer.pass_summary(&PassSummary::new(pass_index, changes));
        log::trace!(
            "pass {pass_index}: {} transforms, {} colors, {} content, {} captures",
            changes.transforms.len(),
            changes.colors.len(),
            changes.content.len(),
            changes.captures.len(),
        );
        self.pass_index += 1;
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn pass_index(&self) -> u64 {
        self.pass_index
    }

    fn drain_live(&mut self, channel: understory_dirty::Channel) -> Vec<u32> {
        let mut drained: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        drained.retain(|&idx| self.alive[idx as usize]);
        drained
    }

    fn capture_owner(&self, target: RenderTargetId) -> Option<u32> {
        (0..self.len).find(|&idx| {
            self.alive[idx as usize]
                && self.capture[idx as usize]
                    .as_ref()
                    .is_some_and(|c| c.target == target)
        })
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::*;
    use crate::color::Color;
    use crate::node::{Content, DrawableId, QuadId};

    fn scene() -> (SceneStore, ContainerId, QuadId) {
        let mut store = SceneStore::new();
        let c = store.create_container();
        let q = store.create_quad(Size::new(10.0, 10.0));
        store.add_child(c, q).unwrap();
        (store, c, q)
    }

    #[test]
    fn world_transform_composes_render_parents() {
        let (mut store, c, q) = scene();
        store.set_position(c, Point::new(100.0, 0.0));
        store.set_scale(c, Vec2::new(2.0, 2.0));
        store.set_position(q, Point::new(5.0, 5.0));
        let changes = store.evaluate();
        assert!(changes.transforms.contains(&q.node().index()));
        assert_eq!(
            store.world_transform(q) * Point::ORIGIN,
            Point::new(110.0, 10.0)
        );
    }

    #[test]
    fn parent_move_propagates_to_children() {
        let (mut store, c, q) = scene();
        let _ = store.evaluate();
        store.set_position(c, Point::new(7.0, 0.0));
        let changes = store.evaluate();
        assert_eq!(changes.transforms, &[c.node().index(), q.node().index()]);
        assert_eq!(store.world_transform(q) * Point::ORIGIN, Point::new(7.0, 0.0));
    }

    #[test]
    fn quiet_pass_is_empty() {
        let (mut store, _, _) = scene();
        let first = store.evaluate();
        assert!(!first.is_empty());
        assert!(first.topology_changed);
        assert_eq!(first.added.len(), 2);
        assert!(store.evaluate().is_empty());
        assert_eq!(store.pass_index(), 2);
    }

    #[test]
    fn color_and_content_channels() {
        let (mut store, _, q) = scene();
        let _ = store.evaluate();
        store.set_color(q, Color::new(1.0, 0.0, 0.0, 1.0));
        store.set_content(q, Some(Content::Drawable(DrawableId(4))));
        let changes = store.evaluate();
        assert_eq!(changes.colors, &[q.node().index()]);
        assert_eq!(changes.content, &[q.node().index()]);
        assert!(changes.transforms.is_empty());
        assert!(!changes.topology_changed);
    }

    #[test]
    fn disposed_nodes_are_reported_once() {
        let (mut store, c, q) = scene();
        let _ = store.evaluate();
        store.set_position(q, Point::new(1.0, 1.0));
        store.dispose(q);
        let changes = store.evaluate();
        assert_eq!(changes.removed, &[q.node().index()]);
        assert!(changes.transforms.is_empty());
        assert!(changes.topology_changed);
        assert_eq!(store.num_children(c), 0);
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let (mut store, c, _) = scene();
        let mut changes = FrameChanges::default();
        store.evaluate_into(&mut changes, &mut Tracer::none());
        assert_eq!(changes.added.len(), 2);
        store.set_rotation(c, 1.0);
        store.evaluate_into(&mut changes, &mut Tracer::none());
        assert!(changes.added.is_empty());
        assert_eq!(changes.transforms.len(), 2);
    }

    #[test]
    fn captured_children_are_relative_to_container() {
        let (mut store, c, q) = scene();
        store.set_position(c, Point::new(50.0, 50.0));
        store.set_position(q, Point::new(3.0, 4.0));
        store.set_clip_area(c, None);
        let _ = store.evaluate();

        assert_eq!(store.world_transform(q) * Point::ORIGIN, Point::new(3.0, 4.0));
        let image = store.capture(c).unwrap().image;
        assert_eq!(
            store.world_transform(image) * Point::ORIGIN,
            Point::new(50.0, 50.0)
        );

        store.destroy_clip_area(c);
        let _ = store.evaluate();
        assert_eq!(
            store.world_transform(q) * Point::ORIGIN,
            Point::new(53.0, 54.0)
        );
    }

    #[test]
    fn frozen_capture_renders_once() {
        let (mut store, c, _) = scene();
        let target = store.flatten(c, None);

        let first = store.evaluate();
        assert_eq!(first.allocated.len(), 1);
        assert_eq!(first.allocated[0].id, target);
        assert_eq!(first.captures.len(), 1);
        assert_eq!(first.captures[0].container, c);
        assert_eq!(store.capture(c).unwrap().state, CaptureState::Committed);
        assert!(!store.schedule().contains(target));

        let second = store.evaluate();
        assert!(second.captures.is_empty());
        assert!(store.is_flattened(c));
    }

    #[test]
    fn live_capture_renders_every_pass() {
        let (mut store, c, _) = scene();
        let target = store.set_clip_area(c, None);
        for _ in 0..3 {
            let changes = store.evaluate();
            assert_eq!(changes.captures.len(), 1);
            assert_eq!(changes.captures[0].target, target);
            assert_eq!(changes.captures[0].mode, CaptureMode::Live);
        }
        assert!(store.schedule().contains(target));
    }

    #[test]
    fn captures_follow_schedule_order() {
        let mut store = SceneStore::new();
        let a = store.create_container();
        let b = store.create_container();
        let tb = store.set_clip_area(b, None);
        let ta = store.set_clip_area(a, None);
        let changes = store.evaluate();
        let order: Vec<RenderTargetId> = changes.captures.iter().map(|j| j.target).collect();
        assert_eq!(order, &[tb, ta]);
    }

    #[test]
    fn unrendered_capture_never_reaches_backend() {
        let (mut store, c, _) = scene();
        let _ = store.evaluate();
        store.flatten(c, Some(Size::new(4.0, 4.0)));
        store.unflatten(c);
        let changes = store.evaluate();
        assert!(changes.allocated.is_empty());
        assert!(changes.released.is_empty());
        assert!(changes.captures.is_empty());
    }

    #[test]
    fn edits_before_pass_are_part_of_capture() {
        let (mut store, c, q) = scene();
        store.flatten(c, None);
        // Still scheduled: the image is produced by the next pass.
        store.set_color(q, Color::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(store.capture(c).unwrap().state, CaptureState::Scheduled);
        let changes = store.evaluate();
        assert!(changes.colors.contains(&q.node().index()));
        assert_eq!(changes.captures.len(), 1);
    }
}
