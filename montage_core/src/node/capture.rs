// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offscreen capture of a container's subtree.
//!
//! A capture renders a container's children into an offscreen target and
//! draws the result as a single image quad in their place. Capture is
//! deferred: creating one only schedules the target, and the pixels are
//! produced by the backend for the next [`evaluate`](SceneStore::evaluate)
//! pass. Edits made before that pass are therefore part of the image.
//!
//! - [`CaptureMode::Frozen`] ("flatten") is rendered by exactly one pass and
//!   then leaves the [`RenderSchedule`](crate::schedule::RenderSchedule).
//! - [`CaptureMode::Live`] ("clip area") is rendered by every pass.
//!
//! While a capture exists the container's children are detached from the
//! render chain, so their world transforms are relative to the container
//! origin. Hit testing and geometry keep using the logical tree and are
//! unaffected.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::CoordinateSystem;
use crate::dirty;
use crate::pivot::PivotMode;
use crate::trace::{CaptureCreatedEvent, CaptureDestroyedEvent, LifecycleEvent};

use super::evaluate::RenderTargetDesc;
use super::id::{Content, ContainerId, INVALID, QuadId, RenderTargetId};
use super::store::{DrawSource, SceneStore};

/// How often a capture is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptureMode {
    /// Rendered once, then kept as a still image.
    Frozen,
    /// Re-rendered on every pass.
    Live,
}

/// Whether a capture has been rendered yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// Waiting for its first pass.
    Scheduled,
    /// Rendered by at least one pass.
    Committed,
}

/// Maps a region of a container's space onto a render target.
///
/// Normalized device coordinates are `offset + 2·(p − region.origin) / scale`.
/// In screen coordinates the scale's y is negative so that the top of the
/// region lands on NDC `y = 1`; in simulation coordinates the bottom of the
/// region lands on NDC `y = −1`. Either way the captured image matches the
/// on-screen orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureViewport {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// The captured region, in the container's local space.
    pub region: Rect,
    /// Region extent per two NDC units, signed by axis direction.
    pub scale: Vec2,
    /// NDC coordinate of the region origin.
    pub offset: Vec2,
}

impl CaptureViewport {
    /// Builds a viewport capturing `region` into a `width` × `height` target.
    #[must_use]
    pub fn new(region: Rect, width: u32, height: u32, coordinates: CoordinateSystem) -> Self {
        let (w, h) = (region.width(), region.height());
        let (scale, offset) = match coordinates {
            CoordinateSystem::Screen => (Vec2::new(w, -h), Vec2::new(-1.0, 1.0)),
            CoordinateSystem::Simulation => (Vec2::new(w, h), Vec2::new(-1.0, -1.0)),
        };
        Self {
            width,
            height,
            region,
            scale,
            offset,
        }
    }

    /// Target size in pixels.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Maps a container-space point to normalized device coordinates.
    #[must_use]
    pub fn to_ndc(&self, p: Point) -> Point {
        let d = p - self.region.origin();
        Point::new(
            self.offset.x + 2.0 * d.x / self.scale.x,
            self.offset.y + 2.0 * d.y / self.scale.y,
        )
    }

    /// Maps a container-space point to target pixels (row 0 at the top).
    #[must_use]
    pub fn to_target(&self, p: Point) -> Point {
        let ndc = self.to_ndc(p);
        Point::new(
            (ndc.x + 1.0) * 0.5 * f64::from(self.width),
            (1.0 - ndc.y) * 0.5 * f64::from(self.height),
        )
    }
}

/// A container's capture record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffscreenCapture {
    /// The target the subtree renders into.
    pub target: RenderTargetId,
    /// Region and orientation of the capture.
    pub viewport: CaptureViewport,
    /// Frozen or live.
    pub mode: CaptureMode,
    /// Rendered yet or not.
    pub state: CaptureState,
    /// The quad that draws the target in place of the children.
    pub image: QuadId,
}

impl SceneStore {
    /// Starts capturing `container`'s subtree into an offscreen target.
    ///
    /// An existing capture is destroyed first. The captured region is
    /// `(0, 0, w, h)` for an explicit `size`, or the container's
    /// [`rect`](Self::rect) otherwise. Each dimension is clamped to the
    /// configured capture bounds. The new target is reported in the next
    /// [`FrameChanges::allocated`](super::FrameChanges::allocated) and
    /// rendered by the next pass.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn create_capture(
        &mut self,
        container: ContainerId,
        mode: CaptureMode,
        size: Option<Size>,
    ) -> RenderTargetId {
        self.validate(container.0);
        let c = container.0.idx;
        self.destroy_capture_at(c);

        let requested = match size {
            Some(size) => size.to_rect(),
            None => self.rect_at(c),
        };
        let width = self.config.clamp_capture_dimension(requested.width());
        let height = self.config.clamp_capture_dimension(requested.height());
        if width != requested.width() || height != requested.height() {
            log::warn!(
                "capture of {container:?} clamped from {}x{} to {width}x{height}",
                requested.width(),
                requested.height(),
            );
        }
        let region = Rect::from_origin_size(requested.origin(), Size::new(width, height));
        let viewport = CaptureViewport::new(
            region,
            pixel_extent(width),
            pixel_extent(height),
            self.config.coordinates,
        );

        // Children render only into the capture from now on.
        for k in 0..self.children[c as usize].len() {
            let child = self.children[c as usize][k];
            self.detach_render(child);
        }

        let target = RenderTargetId(self.next_target);
        self.next_target += 1;
        self.schedule.insert(target);
        self.pending_allocated.push(RenderTargetDesc {
            id: target,
            width: viewport.width,
            height: viewport.height,
            clear_color: self.config.capture_clear_color,
        });

        let image = self.create_quad(region.size());
        let anchor = if self.config.coordinates.is_y_up() {
            PivotMode::BottomLeft
        } else {
            PivotMode::TopLeft
        };
        self.set_pivot_mode(image, anchor);
        self.set_position(image, region.origin());
        self.set_content(image, Some(Content::Target(target)));
        self.attach_render(image.0.idx, c);

        self.capture[c as usize] = Some(OffscreenCapture {
            target,
            viewport,
            mode,
            state: CaptureState::Scheduled,
            image,
        });
        if self.render_slot[c as usize].is_some() {
            self.render_slot[c as usize] = Some(DrawSource::Image(image));
        }
        self.dirty.mark(c, dirty::CONTENT);

        log::debug!(
            "{mode:?} capture of {container:?} into {target:?} ({}x{})",
            viewport.width,
            viewport.height,
        );
        self.pending_events
            .push(LifecycleEvent::Created(CaptureCreatedEvent {
                container: container.0,
                target,
                mode,
                width: viewport.width,
                height: viewport.height,
            }));
        target
    }

    /// Tears down `container`'s capture and restores per-child drawing.
    ///
    /// Returns `false` (and does nothing) if there is no capture.
    pub fn destroy_capture(&mut self, container: ContainerId) -> bool {
        self.validate(container.0);
        self.destroy_capture_at(container.0.idx)
    }

    /// Captures the subtree once; see [`create_capture`](Self::create_capture).
    pub fn flatten(&mut self, container: ContainerId, size: Option<Size>) -> RenderTargetId {
        self.create_capture(container, CaptureMode::Frozen, size)
    }

    /// Removes a capture of either mode.
    pub fn unflatten(&mut self, container: ContainerId) -> bool {
        self.destroy_capture(container)
    }

    /// Captures the subtree on every pass; see
    /// [`create_capture`](Self::create_capture).
    pub fn set_clip_area(&mut self, container: ContainerId, size: Option<Size>) -> RenderTargetId {
        self.create_capture(container, CaptureMode::Live, size)
    }

    /// Removes a capture of either mode.
    pub fn destroy_clip_area(&mut self, container: ContainerId) -> bool {
        self.destroy_capture(container)
    }

    /// Moves the given targets to the front of the render schedule.
    ///
    /// Captures render in schedule order, so a nested capture listed first is
    /// up to date when its enclosing capture samples it. Targets that are not
    /// scheduled are ignored, and the rest keep their relative order.
    pub fn reorder_schedule(&mut self, first: impl IntoIterator<Item = RenderTargetId>) {
        let mut order: Vec<RenderTargetId> = first
            .into_iter()
            .filter(|&target| self.schedule.contains(target))
            .collect();
        let rest: Vec<RenderTargetId> = self
            .schedule
            .iter()
            .filter(|target| !order.contains(target))
            .collect();
        order.extend(rest);
        self.schedule.replace_all(order);
    }

    /// Returns `true` while a frozen capture exists.
    #[must_use]
    pub fn is_flattened(&self, container: ContainerId) -> bool {
        self.capture(container)
            .is_some_and(|c| c.mode == CaptureMode::Frozen)
    }

    /// Returns `true` while a live capture exists.
    #[must_use]
    pub fn has_clip_area(&self, container: ContainerId) -> bool {
        self.capture(container)
            .is_some_and(|c| c.mode == CaptureMode::Live)
    }

    /// Returns `container`'s capture record, if any.
    #[must_use]
    pub fn capture(&self, container: ContainerId) -> Option<&OffscreenCapture> {
        self.validate(container.0);
        self.capture[container.0.idx as usize].as_ref()
    }

    /// Returns `true` if `idx` is the image quad of some capture.
    ///
    /// Capture images are the only nodes with a render parent but no logical
    /// parent.
    pub(crate) fn is_capture_image_at(&self, idx: u32) -> bool {
        let i = idx as usize;
        self.parent[i] == INVALID && self.render_parent[i] != INVALID
    }

    pub(crate) fn destroy_capture_at(&mut self, c: u32) -> bool {
        let Some(capture) = self.capture[c as usize].take() else {
            return false;
        };

        if self.render_slot[c as usize].is_some() {
            self.render_slot[c as usize] = Some(DrawSource::Table);
        }
        self.dirty.mark(c, dirty::CONTENT);

        for k in 0..self.children[c as usize].len() {
            let child = self.children[c as usize][k];
            self.attach_render(child, c);
        }

        self.schedule.remove(capture.target);
        let image = capture.image.0.idx;
        self.detach_render(image);
        self.free(image);

        // A target no pass has seen yet was never announced to the backend.
        match self
            .pending_allocated
            .iter()
            .position(|desc| desc.id == capture.target)
        {
            Some(pos) => {
                self.pending_allocated.remove(pos);
            }
            None => self.pending_released.push(capture.target),
        }

        let container = self.id_at(c);
        log::debug!(
            "destroyed {:?} capture of {container:?} ({:?})",
            capture.mode,
            capture.target,
        );
        self.pending_events
            .push(LifecycleEvent::Destroyed(CaptureDestroyedEvent {
                container,
                target: capture.target,
                mode: capture.mode,
                rendered: capture.state == CaptureState::Committed,
            }));
        true
    }
}

/// Rounds a clamped, non-negative capture dimension up to whole pixels.
fn pixel_extent(value: f64) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "capture dimensions are clamped to the configured maximum first"
    )]
    let whole = value as u32;
    if f64::from(whole) < value {
        whole + 1
    } else {
        whole
    }
}
