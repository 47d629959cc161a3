// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for render passes and capture lifecycles.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`SceneStore::evaluate_into`](crate::node::SceneStore::evaluate_into) calls
//! while running a render pass. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! Capture creation and destruction happen during ordinary edits, which have
//! no sink at hand. The store queues those events and delivers them at the
//! start of the next pass, in the order they occurred.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::node::{CaptureMode, FrameChanges, NodeId, RenderTargetId};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a container gains an offscreen capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureCreatedEvent {
    /// The captured container.
    pub container: NodeId,
    /// The target the capture renders into.
    pub target: RenderTargetId,
    /// Frozen or live.
    pub mode: CaptureMode,
    /// Target width in pixels, after clamping.
    pub width: u32,
    /// Target height in pixels, after clamping.
    pub height: u32,
}

/// Emitted when a capture is torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureDestroyedEvent {
    /// The container that owned the capture.
    ///
    /// May already be stale if the capture went away with its container.
    pub container: NodeId,
    /// The released target.
    pub target: RenderTargetId,
    /// Frozen or live.
    pub mode: CaptureMode,
    /// Whether any pass rendered the capture before it was destroyed.
    pub rendered: bool,
}

/// Emitted for every capture job scheduled in a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureRenderedEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// The captured container.
    pub container: NodeId,
    /// The target being drawn.
    pub target: RenderTargetId,
    /// Frozen or live.
    pub mode: CaptureMode,
    /// Set for frozen captures, which leave the schedule after this pass.
    pub committed: bool,
}

/// Per-pass change counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Nodes whose world transform was recomputed.
    pub transforms: usize,
    /// Nodes whose effective color changed.
    pub colors: usize,
    /// Nodes whose content, size or visibility changed.
    pub content: usize,
    /// Nodes created since the previous pass.
    pub added: usize,
    /// Nodes disposed since the previous pass.
    pub removed: usize,
    /// Render targets the backend must allocate.
    pub targets_allocated: usize,
    /// Render targets the backend may free.
    pub targets_released: usize,
    /// Capture jobs in this pass.
    pub captures_rendered: usize,
    /// Frozen captures committed by this pass.
    pub frozen_committed: usize,
}

impl PassSummary {
    /// Counts the changes of a finished pass.
    #[must_use]
    pub fn new(pass_index: u64, changes: &FrameChanges) -> Self {
        Self {
            pass_index,
            transforms: changes.transforms.len(),
            colors: changes.colors.len(),
            content: changes.content.len(),
            added: changes.added.len(),
            removed: changes.removed.len(),
            targets_allocated: changes.allocated.len(),
            targets_released: changes.released.len(),
            captures_rendered: changes.captures.len(),
            frozen_committed: changes
                .captures
                .iter()
                .filter(|job| job.mode == CaptureMode::Frozen)
                .count(),
        }
    }
}

/// Capture lifecycle events waiting for the next pass.
#[derive(Clone, Copy, Debug)]
pub(crate) enum LifecycleEvent {
    Created(CaptureCreatedEvent),
    Destroyed(CaptureDestroyedEvent),
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from render passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a capture was created since the previous pass.
    fn on_capture_created(&mut self, e: &CaptureCreatedEvent) {
        _ = e;
    }

    /// Called when a capture was destroyed since the previous pass.
    fn on_capture_destroyed(&mut self, e: &CaptureDestroyedEvent) {
        _ = e;
    }

    /// Called for each capture job of a pass, in schedule order.
    fn on_capture_rendered(&mut self, e: &CaptureRenderedEvent) {
        _ = e;
    }

    /// Called once at the end of every pass.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`CaptureCreatedEvent`].
    #[inline]
    pub fn capture_created(&mut self, e: &CaptureCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_capture_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CaptureDestroyedEvent`].
    #[inline]
    pub fn capture_destroyed(&mut self, e: &CaptureDestroyedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_capture_destroyed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CaptureRenderedEvent`].
    #[inline]
    pub fn capture_rendered(&mut self, e: &CaptureRenderedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_capture_rendered(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    pub(crate) fn lifecycle(&mut self, e: &LifecycleEvent) {
        match e {
            LifecycleEvent::Created(e) => self.capture_created(e),
            LifecycleEvent::Destroyed(e) => self.capture_destroyed(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
