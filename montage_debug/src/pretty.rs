// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use montage_core::node::CaptureMode;
use montage_core::trace::{
    CaptureCreatedEvent, CaptureDestroyedEvent, CaptureRenderedEvent, PassSummary, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn mode_name(mode: CaptureMode) -> &'static str {
    match mode {
        CaptureMode::Frozen => "frozen",
        CaptureMode::Live => "live",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_capture_created(&mut self, e: &CaptureCreatedEvent) {
        let _ = writeln!(
            self.writer,
            "[capture:create] {} container={:?} target={:?} size={}x{}",
            mode_name(e.mode),
            e.container,
            e.target,
            e.width,
            e.height,
        );
    }

    fn on_capture_destroyed(&mut self, e: &CaptureDestroyedEvent) {
        let rendered = if e.rendered { "rendered" } else { "never-rendered" };
        let _ = writeln!(
            self.writer,
            "[capture:destroy] {} container={:?} target={:?} {rendered}",
            mode_name(e.mode),
            e.container,
            e.target,
        );
    }

    fn on_capture_rendered(&mut self, e: &CaptureRenderedEvent) {
        let _ = writeln!(
            self.writer,
            "[capture:render] pass={} {} target={:?}{}",
            e.pass_index,
            mode_name(e.mode),
            e.target,
            if e.committed { " committed" } else { "" },
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] pass={} transforms={} colors={} content={} added={} removed={} \
             targets=+{}/-{} captures={} frozen={}",
            s.pass_index,
            s.transforms,
            s.colors,
            s.content,
            s.added,
            s.removed,
            s.targets_allocated,
            s.targets_released,
            s.captures_rendered,
            s.frozen_committed,
        );
    }
}
