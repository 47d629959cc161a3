// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented text outline of a display tree.

use std::io::{self, Write};

use montage_core::SceneStore;
use montage_core::node::{CaptureState, NodeId, NodeKind};

/// Writes one line per node under `root`, children indented two spaces
/// deeper than their parent, back to front.
///
/// ```text
/// container NodeId(0@gen0) "stage" at (0, 0) children=1
///   quad NodeId(1@gen0) "hero" 32x32 at (10, 4) Drawable(DrawableId(7))
/// ```
///
/// Hidden nodes are tagged `hidden`; captured containers show the capture
/// mode, pixel size and state.
pub fn dump_tree(
    store: &SceneStore,
    root: impl Into<NodeId>,
    writer: &mut dyn Write,
) -> io::Result<()> {
    dump_node(store, root.into(), 0, writer)
}

fn dump_node(
    store: &SceneStore,
    node: NodeId,
    depth: usize,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let indent = depth * 2;
    write!(writer, "{:indent$}", "")?;
    match store.kind(node) {
        NodeKind::Quad => write!(writer, "quad {node:?}")?,
        NodeKind::Container => write!(writer, "container {node:?}")?,
    }
    if let Some(name) = store.name(node) {
        write!(writer, " {name:?}")?;
    }
    if let Some(quad) = store.as_quad(node) {
        let size = store.size(quad);
        write!(writer, " {}x{}", size.width, size.height)?;
    }
    let position = store.position(node);
    write!(writer, " at ({}, {})", position.x, position.y)?;
    if store.rotation(node) != 0.0 {
        write!(writer, " rot={}", store.rotation(node))?;
    }
    if !store.is_visible(node) {
        write!(writer, " hidden")?;
    }

    let Some(container) = store.as_container(node) else {
        if let Some(content) = store.as_quad(node).and_then(|q| store.content(q)) {
            write!(writer, " {content:?}")?;
        }
        return writeln!(writer);
    };
    write!(writer, " children={}", store.num_children(container))?;
    if let Some(capture) = store.capture(container) {
        let state = match capture.state {
            CaptureState::Scheduled => "scheduled",
            CaptureState::Committed => "committed",
        };
        write!(
            writer,
            " [{:?} {}x{} {state}]",
            capture.mode, capture.viewport.width, capture.viewport.height,
        )?;
    }
    writeln!(writer)?;
    for child in store.children(container) {
        dump_node(store, child, depth + 1, writer)?;
    }
    Ok(())
}
