// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a display tree.
//!
//! [`snapshot`] captures the logical tree under a node as a
//! [`serde_json::Value`]. Transforms are the evaluated world transforms, so
//! take the snapshot after [`SceneStore::evaluate`].

use std::io::{self, Write};

use serde_json::{Value, json};

use montage_core::SceneStore;
use montage_core::node::{Content, NodeId, NodeKind};

/// Builds a JSON description of the tree under `root`.
///
/// Each node is an object with `kind`, `index`, `name`, `visible`,
/// `position`, `rotation`, `scale`, `world` (the six affine coefficients)
/// and `color`. Quads add `size`, `pivot` and `content`; containers add
/// `capture` (or `null`) and `children`.
#[must_use]
pub fn snapshot(store: &SceneStore, root: impl Into<NodeId>) -> Value {
    node_value(store, root.into())
}

/// Writes [`snapshot`] as pretty-printed JSON.
pub fn write_snapshot(
    store: &SceneStore,
    root: impl Into<NodeId>,
    writer: &mut dyn Write,
) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &snapshot(store, root))?;
    Ok(())
}

fn node_value(store: &SceneStore, node: NodeId) -> Value {
    let transform = store.transform(node);
    let color = store.effective_color(node).to_array();
    let mut value = json!({
        "kind": match store.kind(node) {
            NodeKind::Quad => "quad",
            NodeKind::Container => "container",
        },
        "index": node.index(),
        "name": store.name(node),
        "visible": store.is_visible(node),
        "position": [transform.position.x, transform.position.y],
        "rotation": transform.rotation,
        "scale": [transform.scale.x, transform.scale.y],
        "world": store.world_transform(node).as_coeffs(),
        "color": color,
    });

    if let Some(quad) = store.as_quad(node) {
        let size = store.size(quad);
        value["size"] = json!([size.width, size.height]);
        value["pivot"] = json!([transform.pivot.x, transform.pivot.y]);
        value["pivot_mode"] = json!(format!("{:?}", store.pivot_mode(quad)));
        value["content"] = match store.content(quad) {
            Some(Content::Drawable(id)) => json!({ "drawable": id.0 }),
            Some(Content::Target(id)) => json!({ "target": id.0 }),
            None => Value::Null,
        };
    }

    if let Some(container) = store.as_container(node) {
        value["capture"] = match store.capture(container) {
            Some(capture) => json!({
                "mode": format!("{:?}", capture.mode),
                "state": format!("{:?}", capture.state),
                "target": capture.target.0,
                "width": capture.viewport.width,
                "height": capture.viewport.height,
            }),
            None => Value::Null,
        };
        value["children"] = Value::Array(
            store
                .children(container)
                .map(|child| node_value(store, child))
                .collect(),
        );
    }
    value
}
