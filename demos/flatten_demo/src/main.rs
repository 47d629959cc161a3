// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop: flattens a badge, clips a scrolling strip, then
//! restores both, logging what a backend would be asked to do each pass.
//!
//! Run with `RUST_LOG=debug` to see capture lifecycle messages from
//! `montage_core`.

use kurbo::{Point, Size, Vec2};
use montage_core::backend::Presenter;
use montage_core::node::{ContainerId, Content, DrawableId, FrameChanges};
use montage_core::trace::Tracer;
use montage_core::{Color, NodeId, PivotMode, SceneStore};
use montage_debug::pretty::PrettyPrintSink;
use montage_debug::tree::dump_tree;
use montage_render::{PlanTarget, build_frame};

/// Stands in for a GPU backend: counts draws and logs target traffic.
struct LoggingPresenter {
    root: NodeId,
    draws: usize,
}

impl Presenter for LoggingPresenter {
    fn apply(&mut self, store: &SceneStore, changes: &FrameChanges) {
        for desc in &changes.allocated {
            log::info!("allocate {:?} {}x{}", desc.id, desc.width, desc.height);
        }
        for plan in build_frame(store, self.root, changes) {
            match plan.target {
                PlanTarget::Screen => log::info!("screen: {} items", plan.items.len()),
                PlanTarget::Offscreen { target, viewport } => log::info!(
                    "capture {target:?} ({}x{}): {} items",
                    viewport.width,
                    viewport.height,
                    plan.items.len()
                ),
            }
            self.draws += plan.items.len();
        }
        for id in &changes.released {
            log::info!("release {id:?}");
        }
    }
}

fn tile(store: &mut SceneStore, parent: ContainerId, drawable: u32, at: Point) -> NodeId {
    let quad = store.create_quad(Size::new(32.0, 32.0));
    store.set_content(quad, Some(Content::Drawable(DrawableId(drawable))));
    store.set_pivot_mode(quad, PivotMode::Center);
    store.set_position(quad, at);
    if let Err(err) = store.add_child(parent, quad) {
        log::error!("could not add tile: {err}");
    }
    quad.node()
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let mut store = SceneStore::new();
    let stage = store.create_container();
    store.set_name(stage, Some("stage"));

    let badge = store.create_container();
    store.set_name(badge, Some("badge"));
    store.set_multiply_color(badge, true);
    if let Err(err) = store.add_child(stage, badge) {
        log::error!("could not add badge: {err}");
    }
    for i in 0..4 {
        let id = tile(&mut store, badge, i, Point::new(16.0 + 32.0 * f64::from(i), 16.0));
        store.set_multiply_color(id, true);
    }
    store.set_color(badge, Color::new(1.0, 0.8, 0.8, 1.0));

    let strip = store.create_container();
    store.set_name(strip, Some("strip"));
    store.set_position(strip, Point::new(0.0, 200.0));
    if let Err(err) = store.add_child(stage, strip) {
        log::error!("could not add strip: {err}");
    }
    let scrolling: Vec<NodeId> = (0..8)
        .map(|i| tile(&mut store, strip, 10 + i, Point::new(40.0 * f64::from(i), 16.0)))
        .collect();

    let mut presenter = LoggingPresenter {
        root: stage.node(),
        draws: 0,
    };
    let mut sink = PrettyPrintSink::stderr();
    let mut changes = FrameChanges::default();

    for frame in 0_u32..6 {
        match frame {
            1 => {
                store.flatten(badge, None);
                store.set_clip_area(strip, Some(Size::new(160.0, 32.0)));
            }
            4 => {
                store.unflatten(badge);
                store.destroy_clip_area(strip);
            }
            _ => {}
        }
        for &node in &scrolling {
            let p = store.position(node);
            store.set_position(node, p - Vec2::new(4.0, 0.0));
        }
        store.set_rotation(badge, 0.05 * f64::from(frame));

        store.evaluate_into(&mut changes, &mut Tracer::new(&mut sink));
        presenter.apply(&store, &changes);
    }

    log::info!("{} quads drawn over 6 passes", presenter.draws);
    let mut out = std::io::stdout();
    if let Err(err) = dump_tree(&store, stage, &mut out) {
        log::error!("tree dump failed: {err}");
    }
}
