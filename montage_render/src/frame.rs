// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-pass plan assembly.

use alloc::vec::Vec;

use montage_core::node::{FrameChanges, NodeId, SceneStore};

use crate::plan::RenderPlan;

/// Builds every plan for one pass.
///
/// Returns one offscreen plan per [`FrameChanges::captures`] entry, in
/// schedule order, followed by the screen plan for `root`. Backends draw the
/// plans in the returned order so captured images are ready before the
/// screen samples them.
#[must_use]
pub fn build_frame(
    store: &SceneStore,
    root: impl Into<NodeId>,
    changes: &FrameChanges,
) -> Vec<RenderPlan> {
    let mut plans: Vec<RenderPlan> = changes
        .captures
        .iter()
        .map(|job| RenderPlan::for_capture(store, job))
        .collect();
    plans.push(RenderPlan::for_screen(store, root));
    plans
}

#[cfg(test)]
mod tests {
    use kurbo::Size;
    use montage_core::node::{Content, DrawableId};

    use super::*;
    use crate::plan::PlanTarget;

    #[test]
    fn offscreen_plans_precede_screen() {
        let mut store = SceneStore::new();
        let root = store.create_container();
        let live = store.create_container();
        let frozen = store.create_container();
        store.add_child(root, live).unwrap();
        store.add_child(root, frozen).unwrap();
        for c in [live, frozen] {
            let q = store.create_quad(Size::new(8.0, 8.0));
            store.set_content(q, Some(Content::Drawable(DrawableId(0))));
            store.add_child(c, q).unwrap();
        }
        let live_target = store.set_clip_area(live, None);
        let frozen_target = store.flatten(frozen, None);

        let changes = store.evaluate();
        let plans = build_frame(&store, root, &changes);
        assert_eq!(plans.len(), 3);
        let targets: Vec<PlanTarget> = plans.iter().map(|p| p.target).collect();
        assert!(matches!(
            targets[0],
            PlanTarget::Offscreen { target, .. } if target == live_target
        ));
        assert!(matches!(
            targets[1],
            PlanTarget::Offscreen { target, .. } if target == frozen_target
        ));
        assert_eq!(targets[2], PlanTarget::Screen);
        assert_eq!(plans[2].items.len(), 2);

        // The frozen capture is not redrawn; the live one is.
        let changes = store.evaluate();
        let plans = build_frame(&store, root, &changes);
        assert_eq!(plans.len(), 2);
    }

    #[test]
    fn quiet_pass_yields_screen_only() {
        let mut store = SceneStore::new();
        let root = store.create_container();
        let changes = store.evaluate();
        let plans = build_frame(&store, root, &changes);
        assert_eq!(plans.len(), 1);
        assert!(plans[0].is_empty());
    }
}
