// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing.

use kurbo::Point;

use super::id::NodeId;
use super::store::{NodeKind, SceneStore};

impl SceneStore {
    /// Finds the frontmost node under `point` in the subtree rooted at `node`.
    ///
    /// `point` is expressed in the space of `target_space`: the node itself,
    /// some other node, or the scene root when `None`. It is mapped into
    /// `node`'s local space through the logical tree, so captured subtrees
    /// hit test exactly as they would live.
    ///
    /// - A quad is hit when the point lies in its [`rect`](Self::rect).
    /// - A `hittable` container is tested like a quad against its own rect
    ///   and returns itself instead of descending.
    /// - Any other container scans its children front to back and returns
    ///   the first hit.
    ///
    /// With `for_touch`, nodes that are invisible or not touchable are never
    /// hit and stop the descent into their subtree.
    #[must_use]
    pub fn hit_test(
        &self,
        node: impl Into<NodeId>,
        point: Point,
        target_space: Option<NodeId>,
        for_touch: bool,
    ) -> Option<NodeId> {
        let node = node.into();
        self.validate(node);
        let local = match target_space {
            Some(space) if space == node => point,
            Some(space) => {
                self.validate(space);
                let to_local = self.scene_transform_at(node.idx).inverse()
                    * self.scene_transform_at(space.idx);
                to_local * point
            }
            None => self.scene_transform_at(node.idx).inverse() * point,
        };
        self.hit_test_local(node.idx, local, for_touch)
    }

    fn hit_test_local(&self, idx: u32, local: Point, for_touch: bool) -> Option<NodeId> {
        let i = idx as usize;
        let flags = self.flags[i];
        if for_touch && !(flags.visible && flags.touchable) {
            return None;
        }
        if self.kind[i] == NodeKind::Quad || flags.hittable {
            return self
                .rect_at(idx)
                .contains(local)
                .then(|| self.id_at(idx));
        }
        self.children[i].iter().rev().find_map(|&child| {
            let child_local = self.transform[child as usize].to_affine().inverse() * local;
            self.hit_test_local(child, child_local, for_touch)
        })
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Size, Vec2};

    use super::*;
    use crate::node::ContainerId;

    fn overlapping() -> (SceneStore, ContainerId, NodeId, NodeId) {
        let mut store = SceneStore::new();
        let c = store.create_container();
        let back = store.create_quad(Size::new(50.0, 50.0));
        let front = store.create_quad(Size::new(50.0, 50.0));
        store.add_child(c, back).unwrap();
        store.add_child(c, front).unwrap();
        (store, c, back.node(), front.node())
    }

    #[test]
    fn later_child_wins() {
        let (store, c, _, front) = overlapping();
        assert_eq!(
            store.hit_test(c, Point::new(10.0, 10.0), None, false),
            Some(front)
        );
    }

    #[test]
    fn hittable_container_returns_itself() {
        let (mut store, c, _, _) = overlapping();
        store.set_hittable(c, true);
        assert_eq!(
            store.hit_test(c, Point::new(10.0, 10.0), None, false),
            Some(c.node())
        );
        assert_eq!(store.hit_test(c, Point::new(90.0, 10.0), None, false), None);
    }

    #[test]
    fn hidden_hittable_container_ignores_touch() {
        let (mut store, c, _, _) = overlapping();
        store.set_hittable(c, true);
        let p = Point::new(10.0, 10.0);

        store.set_visible(c, false);
        assert_eq!(store.hit_test(c, p, None, true), None);
        assert_eq!(store.hit_test(c, p, None, false), Some(c.node()));

        store.set_visible(c, true);
        store.set_touchable(c, false);
        assert_eq!(store.hit_test(c, p, None, true), None);
        assert_eq!(store.hit_test(c, p, None, false), Some(c.node()));

        store.set_touchable(c, true);
        assert_eq!(store.hit_test(c, p, None, true), Some(c.node()));
    }

    #[test]
    fn touch_skips_untouchable_children() {
        let (mut store, c, back, front) = overlapping();
        store.set_touchable(front, false);
        assert_eq!(
            store.hit_test(c, Point::new(10.0, 10.0), None, true),
            Some(back)
        );
        // Without `for_touch` the flag is ignored.
        assert_eq!(
            store.hit_test(c, Point::new(10.0, 10.0), None, false),
            Some(front)
        );

        store.set_visible(c, false);
        assert_eq!(store.hit_test(c, Point::new(10.0, 10.0), None, true), None);
    }

    #[test]
    fn points_map_through_transforms() {
        let (mut store, c, back, front) = overlapping();
        store.set_position(front, Point::new(100.0, 0.0));
        store.set_position(c, Point::new(1000.0, 0.0));
        store.set_scale(c, Vec2::new(2.0, 2.0));

        // Scene-space point over the back quad.
        assert_eq!(
            store.hit_test(c, Point::new(1020.0, 20.0), None, false),
            Some(back)
        );
        // The same spot in the container's own space.
        assert_eq!(
            store.hit_test(c, Point::new(10.0, 10.0), Some(c.node()), false),
            Some(back)
        );
        // A point given in the front quad's space.
        assert_eq!(
            store.hit_test(c, Point::new(5.0, 5.0), Some(front), false),
            Some(front)
        );
        assert_eq!(store.hit_test(c, Point::new(75.0, 10.0), Some(c.node()), false), None);
    }

    #[test]
    fn captured_subtree_still_hit_tests() {
        let (mut store, c, _, front) = overlapping();
        store.flatten(c, None);
        let _ = store.evaluate();
        assert_eq!(
            store.hit_test(c, Point::new(10.0, 10.0), None, false),
            Some(front)
        );
    }
}
