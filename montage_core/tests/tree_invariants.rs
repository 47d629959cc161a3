// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seeded random edit sequences against the container invariants.

use kurbo::Size;
use montage_core::node::{NodeKind, SceneStore};
use montage_core::{ContainerId, NodeId};

/// Small deterministic generator so failures reproduce from the seed.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

fn assert_aligned(store: &SceneStore, c: ContainerId) {
    let kids: Vec<NodeId> = store.children(c).collect();
    let handles: Vec<NodeId> = store.draw_table(c).iter().map(|h| h.node()).collect();
    assert_eq!(kids, handles, "child list and draw table diverged");
    for &kid in &kids {
        assert_eq!(store.parent(kid), Some(c), "child has wrong parent");
        assert_eq!(
            kids.iter().filter(|&&k| k == kid).count(),
            1,
            "child listed twice"
        );
    }
}

fn run(seed: u64) {
    let mut rng = Lcg(seed);
    let mut store = SceneStore::new();
    let containers: Vec<ContainerId> = (0..4).map(|_| store.create_container()).collect();
    let mut loose: Vec<NodeId> = (0..24)
        .map(|_| store.create_quad(Size::new(1.0, 1.0)).node())
        .collect();

    for _ in 0..400 {
        let c = containers[rng.below(containers.len())];
        let n = store.num_children(c);
        match rng.below(8) {
            0 | 1 if !loose.is_empty() => {
                let node = loose[rng.below(loose.len())];
                store.add_child(c, node).unwrap();
            }
            2 if !loose.is_empty() => {
                let node = loose[rng.below(loose.len())];
                // A node already in `c` is detached first, shrinking the list.
                let len = if store.parent(node) == Some(c) { n - 1 } else { n };
                let index = rng.below(len + 1);
                store.add_child_at(c, node, index).unwrap();
                assert_eq!(store.child_index(c, node), Some(index));
                assert!(store.add_child_at(c, node, len + 1).is_err());
            }
            3 if n > 0 => {
                let removed = store.remove_child_at(c, rng.below(n), false);
                assert!(removed.is_some(), "in-range removal failed");
            }
            4 => {
                let (i, j) = (rng.below(n + 1), rng.below(n + 1));
                let swapped = store.swap_children_at(c, i, j);
                assert_eq!(swapped, i < n && j < n);
            }
            5 if n > 1 => {
                let start = rng.below(n);
                let removed = store.remove_children(c, start..start + 2, false);
                assert_eq!(removed, (n - start).min(2));
            }
            6 => {
                // Moving a container into another either succeeds or is a cycle.
                let other = containers[rng.below(containers.len())];
                let result = store.add_child(c, other);
                assert_eq!(result.is_err(), other == c || is_ancestor(&store, other, c));
            }
            7 if !store.destroy_clip_area(c) => {
                // Toggles a live capture. Its image never joins a child list.
                store.set_clip_area(c, None);
                let image = store.capture(c).unwrap().image;
                let other = containers[rng.below(containers.len())];
                assert!(store.add_child(other, image).is_err());
                store.dispose(image);
                assert!(store.is_alive(image));
            }
            _ => {}
        }
        for &c in &containers {
            assert_aligned(&store, c);
        }
        loose.retain(|&node| store.is_alive(node));
    }

    for &c in &containers {
        store.destroy_clip_area(c);
    }
    let a = store.create_quad(Size::new(1.0, 1.0));
    let b = store.create_quad(Size::new(1.0, 1.0));
    assert_ne!(a.node(), b.node(), "freed slot handed out twice");

    let _ = store.evaluate();
    for &c in &containers {
        assert_aligned(&store, c);
        let quads = store.children_of_kind(c, NodeKind::Quad).count();
        let groups = store.children_of_kind(c, NodeKind::Container).count();
        assert_eq!(quads + groups, store.num_children(c));
    }
}

fn is_ancestor(store: &SceneStore, ancestor: ContainerId, node: ContainerId) -> bool {
    let mut cursor = store.parent(node);
    while let Some(p) = cursor {
        if p == ancestor {
            return true;
        }
        cursor = store.parent(p);
    }
    false
}

#[test]
fn random_edits_keep_lists_aligned() {
    for seed in [1, 7, 42, 1234, 98_765] {
        run(seed);
    }
}

#[test]
fn remove_children_clamps_range() {
    let mut store = SceneStore::new();
    let c = store.create_container();
    for _ in 0..3 {
        let q = store.create_quad(Size::ZERO);
        store.add_child(c, q).unwrap();
    }
    assert_eq!(store.remove_children(c, 0..1000, false), 3);
    assert_eq!(store.num_children(c), 0);
    assert!(store.draw_table(c).is_empty());
}

#[test]
fn reparent_moves_between_containers() {
    let mut store = SceneStore::new();
    let a = store.create_container();
    let b = store.create_container();
    let q = store.create_quad(Size::ZERO);
    store.add_child(a, q).unwrap();
    store.add_child(b, q).unwrap();
    assert_eq!(store.num_children(a), 0);
    assert_eq!(store.num_children(b), 1);
    assert_eq!(store.parent(q), Some(b));
    assert_aligned(&store, a);
    assert_aligned(&store, b);
}
