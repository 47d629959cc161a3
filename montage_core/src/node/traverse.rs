// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use core::iter::FusedIterator;
use core::slice;

use super::id::NodeId;
use super::store::SceneStore;

/// An iterator over the direct children of a container.
///
/// Created by [`SceneStore::children`]. Yields back to front; reverse it for
/// front to back.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    store: &'a SceneStore,
    inner: slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a SceneStore, children: &'a [u32]) -> Self {
        Self {
            store,
            inner: children.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().map(|&idx| self.store.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.inner.next_back().map(|&idx| self.store.id_at(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Size;

    use super::*;

    #[test]
    fn iterates_both_ways_and_restarts() {
        let mut store = SceneStore::new();
        let c = store.create_container();
        let ids: Vec<NodeId> = (0..3)
            .map(|_| {
                let q = store.create_quad(Size::ZERO);
                store.add_child(c, q).unwrap();
                q.node()
            })
            .collect();

        let mut iter = store.children(c);
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(ids[0]));
        let resumed = iter.clone();

        let back: Vec<NodeId> = store.children(c).rev().collect();
        assert_eq!(back, [ids[2], ids[1], ids[0]]);

        assert_eq!(iter.count(), 2);
        assert_eq!(resumed.collect::<Vec<_>>(), [ids[1], ids[2]]);
    }
}
