// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render schedule: render targets redrawn every pass.

use alloc::vec::Vec;

use crate::node::RenderTargetId;

/// Ordered set of render targets the backend draws each pass.
///
/// Capture creation inserts its target and capture destruction removes it.
/// Both operations are idempotent: inserting a present target or removing an
/// absent one changes nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSchedule {
    targets: Vec<RenderTargetId>,
}

impl RenderSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Appends `target` unless it is already scheduled.
    ///
    /// Returns `true` if the schedule changed.
    pub fn insert(&mut self, target: RenderTargetId) -> bool {
        if self.contains(target) {
            return false;
        }
        self.targets.push(target);
        true
    }

    /// Removes `target`, preserving the order of the rest.
    ///
    /// Returns `true` if the target was scheduled.
    pub fn remove(&mut self, target: RenderTargetId) -> bool {
        match self.targets.iter().position(|&t| t == target) {
            Some(pos) => {
                self.targets.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole schedule. Duplicates keep their first position.
    pub fn replace_all(&mut self, targets: impl IntoIterator<Item = RenderTargetId>) {
        self.targets.clear();
        for target in targets {
            self.insert(target);
        }
    }

    /// Returns whether `target` is scheduled.
    #[must_use]
    pub fn contains(&self, target: RenderTargetId) -> bool {
        self.targets.contains(&target)
    }

    /// Scheduled targets in render order.
    #[must_use]
    pub fn as_slice(&self) -> &[RenderTargetId] {
        &self.targets
    }

    /// Iterates scheduled targets in render order.
    pub fn iter(&self) -> impl Iterator<Item = RenderTargetId> + '_ {
        self.targets.iter().copied()
    }

    /// Number of scheduled targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` when nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
