// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-plan construction for montage.
//!
//! This crate sits between [`montage_core`]'s evaluated display tree and a
//! drawing backend. It flattens the draw tables into ordered lists:
//!
//! - [`RenderItem`]: one textured or drawable quad to draw
//! - [`RenderPlan`]: the items for one destination, screen or offscreen
//! - [`build_frame`]: every plan a pass needs, offscreen captures first

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod frame;
mod plan;

pub use frame::build_frame;
pub use plan::{PlanTarget, RenderItem, RenderPlan};
