// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named pivot anchors.
//!
//! A node's pivot is the local point its position, rotation and scale are
//! applied around. Quads can either carry a literal pivot
//! ([`PivotMode::Custom`]) or follow one of nine named anchors, in which case
//! the store recomputes the point whenever the quad is resized.

use kurbo::{Point, Size};

use crate::config::CoordinateSystem;

/// Vertical component of a named anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalAnchor {
    /// Bottom edge.
    Bottom,
    /// Vertical center.
    Center,
    /// Top edge.
    Top,
}

/// Horizontal component of a named anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalAnchor {
    /// Left edge.
    Left,
    /// Horizontal center.
    Center,
    /// Right edge.
    Right,
}

/// How a quad's pivot is determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PivotMode {
    /// The pivot is whatever was last set explicitly.
    #[default]
    Custom,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
    /// Middle of the left edge.
    CenterLeft,
    /// Center of the rectangle.
    Center,
    /// Middle of the right edge.
    CenterRight,
    /// Top-left corner.
    TopLeft,
    /// Middle of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
}

impl PivotMode {
    /// Every named mode, excluding [`Custom`](Self::Custom).
    pub const NAMED: [Self; 9] = [
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
    ];

    /// Splits a named mode into its anchors; `None` for `Custom`.
    #[must_use]
    pub const fn anchors(self) -> Option<(VerticalAnchor, HorizontalAnchor)> {
        use HorizontalAnchor as H;
        use VerticalAnchor as V;
        match self {
            Self::Custom => None,
            Self::BottomLeft => Some((V::Bottom, H::Left)),
            Self::BottomCenter => Some((V::Bottom, H::Center)),
            Self::BottomRight => Some((V::Bottom, H::Right)),
            Self::CenterLeft => Some((V::Center, H::Left)),
            Self::Center => Some((V::Center, H::Center)),
            Self::CenterRight => Some((V::Center, H::Right)),
            Self::TopLeft => Some((V::Top, H::Left)),
            Self::TopCenter => Some((V::Top, H::Center)),
            Self::TopRight => Some((V::Top, H::Right)),
        }
    }
}

/// Computes the local anchor point of a `size` rectangle for `mode`.
///
/// Returns `None` for [`PivotMode::Custom`]; the caller keeps its explicit
/// point. Top and bottom swap their y value between the two coordinate
/// systems: in [`Screen`](CoordinateSystem::Screen) space the top edge is at
/// `y = 0`, in [`Simulation`](CoordinateSystem::Simulation) space it is at
/// `y = height`.
#[must_use]
pub fn anchor_point(mode: PivotMode, size: Size, coordinates: CoordinateSystem) -> Option<Point> {
    let (vertical, horizontal) = mode.anchors()?;
    let x = match horizontal {
        HorizontalAnchor::Left => 0.0,
        HorizontalAnchor::Center => size.width * 0.5,
        HorizontalAnchor::Right => size.width,
    };
    let y = match (vertical, coordinates) {
        (VerticalAnchor::Center, _) => size.height * 0.5,
        (VerticalAnchor::Top, CoordinateSystem::Screen)
        | (VerticalAnchor::Bottom, CoordinateSystem::Simulation) => 0.0,
        (VerticalAnchor::Bottom, CoordinateSystem::Screen)
        | (VerticalAnchor::Top, CoordinateSystem::Simulation) => size.height,
    };
    Some(Point::new(x, y))
}
