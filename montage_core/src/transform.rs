// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposed 2-D node transform.
//!
//! Nodes keep their transform as separate position, rotation, scale and pivot
//! components so that each can be edited on its own. [`Transform2d::to_affine`]
//! composes them into a [`kurbo::Affine`] when a matrix is needed.

use kurbo::{Affine, Point, Vec2};

/// Position, rotation, scale and pivot of a node relative to its parent.
///
/// The composed matrix is `T(position) · R(rotation) · S(scale) · T(-pivot)`:
/// the pivot is moved to the origin, scaled, rotated, then placed at
/// `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2d {
    /// Location of the pivot in parent space.
    pub position: Point,
    /// Rotation in radians.
    pub rotation: f64,
    /// Per-axis scale factors.
    pub scale: Vec2,
    /// Local point that `position` refers to.
    pub pivot: Point,
}

impl Transform2d {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        position: Point::ORIGIN,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
        pivot: Point::ORIGIN,
    };

    /// Creates a pure translation.
    #[inline]
    #[must_use]
    pub const fn from_position(position: Point) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Composes the components into an affine matrix.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-self.pivot.to_vec2())
    }

    /// Is every component [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
            && self.pivot.is_finite()
    }
}

impl Default for Transform2d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform2d::default(), Transform2d::IDENTITY);
        assert_eq!(Transform2d::IDENTITY.to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn translation_moves_points() {
        let t = Transform2d::from_position(Point::new(3.0, 4.0));
        assert!(approx(t.to_affine() * Point::ORIGIN, Point::new(3.0, 4.0)));
    }

    #[test]
    fn pivot_lands_on_position() {
        let t = Transform2d {
            position: Point::new(10.0, 20.0),
            rotation: 1.0,
            scale: Vec2::new(2.0, 3.0),
            pivot: Point::new(5.0, 5.0),
        };
        assert!(approx(t.to_affine() * t.pivot, t.position));
    }

    #[test]
    fn scale_then_translate() {
        let t = Transform2d {
            position: Point::new(3.0, 4.0),
            scale: Vec2::new(2.0, 2.0),
            ..Transform2d::IDENTITY
        };
        assert!(approx(t.to_affine() * Point::new(1.0, 1.0), Point::new(5.0, 6.0)));
    }

    #[test]
    fn rotation_ninety_degrees() {
        let t = Transform2d {
            rotation: core::f64::consts::FRAC_PI_2,
            ..Transform2d::IDENTITY
        };
        assert!(approx(t.to_affine() * Point::new(1.0, 0.0), Point::new(0.0, 1.0)));
    }

    #[test]
    fn nan_detected() {
        let t = Transform2d {
            rotation: f64::NAN,
            ..Transform2d::IDENTITY
        };
        assert!(!t.is_finite());
        assert!(Transform2d::IDENTITY.is_finite());
    }
}
