// Copyright 2026 the Montage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene configuration.
//!
//! A [`SceneConfig`] is fixed when a [`SceneStore`](crate::node::SceneStore)
//! is created. The coordinate system it carries is consulted by the pivot
//! policy and by offscreen capture, and never changes afterwards.

use crate::color::Color;

/// Largest render-target edge an offscreen capture may allocate.
pub const MAX_CAPTURE_SIZE: f64 = 2048.0;

/// Orientation of the scene's coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// Origin at the top-left, +Y down (window coordinates).
    #[default]
    Screen,
    /// Origin at the bottom-left, +Y up (simulation coordinates).
    Simulation,
}

impl CoordinateSystem {
    /// Returns `true` when +Y points up.
    #[inline]
    #[must_use]
    pub const fn is_y_up(self) -> bool {
        matches!(self, Self::Simulation)
    }
}

/// Configuration for a [`SceneStore`](crate::node::SceneStore).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Coordinate convention for anchors and capture orientation.
    pub coordinates: CoordinateSystem,
    /// Upper bound for each capture dimension, in pixels.
    pub max_capture_size: f64,
    /// Lower bound for each capture dimension, in pixels.
    ///
    /// Captures of empty containers would otherwise request a zero-sized
    /// render target.
    pub min_capture_size: f64,
    /// Clear color of freshly allocated capture targets.
    pub capture_clear_color: Color,
}

impl SceneConfig {
    /// Window-style coordinates (origin top-left).
    #[must_use]
    pub const fn screen() -> Self {
        Self {
            coordinates: CoordinateSystem::Screen,
            max_capture_size: MAX_CAPTURE_SIZE,
            min_capture_size: 1.0,
            capture_clear_color: Color::TRANSPARENT,
        }
    }

    /// Simulation-style coordinates (origin bottom-left).
    #[must_use]
    pub const fn simulation() -> Self {
        Self {
            coordinates: CoordinateSystem::Simulation,
            ..Self::screen()
        }
    }

    /// Clamps a requested capture dimension into the configured bounds.
    ///
    /// `+inf` clamps to the upper bound and `NaN` to the lower bound. If the
    /// bounds are inverted, the upper bound wins.
    #[must_use]
    pub fn clamp_capture_dimension(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min_capture_size.min(self.max_capture_size);
        }
        value.max(self.min_capture_size).min(self.max_capture_size)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::screen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_in_coordinates() {
        let screen = SceneConfig::screen();
        let sim = SceneConfig::simulation();
        assert_eq!(screen.coordinates, CoordinateSystem::Screen);
        assert_eq!(sim.coordinates, CoordinateSystem::Simulation);
        assert_eq!(screen.max_capture_size, sim.max_capture_size);
        assert_eq!(screen.min_capture_size, sim.min_capture_size);
    }

    #[test]
    fn clamp_capture_dimension_bounds() {
        let config = SceneConfig::default();
        assert_eq!(config.clamp_capture_dimension(3000.0), 2048.0);
        assert_eq!(config.clamp_capture_dimension(0.0), 1.0);
        assert_eq!(config.clamp_capture_dimension(-5.0), 1.0);
        assert_eq!(config.clamp_capture_dimension(f64::NAN), 1.0);
        assert_eq!(config.clamp_capture_dimension(f64::INFINITY), 2048.0);
        assert_eq!(config.clamp_capture_dimension(f64::NEG_INFINITY), 1.0);
        assert_eq!(config.clamp_capture_dimension(320.0), 320.0);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let config = SceneConfig {
            min_capture_size: 64.0,
            max_capture_size: 16.0,
            ..SceneConfig::default()
        };
        assert_eq!(config.clamp_capture_dimension(32.0), 16.0);
        assert_eq!(config.clamp_capture_dimension(f64::INFINITY), 16.0);
        assert_eq!(config.clamp_capture_dimension(f64::NAN), 16.0);
    }

    #[test]
    fn y_up_only_for_simulation() {
        assert!(CoordinateSystem::Simulation.is_y_up());
        assert!(!CoordinateSystem::Screen.is_y_up());
    }
}
