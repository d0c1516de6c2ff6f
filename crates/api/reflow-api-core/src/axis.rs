//! One dimension of a box. All numeric types use f32.

use serde::{Deserialize, Serialize};

/// A single axis of a rectangle: `min <= max` by construction.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    pub min: f32,
    pub max: f32,
}

impl Axis {
    /// Construct an axis, swapping the endpoints if they arrive reversed.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn mid(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Shift both endpoints by `d`.
    #[inline]
    pub fn translated(&self, d: f32) -> Self {
        Self {
            min: self.min + d,
            max: self.max + d,
        }
    }

    /// Scale both endpoints about `origin_point`.
    #[inline]
    pub fn scaled_about(&self, scale: f32, origin_point: f32) -> Self {
        Self {
            min: origin_point + (self.min - origin_point) * scale,
            max: origin_point + (self.max - origin_point) * scale,
        }
    }

    /// Approximate equality, used for layout-change detection.
    #[inline]
    pub fn approx_eq(&self, other: &Axis, eps: f32) -> bool {
        (self.min - other.min).abs() <= eps && (self.max - other.max).abs() <= eps
    }
}
