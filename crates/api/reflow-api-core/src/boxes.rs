//! Rectangles and 2D points.
//!
//! A `LayoutBox` is an immutable snapshot of a rectangle in some coordinate
//! space (viewport-relative or layout-relative); consumers hold several named
//! boxes per node simultaneously and never mutate one in place.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;

/// 2D point. Also used for per-axis scale factors (tree scale), where the
/// neutral value is `{1, 1}`.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Neutral scale factor.
    pub fn one() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// A rectangle expressed as two independent axes.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LayoutBox {
    pub x: Axis,
    pub y: Axis,
}

impl LayoutBox {
    pub fn new(x: Axis, y: Axis) -> Self {
        Self { x, y }
    }

    /// Convenience constructor from viewport edges.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: Axis::new(left, right),
            y: Axis::new(top, bottom),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x.length()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y.length()
    }

    #[inline]
    pub fn approx_eq(&self, other: &LayoutBox, eps: f32) -> bool {
        self.x.approx_eq(&other.x, eps) && self.y.approx_eq(&other.y, eps)
    }
}
