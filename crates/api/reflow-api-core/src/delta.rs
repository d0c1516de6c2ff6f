//! Delta math: the affine per-axis transform mapping a "before" axis onto an
//! "after" axis.
//!
//! Conventions:
//! - `scale = after_size / before_size`, guarded so a zero-sized before axis
//!   yields `scale = 1` instead of dividing by zero.
//! - `origin_point` is the before-axis point that remains fixed under the
//!   scale. The leading edge (`before.min`) is used so that border- and
//!   padding-relative children stay anchored, rather than the center.
//! - `translate` is the residual offset once scale is applied about that
//!   origin: `translate = after.min - before.min * scale` for the leading-edge
//!   convention.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::boxes::LayoutBox;

/// Tolerance below which a delta component counts as identity.
const IDENTITY_EPS: f32 = 1e-4;

/// Affine transform for one axis: scale about `origin_point`, then translate.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AxisDelta {
    pub translate: f32,
    pub scale: f32,
    pub origin_point: f32,
}

impl Default for AxisDelta {
    fn default() -> Self {
        Self {
            translate: 0.0,
            scale: 1.0,
            origin_point: 0.0,
        }
    }
}

impl AxisDelta {
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.translate.abs() <= IDENTITY_EPS && (self.scale - 1.0).abs() <= IDENTITY_EPS
    }
}

/// Per-axis deltas for a box. Rotation is deliberately not represented here;
/// it is layered on as an orthogonal transform component by the consumer.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BoxDelta {
    pub x: AxisDelta,
    pub y: AxisDelta,
}

impl BoxDelta {
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.x.is_identity() && self.y.is_identity()
    }
}

/// Compute the delta mapping `before` onto `after`.
pub fn calc_axis_delta(before: &Axis, after: &Axis) -> AxisDelta {
    let before_len = before.length();
    let scale = if before_len.abs() <= f32::EPSILON {
        1.0
    } else {
        after.length() / before_len
    };
    let origin_point = before.min;
    AxisDelta {
        translate: after.min - before.min * scale,
        scale,
        origin_point,
    }
}

/// Per-dimension [`calc_axis_delta`]. The two axes are fully independent.
pub fn calc_box_delta(before: &LayoutBox, after: &LayoutBox) -> BoxDelta {
    BoxDelta {
        x: calc_axis_delta(&before.x, &after.x),
        y: calc_axis_delta(&before.y, &after.y),
    }
}

/// Map a point forward through a delta.
#[inline]
pub fn apply_delta_point(p: f32, delta: &AxisDelta) -> f32 {
    p * delta.scale + delta.translate
}

/// Map a point back through a delta (inverse of [`apply_delta_point`]).
#[inline]
pub fn remove_delta_point(p: f32, delta: &AxisDelta) -> f32 {
    if delta.scale.abs() <= f32::EPSILON {
        p - delta.translate
    } else {
        (p - delta.translate) / delta.scale
    }
}

/// Apply a delta to an axis, producing the transformed axis.
pub fn apply_axis_delta(axis: &Axis, delta: &AxisDelta) -> Axis {
    Axis {
        min: apply_delta_point(axis.min, delta),
        max: apply_delta_point(axis.max, delta),
    }
}

/// Undo a delta previously applied to an axis. Used to de-corrupt boxes
/// measured while their element carries an in-flight projection transform.
pub fn remove_axis_delta(axis: &Axis, delta: &AxisDelta) -> Axis {
    Axis {
        min: remove_delta_point(axis.min, delta),
        max: remove_delta_point(axis.max, delta),
    }
}

pub fn apply_box_delta(b: &LayoutBox, delta: &BoxDelta) -> LayoutBox {
    LayoutBox {
        x: apply_axis_delta(&b.x, &delta.x),
        y: apply_axis_delta(&b.y, &delta.y),
    }
}

pub fn remove_box_delta(b: &LayoutBox, delta: &BoxDelta) -> LayoutBox {
    LayoutBox {
        x: remove_axis_delta(&b.x, &delta.x),
        y: remove_axis_delta(&b.y, &delta.y),
    }
}

/// Linear interpolation.
#[inline]
pub fn mix(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

pub fn mix_axis(from: &Axis, to: &Axis, t: f32) -> Axis {
    Axis {
        min: mix(from.min, to.min, t),
        max: mix(from.max, to.max, t),
    }
}

/// Interpolate between two boxes. Drives a target from its animation origin
/// toward the final layout under an externally supplied progress value.
pub fn mix_box(from: &LayoutBox, to: &LayoutBox, t: f32) -> LayoutBox {
    LayoutBox {
        x: mix_axis(&from.x, &to.x, t),
        y: mix_axis(&from.y, &to.y, t),
    }
}
