//! Relative boxes: a child box expressed as 0..1 fractions of a parent box.
//!
//! Used to keep a child anchored inside an independently-animating parent:
//! take the child's measured box, express each axis as fractions of the
//! parent's before-box, then project those fractions onto the parent's target
//! box.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::boxes::LayoutBox;
use crate::delta::mix;

/// One axis of a relative box, in fractions of the parent axis length.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RelativeAxis {
    pub min: f32,
    pub max: f32,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RelativeBox {
    pub x: RelativeAxis,
    pub y: RelativeAxis,
}

fn calc_relative_axis(child: &Axis, parent: &Axis) -> RelativeAxis {
    let len = parent.length();
    if len.abs() <= f32::EPSILON {
        // Zero-sized parent: anchor to its leading edge.
        return RelativeAxis { min: 0.0, max: 0.0 };
    }
    RelativeAxis {
        min: (child.min - parent.min) / len,
        max: (child.max - parent.min) / len,
    }
}

fn resolve_relative_axis(relative: &RelativeAxis, parent: &Axis) -> Axis {
    Axis {
        min: mix(parent.min, parent.max, relative.min),
        max: mix(parent.min, parent.max, relative.max),
    }
}

/// Express `child` as fractions of `parent`.
pub fn calc_relative_box(child: &LayoutBox, parent: &LayoutBox) -> RelativeBox {
    RelativeBox {
        x: calc_relative_axis(&child.x, &parent.x),
        y: calc_relative_axis(&child.y, &parent.y),
    }
}

/// Project fractions back onto a (possibly different) parent box.
pub fn resolve_relative_box(relative: &RelativeBox, parent: &LayoutBox) -> LayoutBox {
    LayoutBox {
        x: resolve_relative_axis(&relative.x, &parent.x),
        y: resolve_relative_axis(&relative.y, &parent.y),
    }
}
