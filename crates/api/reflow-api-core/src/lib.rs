//! reflow-api-core: geometry, delta math and style values (core, engine-agnostic)

pub mod axis;
pub mod boxes;
pub mod delta;
pub mod error;
pub mod relative;
pub mod style;

pub use axis::Axis;
pub use boxes::{LayoutBox, Point};
pub use delta::{
    apply_axis_delta, apply_box_delta, calc_axis_delta, calc_box_delta, mix, mix_axis, mix_box,
    remove_axis_delta, remove_box_delta, AxisDelta, BoxDelta,
};
pub use error::ProjectionError;
pub use relative::{calc_relative_box, resolve_relative_box, RelativeAxis, RelativeBox};
pub use style::{BoxShadow, StyleValue, StyleValueKind};
