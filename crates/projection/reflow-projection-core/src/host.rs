//! Host collaborator contract.
//!
//! The engine never touches a render target directly. Adapters (DOM, test
//! harness) implement [`Host`] and pass it into `will_update` / `run_frame`.
//! Measurement happens only during the Read phase; writes only during the
//! Render phase.

use serde::{Deserialize, Serialize};

use reflow_api_core::{BoxDelta, LayoutBox, Point, ProjectionError, StyleValue};

use crate::ids::NodeId;

/// The computed transform/style patch written back to the host once per
/// rendered frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FramePatch {
    /// Per-axis projection delta; `None` clears any previously applied
    /// transform.
    pub delta: Option<BoxDelta>,

    /// Cumulative ancestor scale. The host divides the delta's translate
    /// components by this when composing the final transform string, so that
    /// nested scales do not compound.
    pub tree_scale: Point,

    /// Orthogonal rotation in degrees, layered after the axis delta.
    /// Combined non-uniform-scale-plus-rotation correction is approximate.
    pub rotate: Option<f32>,

    /// Crossfade opacity for shared-element transitions.
    pub opacity: Option<f32>,

    /// Scale-corrected style values (border-radius, box-shadow, ...).
    pub styles: Vec<(String, StyleValue)>,
}

impl FramePatch {
    /// True when applying this patch would change nothing.
    pub fn is_noop(&self) -> bool {
        self.delta.is_none()
            && self.rotate.is_none()
            && self.opacity.is_none()
            && self.styles.is_empty()
    }
}

/// Trait the host implements to let the engine read and write real geometry.
pub trait Host {
    /// Current bounding box in viewport coordinates. Synchronous; must
    /// reflect rendered geometry. Fails when the element is detached or
    /// hidden, in which case the engine suspends (never zeroes) the subtree.
    fn measure(&mut self, node: NodeId) -> Result<LayoutBox, ProjectionError>;

    /// Computed style property used as scale-correction input.
    fn read_style_property(&mut self, node: NodeId, name: &str) -> Option<StyleValue>;

    /// Apply the computed projection for this frame.
    fn write_frame(&mut self, node: NodeId, patch: &FramePatch);

    /// Request inclusion in the next render phase.
    fn schedule_render(&mut self, node: NodeId);
}
