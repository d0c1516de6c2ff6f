//! Measurement and snapshot capture.
//!
//! A snapshot records an element's box and corrector-registered style values
//! at a point in time. Boxes measured while a projection transform is applied
//! are corrected by removing the node's own last-known delta, so the same box
//! is produced whether the node is mid-animation or at rest.

use hashbrown::HashMap;

use reflow_api_core::{remove_box_delta, BoxDelta, LayoutBox, StyleValue};

/// Pre-mutation capture of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub layout: LayoutBox,
    pub style: HashMap<String, StyleValue>,
}

impl Snapshot {
    pub fn new(layout: LayoutBox) -> Self {
        Self {
            layout,
            style: HashMap::new(),
        }
    }
}

/// Remove the effect of an in-flight projection transform from a raw
/// measurement. A box measured mid-animation carries the node's own delta;
/// dividing it out recovers the underlying layout box.
pub fn correct_measurement(raw: &LayoutBox, in_flight: Option<&BoxDelta>) -> LayoutBox {
    match in_flight {
        Some(delta) if !delta.is_identity() => remove_box_delta(raw, delta),
        _ => *raw,
    }
}
