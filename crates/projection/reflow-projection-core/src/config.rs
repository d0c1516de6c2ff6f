//! Core configuration for reflow-projection-core.

use serde::{Deserialize, Serialize};

/// Engine sizing and tolerances.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity hint for the node arena.
    pub node_capacity: usize,

    /// Maximum events retained per frame before further events are dropped.
    pub max_events_per_frame: usize,

    /// Tolerance (px) under which a remeasured box counts as unchanged.
    pub layout_change_epsilon: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_capacity: 256,
            max_events_per_frame: 1024,
            layout_change_epsilon: 0.01,
        }
    }
}
