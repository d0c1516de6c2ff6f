//! Shared test harness for the projection crates.
//!
//! [`MockHost`] is a scriptable [`Host`]: tests assign boxes and style values
//! per node, flip nodes to "detached" to exercise measurement failures, and
//! inspect the frame patches the engine wrote.

use hashbrown::{HashMap, HashSet};

use reflow_api_core::{LayoutBox, ProjectionError, StyleValue};
use reflow_projection_core::{FramePatch, Host, NodeId};

/// Scriptable host double recording everything the engine does to it.
#[derive(Debug, Default)]
pub struct MockHost {
    /// Boxes returned by `measure`, keyed by node.
    pub boxes: HashMap<NodeId, LayoutBox>,
    /// Style values returned by `read_style_property`.
    pub styles: HashMap<(NodeId, String), StyleValue>,
    /// Nodes whose measurement fails.
    pub detached: HashSet<NodeId>,

    /// Every patch written, in write order.
    pub patches: Vec<(NodeId, FramePatch)>,
    /// Nodes passed to `schedule_render`.
    pub render_requests: Vec<NodeId>,
    /// Total `measure` calls, for asserting read batching.
    pub measure_calls: usize,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_box(&mut self, node: NodeId, layout: LayoutBox) {
        self.boxes.insert(node, layout);
    }

    pub fn set_style(&mut self, node: NodeId, name: &str, value: StyleValue) {
        self.styles.insert((node, name.to_string()), value);
    }

    /// Stop reporting a style property, as a host mid-mutation might.
    pub fn clear_style(&mut self, node: NodeId, name: &str) {
        self.styles.remove(&(node, name.to_string()));
    }

    pub fn detach(&mut self, node: NodeId) {
        self.detached.insert(node);
    }

    pub fn reattach(&mut self, node: NodeId) {
        self.detached.remove(&node);
    }

    /// Last patch written for `node`, if any.
    pub fn last_patch(&self, node: NodeId) -> Option<&FramePatch> {
        self.patches
            .iter()
            .rev()
            .find(|(id, _)| *id == node)
            .map(|(_, patch)| patch)
    }

    /// Number of patches written for `node`.
    pub fn patch_count(&self, node: NodeId) -> usize {
        self.patches.iter().filter(|(id, _)| *id == node).count()
    }

    pub fn clear_recordings(&mut self) {
        self.patches.clear();
        self.render_requests.clear();
        self.measure_calls = 0;
    }
}

impl Host for MockHost {
    fn measure(&mut self, node: NodeId) -> Result<LayoutBox, ProjectionError> {
        self.measure_calls += 1;
        if self.detached.contains(&node) {
            return Err(ProjectionError::MeasurementUnavailable(format!(
                "node {} is detached",
                node.0
            )));
        }
        self.boxes
            .get(&node)
            .copied()
            .ok_or_else(|| ProjectionError::MeasurementUnavailable(format!("node {}", node.0)))
    }

    fn read_style_property(&mut self, node: NodeId, name: &str) -> Option<StyleValue> {
        self.styles.get(&(node, name.to_string())).cloned()
    }

    fn write_frame(&mut self, node: NodeId, patch: &FramePatch) {
        self.patches.push((node, patch.clone()));
    }

    fn schedule_render(&mut self, node: NodeId) {
        self.render_requests.push(node);
    }
}

/// Convenience box builder used across the integration tests.
pub fn rect(left: f32, top: f32, width: f32, height: f32) -> LayoutBox {
    LayoutBox::from_edges(left, top, left + width, top + height)
}

/// Absolute-difference float comparison for test assertions.
pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
