//! Output contracts from the projection engine.
//!
//! FrameOutputs carry the semantic events of one frame; geometry itself is
//! written through [`crate::host::Host::write_frame`] during the Render
//! phase. Adapters transport events to downstream animation code.

use serde::{Deserialize, Serialize};

use reflow_api_core::{BoxDelta, LayoutBox};

use crate::ids::NodeId;

/// Discrete semantic signals emitted while stepping a frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum ProjectionEvent {
    /// A node's box was measured during the Read phase.
    LayoutMeasured { node: NodeId, layout: LayoutBox },

    /// A node (and its layout group) was marked layout-dirty.
    WillUpdate { node: NodeId },

    /// A full measure -> delta -> render cycle completed for a node.
    DidUpdate {
        node: NodeId,
        delta: BoxDelta,
        layout_changed: bool,
    },

    /// A layout animation was armed for a node.
    AnimationStart { node: NodeId },

    /// A layout animation finished or was cancelled.
    AnimationComplete { node: NodeId },

    /// Lead/follow roles changed for a shared layout id.
    LeadChanged {
        layout_id: String,
        lead: NodeId,
        follow: Option<NodeId>,
    },

    /// A recoverable degradation (failed measurement, id collision). The
    /// engine has already degraded and continued; this is observability only.
    Warning { message: String },
}

/// Outputs returned by ProjectionEngine::run_frame().
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FrameOutputs {
    #[serde(default)]
    pub events: Vec<ProjectionEvent>,
}

impl FrameOutputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: ProjectionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
