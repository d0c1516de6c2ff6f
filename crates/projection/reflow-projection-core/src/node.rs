//! The projection node: one entry in the tree mirroring the host's UI tree.
//!
//! Nodes are owned by the engine's arena; the parent link is an id (weak by
//! construction) and children are an insertion-ordered id list.

use serde::{Deserialize, Serialize};

use reflow_api_core::{BoxDelta, LayoutBox, Point, RelativeBox};

use crate::ids::{GroupId, NodeId};
use crate::snapshot::Snapshot;

/// How a shared-element transition swaps lead and follow.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransitionMode {
    /// Crossfade lead and follow over the animation window.
    #[default]
    Animated,
    /// Single-frame swap: follower hidden immediately, no crossfade.
    Instant,
}

/// Role assigned within a shared layout id stack.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SharedRole {
    Lead,
    Follow,
}

/// Per-node configuration. Merged by [`NodeOptionsPatch`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeOptions {
    /// Opt into layout projection for this node.
    pub layout: bool,

    /// Do not inherit ancestor corrections; projection restarts here.
    pub layout_root: bool,

    /// Shared layout id matching this node across structurally different
    /// trees.
    pub layout_id: Option<String>,

    /// Layout group membership: dirtying any member remeasures all of them.
    pub group: Option<GroupId>,

    /// Designated relative parent: the target tracks a proportional position
    /// inside this ancestor's box instead of the node's own measured box.
    pub relative_parent: Option<NodeId>,

    /// Shared-element swap behavior.
    pub transition: TransitionMode,

    /// Static rotation (degrees) carried orthogonally on the frame patch.
    pub rotate: Option<f32>,
}

/// Partial options update; `None` fields leave the current value untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeOptionsPatch {
    #[serde(default)]
    pub layout: Option<bool>,
    #[serde(default)]
    pub layout_root: Option<bool>,
    #[serde(default)]
    pub layout_id: Option<Option<String>>,
    #[serde(default)]
    pub group: Option<Option<GroupId>>,
    #[serde(default)]
    pub relative_parent: Option<Option<NodeId>>,
    #[serde(default)]
    pub transition: Option<TransitionMode>,
    #[serde(default)]
    pub rotate: Option<Option<f32>>,
}

impl NodeOptions {
    /// Merge a patch into this configuration.
    pub fn merge(&mut self, patch: NodeOptionsPatch) {
        if let Some(v) = patch.layout {
            self.layout = v;
        }
        if let Some(v) = patch.layout_root {
            self.layout_root = v;
        }
        if let Some(v) = patch.layout_id {
            self.layout_id = v;
        }
        if let Some(v) = patch.group {
            self.group = v;
        }
        if let Some(v) = patch.relative_parent {
            self.relative_parent = v;
        }
        if let Some(v) = patch.transition {
            self.transition = v;
        }
        if let Some(v) = patch.rotate {
            self.rotate = v;
        }
    }
}

/// In-flight layout animation state. The tween itself lives outside the
/// engine; progress arrives through `set_animation_progress`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutAnimation {
    /// The box this node visually originates from (corrected snapshot, or
    /// the follower's box for a promoted shared lead).
    pub origin: LayoutBox,
    /// Normalized progress 0..1.
    pub progress: f32,
}

/// The core tree entity tracking one element's geometry and animation state.
#[derive(Clone, Debug)]
pub struct ProjectionNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub options: NodeOptions,

    /// Bound to its render collaborator.
    pub mounted: bool,
    /// Unmounted but retained as a shared-element follower until its exit
    /// animation completes.
    pub exiting: bool,

    /// Pre-mutation capture taken by `will_update`.
    pub snapshot: Option<Snapshot>,
    /// Last measured box (own in-flight transform removed).
    pub layout: Option<LayoutBox>,
    /// Layout box with ancestor projections applied (pre-own-transform
    /// geometry in rendered space).
    pub layout_corrected: Option<LayoutBox>,
    /// The box this node should occupy once animation completes.
    pub target: Option<LayoutBox>,
    /// Target mixed from the animation origin by current progress.
    pub animated_target: Option<LayoutBox>,
    /// Cached fractions for relative-target resolution.
    pub relative_target: Option<RelativeBox>,

    /// Delta between current rendered state and target.
    pub projection_delta: Option<BoxDelta>,
    /// Cumulative ancestor scale correction.
    pub tree_scale: Point,

    pub animation: Option<LayoutAnimation>,
    pub role: Option<SharedRole>,
    /// Crossfade opacity output; `None` leaves host opacity untouched.
    pub opacity: Option<f32>,

    /// Latest raw style reads for registered corrector properties.
    pub style_values: Vec<(String, reflow_api_core::StyleValue)>,

    /// Measurement failed; subtree delta propagation is suspended.
    pub measurement_suspended: bool,
    /// A non-identity transform was written and must be cleared on reset.
    pub rendered_non_identity: bool,
    pub needs_render: bool,
}

impl ProjectionNode {
    pub fn new(id: NodeId, parent: Option<NodeId>, options: NodeOptions) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            options,
            mounted: false,
            exiting: false,
            snapshot: None,
            layout: None,
            layout_corrected: None,
            target: None,
            animated_target: None,
            relative_target: None,
            projection_delta: None,
            tree_scale: Point::one(),
            animation: None,
            role: None,
            opacity: None,
            style_values: Vec::new(),
            measurement_suspended: false,
            rendered_non_identity: false,
            needs_render: false,
        }
    }

    /// True when this node takes part in projection at all.
    #[inline]
    pub fn is_projecting(&self) -> bool {
        self.options.layout || self.options.layout_id.is_some()
    }
}
