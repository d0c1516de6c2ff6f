//! Shared-element matching: layout-id stacks and crossfade roles.
//!
//! Nodes carrying the same `layout_id` are matched across tree mutations,
//! even across different subtrees. The newest mounted member becomes *lead*
//! (first mount in a frame wins ties) and the previous lead is retained as
//! the single *follow*; older followers are dropped without animating to
//! bound memory and avoid runaway chains.

use hashbrown::HashMap;

use crate::ids::NodeId;
use crate::node::TransitionMode;

/// One layout-id stack.
#[derive(Clone, Debug, Default)]
pub struct SharedStack {
    /// Members in mount order, including exiting nodes not yet released.
    pub members: Vec<NodeId>,
    pub lead: Option<NodeId>,
    pub follow: Option<NodeId>,
    /// Frame counter at the last lead promotion, for tie-breaking.
    pub lead_promoted_frame: u64,
}

/// Result of a membership change, for the engine to apply to nodes/events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Promotion {
    /// The joining node became lead. `follow` is the retained previous lead;
    /// `dropped` is an older follower released without animation.
    Promoted {
        lead: NodeId,
        follow: Option<NodeId>,
        dropped: Option<NodeId>,
    },
    /// A lead was already promoted this frame; first mount wins the tie and
    /// the joining node simply becomes a member.
    TieRetained { lead: NodeId },
}

#[derive(Debug, Default)]
pub struct SharedStacks {
    stacks: HashMap<String, SharedStack>,
}

impl SharedStacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, layout_id: &str) -> Option<&SharedStack> {
        self.stacks.get(layout_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SharedStack)> {
        self.stacks.iter()
    }

    /// A node with this layout id mounts (or is explicitly promoted).
    pub fn join(&mut self, layout_id: &str, node: NodeId, frame: u64) -> Promotion {
        let stack = self.stacks.entry(layout_id.to_string()).or_default();
        if !stack.members.contains(&node) {
            stack.members.push(node);
        }

        match stack.lead {
            Some(lead) if lead == node => Promotion::TieRetained { lead },
            Some(lead) if stack.lead_promoted_frame == frame => {
                // First-mounted-this-frame keeps the lead.
                Promotion::TieRetained { lead }
            }
            prev_lead => {
                // A re-promoted current follower vacates the follow slot.
                if stack.follow == Some(node) {
                    stack.follow = None;
                }
                let dropped = stack.follow.take();
                stack.follow = prev_lead;
                stack.lead = Some(node);
                stack.lead_promoted_frame = frame;
                Promotion::Promoted {
                    lead: node,
                    follow: stack.follow,
                    dropped,
                }
            }
        }
    }

    /// Fully release a node from its stack (exit animation done, or dropped).
    pub fn remove_member(&mut self, layout_id: &str, node: NodeId) {
        let mut emptied = false;
        if let Some(stack) = self.stacks.get_mut(layout_id) {
            stack.members.retain(|m| *m != node);
            if stack.follow == Some(node) {
                stack.follow = None;
            }
            if stack.lead == Some(node) {
                stack.lead = None;
            }
            emptied = stack.members.is_empty();
        }
        if emptied {
            self.stacks.remove(layout_id);
        }
    }
}

/// Opacities for (lead, follow) at crossfade progress `t`. Linear on both
/// sides so the composite sums to 1 at the midpoint. `Instant` collapses to
/// a single-frame swap.
pub fn crossfade_opacities(progress: f32, mode: TransitionMode) -> (f32, f32) {
    match mode {
        TransitionMode::Animated => {
            let t = progress.clamp(0.0, 1.0);
            (t, 1.0 - t)
        }
        TransitionMode::Instant => (1.0, 0.0),
    }
}
