//! Shared layout groups.
//!
//! Siblings in a group may be visually coupled (a list reflowing around a
//! removed item), so dirtying any member invalidates measurement for the
//! whole group and they remeasure together in the next Read phase.

use crate::ids::{GroupId, NodeId};

#[derive(Clone, Debug)]
pub struct SharedLayoutGroup {
    pub id: GroupId,
    pub members: Vec<NodeId>,
}

impl SharedLayoutGroup {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    pub fn join(&mut self, node: NodeId) {
        if !self.members.contains(&node) {
            self.members.push(node);
        }
    }

    pub fn leave(&mut self, node: NodeId) {
        self.members.retain(|m| *m != node);
    }
}
