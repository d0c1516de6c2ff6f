//! Entity identifiers.
//!
//! Ids are opaque handles minted per engine instance. A removed node's id is
//! never minted again, so a stale id held by the host misses on lookup
//! instead of aliasing a newer node.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Dense counter backing one id namespace. The engine keeps one sequence per
/// id kind so node and group ids stay independently dense.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    pub fn mint(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}
