//! Frame scheduler: ordered phases and the dirty set.
//!
//! Single-threaded and cooperative; all coordination is temporal ordering
//! within one display-refresh cycle. Measurement happens only in `Read`
//! (reading geometry elsewhere risks a forced synchronous layout), pure
//! computation in `Update`, host writes in `PreRender`/`Render`, and
//! notifications in `PostRender`. No phase may re-enter an earlier phase in
//! the same frame; dirtying requested at or after `Update` is deferred to
//! the next frame's `Read`.

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Read,
    Update,
    PreRender,
    Render,
    PostRender,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    phase: Option<Phase>,
    frame: u64,
    dirty: Vec<NodeId>,
    deferred: Vec<NodeId>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic frame counter, incremented by `begin_frame`.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Start a new frame: work deferred from the previous frame becomes
    /// dirty now.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.phase = None;
        self.dirty.append(&mut self.deferred);
    }

    /// Advance to `phase`. Phases must advance monotonically within a frame.
    pub fn enter(&mut self, phase: Phase) {
        debug_assert!(
            self.phase.map_or(true, |current| current < phase),
            "phase {phase:?} entered after {:?}",
            self.phase
        );
        self.phase = Some(phase);
    }

    pub fn end_frame(&mut self) {
        self.phase = None;
    }

    /// Mark a node layout-dirty. During `Update` or later the request is
    /// deferred to the next frame's `Read`.
    pub fn mark_dirty(&mut self, node: NodeId) {
        let list = match self.phase {
            Some(p) if p >= Phase::Update => &mut self.deferred,
            _ => &mut self.dirty,
        };
        if !list.contains(&node) {
            list.push(node);
        }
    }

    /// Remove a node from pending work (used on unmount/cancel).
    pub fn cancel(&mut self, node: NodeId) {
        self.dirty.retain(|n| *n != node);
        self.deferred.retain(|n| *n != node);
    }

    /// Drain the dirty set for the Read phase.
    pub fn take_dirty(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.dirty)
    }

    #[inline]
    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}
