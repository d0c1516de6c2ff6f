//! Relative-target resolution.
//!
//! A node whose options designate a relative parent tracks a proportional
//! position inside that parent's box rather than its own absolute measured
//! box: the child's last measured box is expressed as 0..1 fractions of the
//! parent's before-box, then projected onto the parent's target box. Parents
//! resolve before children within a frame (depth-first traversal), so a
//! child normally re-resolves in the same frame; if the parent has no target
//! yet the child defers with an identity delta for the frame.

use reflow_api_core::{calc_relative_box, resolve_relative_box, LayoutBox, RelativeBox};

/// Outcome of one resolution attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum RelativeResolution {
    /// Parent resolved; the child's target and its cached fractions.
    Resolved {
        target: LayoutBox,
        fractions: RelativeBox,
    },
    /// Parent target unknown this frame; the child keeps an identity delta
    /// rather than guessing, and retries next frame.
    Deferred,
}

/// Resolve a child's relative target against its parent.
///
/// `parent_before` is the parent's reference box (snapshot if the parent is
/// animating, otherwise its layout); `parent_target` is the box the parent is
/// heading to, if known. Cached `fractions` are reused so the child stays
/// anchored to the same proportions for the whole transition.
pub fn resolve_relative_target(
    child_layout: &LayoutBox,
    cached: Option<&RelativeBox>,
    parent_before: Option<&LayoutBox>,
    parent_target: Option<&LayoutBox>,
) -> RelativeResolution {
    let Some(parent_target) = parent_target else {
        return RelativeResolution::Deferred;
    };

    let fractions = match cached {
        Some(f) => *f,
        None => {
            let Some(before) = parent_before else {
                return RelativeResolution::Deferred;
            };
            calc_relative_box(child_layout, before)
        }
    };

    RelativeResolution::Resolved {
        target: resolve_relative_box(&fractions, parent_target),
        fractions,
    }
}
