//! Engine: node-tree ownership and the per-frame projection pipeline.
//!
//! Methods:
//! - new/with_correctors, create_node, set_options, mount/unmount,
//!   will_update (snapshot + dirty), run_frame (read -> update -> render ->
//!   post-render), set_animation_progress, cancel_animation.

use reflow_api_core::{
    apply_box_delta, calc_box_delta, mix_box, BoxDelta, LayoutBox, Point, ProjectionError,
    StyleValue,
};

use crate::config::Config;
use crate::correctors::{CorrectionContext, CorrectorRegistry};
use crate::group::SharedLayoutGroup;
use crate::host::{FramePatch, Host};
use crate::ids::{GroupId, IdSequence, NodeId};
use crate::node::{
    LayoutAnimation, NodeOptions, NodeOptionsPatch, ProjectionNode, SharedRole, TransitionMode,
};
use crate::outputs::{FrameOutputs, ProjectionEvent};
use crate::relative::{resolve_relative_target, RelativeResolution};
use crate::scheduler::{FrameScheduler, Phase};
use crate::shared::{crossfade_opacities, Promotion, SharedStacks};
use crate::snapshot::{correct_measurement, Snapshot};

/// The projection engine. Owns the node arena and drives the frame phases;
/// all host I/O goes through the [`Host`] trait.
#[derive(Debug)]
pub struct ProjectionEngine {
    // Owned data
    cfg: Config,
    node_ids: IdSequence,
    group_ids: IdSequence,
    nodes: Vec<ProjectionNode>,
    roots: Vec<NodeId>,
    groups: Vec<SharedLayoutGroup>,

    // Systems
    shared: SharedStacks,
    correctors: CorrectorRegistry,
    scheduler: FrameScheduler,

    // Per-frame outputs and scratch
    outputs: FrameOutputs,
    pending_events: Vec<ProjectionEvent>,
    frame_measured: Vec<NodeId>,
    frame_updated: Vec<(NodeId, bool)>,
}

impl ProjectionEngine {
    /// Create an engine with the built-in corrector set.
    pub fn new(cfg: Config) -> Self {
        Self::with_correctors(cfg, CorrectorRegistry::with_defaults())
    }

    /// Create an engine with an explicit corrector table. Separate engine
    /// instances never share corrector state.
    pub fn with_correctors(cfg: Config, correctors: CorrectorRegistry) -> Self {
        Self {
            nodes: Vec::with_capacity(cfg.node_capacity),
            cfg,
            node_ids: IdSequence::default(),
            group_ids: IdSequence::default(),
            roots: Vec::new(),
            groups: Vec::new(),
            shared: SharedStacks::new(),
            correctors,
            scheduler: FrameScheduler::new(),
            outputs: FrameOutputs::default(),
            pending_events: Vec::new(),
            frame_measured: Vec::new(),
            frame_updated: Vec::new(),
        }
    }

    // ---- tree construction -------------------------------------------------

    /// Create a new layout group.
    pub fn create_group(&mut self) -> GroupId {
        let id = GroupId(self.group_ids.mint());
        self.groups.push(SharedLayoutGroup::new(id));
        id
    }

    /// Insert a node under `parent` (or as a root when absent/unknown).
    pub fn create_node(&mut self, parent: Option<NodeId>, options: NodeOptions) -> NodeId {
        let id = NodeId(self.node_ids.mint());
        let parent = parent.filter(|p| self.node(*p).is_some());
        let node = ProjectionNode::new(id, parent, options);
        if let Some(gid) = node.options.group {
            if let Some(group) = self.groups.iter_mut().find(|g| g.id == gid) {
                group.join(id);
            }
        }
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.nodes.push(node);
        id
    }

    /// Merge a configuration patch, updating group and shared-id membership.
    pub fn set_options(&mut self, id: NodeId, patch: NodeOptionsPatch) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let old_group = node.options.group;
        let old_layout_id = node.options.layout_id.clone();
        node.options.merge(patch);
        let new_group = node.options.group;
        let new_layout_id = node.options.layout_id.clone();
        let mounted = node.mounted;

        if old_group != new_group {
            if let Some(g) = old_group {
                if let Some(group) = self.groups.iter_mut().find(|gr| gr.id == g) {
                    group.leave(id);
                }
            }
            if let Some(g) = new_group {
                if let Some(group) = self.groups.iter_mut().find(|gr| gr.id == g) {
                    group.join(id);
                }
            }
        }

        if old_layout_id != new_layout_id {
            if let Some(old) = old_layout_id {
                self.shared.remove_member(&old, id);
            }
            if new_layout_id.is_some() && mounted {
                self.promote(id);
            }
        }
    }

    // ---- lifecycle ---------------------------------------------------------

    /// Bind the node to its render collaborator. Schedules an initial
    /// measurement and, for shared nodes, contends for the lead role.
    pub fn mount(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.mounted = true;
        node.exiting = false;
        self.scheduler.mark_dirty(id);
        self.promote(id);
    }

    /// Explicitly make a mounted shared node the lead of its stack (e.g. a
    /// visibility toggle without a remount).
    pub fn promote_lead(&mut self, id: NodeId) {
        self.promote(id);
    }

    /// Detach the node. Shared nodes are retained transiently as followers
    /// until their exit animation completes; plain nodes are released
    /// immediately.
    pub fn unmount(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.mounted = false;
        self.scheduler.cancel(id);
        if self.node(id).is_some_and(|n| n.options.layout_id.is_some()) {
            if let Some(node) = self.node_mut(id) {
                node.exiting = true;
            }
        } else {
            self.remove_node(id);
        }
    }

    /// Mark the node (and, transitively, its layout group) layout-dirty and
    /// capture pre-mutation snapshots. Must be called before the host mutates
    /// layout: the "before" geometry cannot be recovered afterwards.
    pub fn will_update(&mut self, id: NodeId, host: &mut dyn Host) {
        let members = match self.node(id).and_then(|n| n.options.group) {
            Some(gid) => self
                .groups
                .iter()
                .find(|g| g.id == gid)
                .map(|g| g.members.clone())
                .unwrap_or_else(|| vec![id]),
            None => vec![id],
        };
        let style_props: Vec<String> = self.correctors.names().map(str::to_string).collect();

        for member in members {
            let Some(node) = self.node(member) else {
                continue;
            };
            if !node.mounted {
                continue;
            }
            let in_flight = node.projection_delta;
            match host.measure(member) {
                Ok(raw) => {
                    let corrected = correct_measurement(&raw, in_flight.as_ref());
                    let mut snapshot = Snapshot::new(corrected);
                    for name in &style_props {
                        if let Some(value) = host.read_style_property(member, name) {
                            snapshot.style.insert(name.clone(), value);
                        }
                    }
                    if let Some(node) = self.node_mut(member) {
                        node.snapshot = Some(snapshot);
                    }
                }
                Err(err) => {
                    log::warn!("snapshot skipped for {member:?}: {err}");
                    self.push_event(ProjectionEvent::Warning {
                        message: err.to_string(),
                    });
                }
            }
            self.scheduler.mark_dirty(member);
            host.schedule_render(member);
        }

        self.push_event(ProjectionEvent::WillUpdate { node: id });
    }

    // ---- animation control -------------------------------------------------

    /// Drive the layout animation externally; `1.0` completes it.
    pub fn set_animation_progress(&mut self, id: NodeId, progress: f32) {
        let done = match self.node_mut(id).and_then(|n| n.animation.as_mut()) {
            Some(animation) => {
                animation.progress = progress.clamp(0.0, 1.0);
                animation.progress >= 1.0
            }
            None => false,
        };
        if done {
            self.complete_animation(id);
        }
    }

    /// Cancel an in-flight animation: delta resets to identity and completion
    /// fires immediately.
    pub fn cancel_animation(&mut self, id: NodeId) {
        if self.node(id).is_none() {
            return;
        }
        if let Some(node) = self.node_mut(id) {
            node.projection_delta = None;
            node.target = None;
            node.animated_target = None;
            node.relative_target = None;
        }
        self.complete_animation(id);
    }

    // ---- frame pipeline ----------------------------------------------------

    /// Step one display frame through the ordered phases, producing outputs.
    pub fn run_frame(&mut self, host: &mut dyn Host) -> &FrameOutputs {
        self.scheduler.begin_frame();
        self.outputs.clear();
        self.frame_measured.clear();
        self.frame_updated.clear();
        let pending: Vec<ProjectionEvent> = self.pending_events.drain(..).collect();
        for event in pending {
            self.emit(event);
        }

        self.scheduler.enter(Phase::Read);
        self.read_phase(host);

        self.scheduler.enter(Phase::Update);
        self.update_phase();

        self.scheduler.enter(Phase::PreRender);
        self.scheduler.enter(Phase::Render);
        self.render_phase(host);

        self.scheduler.enter(Phase::PostRender);
        self.post_render_phase();

        self.scheduler.end_frame();
        &self.outputs
    }

    /// Read phase: measure every dirty node. Failures suspend the node's
    /// subtree instead of propagating a garbage box.
    fn read_phase(&mut self, host: &mut dyn Host) {
        let dirty = self.scheduler.take_dirty();
        let style_props: Vec<String> = self.correctors.names().map(str::to_string).collect();

        for id in dirty {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.mounted {
                continue;
            }
            let in_flight = node.projection_delta;
            let snapshot_style = node.snapshot.as_ref().map(|s| s.style.clone());
            match host.measure(id) {
                Ok(raw) => {
                    let corrected = correct_measurement(&raw, in_flight.as_ref());
                    let mut styles = Vec::new();
                    for name in &style_props {
                        match host.read_style_property(id, name) {
                            Some(value) => styles.push((name.clone(), value)),
                            // Mid-mutation the host may briefly stop reporting
                            // a property; the pre-mutation snapshot stands in.
                            None => {
                                if let Some(value) =
                                    snapshot_style.as_ref().and_then(|style| style.get(name))
                                {
                                    styles.push((name.clone(), value.clone()));
                                }
                            }
                        }
                    }
                    if let Some(node) = self.node_mut(id) {
                        node.layout = Some(corrected);
                        node.measurement_suspended = false;
                        node.style_values = styles;
                    }
                    self.frame_measured.push(id);
                    self.emit(ProjectionEvent::LayoutMeasured {
                        node: id,
                        layout: corrected,
                    });
                }
                Err(err) => {
                    if let Some(node) = self.node_mut(id) {
                        node.measurement_suspended = true;
                    }
                    log::warn!("measurement unavailable for {id:?}: {err}");
                    self.emit(ProjectionEvent::Warning {
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    /// Update phase: pure computation. Arms animations, applies shared
    /// lead/follow coupling, resolves targets and computes projection deltas
    /// with tree-scale composition.
    fn update_phase(&mut self) {
        // 1) Arm layout animations for remeasured nodes whose box changed.
        let eps = self.cfg.layout_change_epsilon;
        let measured = self.frame_measured.clone();
        for id in measured {
            let degenerate = self
                .node(id)
                .and_then(|n| n.layout)
                .is_some_and(|l| l.width() <= f32::EPSILON || l.height() <= f32::EPSILON);
            if degenerate {
                self.emit(ProjectionEvent::Warning {
                    message: ProjectionError::DegenerateBox.to_string(),
                });
            }
            let (changed, origin) = match self.node(id) {
                Some(node) => match (&node.snapshot, &node.layout) {
                    (Some(snapshot), Some(layout)) => (
                        !snapshot.layout.approx_eq(layout, eps),
                        Some(snapshot.layout),
                    ),
                    _ => (false, None),
                },
                None => continue,
            };
            if changed {
                // Followers mirror their lead instead of arming their own
                // animation; any other projecting node arms, including solo
                // shared nodes without the layout flag.
                let should_arm = self.node(id).is_some_and(|n| {
                    n.is_projecting()
                        && n.role != Some(SharedRole::Follow)
                        && n.animation.is_none()
                });
                if should_arm {
                    if let (Some(origin), Some(node)) = (origin, self.node_mut(id)) {
                        node.animation = Some(LayoutAnimation {
                            origin,
                            progress: 0.0,
                        });
                        self.emit(ProjectionEvent::AnimationStart { node: id });
                    }
                }
            }
            self.frame_updated.push((id, changed));
        }

        // 2) Shared stacks: lead originates from the follower's last-known
        //    box; crossfade opacities track the lead's progress.
        //
        // A lead whose follower has been released sheds any leftover swap
        // opacity so it stops re-rendering an identical patch.
        let settled: Vec<NodeId> = self
            .shared
            .iter()
            .filter_map(|(_, stack)| match (stack.lead, stack.follow) {
                (Some(lead), None) => Some(lead),
                _ => None,
            })
            .collect();
        for lead in settled {
            let clear = self
                .node(lead)
                .is_some_and(|n| n.animation.is_none() && n.opacity.is_some());
            if clear {
                if let Some(node) = self.node_mut(lead) {
                    node.opacity = None;
                }
            }
        }

        let mut stack_pairs: Vec<(String, NodeId, NodeId)> = self
            .shared
            .iter()
            .filter_map(|(layout_id, stack)| match (stack.lead, stack.follow) {
                (Some(lead), Some(follow)) => Some((layout_id.clone(), lead, follow)),
                _ => None,
            })
            .collect();
        stack_pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut released: Vec<NodeId> = Vec::new();
        for (_layout_id, lead, follow) in stack_pairs {
            let mode = match self.node(lead) {
                Some(node) => node.options.transition,
                None => continue,
            };
            let follow_box = self
                .node(follow)
                .and_then(|n| n.layout.or(n.snapshot.as_ref().map(|s| s.layout)));

            if mode == TransitionMode::Instant {
                if let Some(node) = self.node_mut(lead) {
                    node.opacity = Some(1.0);
                }
                if let Some(node) = self.node_mut(follow) {
                    node.opacity = Some(0.0);
                    if node.exiting {
                        released.push(follow);
                    }
                }
                continue;
            }

            let lead_measured = self.frame_measured.contains(&lead);
            let arm = self
                .node(lead)
                .is_some_and(|n| n.animation.is_none() && lead_measured);
            if arm {
                if let (Some(origin), Some(node)) = (follow_box, self.node_mut(lead)) {
                    node.animation = Some(LayoutAnimation {
                        origin,
                        progress: 0.0,
                    });
                    self.emit(ProjectionEvent::AnimationStart { node: lead });
                }
            }

            if let Some(progress) = self.node(lead).and_then(|n| n.animation.as_ref()).map(|a| a.progress)
            {
                let (lead_opacity, follow_opacity) = crossfade_opacities(progress, mode);
                if let Some(node) = self.node_mut(lead) {
                    node.opacity = Some(lead_opacity);
                }
                if let Some(node) = self.node_mut(follow) {
                    node.opacity = Some(follow_opacity);
                }
            }
        }
        for id in released {
            self.release_shared_node(id);
        }

        // 3) Resolve targets, parents before children, then let followers
        //    mirror their lead.
        let order = self.traversal_order();
        for id in &order {
            self.resolve_target(*id);
        }
        let mirrors: Vec<(NodeId, NodeId)> = self
            .shared
            .iter()
            .filter_map(|(_, stack)| match (stack.lead, stack.follow) {
                (Some(lead), Some(follow)) => Some((follow, lead)),
                _ => None,
            })
            .collect();
        for (follow, lead) in mirrors {
            let lead_boxes = self
                .node(lead)
                .map(|n| (n.target, n.animated_target));
            if let (Some((target, animated)), Some(node)) = (lead_boxes, self.node_mut(follow)) {
                if target.is_some() {
                    node.target = target;
                    node.animated_target = animated.or(target);
                }
            }
        }

        // 4) Projection deltas and tree scale, root to leaf.
        let roots = self.roots.clone();
        for root in roots {
            self.project_subtree(root);
        }
    }

    /// Final target for one node: lead box for followers (handled after this
    /// pass), relative resolution against a designated parent, or the node's
    /// own measured layout.
    fn resolve_target(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.is_projecting() || node.role == Some(SharedRole::Follow) {
            return;
        }
        let Some(layout) = node.layout else {
            return;
        };
        let relative_parent = node.options.relative_parent;
        let cached = node.relative_target;
        let animation = node.animation.clone();

        let final_box = match relative_parent {
            Some(parent_id) => {
                let (parent_before, parent_target) = match self.node(parent_id) {
                    Some(parent) => (
                        parent.snapshot.as_ref().map(|s| s.layout).or(parent.layout),
                        parent.animated_target.or(parent.target),
                    ),
                    None => (None, None),
                };
                match resolve_relative_target(
                    &layout,
                    cached.as_ref(),
                    parent_before.as_ref(),
                    parent_target.as_ref(),
                ) {
                    RelativeResolution::Resolved { target, fractions } => {
                        if let Some(node) = self.node_mut(id) {
                            node.relative_target = Some(fractions);
                        }
                        target
                    }
                    // Identity for this frame; retried next frame.
                    RelativeResolution::Deferred => layout,
                }
            }
            None => layout,
        };

        let animated = match &animation {
            Some(animation) => mix_box(&animation.origin, &final_box, animation.progress),
            None => final_box,
        };
        if let Some(node) = self.node_mut(id) {
            node.target = Some(final_box);
            node.animated_target = Some(animated);
        }
    }

    /// Depth-first projection. Each node's corrected layout applies every
    /// ancestor delta in root-to-leaf order; tree scale is the product of
    /// ancestor delta scales. Suspended nodes freeze their whole subtree.
    fn project_subtree(&mut self, root: NodeId) {
        let mut work: Vec<(NodeId, Vec<BoxDelta>, Point)> =
            vec![(root, Vec::new(), Point::one())];

        while let Some((id, path, inherited_scale)) = work.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if node.measurement_suspended {
                // Retain prior deltas for the subtree; never snap to origin.
                continue;
            }
            let children = node.children.clone();
            let mut child_path = path.clone();
            let mut child_scale = inherited_scale;

            let projectable = node.is_projecting()
                && node.layout.is_some()
                && node.animated_target.is_some()
                && (node.mounted || node.exiting);
            if projectable {
                let layout = node.layout.unwrap_or_default();
                let target = node.animated_target.unwrap_or_default();
                let layout_root = node.options.layout_root;

                let (corrected, tree_scale) = if layout_root || path.is_empty() {
                    (layout, Point::one())
                } else {
                    let mut corrected = layout;
                    for delta in &path {
                        corrected = apply_box_delta(&corrected, delta);
                    }
                    (corrected, inherited_scale)
                };
                let delta = calc_box_delta(&corrected, &target);

                if let Some(node) = self.node_mut(id) {
                    node.layout_corrected = Some(corrected);
                    node.tree_scale = tree_scale;
                    node.projection_delta = Some(delta);
                    node.needs_render = !delta.is_identity()
                        || node.rendered_non_identity
                        || node.opacity.is_some()
                        || !node.style_values.is_empty();
                }

                if layout_root {
                    child_path = vec![delta];
                } else {
                    child_path.push(delta);
                }
                child_scale = Point::new(
                    tree_scale.x * delta.x.scale,
                    tree_scale.y * delta.y.scale,
                );
            }

            for child in children {
                work.push((child, child_path.clone(), child_scale));
            }
        }
    }

    /// Render phase: the only place host writes happen.
    fn render_phase(&mut self, host: &mut dyn Host) {
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.needs_render && (n.mounted || n.exiting))
            .map(|n| n.id)
            .collect();
        for id in ids {
            let patch = self.build_patch(id);
            host.write_frame(id, &patch);
            if let Some(node) = self.node_mut(id) {
                node.needs_render = false;
                node.rendered_non_identity =
                    patch.delta.map_or(false, |delta| !delta.is_identity());
            }
        }
    }

    fn build_patch(&self, id: NodeId) -> FramePatch {
        let Some(node) = self.node(id) else {
            return FramePatch::default();
        };
        let target = node.animated_target.or(node.target);
        let mut styles: Vec<(String, StyleValue)> = Vec::new();
        for (name, raw) in &node.style_values {
            let corrected = match &target {
                Some(target_box) => {
                    let ctx = CorrectionContext {
                        target: target_box,
                        delta: node.projection_delta.as_ref(),
                        tree_scale: node.tree_scale,
                    };
                    self.correctors.correct(name, raw, Some(&ctx))
                }
                // Non-projecting node: raw value passes through unchanged.
                None => self.correctors.correct(name, raw, None),
            };
            if let Some(corrector) = self.correctors.get(name) {
                if let Some(extra) = corrector.apply_to() {
                    for extra_name in extra {
                        styles.push((extra_name.to_string(), corrected.clone()));
                    }
                }
            }
            styles.push((name.clone(), corrected));
        }

        FramePatch {
            delta: node.projection_delta,
            tree_scale: node.tree_scale,
            rotate: node.options.rotate,
            opacity: node.opacity,
            styles,
        }
    }

    /// Post-render phase: lifecycle notifications.
    fn post_render_phase(&mut self) {
        let updated = std::mem::take(&mut self.frame_updated);
        for (id, layout_changed) in updated {
            let delta = self
                .node(id)
                .and_then(|n| n.projection_delta)
                .unwrap_or_default();
            self.emit(ProjectionEvent::DidUpdate {
                node: id,
                delta,
                layout_changed,
            });
            if let Some(node) = self.node_mut(id) {
                // Snapshot is consumed by this cycle; the armed animation
                // keeps its own copy of the origin box.
                node.snapshot = None;
            }
        }
    }

    // ---- shared-element plumbing -------------------------------------------

    /// Contend for the lead role of this node's layout-id stack.
    fn promote(&mut self, id: NodeId) {
        let Some(layout_id) = self.node(id).and_then(|n| n.options.layout_id.clone()) else {
            return;
        };
        let frame = self.scheduler.frame();
        match self.shared.join(&layout_id, id, frame) {
            Promotion::Promoted {
                lead,
                follow,
                dropped,
            } => {
                if let Some(node) = self.node_mut(lead) {
                    node.role = Some(SharedRole::Lead);
                }
                if let Some(follow_id) = follow {
                    if let Some(node) = self.node_mut(follow_id) {
                        node.role = Some(SharedRole::Follow);
                    }
                }
                if let Some(dropped_id) = dropped {
                    log::warn!(
                        "shared layout id {layout_id:?}: dropping stale follower {dropped_id:?}"
                    );
                    self.push_event(ProjectionEvent::Warning {
                        message: ProjectionError::SharedIdCollision(layout_id.clone()).to_string(),
                    });
                    self.release_shared_node(dropped_id);
                }
                self.push_event(ProjectionEvent::LeadChanged {
                    layout_id,
                    lead,
                    follow,
                });
            }
            Promotion::TieRetained { .. } => {}
        }
    }

    /// Release a node that no longer participates in a shared transition.
    /// Exiting nodes are removed outright; mounted ones just shed their role.
    fn release_shared_node(&mut self, id: NodeId) {
        let exiting = self.node(id).is_some_and(|n| n.exiting);
        if exiting {
            self.remove_node(id);
        } else if let Some(node) = self.node_mut(id) {
            node.role = None;
            node.opacity = None;
            node.needs_render = true;
        }
    }

    fn complete_animation(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.animation = None;
        node.animated_target = node.target;
        node.opacity = None;
        node.needs_render = true;
        let layout_id = node.options.layout_id.clone();
        self.push_event(ProjectionEvent::AnimationComplete { node: id });

        // A completed shared transition releases the retained follower.
        if let Some(layout_id) = layout_id {
            let follow = self
                .shared
                .get(&layout_id)
                .filter(|stack| stack.lead == Some(id))
                .and_then(|stack| stack.follow);
            if let Some(follow_id) = follow {
                self.shared.remove_member(&layout_id, follow_id);
                self.release_shared_node(follow_id);
            }
        }
    }

    // ---- arena helpers -----------------------------------------------------

    fn node(&self, id: NodeId) -> Option<&ProjectionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut ProjectionNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Pre-order traversal so parents always resolve before children.
    fn traversal_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut work: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = work.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            order.push(id);
            for child in node.children.iter().rev() {
                work.push(*child);
            }
        }
        order
    }

    /// Fully detach and drop a node; children are reparented to its parent.
    fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let parent = node.parent;
        let children = node.children.clone();
        let group = node.options.group;
        let layout_id = node.options.layout_id.clone();

        for child in &children {
            if let Some(child_node) = self.node_mut(*child) {
                child_node.parent = parent;
            }
        }
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.node_mut(p) {
                    parent_node.children.retain(|c| *c != id);
                    parent_node.children.extend(children);
                }
            }
            None => {
                self.roots.retain(|r| *r != id);
                self.roots.extend(children);
            }
        }
        if let Some(gid) = group {
            if let Some(g) = self.groups.iter_mut().find(|g| g.id == gid) {
                g.leave(id);
            }
        }
        if let Some(layout_id) = layout_id {
            self.shared.remove_member(&layout_id, id);
        }
        self.scheduler.cancel(id);
        self.nodes.retain(|n| n.id != id);
    }

    // ---- events ------------------------------------------------------------

    /// Route an event to this frame's outputs, or hold it for the next frame
    /// when raised between frames.
    fn push_event(&mut self, event: ProjectionEvent) {
        if self.scheduler.phase().is_some() {
            self.emit(event);
        } else {
            self.pending_events.push(event);
        }
    }

    fn emit(&mut self, event: ProjectionEvent) {
        if self.outputs.events.len() >= self.cfg.max_events_per_frame {
            return;
        }
        self.outputs.push_event(event);
    }

    // ---- introspection -----------------------------------------------------

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn layout_of(&self, id: NodeId) -> Option<LayoutBox> {
        self.node(id).and_then(|n| n.layout)
    }

    pub fn target_of(&self, id: NodeId) -> Option<LayoutBox> {
        self.node(id).and_then(|n| n.target)
    }

    pub fn animated_target_of(&self, id: NodeId) -> Option<LayoutBox> {
        self.node(id).and_then(|n| n.animated_target)
    }

    pub fn projection_delta_of(&self, id: NodeId) -> Option<BoxDelta> {
        self.node(id).and_then(|n| n.projection_delta)
    }

    pub fn tree_scale_of(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.tree_scale)
    }

    pub fn opacity_of(&self, id: NodeId) -> Option<f32> {
        self.node(id).and_then(|n| n.opacity)
    }

    pub fn lead_of(&self, layout_id: &str) -> Option<NodeId> {
        self.shared.get(layout_id).and_then(|stack| stack.lead)
    }

    pub fn follow_of(&self, layout_id: &str) -> Option<NodeId> {
        self.shared.get(layout_id).and_then(|stack| stack.follow)
    }

    pub fn is_animating(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.animation.is_some())
    }

    pub fn is_exiting(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.exiting)
    }

    /// Suspension state, exposed so host adapters can pause their tween
    /// driver while a subtree is frozen.
    pub fn is_suspended(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.measurement_suspended)
    }
}
