use reflow_projection_core::{
    config::Config,
    engine::ProjectionEngine,
    ids::NodeId,
    node::{NodeOptions, NodeOptionsPatch},
    outputs::ProjectionEvent,
};
use reflow_test_fixtures::{rect, MockHost};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn layout_opts() -> NodeOptions {
    NodeOptions {
        layout: true,
        ..Default::default()
    }
}

fn mounted_node(
    engine: &mut ProjectionEngine,
    host: &mut MockHost,
    parent: Option<NodeId>,
    options: NodeOptions,
    layout: reflow_projection_core::LayoutBox,
) -> NodeId {
    let id = engine.create_node(parent, options);
    host.set_box(id, layout);
    engine.mount(id);
    id
}

/// it should measure a freshly mounted node and settle at an identity delta
#[test]
fn mounted_node_settles_at_identity() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );

    let outputs = engine.run_frame(&mut host).clone();
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, ProjectionEvent::LayoutMeasured { node: n, .. } if *n == node)));

    let delta = engine.projection_delta_of(node).expect("delta computed");
    assert!(delta.is_identity());
    // Nothing to correct, nothing written.
    assert_eq!(host.patch_count(node), 0);
}

/// it should invert a layout change into the delta that preserves the old
/// visual position at progress zero
#[test]
fn layout_change_inverts_into_projection_delta() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(node, &mut host);
    assert!(host.render_requests.contains(&node));
    // The host reflows: x 0..100 -> 100..300, y 0..100 -> 0..50.
    host.set_box(node, rect(100.0, 0.0, 200.0, 50.0));

    let outputs = engine.run_frame(&mut host).clone();
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, ProjectionEvent::AnimationStart { node: n } if *n == node)));
    assert!(outputs.events.iter().any(|e| matches!(
        e,
        ProjectionEvent::DidUpdate { node: n, layout_changed: true, .. } if *n == node
    )));

    let delta = engine.projection_delta_of(node).expect("delta computed");
    approx(delta.x.scale, 0.5, 1e-4);
    approx(delta.x.translate, -50.0, 1e-3);
    approx(delta.y.scale, 2.0, 1e-4);
    approx(delta.y.translate, 0.0, 1e-3);

    let patch = host.last_patch(node).expect("patch written");
    let written = patch.delta.expect("delta in patch");
    approx(written.x.scale, 0.5, 1e-4);
}

/// it should fire AnimationComplete and write a clearing identity patch when
/// progress reaches one
#[test]
fn completed_animation_clears_transform() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(node, &mut host);
    host.set_box(node, rect(100.0, 0.0, 100.0, 100.0));
    engine.run_frame(&mut host);
    assert!(engine.is_animating(node));

    engine.set_animation_progress(node, 1.0);
    assert!(!engine.is_animating(node));

    host.clear_recordings();
    let outputs = engine.run_frame(&mut host).clone();
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, ProjectionEvent::AnimationComplete { node: n } if *n == node)));
    let patch = host.last_patch(node).expect("clearing patch written");
    assert!(patch.delta.expect("delta present").is_identity());
}

/// it should interpolate the rendered box by externally supplied progress
#[test]
fn progress_drives_animated_target() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(node, &mut host);
    host.set_box(node, rect(200.0, 0.0, 100.0, 100.0));
    engine.run_frame(&mut host);

    engine.set_animation_progress(node, 0.5);
    engine.run_frame(&mut host);

    // Midway between the origin (x=0) and the new layout (x=200).
    let animated = engine.animated_target_of(node).expect("animated target");
    approx(animated.x.min, 100.0, 1e-3);
    let delta = engine.projection_delta_of(node).expect("delta");
    approx(delta.x.translate, -100.0, 1e-3);
}

/// it should compose ancestor deltas into tree scale so descendants keep
/// their own visual size under a scaling parent
#[test]
fn tree_scale_composes_through_nesting() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let parent = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    // Structural middle node that does not project.
    let middle = mounted_node(
        &mut engine,
        &mut host,
        Some(parent),
        NodeOptions::default(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let leaf = mounted_node(
        &mut engine,
        &mut host,
        Some(middle),
        layout_opts(),
        rect(10.0, 10.0, 30.0, 30.0),
    );
    engine.run_frame(&mut host);

    // The parent's layout doubles; the leaf's own layout is untouched.
    engine.will_update(parent, &mut host);
    host.set_box(parent, rect(0.0, 0.0, 200.0, 200.0));
    engine.run_frame(&mut host);

    let parent_delta = engine.projection_delta_of(parent).expect("parent delta");
    approx(parent_delta.x.scale, 0.5, 1e-4);

    // Leaf inherits the parent's shrink and compensates with the inverse.
    let tree_scale = engine.tree_scale_of(leaf).expect("leaf tree scale");
    approx(tree_scale.x, 0.5, 1e-4);
    approx(tree_scale.y, 0.5, 1e-4);
    let leaf_delta = engine.projection_delta_of(leaf).expect("leaf delta");
    approx(leaf_delta.x.scale, 2.0, 1e-3);

    let patch = host.last_patch(leaf).expect("leaf patch written");
    approx(patch.tree_scale.x, 0.5, 1e-4);
}

/// it should multiply delta scales along a chain of three projecting levels
#[test]
fn tree_scale_composes_through_three_projecting_levels() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let root = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let mid = mounted_node(
        &mut engine,
        &mut host,
        Some(root),
        layout_opts(),
        rect(0.0, 0.0, 50.0, 50.0),
    );
    let leaf = mounted_node(
        &mut engine,
        &mut host,
        Some(mid),
        layout_opts(),
        rect(0.0, 0.0, 25.0, 25.0),
    );
    engine.run_frame(&mut host);

    // Only the root's layout doubles; the descendants keep their boxes.
    engine.will_update(root, &mut host);
    host.set_box(root, rect(0.0, 0.0, 200.0, 200.0));
    engine.run_frame(&mut host);

    // Root shrinks back onto its origin box.
    let root_delta = engine.projection_delta_of(root).expect("root delta");
    approx(root_delta.x.scale, 0.5, 1e-4);

    // The mid node inherits the shrink and compensates with the inverse.
    let mid_scale = engine.tree_scale_of(mid).expect("mid tree scale");
    approx(mid_scale.x, 0.5, 1e-4);
    approx(mid_scale.y, 0.5, 1e-4);
    let mid_delta = engine.projection_delta_of(mid).expect("mid delta");
    approx(mid_delta.x.scale, 2.0, 1e-3);

    // The leaf sees the product 0.5 * 2 = 1 and needs no correction at all.
    let leaf_scale = engine.tree_scale_of(leaf).expect("leaf tree scale");
    approx(leaf_scale.x, 1.0, 1e-3);
    approx(leaf_scale.y, 1.0, 1e-3);
    assert!(engine
        .projection_delta_of(leaf)
        .expect("leaf delta")
        .is_identity());

    let patch = host.last_patch(mid).expect("mid patch written");
    approx(patch.tree_scale.x, 0.5, 1e-4);
}

/// it should restart projection inheritance at a layout root
#[test]
fn layout_root_blocks_ancestor_corrections() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let parent = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let island = mounted_node(
        &mut engine,
        &mut host,
        Some(parent),
        NodeOptions {
            layout: true,
            layout_root: true,
            ..Default::default()
        },
        rect(10.0, 10.0, 30.0, 30.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(parent, &mut host);
    host.set_box(parent, rect(0.0, 0.0, 200.0, 200.0));
    engine.run_frame(&mut host);

    // The island ignores the parent's in-flight shrink entirely.
    let tree_scale = engine.tree_scale_of(island).expect("island tree scale");
    approx(tree_scale.x, 1.0, 1e-4);
    assert!(engine
        .projection_delta_of(island)
        .expect("island delta")
        .is_identity());
}

/// it should resolve a relative target against the parent's target box in
/// the same frame
#[test]
fn relative_target_tracks_parent() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let parent = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let child = mounted_node(
        &mut engine,
        &mut host,
        Some(parent),
        NodeOptions {
            layout: true,
            relative_parent: Some(parent),
            ..Default::default()
        },
        rect(20.0, 0.0, 60.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(parent, &mut host);
    host.set_box(parent, rect(0.0, 0.0, 50.0, 100.0));
    engine.run_frame(&mut host);
    engine.set_animation_progress(parent, 1.0);
    engine.run_frame(&mut host);

    // 20..80 inside 0..100 is 20%..80%; inside 0..50 that is 10..40.
    let target = engine.target_of(child).expect("child target");
    approx(target.x.min, 10.0, 1e-3);
    approx(target.x.max, 40.0, 1e-3);
    let delta = engine.projection_delta_of(child).expect("child delta");
    approx(delta.x.scale, 0.5, 1e-3);
    approx(delta.x.translate, 0.0, 1e-3);
}

/// it should defer a relative target to identity while the parent has no
/// resolved target yet
#[test]
fn relative_target_defers_without_parent() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    // The parent exists in the tree but is never mounted or measured.
    let parent = engine.create_node(None, layout_opts());
    let child = mounted_node(
        &mut engine,
        &mut host,
        Some(parent),
        NodeOptions {
            layout: true,
            relative_parent: Some(parent),
            ..Default::default()
        },
        rect(20.0, 0.0, 60.0, 100.0),
    );
    engine.run_frame(&mut host);

    let delta = engine.projection_delta_of(child).expect("child delta");
    assert!(delta.is_identity());
    assert!(engine.target_of(parent).is_none());
}

/// it should suspend the subtree and retain prior deltas when measurement
/// fails, then recover on reattach
#[test]
fn failed_measurement_suspends_and_recovers() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(node, &mut host);
    host.set_box(node, rect(100.0, 0.0, 100.0, 100.0));
    engine.run_frame(&mut host);
    let in_flight = engine.projection_delta_of(node).expect("delta");
    approx(in_flight.x.translate, -100.0, 1e-3);

    host.detach(node);
    engine.will_update(node, &mut host);
    let outputs = engine.run_frame(&mut host).clone();
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, ProjectionEvent::Warning { .. })));
    assert!(engine.is_suspended(node));
    // Never snapped to zero; the last good delta survives.
    let retained = engine.projection_delta_of(node).expect("retained delta");
    approx(retained.x.translate, in_flight.x.translate, 1e-3);

    host.reattach(node);
    engine.will_update(node, &mut host);
    engine.run_frame(&mut host);
    assert!(!engine.is_suspended(node));
}

/// it should freeze a suspended ancestor's whole subtree, keeping descendant
/// deltas even when the descendants remeasure fine
#[test]
fn suspended_ancestor_freezes_descendants() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let parent = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let child = mounted_node(
        &mut engine,
        &mut host,
        Some(parent),
        layout_opts(),
        rect(10.0, 10.0, 20.0, 20.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(parent, &mut host);
    host.set_box(parent, rect(100.0, 0.0, 100.0, 100.0));
    engine.run_frame(&mut host);
    let parent_delta = engine.projection_delta_of(parent).expect("parent delta");
    approx(parent_delta.x.translate, -100.0, 1e-3);
    let child_delta = engine.projection_delta_of(child).expect("child delta");
    approx(child_delta.x.translate, 100.0, 1e-3);

    // The parent drops out of measurement; the child still measures and even
    // moves, but projection under the frozen ancestor does not run.
    host.detach(parent);
    engine.will_update(parent, &mut host);
    engine.will_update(child, &mut host);
    host.set_box(child, rect(10.0, 40.0, 20.0, 20.0));
    engine.run_frame(&mut host);

    assert!(engine.is_suspended(parent));
    assert!(!engine.is_suspended(child));
    let retained = engine.projection_delta_of(child).expect("retained delta");
    approx(retained.x.translate, child_delta.x.translate, 1e-3);
    approx(retained.y.translate, child_delta.y.translate, 1e-3);
}

/// it should warn about a zero-sized measured box and keep its delta finite
#[test]
fn zero_sized_measurement_warns_and_stays_finite() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(node, &mut host);
    // Collapses to zero width.
    host.set_box(node, rect(50.0, 0.0, 0.0, 100.0));
    let outputs = engine.run_frame(&mut host).clone();
    assert!(outputs.events.iter().any(|e| matches!(
        e,
        ProjectionEvent::Warning { message } if message.contains("degenerate")
    )));

    let delta = engine.projection_delta_of(node).expect("delta computed");
    approx(delta.x.scale, 1.0, 1e-4);
    assert!(delta.x.translate.is_finite());
}

/// it should never hand out a removed node's id again
#[test]
fn node_ids_are_not_reused() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let a = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.unmount(a);
    assert_eq!(engine.node_count(), 0);

    let b = engine.create_node(None, layout_opts());
    assert_ne!(a, b);
}

/// it should remeasure every member of a layout group when one is dirtied
#[test]
fn group_members_remeasure_together() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let group = engine.create_group();
    let grouped = NodeOptions {
        layout: true,
        group: Some(group),
        ..Default::default()
    };
    let a = mounted_node(
        &mut engine,
        &mut host,
        None,
        grouped.clone(),
        rect(0.0, 0.0, 100.0, 50.0),
    );
    let b = mounted_node(
        &mut engine,
        &mut host,
        None,
        grouped,
        rect(0.0, 50.0, 100.0, 50.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(a, &mut host);
    assert!(host.render_requests.contains(&a));
    assert!(host.render_requests.contains(&b));

    // Removing a drops b upward; both boxes change.
    host.set_box(a, rect(0.0, 0.0, 100.0, 30.0));
    host.set_box(b, rect(0.0, 30.0, 100.0, 50.0));
    let outputs = engine.run_frame(&mut host).clone();
    for node in [a, b] {
        assert!(outputs
            .events
            .iter()
            .any(|e| matches!(e, ProjectionEvent::LayoutMeasured { node: n, .. } if *n == node)));
    }
    assert!(engine.is_animating(b));
}

/// it should merge option patches field by field, leaving untouched fields
/// alone
#[test]
fn option_patches_merge() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.set_options(
        node,
        NodeOptionsPatch {
            layout_id: Some(Some("hero".to_string())),
            rotate: Some(Some(45.0)),
            ..Default::default()
        },
    );
    assert_eq!(engine.lead_of("hero"), Some(node));

    engine.will_update(node, &mut host);
    host.set_box(node, rect(50.0, 0.0, 100.0, 100.0));
    engine.run_frame(&mut host);
    let patch = host.last_patch(node).expect("patch");
    approx(patch.rotate.expect("rotate carried"), 45.0, 1e-4);
}

/// it should release an unmounted plain node immediately and reparent its
/// children
#[test]
fn unmount_releases_plain_nodes() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let parent = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let child = mounted_node(
        &mut engine,
        &mut host,
        Some(parent),
        layout_opts(),
        rect(0.0, 0.0, 50.0, 50.0),
    );
    engine.run_frame(&mut host);
    assert_eq!(engine.node_count(), 2);

    engine.unmount(parent);
    assert_eq!(engine.node_count(), 1);
    // The child became a root and still projects.
    engine.run_frame(&mut host);
    assert!(engine.projection_delta_of(child).is_some());
}

/// it should produce identical outputs for identical input sequences
#[test]
fn frame_outputs_are_deterministic() {
    let run = || {
        let mut engine = ProjectionEngine::new(Config::default());
        let mut host = MockHost::new();
        let node = mounted_node(
            &mut engine,
            &mut host,
            None,
            layout_opts(),
            rect(0.0, 0.0, 100.0, 100.0),
        );
        let mut all = Vec::new();
        all.push(engine.run_frame(&mut host).clone());
        engine.will_update(node, &mut host);
        host.set_box(node, rect(40.0, 40.0, 120.0, 80.0));
        all.push(engine.run_frame(&mut host).clone());
        engine.set_animation_progress(node, 0.5);
        all.push(engine.run_frame(&mut host).clone());
        (all, host.patches)
    };

    let (events_a, patches_a) = run();
    let (events_b, patches_b) = run();
    assert_eq!(events_a, events_b);
    assert_eq!(patches_a, patches_b);
}

/// it should cancel an in-flight animation back to identity with an
/// immediate completion event
#[test]
fn cancel_resets_to_identity() {
    let mut engine = ProjectionEngine::new(Config::default());
    let mut host = MockHost::new();
    let node = mounted_node(
        &mut engine,
        &mut host,
        None,
        layout_opts(),
        rect(0.0, 0.0, 100.0, 100.0),
    );
    engine.run_frame(&mut host);

    engine.will_update(node, &mut host);
    host.set_box(node, rect(300.0, 0.0, 100.0, 100.0));
    engine.run_frame(&mut host);
    assert!(engine.is_animating(node));

    engine.cancel_animation(node);
    assert!(!engine.is_animating(node));
    let outputs = engine.run_frame(&mut host).clone();
    assert!(outputs
        .events
        .iter()
        .any(|e| matches!(e, ProjectionEvent::AnimationComplete { node: n } if *n == node)));
    assert!(engine
        .projection_delta_of(node)
        .expect("delta recomputed")
        .is_identity());
}
