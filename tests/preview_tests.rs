// Scene-side behaviour: node index, applying variants, and dropping late
// load completions.

use feeder_core::{Dimensions, LimitViolation, ResolvedVariant, RuleTable};
use feeder_preview::*;
use glam::DVec3;

const L5A: &str = "/models/linearsizes/linear-L5A.glb";
const L15A: &str = "/models/linearsizes/linear-L15A.glb";

fn linear_preview() -> Preview<'static> {
    Preview::with_dimensions(
        RuleTable::builtin(),
        "linear",
        Dimensions::new().with("A", "70").with("B", "111").with("C", "75"),
    )
}

#[test]
fn scene_index_resolves_first_duplicate() {
    let mut scene = SceneGraph::new("x.glb", ["A", "B", "A"]);
    assert_eq!(scene.nodes().len(), 3);
    assert!(scene.node("C").is_none());
    scene.node_mut("A").unwrap().scale = DVec3::splat(2.0);
    assert_eq!(scene.nodes()[0].scale, DVec3::splat(2.0));
    assert_eq!(scene.nodes()[2].scale, DVec3::ONE);
}

#[test]
fn apply_reports_unmatched_parts() {
    let variant = RuleTable::builtin().resolve(
        "linear",
        &Dimensions::new().with("B", "148").with("C", "75").with("D", "49"),
    );
    let mut scene = SceneGraph::new(L5A, ["A", "frame"]);
    let unmatched = scene.apply(&variant);
    assert_eq!(unmatched, vec!["C".to_string()]);
    assert_eq!(scene.root_scale(), variant.root_scale);
    assert!((scene.node("A").unwrap().scale.x - 2.0).abs() < 1e-9);
    assert_eq!(scene.node("frame").unwrap().scale, DVec3::ONE);
}

#[test]
fn set_dimension_reports_variant_changes() {
    let mut preview = linear_preview();
    assert_eq!(preview.desired().asset_file, L5A);
    assert!(preview.set_dimension("C", "80").unwrap());
    assert_eq!(preview.desired().asset_file, L15A);
    assert!(!preview.set_dimension("E", "12").unwrap(), "E drives nothing");
    assert!(preview.set_dimension("B", "150").unwrap(), "scale change only");
    assert_eq!(preview.desired().asset_file, L15A);
}

#[test]
fn set_dimension_enforces_limits() {
    let mut preview = linear_preview();
    let err = preview.set_dimension("C", "40").unwrap_err();
    assert!(matches!(err, LimitViolation::TooSmall { .. }));
    assert_eq!(preview.dimensions().raw("C"), Some("75"), "rejected input not stored");
    assert!(preview.set_dimension("C", "").unwrap(), "blank clears the value");
    assert_eq!(preview.desired(), &ResolvedVariant::fallback("linear"));
}

#[test]
fn load_with_applies_current_variant() {
    let mut preview = linear_preview();
    let loader = StaticLoader::from_rule_table(RuleTable::builtin());
    let outcome = pollster::block_on(preview.load_with(&loader)).unwrap();
    assert_eq!(outcome, LoadOutcome::Applied { unmatched: vec![] });
    let scene = preview.scene().unwrap();
    assert_eq!(scene.asset(), L5A);
    assert!((scene.node("A").unwrap().scale.x - 1.5).abs() < 1e-9);
    assert!((scene.node("A").unwrap().scale.z - 1.0).abs() < 1e-9);
    assert_eq!(preview.pending_loads(), 0);
}

#[test]
fn late_completion_is_dropped() {
    let mut preview = linear_preview();
    let loader = StaticLoader::from_rule_table(RuleTable::builtin());

    let first = preview.request_load();
    preview.set_dimension("C", "85").unwrap();
    let second = preview.request_load();
    assert_eq!(preview.pending_loads(), 2);

    // second finishes first, then the old one arrives
    let (second, res2) = pollster::block_on(fetch(&loader, second));
    let (first, res1) = pollster::block_on(fetch(&loader, first));

    let out2 = preview.complete_load(&second, res2).unwrap();
    assert!(matches!(out2, LoadOutcome::Applied { .. }));
    let out1 = preview.complete_load(&first, res1).unwrap();
    assert_eq!(out1, LoadOutcome::Stale);

    assert_eq!(preview.scene().unwrap().asset(), L15A);
    assert_eq!(preview.pending_loads(), 0);
}

#[test]
fn ticket_settles_only_once() {
    let mut preview = linear_preview();
    let loader = StaticLoader::from_rule_table(RuleTable::builtin());
    let ticket = preview.request_load();
    let (ticket, res) = pollster::block_on(fetch(&loader, ticket));
    assert!(matches!(
        preview.complete_load(&ticket, res).unwrap(),
        LoadOutcome::Applied { .. }
    ));
    let again = SceneGraph::new(L5A, ["A", "C"]);
    assert_eq!(
        preview.complete_load(&ticket, Ok(again)).unwrap(),
        LoadOutcome::Stale
    );
}

#[test]
fn returning_to_the_same_variant_accepts_older_ticket() {
    let mut preview = linear_preview();
    let loader = StaticLoader::from_rule_table(RuleTable::builtin());
    let first = preview.request_load();
    preview.set_dimension("C", "85").unwrap();
    preview.set_dimension("C", "75").unwrap();
    let (first, res) = pollster::block_on(fetch(&loader, first));
    assert!(matches!(
        preview.complete_load(&first, res).unwrap(),
        LoadOutcome::Applied { .. }
    ));
}

#[test]
fn failed_current_load_is_an_error_but_stale_failure_is_not() {
    let mut preview = Preview::new(RuleTable::builtin(), "linear");
    let empty = StaticLoader::new();

    let ticket = preview.request_load();
    let (ticket, res) = pollster::block_on(fetch(&empty, ticket));
    assert!(preview.complete_load(&ticket, res).is_err());

    let stale = preview.request_load();
    preview.set_dimension("C", "70").unwrap();
    let (stale, res) = pollster::block_on(fetch(&empty, stale));
    assert_eq!(preview.complete_load(&stale, res).unwrap(), LoadOutcome::Stale);
}

#[test]
fn refresh_scene_reuses_loaded_asset() {
    let mut preview = linear_preview();
    let loader = StaticLoader::from_rule_table(RuleTable::builtin());
    assert!(preview.refresh_scene().is_none(), "nothing loaded yet");
    pollster::block_on(preview.load_with(&loader)).unwrap();

    preview.set_dimension("B", "148").unwrap();
    assert_eq!(preview.refresh_scene(), Some(vec![]));
    let x = preview.scene().unwrap().node("A").unwrap().scale.x;
    assert!((x - 2.0).abs() < 1e-9);

    preview.set_dimension("C", "90").unwrap();
    assert!(preview.refresh_scene().is_none(), "asset changed, reload needed");
}

#[test]
fn fallback_scene_loads_for_every_feeder_type() {
    let loader = StaticLoader::from_rule_table(RuleTable::builtin());
    for ty in ["bowl", "linear", "hopper", "set-a", "set-b", "set-c"] {
        let mut preview = Preview::new(RuleTable::builtin(), ty);
        let outcome = pollster::block_on(preview.load_with(&loader)).unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { unmatched: vec![] }, "{ty}");
        assert_eq!(preview.scene().unwrap().asset(), format!("/models/{ty}.glb"));
    }
}

#[test]
fn camera_and_reference_follow_inputs() {
    let mut preview = Preview::new(RuleTable::builtin(), "bowl");
    let before = preview.reference().position.x;
    preview.set_dimension("A", "600").unwrap();
    let after = preview.reference().position.x;
    assert!(after < before, "larger bowl pushes the reference further out");
    let cam = preview.camera(1.5).unwrap();
    assert!((cam.target.y - (0.3 - 0.08)).abs() < 1e-9);
    assert!(Preview::new(RuleTable::builtin(), "conveyor").camera(1.5).is_none());
}

#[test]
fn switching_feeder_type_recomputes() {
    let mut preview = linear_preview();
    assert!(preview.set_feeder_type("bowl"));
    assert_eq!(preview.feeder_type(), "bowl");
    assert_eq!(preview.desired().asset_file, "/models/bowl.glb");
}
