use super::*;
use serde_json::json;

#[test]
fn only_start_and_end_are_reserved() {
    assert!(StepKind::Start.is_reserved());
    assert!(StepKind::End.is_reserved());
    assert!(!StepKind::Decision.is_reserved());
    assert_eq!(Step::new("x", StepKind::End).reserved_role(), Some("end"));
    assert_eq!(Step::new("x", StepKind::Output).reserved_role(), None);
}

#[test]
fn step_kind_defaults_to_process() {
    let step: Step = serde_json::from_value(json!({ "label": "Do work" })).unwrap();
    assert_eq!(step.kind, StepKind::Process);
}

#[test]
fn step_uses_type_on_the_wire() {
    let json = serde_json::to_value(Step::new("Ask user", StepKind::Input)).unwrap();
    assert_eq!(json, json!({ "label": "Ask user", "type": "input" }));
}

#[test]
fn patch_from_step_is_full_replacement() {
    let mut step = Step::new("Old", StepKind::Process);
    step.apply(StepPatch::from(Step::new("New", StepKind::Output)));
    assert_eq!(step, Step::new("New", StepKind::Output));
}

#[test]
fn empty_patch_changes_nothing() {
    let mut step = Step::new("Keep", StepKind::Decision);
    step.apply(StepPatch::default());
    assert_eq!(step, Step::new("Keep", StepKind::Decision));
}

#[test]
fn transition_label_is_optional_on_the_wire() {
    assert_eq!(serde_json::to_value(Transition::default()).unwrap(), json!({}));
    assert_eq!(serde_json::to_value(Transition::labeled("yes")).unwrap(), json!({ "label": "yes" }));
}
