use super::*;
use crate::diagram::flowchart::{Step, StepKind, Transition};
use crate::diagram::er::{Attribute, Entity};
use crate::diagram::uml::Class;
use crate::error::ErrorCode;

fn step(id: &str, kind: StepKind) -> Node<Step> {
    Node::new(id, Step::new("label", kind))
}

// =============================================================================
// required fields
// =============================================================================

#[test]
fn blank_label_is_missing_field() {
    let err = require_name(&Step::new("   ", StepKind::Process)).unwrap_err();
    assert_eq!(err, DiagramError::Validation(ValidationError::MissingField { field: "label" }));
}

#[test]
fn blank_class_name_reports_name_field() {
    let err = require_name(&Class::new("")).unwrap_err();
    assert_eq!(err.to_string(), "name is required");
}

#[test]
fn blank_list_entries_are_rejected_after_the_name() {
    let mut class = Class::new("Order");
    class.methods = vec!["+ total()".into(), "  ".into()];
    let err = require_fields(&class).unwrap_err();
    assert_eq!(err, ValidationError::EmptyEntry { field: "method" }.into());

    class.name = String::new();
    assert_eq!(require_fields(&class).unwrap_err(), ValidationError::MissingField { field: "name" }.into());

    let mut entity = Entity::new("Order");
    entity.attributes.push(Attribute::new(""));
    assert_eq!(require_fields(&entity).unwrap_err().to_string(), "attribute cannot be empty");

    assert!(require_fields(&Step::new("Ship", StepKind::Process)).is_ok());
}

#[test]
fn missing_endpoint_rejected() {
    let err = require_endpoints(&ElementId::default(), &ElementId::new("2")).unwrap_err();
    assert_eq!(err, ValidationError::MissingEndpoint.into());
}

#[test]
fn reserved_kind_not_insertable() {
    let err = check_insertable(&Step::new("Begin", StepKind::Start)).unwrap_err();
    assert_eq!(err, ValidationError::ReservedKind("start").into());
    assert!(check_insertable(&Step::new("Work", StepKind::Decision)).is_ok());
}

// =============================================================================
// role changes
// =============================================================================

#[test]
fn reserved_role_cannot_be_patched_away() {
    let id = ElementId::new("1");
    let before = Step::new("Start", StepKind::Start);
    let after = Step::new("Start", StepKind::Process);
    let err = check_role_change(&id, &before, &after).unwrap_err();
    assert_eq!(err, DiagramError::Protected { id, role: "start" });
}

#[test]
fn start_cannot_become_end() {
    let id = ElementId::new("1");
    let err = check_role_change(&id, &Step::new("s", StepKind::Start), &Step::new("s", StepKind::End)).unwrap_err();
    assert!(matches!(err, DiagramError::Protected { role: "start", .. }));
}

#[test]
fn ordinary_step_cannot_gain_reserved_role() {
    let id = ElementId::new("3");
    let err = check_role_change(&id, &Step::new("p", StepKind::Process), &Step::new("p", StepKind::End)).unwrap_err();
    assert_eq!(err, ValidationError::ReservedKind("end").into());
}

#[test]
fn relabeling_reserved_step_is_fine() {
    let id = ElementId::new("1");
    assert!(check_role_change(&id, &Step::new("Start", StepKind::Start), &Step::new("Begin", StepKind::Start)).is_ok());
}

// =============================================================================
// references and loops
// =============================================================================

#[test]
fn unknown_endpoint_rejected_before_self_loop() {
    let nodes = vec![step("1", StepKind::Start)];
    let ghost = ElementId::new("9");
    let err = resolve_endpoints(&nodes, &ghost, &ghost).unwrap_err();
    assert_eq!(err, ValidationError::UnknownEndpoint(ghost).into());
}

#[test]
fn self_loop_rejected() {
    let id = ElementId::new("1");
    assert_eq!(reject_self_loop(&id, &id).unwrap_err(), ValidationError::SelfLoop.into());
    assert!(reject_self_loop(&id, &ElementId::new("2")).is_ok());
}

// =============================================================================
// deletion protection
// =============================================================================

#[test]
fn start_and_end_are_not_deletable() {
    for kind in [StepKind::Start, StepKind::End] {
        let err = check_deletable(&step("1", kind)).unwrap_err();
        assert_eq!(err.error_code(), "E_PROTECTED_ELEMENT");
    }
}

#[test]
fn other_step_kinds_are_deletable() {
    for kind in [StepKind::Process, StepKind::Decision, StepKind::Input, StepKind::Output] {
        assert!(check_deletable(&step("3", kind)).is_ok());
    }
}

// =============================================================================
// whole document
// =============================================================================

#[test]
fn dangling_links_finds_unresolved_and_looping_links() {
    let nodes = vec![step("1", StepKind::Start), step("2", StepKind::End)];
    let link = |id: &str, from: &str, to: &str| Link {
        id: ElementId::new(id),
        from: ElementId::new(from),
        to: ElementId::new(to),
        attrs: Transition::default(),
    };
    let links = vec![link("edge-1", "1", "2"), link("edge-2", "1", "7"), link("edge-3", "2", "2")];
    let bad: Vec<&str> = dangling_links(&nodes, &links)
        .into_iter()
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(bad, vec!["edge-2", "edge-3"]);
}

#[test]
fn node_ids_must_be_present_and_distinct() {
    assert!(unique_node_ids(&[step("1", StepKind::Start), step("2", StepKind::End)]).is_ok());

    let err = unique_node_ids(&[step("1", StepKind::Start), step("1", StepKind::Process)]).unwrap_err();
    assert_eq!(err, DiagramError::MalformedDocument("duplicate node id 1".into()));

    let err = unique_node_ids(&[step(" ", StepKind::Process)]).unwrap_err();
    assert_eq!(err.error_code(), "E_MALFORMED_DOCUMENT");
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(DiagramError::from(ValidationError::SelfLoop).error_code(), "E_VALIDATION");
    assert_eq!(DiagramError::NotFound(ElementId::new("4")).error_code(), "E_NOT_FOUND");
    assert_eq!(DiagramError::EntryNotFound { field: "method", index: 2 }.error_code(), "E_NOT_FOUND");
    assert_eq!(DiagramError::MalformedDocument("x".into()).error_code(), "E_MALFORMED_DOCUMENT");
    assert!(!DiagramError::NotFound(ElementId::new("4")).retryable());
}
