use super::*;
use flowchart::{Step, StepKind, Transition};

#[test]
fn element_id_blank_is_empty() {
    assert!(ElementId::default().is_empty());
    assert!(ElementId::new("  ").is_empty());
    assert!(!ElementId::new("1").is_empty());
}

#[test]
fn element_id_serializes_as_plain_string() {
    let json = serde_json::to_string(&ElementId::new("rel-2")).unwrap();
    assert_eq!(json, "\"rel-2\"");
}

#[test]
fn diagram_kind_parse_is_case_insensitive() {
    assert_eq!(DiagramKind::parse("UML"), Some(DiagramKind::Uml));
    assert_eq!(DiagramKind::parse(" er "), Some(DiagramKind::Er));
    assert_eq!(DiagramKind::parse("flowchart"), Some(DiagramKind::Flowchart));
    assert_eq!(DiagramKind::parse("sequence"), None);
}

#[test]
fn diagram_kind_wire_names() {
    assert_eq!(DiagramKind::Flowchart.data_field(), "flowchart_data");
    assert_eq!(DiagramKind::Uml.data_field(), "uml_data");
    assert_eq!(DiagramKind::Er.data_field(), "er_data");
    assert_eq!(DiagramKind::Er.export_filename(), "er.svg");
    assert_eq!(serde_json::to_string(&DiagramKind::Uml).unwrap(), "\"uml\"");
}

#[test]
fn node_flattens_body_and_skips_missing_position() {
    let node = Node::new("3", Step::new("Validate input", StepKind::Process));
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json, serde_json::json!({ "id": "3", "label": "Validate input", "type": "process" }));
}

#[test]
fn node_position_round_trips() {
    let node = Node::new("1", uml::Class::new("Order")).at(100.0, 250.0);
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["x"], 100.0);
    assert_eq!(json["y"], 250.0);
}

#[test]
fn link_without_id_decodes_with_empty_id() {
    let link: Link<Transition> = serde_json::from_value(serde_json::json!({ "from": "1", "to": "2" })).unwrap();
    assert!(link.id.is_empty());
    assert!(link.touches(&ElementId::new("1")));
    assert!(link.touches(&ElementId::new("2")));
    assert!(!link.touches(&ElementId::new("3")));
}

#[test]
fn element_id_decodes_strings_and_integers() {
    let ids: Vec<ElementId> = serde_json::from_value(serde_json::json!(["rel-1", 3, -2])).unwrap();
    assert_eq!(ids, vec![ElementId::new("rel-1"), ElementId::new("3"), ElementId::new("-2")]);

    assert!(serde_json::from_value::<ElementId>(serde_json::json!(1.5)).is_err());
    assert!(serde_json::from_value::<ElementId>(serde_json::json!(null)).is_err());
}
