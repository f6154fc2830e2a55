use super::*;
use crate::diagram::er::{Attribute, Cardinality, Er, Relationship};
use crate::diagram::flowchart::{Flowchart, Step, StepKind, StepPatch, Transition};
use crate::diagram::uml::{Class, Uml};

fn id(raw: &str) -> ElementId {
    ElementId::new(raw)
}

// =============================================================================
// node form
// =============================================================================

#[test]
fn confirm_adds_and_resets_form() {
    let mut editor = Editor::<Flowchart>::new();
    editor.set_node_form(Step::new("Validate input", StepKind::Process));

    let added = editor.confirm_node().unwrap();
    assert_eq!(added, id("3"));
    assert_eq!(editor.node_form(), &NodeForm::default());
    assert_eq!(editor.last_error(), None);
}

#[test]
fn failed_confirm_keeps_form_and_reports() {
    let mut editor = Editor::<Uml>::new();
    let mut draft = Class::new("");
    draft.methods.push("+ pay()".into());
    editor.set_node_form(draft.clone());

    assert!(editor.confirm_node().is_err());
    assert_eq!(editor.node_form().body, draft);
    assert_eq!(editor.last_error(), Some("Name is required"));
    assert_eq!(editor.document().nodes().len(), 1);
}

#[test]
fn success_clears_previous_error() {
    let mut editor = Editor::<Uml>::new();
    assert!(editor.submit_node(Class::new(" ")).is_err());
    assert!(editor.last_error().is_some());
    editor.submit_node(Class::new("Invoice")).unwrap();
    assert_eq!(editor.last_error(), None);
}

#[test]
fn edit_node_form_builds_member_lists() {
    let mut editor = Editor::<Uml>::new();
    editor.set_node_form(Class::new("Cart"));
    editor.edit_node_form(|class| class.push_attribute("- items: Vec<Item>")).unwrap();
    editor.edit_node_form(|class| class.push_method("+ total()")).unwrap();
    let err = editor.edit_node_form(|class| class.push_method("  ")).unwrap_err();

    assert_eq!(err, crate::diagram::ValidationError::EmptyEntry { field: "method" }.into());
    assert_eq!(editor.node_form().body.methods, vec!["+ total()"]);
    assert_eq!(editor.last_error(), Some("Method cannot be empty"));
}

#[test]
fn er_form_attribute_index_errors_keep_draft() {
    let mut editor = Editor::<Er>::new();
    editor.edit_node_form(|entity| entity.push_attribute(Attribute::key("id"))).unwrap();
    let err = editor.edit_node_form(|entity| entity.remove_attribute(3)).unwrap_err();

    assert!(matches!(err, DiagramError::EntryNotFound { index: 3, .. }));
    assert_eq!(editor.node_form().body.attributes.len(), 1);
}

// =============================================================================
// editing existing nodes
// =============================================================================

#[test]
fn begin_edit_then_confirm_patches_node() {
    let mut editor = Editor::<Uml>::new();
    editor.begin_edit(&id("1")).unwrap();
    assert_eq!(editor.node_form().editing, Some(id("1")));
    assert_eq!(editor.node_form().body.name, "User");

    editor.edit_node_form(|class| class.push_method("+ resetPassword()")).unwrap();
    let patched = editor.confirm_node().unwrap();

    assert_eq!(patched, id("1"));
    assert_eq!(editor.document().nodes().len(), 1);
    assert_eq!(editor.document().nodes()[0].body.methods.len(), 3);
    assert_eq!(editor.node_form().editing, None);
}

#[test]
fn begin_edit_unknown_node_fails() {
    let mut editor = Editor::<Uml>::new();
    assert_eq!(editor.begin_edit(&id("5")).unwrap_err(), DiagramError::NotFound(id("5")));
    assert_eq!(editor.node_form().editing, None);
}

#[test]
fn cancel_edit_resets_form() {
    let mut editor = Editor::<Flowchart>::new();
    editor.begin_edit(&id("2")).unwrap();
    editor.cancel_edit();
    assert_eq!(editor.node_form(), &NodeForm::default());
}

#[test]
fn editing_start_kind_is_protected() {
    let mut editor = Editor::<Flowchart>::new();
    editor.begin_edit(&id("1")).unwrap();
    editor.edit_node_form(|step| {
        step.kind = StepKind::Decision;
        Ok(())
    })
    .unwrap();

    let err = editor.confirm_node().unwrap_err();
    assert!(matches!(err, DiagramError::Protected { role: "start", .. }));
    assert_eq!(editor.node_form().editing, Some(id("1")));
}

#[test]
fn direct_update_patches_label() {
    let mut editor = Editor::<Flowchart>::new();
    editor.update_node(&id("2"), StepPatch { label: Some("Done".into()), kind: None }).unwrap();
    assert_eq!(editor.document().node(&id("2")).unwrap().body.label, "Done");
}

// =============================================================================
// links and removal
// =============================================================================

#[test]
fn link_form_confirm_and_self_loop() {
    let mut editor = Editor::<Er>::new();
    editor.submit_node(crate::diagram::er::Entity::new("Order")).unwrap();

    let rel = editor
        .submit_link(LinkForm::new("1", "2", Relationship::new(Cardinality::OneToMany)))
        .unwrap();
    assert_eq!(rel, id("rel-1"));
    assert_eq!(editor.link_form(), &LinkForm::default());

    let looped = LinkForm::new("2", "2", Relationship::default());
    assert!(editor.submit_link(looped.clone()).is_err());
    assert_eq!(editor.link_form(), &looped);
    assert_eq!(editor.last_error(), Some("Cannot connect a node to itself"));
    assert_eq!(editor.document().links().len(), 1);
}

#[test]
fn empty_link_form_is_missing_endpoint() {
    let mut editor = Editor::<Flowchart>::new();
    editor.set_link_form(LinkForm::new("", "2", Transition::default()));
    assert!(editor.confirm_link().is_err());
    assert_eq!(editor.last_error(), Some("Both 'from' and 'to' nodes are required"));
}

#[test]
fn removing_protected_node_reports() {
    let mut editor = Editor::<Flowchart>::new();
    assert!(editor.remove_node(&id("1")).is_err());
    assert_eq!(editor.last_error(), Some("Start node 1 is protected"));
}

#[test]
fn removing_edited_node_resets_form() {
    let mut editor = Editor::<Uml>::new();
    editor.submit_node(Class::new("Temp")).unwrap();
    editor.begin_edit(&id("2")).unwrap();
    editor.remove_node(&id("2")).unwrap();
    assert_eq!(editor.node_form().editing, None);
}

#[test]
fn remove_unknown_link_is_ok() {
    let mut editor = Editor::<Uml>::new();
    assert!(!editor.remove_link(&id("rel-4")));
}
