use super::*;
use serde_json::json;

#[test]
fn seed_is_user_class() {
    let seed = Uml::seed();
    assert_eq!(seed.len(), 1);
    let user = &seed[0];
    assert_eq!(user.body.name, "User");
    assert_eq!(user.body.attributes, vec!["- id: String", "- name: String"]);
    assert_eq!(user.body.methods, vec!["+ login()", "+ logout()"]);
    assert_eq!((user.x, user.y), (Some(100.0), Some(100.0)));
}

#[test]
fn blank_member_lines_rejected() {
    let mut class = Class::new("Order");
    assert!(class.push_attribute("  ").is_err());
    assert!(class.push_method("").is_err());
    class.push_attribute("- total: Money").unwrap();
    class.push_method("+ checkout()").unwrap();
    assert_eq!(class.attributes.len(), 1);
    assert_eq!(class.methods.len(), 1);
}

#[test]
fn remove_member_by_index() {
    let mut class = Uml::seed().remove(0).body;
    assert_eq!(class.remove_method(0).unwrap(), "+ login()");
    assert_eq!(class.methods, vec!["+ logout()"]);
    assert_eq!(
        class.remove_attribute(5).unwrap_err(),
        DiagramError::EntryNotFound { field: "attribute", index: 5 }
    );
}

#[test]
fn association_kind_wire_names() {
    let rel = Association::new(AssociationKind::Inheritance);
    assert_eq!(serde_json::to_value(&rel).unwrap(), json!({ "type": "inheritance" }));
    let parsed: Association = serde_json::from_value(json!({})).unwrap();
    assert_eq!(parsed.kind, AssociationKind::Association);
}

#[test]
fn patch_replaces_member_lists() {
    let mut class = Class::new("Order");
    class.apply(ClassPatch { attributes: Some(vec!["- id: Uuid".into()]), ..ClassPatch::default() });
    assert_eq!(class.name, "Order");
    assert_eq!(class.attributes, vec!["- id: Uuid"]);
}
