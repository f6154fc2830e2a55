use super::*;
use crate::diagram::flowchart::{Step, StepKind, Transition};

fn nodes(ids: &[&str]) -> Vec<Node<Step>> {
    ids.iter()
        .map(|id| Node::new(*id, Step::new("n", StepKind::Process)))
        .collect()
}

fn links(ids: &[&str]) -> Vec<Link<Transition>> {
    ids.iter()
        .map(|id| Link { id: ElementId::new(*id), from: "1".into(), to: "2".into(), attrs: Transition::default() })
        .collect()
}

#[test]
fn first_node_id_is_one() {
    assert_eq!(next_node_id::<Step>(&[]), ElementId::new("1"));
}

#[test]
fn node_id_is_count_plus_one() {
    assert_eq!(next_node_id(&nodes(&["1", "2"])), ElementId::new("3"));
}

#[test]
fn node_id_is_reused_after_deleting_the_last_node() {
    // {1,2,3} minus 3 -> count 2 -> "3" again.
    assert_eq!(next_node_id(&nodes(&["1", "2"])), ElementId::new("3"));
}

#[test]
fn node_id_skips_past_surviving_ids() {
    // {1,2,3,4} minus 3 -> count 3 -> "4" is taken, so "5".
    assert_eq!(next_node_id(&nodes(&["1", "2", "4"])), ElementId::new("5"));
}

#[test]
fn link_id_uses_prefix() {
    assert_eq!(next_link_id::<Transition>("edge-", &[]), ElementId::new("edge-1"));
    assert_eq!(next_link_id("rel-", &links(&["rel-1"])), ElementId::new("rel-2"));
}

#[test]
fn link_id_skips_past_surviving_ids() {
    assert_eq!(next_link_id("rel-", &links(&["rel-2"])), ElementId::new("rel-3"));
}
