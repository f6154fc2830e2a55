//! Identifier allocator.
//!
//! Node ids are `count + 1` rendered as a decimal string; link ids are the
//! same count-based number behind a kind prefix (`edge-3`, `rel-2`). Deleting
//! and re-adding therefore reuses ids across a session. When the count-based
//! id is still taken by a surviving element (delete from the middle, then add)
//! the allocator counts upward to the first free number so ids stay unique
//! within the current snapshot.

use super::{ElementId, Link, Node};

/// Next id for a node appended to `nodes`.
#[must_use]
pub fn next_node_id<B>(nodes: &[Node<B>]) -> ElementId {
    next_free("", nodes.len(), |candidate| nodes.iter().any(|n| n.id.as_str() == candidate))
}

/// Next id for a link appended to `links`.
#[must_use]
pub fn next_link_id<A>(prefix: &str, links: &[Link<A>]) -> ElementId {
    next_free(prefix, links.len(), |candidate| links.iter().any(|l| l.id.as_str() == candidate))
}

fn next_free(prefix: &str, count: usize, taken: impl Fn(&str) -> bool) -> ElementId {
    let mut n = count + 1;
    loop {
        let candidate = format!("{prefix}{n}");
        if !taken(&candidate) {
            return ElementId::new(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
#[path = "id_test.rs"]
mod tests;
