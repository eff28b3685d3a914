//! Occurrence counts for siblings that would otherwise share a memento.

use std::collections::HashMap;

use crate::node::Node;

/// Assigns 1-based occurrence counts to `siblings`, given in declaration order.
///
/// Siblings are grouped by everything that ends up in their memento except the count itself, so
/// two anonymous types in one initializer become `[` and `[!2`, while `foo(int)` and
/// `foo(String)` both stay at 1. Initializers, which have no name, are simply numbered.
/// Kinds without an occurrence count are left untouched.
pub fn assign_occurrences(siblings: &mut [Node]) {
    let mut seen: HashMap<Node, u32> = HashMap::new();
    for node in siblings.iter_mut() {
        let mut key = node.clone();
        let Some(slot) = key.occurrence_mut() else {
            continue;
        };
        *slot = 1;

        let count = seen.entry(key).or_insert(0);
        *count += 1;
        if let Some(slot) = node.occurrence_mut() {
            *slot = *count;
        }
    }
}
