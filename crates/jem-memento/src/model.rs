//! A model backed by a set of known live handles.

use std::collections::HashSet;

use crate::decode::{decode, ChildFactory, Element, RootResolver};
use crate::node::{Node, RootSegment};
use crate::path::HandlePath;

/// Knows which elements exist by their handle paths, e.g. from a persisted index.
///
/// Inserting a path makes all of its ancestors live as well; removing one drops its
/// descendants. Decoding against the model yields the live [`HandlePath`] itself as the element.
#[derive(Debug, Default, Clone)]
pub struct InMemoryModel {
    live: HashSet<HandlePath>,
}

impl InMemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: HandlePath) {
        for prefix in path.prefixes() {
            self.live.insert(prefix);
        }
    }

    /// Removes `path` and everything below it. Returns whether `path` was live.
    pub fn remove(&mut self, path: &HandlePath) -> bool {
        let was_live = self.live.contains(path);
        self.live.retain(|live| !live.starts_with(path));
        was_live
    }

    pub fn contains(&self, path: &HandlePath) -> bool {
        self.live.contains(path)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn decode(&self, memento: &str) -> Option<Element<HandlePath>> {
        decode(memento, self, self)
    }

    fn live_child(&self, parent: &HandlePath, node: Node) -> Option<HandlePath> {
        let path = parent.clone().child(node).ok()?;
        self.live.contains(&path).then_some(path)
    }
}

impl RootResolver for InMemoryModel {
    type Element = HandlePath;

    fn project(&self, name: &str) -> Option<HandlePath> {
        let path = HandlePath::project(name);
        self.live.contains(&path).then_some(path)
    }

    fn root(&self, project: &HandlePath, root: &RootSegment) -> Option<HandlePath> {
        self.live_child(project, Node::Root(root.clone()))
    }
}

impl ChildFactory<HandlePath> for InMemoryModel {
    fn child(&self, parent: &HandlePath, node: &Node) -> Option<HandlePath> {
        self.live_child(parent, node.clone())
    }
}

impl FromIterator<HandlePath> for InMemoryModel {
    fn from_iter<I: IntoIterator<Item = HandlePath>>(iter: I) -> Self {
        let mut model = InMemoryModel::new();
        model.extend(iter);
        model
    }
}

impl Extend<HandlePath> for InMemoryModel {
    fn extend<I: IntoIterator<Item = HandlePath>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}
