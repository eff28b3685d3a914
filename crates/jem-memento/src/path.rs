use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encode::encode;
use crate::error::PathError;
use crate::node::{Node, NodeKind};

/// A path through the Java model, from the project down to one element.
///
/// Always non-empty, always starts at a project, and every node is a valid child of its
/// predecessor. It is a pure value: it owns nothing in the live model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Node>", into = "Vec<Node>")]
pub struct HandlePath {
    nodes: Vec<Node>,
}

impl HandlePath {
    pub fn project(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::project(name)],
        }
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, PathError> {
        let mut nodes = nodes.into_iter();
        let first = nodes.next().ok_or(PathError::Empty)?;
        let mut path = match first {
            Node::Project { name } => HandlePath::project(name),
            other => return Err(PathError::NotAProject(other.kind())),
        };
        for node in nodes {
            path.push(node)?;
        }
        Ok(path)
    }

    /// Returns this path extended by `node`.
    pub fn child(mut self, node: Node) -> Result<Self, PathError> {
        self.push(node)?;
        Ok(self)
    }

    pub fn push(&mut self, node: Node) -> Result<(), PathError> {
        let parent = self.kind();
        let child = node.kind();
        if !parent.can_contain(child) {
            return Err(PathError::InvalidChild { parent, child });
        }
        if node.occurrence() == 0 {
            return Err(PathError::ZeroOccurrence(child));
        }
        check_payload(&node)?;
        self.nodes.push(node);
        Ok(())
    }

    /// Appends a node whose containment the caller has already checked.
    pub(crate) fn push_unchecked(&mut self, node: Node) {
        debug_assert!(self.kind().can_contain(node.kind()));
        debug_assert_eq!(check_payload(&node), Ok(()));
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf(&self) -> &Node {
        // Non-empty by construction.
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn kind(&self) -> NodeKind {
        self.leaf().kind()
    }

    pub fn project_name(&self) -> &str {
        match &self.nodes[0] {
            Node::Project { name } => name,
            _ => "",
        }
    }

    /// The enclosing element, or `None` for a project.
    pub fn parent(&self) -> Option<HandlePath> {
        if self.nodes.len() < 2 {
            return None;
        }
        Some(Self {
            nodes: self.nodes[..self.nodes.len() - 1].to_vec(),
        })
    }

    /// Ancestors from the project down to (and including) this path.
    pub fn prefixes(&self) -> impl Iterator<Item = HandlePath> + '_ {
        (1..=self.nodes.len()).map(move |len| Self {
            nodes: self.nodes[..len].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &HandlePath) -> bool {
        self.nodes.starts_with(&prefix.nodes)
    }

    /// The canonical memento of this path.
    pub fn memento(&self) -> String {
        encode(self)
    }
}

/// Rejects payloads whose memento would decode to a different path.
fn check_payload(node: &Node) -> Result<(), PathError> {
    let kind = node.kind();
    if kind.requires_name() && node.name().is_some_and(str::is_empty) {
        return Err(PathError::EmptyName(kind));
    }
    if let Node::Method {
        parameter_types, ..
    } = node
    {
        if let Some(index) = parameter_types.iter().position(String::is_empty) {
            return Err(PathError::EmptyParameterType { index });
        }
    }
    Ok(())
}

impl fmt::Display for HandlePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.memento())
    }
}

impl TryFrom<Vec<Node>> for HandlePath {
    type Error = PathError;

    fn try_from(nodes: Vec<Node>) -> Result<Self, Self::Error> {
        HandlePath::from_nodes(nodes)
    }
}

impl From<HandlePath> for Vec<Node> {
    fn from(path: HandlePath) -> Self {
        path.nodes
    }
}
