//! Arena representation of a possibly-cyclic OpenAPI document.
//!
//! A parsed JSON or YAML document is always a tree, but documents that went through a full
//! inlining pass share objects between locations and may contain cycles. [`DocumentGraph`]
//! stores every map and sequence once and addresses it by [`NodeId`], so "is this the same
//! node" is an index comparison and never a deep-equality check.

mod convert;

#[cfg(test)]
mod tests;

use std::fmt;

use indexmap::IndexMap;

pub const REF_KEY: &str = "$ref";
pub const REF_VALUE_KEY: &str = "$ref-value";

/// Path item fields that hold operations.
pub const HTTP_METHODS: [&str; 9] = ["get", "put", "post", "delete", "options", "head", "patch", "trace", "query"];

/// Index of a container node inside a [`DocumentGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  pub const fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A value stored in a map entry or sequence slot.
///
/// Scalars are stored inline, containers are stored by handle so that several parents can share
/// one child.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  Number(serde_json::Number),
  String(String),
  Node(NodeId),
}

impl Value {
  pub const fn as_node(&self) -> Option<NodeId> {
    match self {
      Self::Node(id) => Some(*id),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) => Some(s),
      _ => None,
    }
  }

  pub const fn is_scalar(&self) -> bool {
    !matches!(self, Self::Node(_))
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Self::String(value.to_string())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Self::String(value)
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Self::Bool(value)
  }
}

impl From<NodeId> for Value {
  fn from(value: NodeId) -> Self {
    Self::Node(value)
  }
}

/// Container stored in the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  Map(IndexMap<String, Value>),
  Seq(Vec<Value>),
}

impl Node {
  pub const fn is_map(&self) -> bool {
    matches!(self, Self::Map(_))
  }

  /// Empty container of the same kind, used as an in-progress placeholder.
  pub fn empty_like(&self) -> Self {
    match self {
      Self::Map(_) => Self::Map(IndexMap::new()),
      Self::Seq(_) => Self::Seq(Vec::new()),
    }
  }

  /// Owned snapshot of the outgoing edges, in document order.
  pub fn edges(&self) -> Vec<(EdgeKey, Value)> {
    match self {
      Self::Map(entries) => entries
        .iter()
        .map(|(key, value)| (EdgeKey::Field(key.clone()), value.clone()))
        .collect(),
      Self::Seq(items) => items
        .iter()
        .enumerate()
        .map(|(index, value)| (EdgeKey::Index(index), value.clone()))
        .collect(),
    }
  }
}

/// Label of an edge between a container and one of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKey {
  Field(String),
  Index(usize),
}

impl EdgeKey {
  pub fn as_field(&self) -> Option<&str> {
    match self {
      Self::Field(name) => Some(name),
      Self::Index(_) => None,
    }
  }
}

impl fmt::Display for EdgeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Field(name) => f.write_str(name),
      Self::Index(index) => write!(f, "{index}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
  #[error("node {0} is reachable from itself; break the cycles before serializing")]
  Cycle(NodeId),
  #[error("node {0} does not belong to this document graph")]
  UnknownNode(NodeId),
  #[error("node {0} is not a map")]
  NotAMap(NodeId),
  #[error("node {0} is not a sequence")]
  NotASequence(NodeId),
}

/// Arena holding every container of one or more documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentGraph {
  nodes: Vec<Node>,
}

impl DocumentGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn add(&mut self, node: Node) -> NodeId {
    self.nodes.push(node);
    NodeId(self.nodes.len() - 1)
  }

  pub fn add_map(&mut self) -> NodeId {
    self.add(Node::Map(IndexMap::new()))
  }

  pub fn add_seq(&mut self) -> NodeId {
    self.add(Node::Seq(Vec::new()))
  }

  pub fn get(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(id.0)
  }

  pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
    self.nodes.get(id.0).ok_or(GraphError::UnknownNode(id))
  }

  pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
    self.nodes.get_mut(id.0).ok_or(GraphError::UnknownNode(id))
  }

  pub fn map(&self, id: NodeId) -> Option<&IndexMap<String, Value>> {
    match self.get(id)? {
      Node::Map(entries) => Some(entries),
      Node::Seq(_) => None,
    }
  }

  /// Replaces the contents of `id`, keeping its identity.
  pub fn replace(&mut self, id: NodeId, node: Node) -> Result<Node, GraphError> {
    let slot = self.node_mut(id)?;
    Ok(std::mem::replace(slot, node))
  }

  /// Sets `key` on the map `id`, returning the previous value.
  pub fn set(
    &mut self,
    id: NodeId,
    key: impl Into<String>,
    value: impl Into<Value>,
  ) -> Result<Option<Value>, GraphError> {
    match self.node_mut(id)? {
      Node::Map(entries) => Ok(entries.insert(key.into(), value.into())),
      Node::Seq(_) => Err(GraphError::NotAMap(id)),
    }
  }

  pub fn push(&mut self, id: NodeId, value: impl Into<Value>) -> Result<(), GraphError> {
    match self.node_mut(id)? {
      Node::Seq(items) => {
        items.push(value.into());
        Ok(())
      }
      Node::Map(_) => Err(GraphError::NotASequence(id)),
    }
  }

  /// Looks up a field of the map `id`.
  pub fn field(&self, id: NodeId, key: &str) -> Option<&Value> {
    self.map(id)?.get(key)
  }

  /// Follows a chain of edges from `from`. Sequence segments must be decimal indexes.
  pub fn walk<'a>(&self, from: &Value, segments: impl IntoIterator<Item = &'a str>) -> Option<Value> {
    let mut current = from.clone();
    for segment in segments {
      let id = current.as_node()?;
      current = match self.get(id)? {
        Node::Map(entries) => entries.get(segment)?.clone(),
        Node::Seq(items) => items.get(segment.parse::<usize>().ok()?)?.clone(),
      };
    }
    Some(current)
  }

  /// Returns true when `id` is a map carrying a `$ref` locator.
  pub fn is_pointer(&self, id: NodeId) -> bool {
    self.map(id).is_some_and(|entries| entries.contains_key(REF_KEY))
  }

  pub fn locator(&self, id: NodeId) -> Option<&str> {
    self.field(id, REF_KEY).and_then(Value::as_str)
  }
}
