use std::collections::HashSet;

use indexmap::IndexMap;

use super::{DocumentGraph, GraphError, Node, NodeId, Value};

impl DocumentGraph {
  /// Builds a graph holding a single parsed document and returns it with its root value.
  pub fn from_json(json: &serde_json::Value) -> (Self, Value) {
    let mut graph = Self::new();
    let root = graph.import(json);
    (graph, root)
  }

  /// Copies a JSON tree into the arena. Every object and array becomes a fresh node.
  pub fn import(&mut self, json: &serde_json::Value) -> Value {
    match json {
      serde_json::Value::Array(items) => {
        let values = items.iter().map(|item| self.import(item)).collect();
        Value::Node(self.add(Node::Seq(values)))
      }
      serde_json::Value::Object(entries) => {
        let values = entries
          .iter()
          .map(|(key, value)| (key.clone(), self.import(value)))
          .collect::<IndexMap<_, _>>();
        Value::Node(self.add(Node::Map(values)))
      }
      scalar => Value::from_scalar_json(scalar),
    }
  }

  /// Serializes `value` back into a JSON tree.
  ///
  /// Shared acyclic nodes are written out once per location. A node reachable from itself
  /// yields [`GraphError::Cycle`].
  pub fn to_json(&self, value: &Value) -> Result<serde_json::Value, GraphError> {
    let mut on_stack = HashSet::new();
    self.export(value, &mut on_stack)
  }

  fn export(&self, value: &Value, on_stack: &mut HashSet<NodeId>) -> Result<serde_json::Value, GraphError> {
    let Value::Node(id) = value else {
      return Ok(value.to_scalar_json());
    };

    if !on_stack.insert(*id) {
      return Err(GraphError::Cycle(*id));
    }

    let json = match self.node(*id)? {
      Node::Map(entries) => {
        let mut object = serde_json::Map::with_capacity(entries.len());
        for (key, child) in entries {
          object.insert(key.clone(), self.export(child, on_stack)?);
        }
        serde_json::Value::Object(object)
      }
      Node::Seq(items) => serde_json::Value::Array(
        items
          .iter()
          .map(|child| self.export(child, on_stack))
          .collect::<Result<_, _>>()?,
      ),
    };

    on_stack.remove(id);
    Ok(json)
  }
}

impl Value {
  /// Converts a non-container JSON value. Containers map to `Null`; use [`DocumentGraph::import`].
  pub fn from_scalar_json(json: &serde_json::Value) -> Self {
    match json {
      serde_json::Value::Bool(b) => Self::Bool(*b),
      serde_json::Value::Number(n) => Self::Number(n.clone()),
      serde_json::Value::String(s) => Self::String(s.clone()),
      serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Null,
    }
  }

  /// JSON form of a scalar. Node handles have no standalone JSON form and map to `null`.
  pub fn to_scalar_json(&self) -> serde_json::Value {
    match self {
      Self::Null | Self::Node(_) => serde_json::Value::Null,
      Self::Bool(b) => serde_json::Value::Bool(*b),
      Self::Number(n) => serde_json::Value::Number(n.clone()),
      Self::String(s) => serde_json::Value::String(s.clone()),
    }
  }
}
