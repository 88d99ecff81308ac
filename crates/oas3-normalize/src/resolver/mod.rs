//! Resolution of reference pointers to concrete values.
//!
//! A pointer is a map with a `$ref` locator. After [`crate::pointer::link_references`] (or any
//! other loader that already knows the target) it also carries `$ref-value`, the target node.
//! Resolution reads that field; it never looks the locator up again.


use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::document::{DocumentGraph, Node, NodeId, REF_KEY, REF_VALUE_KEY, Value};

/// Resolves a single pointer.
///
/// Non-pointers are returned unchanged. For a pointer, the result is its `$ref-value`; when both the
/// pointer and the target are maps, the pointer's own fields (anything but `$ref` and
/// `$ref-value`) are laid over a copy of the target. A pointer without `$ref-value` resolves to
/// `None`.
pub fn resolve(graph: &mut DocumentGraph, value: &Value) -> Option<Value> {
  let Value::Node(id) = value else {
    return Some(value.clone());
  };
  let Some(entries) = graph.map(*id) else {
    return Some(value.clone());
  };
  if !entries.contains_key(REF_KEY) {
    return Some(value.clone());
  }

  let resolved = entries.get(REF_VALUE_KEY)?.clone();
  let overrides = entries
    .iter()
    .filter(|(key, _)| key.as_str() != REF_KEY && key.as_str() != REF_VALUE_KEY)
    .map(|(key, value)| (key.clone(), value.clone()))
    .collect::<IndexMap<_, _>>();

  if overrides.is_empty() {
    return Some(resolved);
  }

  let Some(base) = resolved.as_node().and_then(|target| graph.map(target)) else {
    return Some(resolved);
  };
  let mut merged = base.clone();
  merged.extend(overrides);
  Some(Value::Node(graph.add(Node::Map(merged))))
}

/// Resolves every pointer reachable from `value`, producing pointer-free copies.
///
/// Cycles through `$ref-value` are preserved rather than unrolled: the copy of a node is
/// registered before its children are resolved, so a later visit of the same node gets the
/// in-progress copy. The result can therefore be cyclic when the input is.
pub fn resolve_deep(graph: &mut DocumentGraph, value: &Value) -> Option<Value> {
  DeepResolver::new(graph).resolve(value)
}

struct DeepResolver<'g> {
  graph: &'g mut DocumentGraph,
  /// Source node -> copy being (or already) filled in.
  copies: HashMap<NodeId, NodeId>,
}

impl<'g> DeepResolver<'g> {
  fn new(graph: &'g mut DocumentGraph) -> Self {
    Self {
      graph,
      copies: HashMap::new(),
    }
  }

  fn resolve(&mut self, value: &Value) -> Option<Value> {
    let Value::Node(id) = value else {
      return Some(value.clone());
    };
    if let Some(copy) = self.copies.get(id) {
      return Some(Value::Node(*copy));
    }
    if !self.graph.is_pointer(*id) {
      return Some(Value::Node(self.copy(*id, &[])));
    }

    let mut chain = vec![*id];
    let mut seen = HashSet::from([*id]);
    let mut current = *id;
    loop {
      match resolve(self.graph, &Value::Node(current))? {
        Value::Node(target) => {
          if let Some(copy) = self.copies.get(&target).copied() {
            for pointer in chain {
              self.copies.insert(pointer, copy);
            }
            return Some(Value::Node(copy));
          }
          if self.graph.is_pointer(target) && seen.insert(target) {
            chain.push(target);
            current = target;
            continue;
          }
          // a pointer chain that loops back on itself stays as the last pointer map
          return Some(Value::Node(self.copy(target, &chain)));
        }
        scalar => return Some(scalar),
      }
    }
  }

  fn copy(&mut self, source: NodeId, aliases: &[NodeId]) -> NodeId {
    let Some(node) = self.graph.get(source) else {
      return source;
    };
    let edges = node.edges();
    let empty = node.empty_like();
    let is_map = node.is_map();
    let placeholder = self.graph.add(empty);

    self.copies.insert(source, placeholder);
    for alias in aliases {
      self.copies.insert(*alias, placeholder);
    }

    let filled = if is_map {
      let mut entries = IndexMap::with_capacity(edges.len());
      for (key, child) in edges {
        if let Some(resolved) = self.resolve(&child) {
          entries.insert(key.to_string(), resolved);
        }
      }
      Node::Map(entries)
    } else {
      Node::Seq(
        edges
          .into_iter()
          .map(|(_, child)| self.resolve(&child).unwrap_or(Value::Null))
          .collect(),
      )
    };

    if let Ok(slot) = self.graph.node_mut(placeholder) {
      *slot = filled;
    }
    placeholder
  }
}
