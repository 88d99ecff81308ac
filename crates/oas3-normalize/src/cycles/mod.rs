//! Conversion of cyclic document graphs into acyclic, pointer-based JSON.
//!
//! The breaker runs in two passes. The first is a depth-first walk that records every node
//! reached again while still on the walk stack, classifies nodes by their structural role, and
//! names the ones that can live in the component catalog. The second pass writes JSON: named
//! nodes are written once into `components` and replaced by `$ref` pointers everywhere else.

mod namer;
mod shape;


use std::collections::{HashMap, HashSet};

use strum::IntoEnumIterator;

use self::{namer::CatalogNamer, shape::Shape};
use crate::{
  category::ComponentCategory,
  document::{DocumentGraph, Node, NodeId, REF_KEY, Value},
  pointer::{component_locator, to_locator},
};

/// A catalog entry created by the cycle breaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoistedSlot {
  pub category: ComponentCategory,
  pub name: String,
}

impl HoistedSlot {
  pub fn locator(&self) -> String {
    component_locator(self.category, &self.name)
  }
}

/// Statistics of a [`break_cycles_with_report`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
  /// New catalog entries, in allocation order.
  pub hoisted: Vec<HoistedSlot>,
  /// Edges that closed a cycle during the walk.
  pub back_edges: usize,
  /// Pointers written against a document position because the target has no catalog category.
  pub location_pointers: usize,
}

impl CycleReport {
  pub fn is_acyclic(&self) -> bool {
    self.back_edges == 0
  }
}

/// Serializes `root` into an acyclic JSON document.
///
/// Every cyclic subtree with a component shape is moved to
/// `components/<category>/Circular<Singular><N>` and referenced from all of its locations.
/// `extra_pointer_fields` are added to every pointer the breaker writes. Acyclic input is returned
/// structurally unchanged and gets no `components` key.
pub fn break_cycles(
  graph: &DocumentGraph,
  root: &Value,
  extra_pointer_fields: &serde_json::Map<String, serde_json::Value>,
) -> serde_json::Value {
  break_cycles_with_report(graph, root, extra_pointer_fields).0
}

/// Same as [`break_cycles`], also returning what was hoisted.
pub fn break_cycles_with_report(
  graph: &DocumentGraph,
  root: &Value,
  extra_pointer_fields: &serde_json::Map<String, serde_json::Value>,
) -> (serde_json::Value, CycleReport) {
  let Value::Node(root_id) = root else {
    return (root.to_scalar_json(), CycleReport::default());
  };

  let catalog = existing_catalog(graph, *root_id);
  let mut walk = CycleWalk::new(graph);
  walk.visit(*root_id, Shape::Document);

  let mut namer = CatalogNamer::from_existing(catalog.iter().map(|(category, name, _)| (*category, name.as_str())));
  let mut slots = HashMap::new();
  let mut hoisted = Vec::new();
  for id in &walk.finish_order {
    if let Some((category, name, _)) = catalog.iter().find(|(_, _, entry)| entry.as_node() == Some(*id)) {
      slots.insert(*id, Slot::new(*category, name.clone()));
    } else if let Some(category) = walk.shapes.get(id).and_then(|shape| shape.hoist_category()) {
      let name = namer.next_name(category);
      slots.insert(*id, Slot::new(category, name.clone()));
      hoisted.push((*id, HoistedSlot { category, name }));
    }
  }

  let mut emitter = Emitter {
    graph,
    slots: &slots,
    marked: &walk.marked,
    extra_pointer_fields,
    open: HashMap::new(),
    placed: HashMap::new(),
    cache: HashMap::new(),
    location_pointers: 0,
    positioned: 0,
  };
  let mut output = emitter.node(*root_id, &mut Vec::new());

  if let serde_json::Value::Object(document) = &mut output {
    let mut ordered = hoisted.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|(_, slot)| slot.category);
    for (id, slot) in ordered {
      let mut path = vec!["components".to_string(), slot.category.to_string(), slot.name.clone()];
      let body = emitter.node(*id, &mut path);
      if let Some(section) =
        object_entry(document, "components").and_then(|components| object_entry(components, slot.category.as_ref()))
      {
        section.insert(slot.name.clone(), body);
      }
    }
  }

  let report = CycleReport {
    hoisted: hoisted.into_iter().map(|(_, slot)| slot).collect(),
    back_edges: walk.back_edges,
    location_pointers: emitter.location_pointers,
  };
  (output, report)
}

/// Entries already present under the root `components`, by category, scalars included.
fn existing_catalog(graph: &DocumentGraph, root: NodeId) -> Vec<(ComponentCategory, String, Value)> {
  let Some(components) = graph.field(root, "components").and_then(Value::as_node) else {
    return vec![];
  };
  let mut entries = Vec::new();
  for category in ComponentCategory::iter() {
    let Some(section) = graph
      .field(components, category.as_ref())
      .and_then(Value::as_node)
      .and_then(|id| graph.map(id))
    else {
      continue;
    };
    for (name, value) in section {
      entries.push((category, name.clone(), value.clone()));
    }
  }
  entries
}

/// Returns the object stored under `key`, replacing anything that is not an object.
fn object_entry<'a>(
  object: &'a mut serde_json::Map<String, serde_json::Value>,
  key: &str,
) -> Option<&'a mut serde_json::Map<String, serde_json::Value>> {
  if !object.get(key).is_some_and(serde_json::Value::is_object) {
    object.insert(key.to_string(), serde_json::Value::Object(serde_json::Map::new()));
  }
  object.get_mut(key).and_then(serde_json::Value::as_object_mut)
}

/// First pass: depth-first walk recording back-edge targets in post-order.
struct CycleWalk<'g> {
  graph: &'g DocumentGraph,
  shapes: HashMap<NodeId, Shape>,
  on_stack: HashSet<NodeId>,
  finished: HashSet<NodeId>,
  marked: HashSet<NodeId>,
  finish_order: Vec<NodeId>,
  back_edges: usize,
}

impl<'g> CycleWalk<'g> {
  fn new(graph: &'g DocumentGraph) -> Self {
    Self {
      graph,
      shapes: HashMap::new(),
      on_stack: HashSet::new(),
      finished: HashSet::new(),
      marked: HashSet::new(),
      finish_order: Vec::new(),
      back_edges: 0,
    }
  }

  fn visit(&mut self, id: NodeId, shape: Shape) {
    let graph = self.graph;
    self.shapes.insert(id, shape);
    self.on_stack.insert(id);

    if let Some(node) = graph.get(id) {
      for (key, child) in node.edges() {
        let Value::Node(child_id) = child else {
          continue;
        };
        if self.on_stack.contains(&child_id) {
          self.marked.insert(child_id);
          self.back_edges += 1;
          continue;
        }
        if self.finished.contains(&child_id) {
          continue;
        }
        let Some(child_node) = graph.get(child_id) else {
          continue;
        };
        self.visit(child_id, shape.child(&key, child_node));
      }
    }

    self.on_stack.remove(&id);
    self.finished.insert(id);
    if self.marked.contains(&id) {
      self.finish_order.push(id);
    }
  }
}

#[derive(Debug)]
struct Slot {
  category: ComponentCategory,
  name: String,
  locator: String,
}

impl Slot {
  fn new(category: ComponentCategory, name: String) -> Self {
    let locator = component_locator(category, &name);
    Self { category, name, locator }
  }

  fn is_at(&self, path: &[String]) -> bool {
    matches!(path, [components, category, name]
      if components == "components" && category == self.category.as_ref() && *name == self.name)
  }
}

/// Second pass: writes JSON, cutting every cycle at a pointer.
struct Emitter<'a> {
  graph: &'a DocumentGraph,
  slots: &'a HashMap<NodeId, Slot>,
  /// Cycle targets found by the walk.
  marked: &'a HashSet<NodeId>,
  extra_pointer_fields: &'a serde_json::Map<String, serde_json::Value>,
  /// Nodes being written, with the length of the output path where they start.
  open: HashMap<NodeId, usize>,
  /// Locator of the single copy of each cycle target that has no catalog slot.
  placed: HashMap<NodeId, String>,
  /// Finished output of nodes whose JSON does not depend on where it is written.
  cache: HashMap<NodeId, serde_json::Value>,
  location_pointers: usize,
  /// Bumped by every location pointer and every placement; output written while it moved is
  /// position dependent and never cached.
  positioned: usize,
}

impl Emitter<'_> {
  fn value(&mut self, value: &Value, path: &mut Vec<String>) -> serde_json::Value {
    let Value::Node(id) = value else {
      return value.to_scalar_json();
    };
    if let Some(slot) = self.slots.get(id)
      && !slot.is_at(path)
    {
      return self.pointer(slot.locator.clone());
    }
    self.node(*id, path)
  }

  fn node(&mut self, id: NodeId, path: &mut Vec<String>) -> serde_json::Value {
    if let Some(depth) = self.open.get(&id) {
      let locator = to_locator(&path[..*depth]);
      return self.location_pointer(locator);
    }
    if let Some(locator) = self.placed.get(&id) {
      let locator = locator.clone();
      return self.location_pointer(locator);
    }
    if let Some(cached) = self.cache.get(&id) {
      return cached.clone();
    }

    let graph = self.graph;
    let Some(node) = graph.get(id) else {
      return serde_json::Value::Null;
    };

    if self.marked.contains(&id) && !self.slots.contains_key(&id) {
      self.placed.insert(id, to_locator(path.as_slice()));
      self.positioned += 1;
    }
    let before = self.positioned;
    self.open.insert(id, path.len());
    let json = match node {
      Node::Map(entries) => {
        let mut object = serde_json::Map::with_capacity(entries.len());
        for (key, child) in entries {
          path.push(key.clone());
          let child = self.value(child, path);
          path.pop();
          object.insert(key.clone(), child);
        }
        serde_json::Value::Object(object)
      }
      Node::Seq(items) => {
        let mut array = Vec::with_capacity(items.len());
        for (index, child) in items.iter().enumerate() {
          path.push(index.to_string());
          array.push(self.value(child, path));
          path.pop();
        }
        serde_json::Value::Array(array)
      }
    };
    self.open.remove(&id);

    if self.positioned == before {
      self.cache.insert(id, json.clone());
    }
    json
  }

  fn location_pointer(&mut self, locator: String) -> serde_json::Value {
    self.location_pointers += 1;
    self.positioned += 1;
    self.pointer(locator)
  }

  fn pointer(&self, locator: String) -> serde_json::Value {
    let mut pointer = serde_json::Map::with_capacity(1 + self.extra_pointer_fields.len());
    pointer.insert(REF_KEY.to_string(), serde_json::Value::String(locator));
    for (key, value) in self.extra_pointer_fields {
      if key != REF_KEY {
        pointer.insert(key.clone(), value.clone());
      }
    }
    serde_json::Value::Object(pointer)
  }
}
