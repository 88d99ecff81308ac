use serde_json::json;

use crate::document::{DocumentGraph, GraphError, Node, Value};

#[test]
fn test_json_round_trip_preserves_order() {
  let document = json!({
    "openapi": "3.1.0",
    "info": { "title": "Tree API", "version": "1.0.0" },
    "paths": { "/nodes": { "get": { "tags": ["a", "b"], "deprecated": false, "x-rank": 1.5 } } },
    "servers": []
  });
  let (graph, root) = DocumentGraph::from_json(&document);
  let exported = graph.to_json(&root).unwrap();
  assert_eq!(exported, document);
  assert_eq!(
    serde_json::to_string(&exported).unwrap(),
    serde_json::to_string(&document).unwrap(),
    "key order survives the arena"
  );
}

#[test]
fn test_scalar_roots() {
  let cases = [json!(null), json!(true), json!(3), json!("text")];
  for case in cases {
    let (graph, root) = DocumentGraph::from_json(&case);
    assert!(root.is_scalar());
    assert!(graph.is_empty());
    assert_eq!(graph.to_json(&root).unwrap(), case);
  }
}

#[test]
fn test_shared_acyclic_node_is_written_per_location() {
  let mut graph = DocumentGraph::new();
  let shared = graph.add_map();
  graph.set(shared, "type", "string").unwrap();
  let root = graph.add_map();
  graph.set(root, "a", shared).unwrap();
  graph.set(root, "b", shared).unwrap();

  assert_eq!(
    graph.to_json(&Value::Node(root)).unwrap(),
    json!({ "a": { "type": "string" }, "b": { "type": "string" } })
  );
}

#[test]
fn test_cycle_is_reported() {
  let mut graph = DocumentGraph::new();
  let root = graph.add_map();
  let child = graph.add_map();
  graph.set(root, "child", child).unwrap();
  graph.set(child, "parent", root).unwrap();

  assert_eq!(graph.to_json(&Value::Node(root)), Err(GraphError::Cycle(root)));
}

#[test]
fn test_container_kind_errors() {
  let mut graph = DocumentGraph::new();
  let map = graph.add_map();
  let seq = graph.add_seq();
  assert_eq!(graph.push(map, "x"), Err(GraphError::NotASequence(map)));
  assert_eq!(graph.set(seq, "x", "y"), Err(GraphError::NotAMap(seq)));
  assert_eq!(graph.set(map, "x", "y"), Ok(None));
  assert_eq!(graph.set(map, "x", "z"), Ok(Some(Value::from("y"))));
  assert!(matches!(graph.node(seq), Ok(Node::Seq(items)) if items.is_empty()));

  let (_, other_root) = DocumentGraph::from_json(&json!({ "a": { "b": { "c": {} } } }));
  let foreign = other_root.as_node().unwrap();
  assert_eq!(graph.node(foreign), Err(GraphError::UnknownNode(foreign)));
}

#[test]
fn test_walk_and_pointer_detection() {
  let (graph, root) = DocumentGraph::from_json(&json!({
    "paths": { "/pets": { "parameters": [{ "$ref": "#/components/parameters/Limit" }] } }
  }));

  let pointer = graph.walk(&root, ["paths", "/pets", "parameters", "0"]).unwrap();
  let pointer = pointer.as_node().unwrap();
  assert!(graph.is_pointer(pointer));
  assert_eq!(graph.locator(pointer), Some("#/components/parameters/Limit"));
  assert!(!graph.is_pointer(root.as_node().unwrap()));

  assert_eq!(graph.walk(&root, ["paths", "/pets", "parameters", "one"]), None);
  assert_eq!(graph.walk(&root, ["missing"]), None);
  assert_eq!(graph.walk(&root, []), Some(root.clone()));
}
