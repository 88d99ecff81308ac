use serde_json::json;

use crate::{
  category::ComponentCategory,
  merge::{ConflictRecord, MergeOptions, merge},
};

fn merge_all(documents: &[serde_json::Value]) -> Result<serde_json::Value, Vec<ConflictRecord>> {
  merge(documents, &MergeOptions::default()).map_err(|error| error.conflicts)
}

#[test]
fn test_info_fields_first_document_wins() {
  let merged = merge_all(&[
    json!({ "info": { "title": "Main title", "version": "1.1.1" } }),
    json!({ "info": { "title": "Second title", "version": "1.43.1", "summary": "Some extra information about the API" } }),
    json!({ "info": { "title": "Third title", "version": "1.3.1", "summary": "This will be overridden" } }),
  ])
  .unwrap();

  assert_eq!(
    merged,
    json!({
      "info": { "title": "Main title", "version": "1.1.1", "summary": "Some extra information about the API" },
      "paths": {},
      "webhooks": {},
      "tags": [],
      "servers": [],
      "components": {}
    })
  );
}

#[test]
fn test_output_sections_follow_top_level_fields() {
  let merged = merge_all(&[
    json!({ "openapi": "3.1.1", "paths": {}, "x-owner": "team-a" }),
    json!({ "openapi": "3.0.3", "jsonSchemaDialect": "https://spec.openapis.org/oas/3.1/dialect/base", "x-owner": "team-b" }),
  ])
  .unwrap();

  let keys: Vec<&String> = merged.as_object().unwrap().keys().collect();
  assert_eq!(
    keys,
    [
      "openapi",
      "x-owner",
      "jsonSchemaDialect",
      "info",
      "paths",
      "webhooks",
      "tags",
      "servers",
      "components"
    ]
  );
  assert_eq!(merged["openapi"], json!("3.1.1"));
  assert_eq!(merged["x-owner"], json!("team-a"));
  assert_eq!(merged["info"], json!({}));
}

#[test]
fn test_path_operations_are_unioned() {
  let merged = merge_all(&[
    json!({ "paths": { "/": { "get": { "description": "Get your feed" }, "summary": "Feed" } } }),
    json!({
      "paths": {
        "/": { "post": { "description": "create a new post" }, "summary": "ignored" },
        "/users": { "post": { "description": "create a new user" } }
      }
    }),
  ])
  .unwrap();

  assert_eq!(
    merged["paths"],
    json!({
      "/": {
        "get": { "description": "Get your feed" },
        "summary": "Feed",
        "post": { "description": "create a new post" }
      },
      "/users": { "post": { "description": "create a new user" } }
    })
  );
}

#[test]
fn test_webhooks_are_unioned() {
  let merged = merge_all(&[
    json!({ "webhooks": { "/": { "get": { "description": "Get your feed" } } } }),
    json!({
      "webhooks": {
        "/": { "post": { "description": "create a new post" } },
        "/users": { "post": { "description": "create a new user" } }
      }
    }),
  ])
  .unwrap();

  assert_eq!(merged["paths"], json!({}));
  assert_eq!(
    merged["webhooks"],
    json!({
      "/": { "get": { "description": "Get your feed" }, "post": { "description": "create a new post" } },
      "/users": { "post": { "description": "create a new user" } }
    })
  );
}

#[test]
fn test_repeated_methods_are_conflicts() {
  let cases = [
    (
      "paths",
      ConflictRecord::Path {
        method: "get".to_string(),
        path: "/".to_string(),
      },
    ),
    (
      "webhooks",
      ConflictRecord::Webhook {
        method: "get".to_string(),
        path: "/".to_string(),
      },
    ),
  ];
  for (section, expected) in cases {
    let conflicts = merge_all(&[
      json!({ section: { "/": { "get": { "description": "Get your feed" } } } }),
      json!({
        section: {
          "/": { "get": { "description": "Get the list of all post" }, "post": { "description": "create a new post" } },
          "/users": { "post": { "description": "create a new user" } }
        }
      }),
    ])
    .unwrap_err();
    assert_eq!(conflicts, vec![expected], "failed for {section}");
  }
}

#[test]
fn test_identical_method_is_still_a_conflict() {
  let operation = json!({ "get": { "description": "same" } });
  let conflicts = merge_all(&[
    json!({ "paths": { "/": operation } }),
    json!({ "paths": { "/": operation } }),
    json!({ "paths": { "/": operation } }),
  ])
  .unwrap_err();
  assert_eq!(
    conflicts,
    vec![ConflictRecord::Path {
      method: "get".to_string(),
      path: "/".to_string(),
    }],
    "reported once"
  );
}

#[test]
fn test_tags_and_servers_scan_documents_in_reverse() {
  let tag = |n: u8| json!({ "name": format!("tag-{n}"), "description": format!("some tag{n} description") });
  let server = |n: u8| json!({ "url": format!("server-{n}"), "description": format!("some server{n} description") });

  let merged = merge_all(&[
    json!({ "tags": [tag(1), tag(2)], "servers": [server(1), server(2)] }),
    json!({ "tags": [tag(1), tag(3)], "servers": [server(1), server(3)] }),
    json!({ "tags": [tag(4), tag(3)], "servers": [server(4), server(3)] }),
  ])
  .unwrap();

  assert_eq!(merged["tags"], json!([tag(4), tag(3), tag(1), tag(2)]));
  assert_eq!(merged["servers"], json!([server(4), server(3), server(1), server(2)]));
}

#[test]
fn test_keyed_list_keeps_last_document_content() {
  let merged = merge_all(&[
    json!({ "tags": [{ "name": "pets", "description": "first" }, { "description": "no name" }] }),
    json!({ "tags": [{ "name": "pets", "description": "last" }] }),
  ])
  .unwrap();
  assert_eq!(
    merged["tags"],
    json!([{ "name": "pets", "description": "last" }, { "description": "no name" }])
  );
}

#[test]
fn test_components_are_unioned() {
  let schema1 = json!({ "type": "object", "properties": { "prop1": { "type": "string" } } });
  let schema2 = json!({ "type": "object", "properties": { "prop2": { "type": "string" } } });

  let merged = merge_all(&[
    json!({ "components": { "schemas": { "Schema1": schema1 } } }),
    json!({ "components": { "schemas": { "Schema2": schema2, "Schema1": schema1 }, "x-extra": 1 } }),
  ])
  .unwrap();
  assert_eq!(
    merged["components"],
    json!({ "schemas": { "Schema1": schema1, "Schema2": schema2 }, "x-extra": 1 })
  );
}

#[test]
fn test_component_conflicts() {
  let conflicts = merge_all(&[
    json!({ "components": { "schemas": { "Schema1": { "type": "object", "properties": { "prop1": { "type": "string" } } } } } }),
    json!({ "components": { "schemas": { "Schema1": { "type": "object", "properties": { "prop2": { "type": "string" } } } } } }),
  ])
  .unwrap_err();

  assert_eq!(
    conflicts,
    vec![ConflictRecord::Component {
      component_type: ComponentCategory::Schemas,
      name: "Schema1".to_string(),
    }]
  );
  assert_eq!(
    serde_json::to_value(&conflicts).unwrap(),
    json!([{ "type": "component", "componentType": "schemas", "name": "Schema1" }])
  );
}

#[test]
fn test_all_conflicts_are_reported_in_section_order() {
  let first = json!({
    "components": { "responses": { "NotFound": { "description": "a" } } },
    "webhooks": { "created": { "post": {} } },
    "paths": { "/a": { "get": {} }, "/b": { "put": {} } }
  });
  let second = json!({
    "paths": { "/b": { "put": {} }, "/a": { "get": {} } },
    "webhooks": { "created": { "post": {} } },
    "components": { "responses": { "NotFound": { "description": "b" } } }
  });

  let error = merge(&[first.clone(), second.clone()], &MergeOptions::default()).unwrap_err();
  assert_eq!(
    error.conflicts,
    vec![
      ConflictRecord::Path {
        method: "put".to_string(),
        path: "/b".to_string(),
      },
      ConflictRecord::Path {
        method: "get".to_string(),
        path: "/a".to_string(),
      },
      ConflictRecord::Webhook {
        method: "post".to_string(),
        path: "created".to_string(),
      },
      ConflictRecord::Component {
        component_type: ComponentCategory::Responses,
        name: "NotFound".to_string(),
      },
    ]
  );
  assert_eq!(
    error.to_string(),
    "4 merge conflict(s): path 'put /b', path 'get /a', webhook 'post created', component 'responses/NotFound'"
  );

  let again = merge(&[first, second], &MergeOptions::default()).unwrap_err();
  assert_eq!(again, error, "merging is deterministic");
}

#[test]
fn test_conflict_record_serialization() {
  let cases = [
    (
      ConflictRecord::Path {
        method: "get".to_string(),
        path: "/".to_string(),
      },
      json!({ "type": "path", "method": "get", "path": "/" }),
    ),
    (
      ConflictRecord::Webhook {
        method: "post".to_string(),
        path: "newPet".to_string(),
      },
      json!({ "type": "webhook", "method": "post", "path": "newPet" }),
    ),
    (
      ConflictRecord::Component {
        component_type: ComponentCategory::RequestBodies,
        name: "Pet".to_string(),
      },
      json!({ "type": "component", "componentType": "requestBodies", "name": "Pet" }),
    ),
  ];
  for (record, expected) in cases {
    assert_eq!(serde_json::to_value(&record).unwrap(), expected, "failed for {record}");
  }
}

#[test]
fn test_non_object_documents_contribute_nothing() {
  let merged = merge_all(&[json!(null), json!({ "info": { "title": "Only" } }), json!([1, 2])]).unwrap();
  assert_eq!(merged["info"], json!({ "title": "Only" }));
  assert_eq!(merge_all(&[]).unwrap()["paths"], json!({}));
}
