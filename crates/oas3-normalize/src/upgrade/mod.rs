//! OpenAPI 3.0 to 3.1 upgrade.
//!
//! A single pre-order traversal applies node-local rewrites, see [`rules`]. Values that are
//! literal data (`example`, `examples`, `default`, `enum`, `const`) are not traversed, so user
//! payloads that happen to look like schema keywords are left alone. The same words used as names
//! (a `default` response, a component called `enum`) are traversed like any other entry.

mod rules;


use serde_json::Value;

pub const UPGRADED_VERSION: &str = "3.1.1";

const LITERAL_KEYS: [&str; 5] = ["example", "examples", "default", "enum", "const"];

/// Keywords whose value is a map keyed by author-chosen names.
const NAME_MAPS: [&str; 15] = [
  "paths",
  "webhooks",
  "responses",
  "callbacks",
  "headers",
  "content",
  "links",
  "encoding",
  "securitySchemes",
  "variables",
  "properties",
  "patternProperties",
  "$defs",
  "definitions",
  "dependentSchemas",
];

const SCHEMA_SEGMENTS: [&str; 8] = [
  "properties",
  "items",
  "allOf",
  "anyOf",
  "oneOf",
  "not",
  "additionalProperties",
  "schema",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UpgradeOutcome {
  /// The document declared 3.0.x and was rewritten.
  Upgraded,
  /// The document was not a 3.0.x document and is returned unchanged.
  Skipped,
}

/// Upgrades an OpenAPI 3.0.x document to 3.1.1. Any other document is returned unchanged.
pub fn upgrade(document: Value) -> Value {
  upgrade_with_outcome(document).0
}

pub fn upgrade_with_outcome(mut document: Value) -> (Value, UpgradeOutcome) {
  let Some(root) = document.as_object_mut() else {
    return (document, UpgradeOutcome::Skipped);
  };
  let is_three_zero = root
    .get("openapi")
    .and_then(Value::as_str)
    .is_some_and(|version| version.starts_with("3.0"));
  if !is_three_zero {
    return (document, UpgradeOutcome::Skipped);
  }

  root.insert("openapi".to_string(), Value::String(UPGRADED_VERSION.to_string()));
  rules::promote_webhooks(root);
  visit(&mut document, &mut Vec::new());
  (document, UpgradeOutcome::Upgraded)
}

/// Returns true when `path` addresses a node inside a schema.
pub fn is_schema_path<S: AsRef<str>>(path: &[S]) -> bool {
  let in_catalog = matches!(path, [components, schemas, ..]
    if components.as_ref() == "components" && schemas.as_ref() == "schemas");
  in_catalog
    || path
      .iter()
      .map(|segment| segment.as_ref())
      .any(|segment| SCHEMA_SEGMENTS.contains(&segment) || segment.ends_with("Schema"))
}

/// True when `path` addresses a `properties` map, whose keys are property names rather than
/// keywords. A property may itself be named `properties`, hence the parity.
fn is_property_map(path: &[String]) -> bool {
  let trailing = path.iter().rev().take_while(|segment| *segment == "properties").count();
  trailing % 2 == 1
}

/// True when the keys of the map at `path` are names rather than keywords: a catalog section under
/// `components`, or the value of one of [`NAME_MAPS`]. A schema that is itself a property (say one
/// named `responses`) is not a name map.
fn is_name_map(path: &[String]) -> bool {
  match path {
    [components, _] if components == "components" => true,
    [parent @ .., last] => !is_property_map(parent) && NAME_MAPS.contains(&last.as_str()),
    [] => false,
  }
}

fn visit(value: &mut Value, path: &mut Vec<String>) {
  match value {
    Value::Object(node) => {
      let names = is_name_map(path);
      if names {
        rules::apply_to_names(node, path);
      } else {
        rules::apply(node, path);
      }
      for (key, child) in node.iter_mut() {
        if !names && LITERAL_KEYS.contains(&key.as_str()) {
          continue;
        }
        path.push(key.clone());
        visit(child, path);
        path.pop();
      }
    }
    Value::Array(items) => {
      for (index, item) in items.iter_mut().enumerate() {
        path.push(index.to_string());
        visit(item, path);
        path.pop();
      }
    }
    _ => {}
  }
}
