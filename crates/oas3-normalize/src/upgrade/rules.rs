//! Node-local 3.0 to 3.1 rewrites. Each rule looks at one map and its path from the root.

use mediatype::MediaType;
use serde_json::{Map, Value, json};

use super::{is_property_map, is_schema_path};

const OCTET_STREAM: &str = "application/octet-stream";

pub(super) fn apply(node: &mut Map<String, Value>, path: &[String]) {
  promote_nullable(node);
  convert_exclusive_bound(node, "exclusiveMinimum", "minimum");
  convert_exclusive_bound(node, "exclusiveMaximum", "maximum");
  pluralize_example(node, path);
  mark_multipart_binaries(node, path);
  convert_string_format(node, path);
}

/// Rules for maps keyed by names, where keyword rewrites must not run.
pub(super) fn apply_to_names(node: &mut Map<String, Value>, path: &[String]) {
  clear_octet_stream_content(node, path);
}

/// `x-webhooks` becomes `webhooks`. When both exist the legacy entries are added to `webhooks`
/// without replacing any.
pub(super) fn promote_webhooks(root: &mut Map<String, Value>) {
  if !root.get("x-webhooks").is_some_and(Value::is_object) {
    return;
  }
  if !root.contains_key("webhooks") {
    rename_key(root, "x-webhooks", "webhooks");
    return;
  }
  if !root.get("webhooks").is_some_and(Value::is_object) {
    return;
  }
  if let Some(Value::Object(legacy)) = root.shift_remove("x-webhooks")
    && let Some(webhooks) = root.get_mut("webhooks").and_then(Value::as_object_mut)
  {
    for (name, item) in legacy {
      webhooks.entry(name).or_insert(item);
    }
  }
}

/// `type: T` with `nullable: true` becomes `type: [T, "null"]`.
fn promote_nullable(node: &mut Map<String, Value>) {
  let Some(nullable) = node.get("nullable").and_then(Value::as_bool) else {
    return;
  };
  let Some(slot) = node.get_mut("type") else {
    return;
  };

  if nullable {
    match slot {
      Value::String(ty) => {
        let promoted = json!([ty.as_str(), "null"]);
        *slot = promoted;
      }
      Value::Array(types) => {
        if !types.iter().any(|ty| ty == "null") {
          types.push(json!("null"));
        }
      }
      _ => return,
    }
  }
  node.shift_remove("nullable");
}

/// Boolean exclusive bounds become numeric ones taking the value of the matching inclusive bound.
fn convert_exclusive_bound(node: &mut Map<String, Value>, flag: &str, bound: &str) {
  match node.get(flag).and_then(Value::as_bool) {
    Some(true) => match node.shift_remove(bound) {
      Some(limit) => {
        node.insert(flag.to_string(), limit);
      }
      None => {
        node.shift_remove(flag);
      }
    },
    Some(false) => {
      node.shift_remove(flag);
    }
    None => {}
  }
}

/// `example` becomes `examples`: a list inside schemas, a map of example objects elsewhere.
fn pluralize_example(node: &mut Map<String, Value>, path: &[String]) {
  if !node.contains_key("example") || is_examples_map(path) {
    return;
  }
  let in_schema = is_schema_path(path);

  match node.get("examples").map(|examples| (examples.is_array(), examples.is_object())) {
    None => {
      rename_key(node, "example", "examples");
      if let Some(slot) = node.get_mut("examples") {
        let value = slot.take();
        *slot = if in_schema {
          Value::Array(vec![value])
        } else {
          json!({ "default": { "value": value } })
        };
      }
    }
    Some((true, _)) if in_schema => {
      if let Some(value) = node.shift_remove("example")
        && let Some(Value::Array(examples)) = node.get_mut("examples")
      {
        examples.push(value);
      }
    }
    Some((_, true)) if !in_schema => {
      if let Some(value) = node.shift_remove("example")
        && let Some(Value::Object(examples)) = node.get_mut("examples")
      {
        examples
          .entry("default")
          .or_insert_with(|| json!({ "value": value }));
      }
    }
    Some(_) => {}
  }
}

/// Binary string properties of an object schema sent as `multipart/form-data` become
/// `contentMediaType: application/octet-stream`.
fn mark_multipart_binaries(node: &mut Map<String, Value>, path: &[String]) {
  let is_multipart = path.len() >= 2 && is_multipart_form(&path[path.len() - 2]);
  if !is_multipart || node.get("type").and_then(Value::as_str) != Some("object") {
    return;
  }
  let Some(properties) = node.get_mut("properties").and_then(Value::as_object_mut) else {
    return;
  };
  for property in properties.values_mut() {
    if let Some(property) = property.as_object_mut()
      && is_string_with_format(property, "binary")
    {
      replace_entry(property, "format", "contentMediaType", json!(OCTET_STREAM));
    }
  }
}

/// `binary`, `base64` and `byte` string formats become content keywords.
fn convert_string_format(node: &mut Map<String, Value>, path: &[String]) {
  if is_string_with_format(node, "binary") {
    replace_entry(node, "format", "contentMediaType", json!(OCTET_STREAM));
  } else if is_string_with_format(node, "base64") {
    replace_entry(node, "format", "contentEncoding", json!("base64"));
  } else if is_string_with_format(node, "byte") {
    replace_entry(node, "format", "contentEncoding", json!("base64"));
    if let Some(media_type) = enclosing_media_type(path) {
      node.insert("contentMediaType".to_string(), json!(media_type));
    }
  }
}

/// Raw octet-stream bodies need no schema in 3.1.
fn clear_octet_stream_content(node: &mut Map<String, Value>, path: &[String]) {
  let is_content_map = matches!(path, [rest @ .., last] if last == "content" && !is_property_map(rest));
  if is_content_map && let Some(media) = node.get_mut(OCTET_STREAM) {
    *media = json!({});
  }
}

fn is_examples_map(path: &[String]) -> bool {
  matches!(path, [rest @ .., last] if last == "examples" && !is_property_map(rest))
}

fn is_multipart_form(key: &str) -> bool {
  MediaType::parse(key).is_ok_and(|media| {
    media.ty.as_str().eq_ignore_ascii_case("multipart") && media.subty.as_str().eq_ignore_ascii_case("form-data")
  })
}

fn is_string_with_format(node: &Map<String, Value>, format: &str) -> bool {
  node.get("type").and_then(Value::as_str) == Some("string")
    && node.get("format").and_then(Value::as_str) == Some(format)
}

/// Media type key following the last `content` segment.
fn enclosing_media_type(path: &[String]) -> Option<&str> {
  let content = path.iter().rposition(|segment| segment == "content")?;
  path.get(content + 1).map(String::as_str)
}

/// Renames `from` to `to` in place. Does nothing when `from` is missing or `to` already exists.
fn rename_key(node: &mut Map<String, Value>, from: &str, to: &str) {
  if !node.contains_key(from) || node.contains_key(to) {
    return;
  }
  let entries = std::mem::take(node);
  *node = entries
    .into_iter()
    .map(|(key, value)| if key == from { (to.to_string(), value) } else { (key, value) })
    .collect();
}

/// Replaces the entry `from` by `to: value` at the same position.
fn replace_entry(node: &mut Map<String, Value>, from: &str, to: &str, value: Value) {
  if node.contains_key(to) {
    node.shift_remove(from);
  } else {
    rename_key(node, from, to);
  }
  node.insert(to.to_string(), value);
}
