//! Merging several OpenAPI documents into one.
//!
//! Each top-level section has its own policy:
//!
//! - `info` and any other top-level field: the first document defining a field wins.
//! - `paths` and `webhooks`: union of paths and methods; a method defined by two documents is a
//!   conflict.
//! - `tags` (keyed by `name`) and `servers` (keyed by `url`): documents are scanned last to first
//!   and the first entry seen for a key is kept.
//! - `components`: union; the same name with different content is a conflict.
//!
//! A merge with conflicts fails as a whole and reports all of them.

mod conflicts;
mod prefix;

#[cfg(test)]
mod tests;

use std::{borrow::Cow, collections::HashSet};

use serde_json::{Map, Value};

pub use self::conflicts::{ConflictRecord, MergeConflict};
use self::prefix::prefix_components;
use crate::{category::ComponentCategory, document::HTTP_METHODS};

const MERGED_SECTIONS: [&str; 6] = ["info", "paths", "webhooks", "tags", "servers", "components"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
  /// Prefix for the component names of the document at the same position. Documents past the end
  /// of the list keep their names.
  pub component_prefixes: Vec<String>,
}

impl MergeOptions {
  pub fn with_component_prefixes<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
    Self {
      component_prefixes: prefixes.into_iter().map(Into::into).collect(),
    }
  }
}

/// Merges `documents` in order.
///
/// The result always carries `info`, `paths`, `webhooks`, `tags`, `servers` and `components`,
/// after the other top-level fields. Non-object documents contribute nothing.
pub fn merge(documents: &[Value], options: &MergeOptions) -> Result<Value, MergeConflict> {
  let documents: Vec<Cow<'_, Value>> = documents
    .iter()
    .enumerate()
    .map(|(index, document)| match options.component_prefixes.get(index) {
      Some(prefix) if !prefix.is_empty() => {
        let mut document = document.clone();
        prefix_components(&mut document, prefix);
        Cow::Owned(document)
      }
      _ => Cow::Borrowed(document),
    })
    .collect();
  let objects: Vec<&Map<String, Value>> = documents.iter().filter_map(|document| document.as_object()).collect();

  let mut conflicts = Vec::new();
  let paths = merge_routes(&objects, "paths", &mut conflicts, |method, path| ConflictRecord::Path {
    method,
    path,
  });
  let webhooks = merge_routes(&objects, "webhooks", &mut conflicts, |method, path| {
    ConflictRecord::Webhook { method, path }
  });
  let components = merge_components(&objects, &mut conflicts);
  if !conflicts.is_empty() {
    return Err(MergeConflict { conflicts });
  }

  let mut merged = Map::new();
  for document in &objects {
    for (key, value) in *document {
      if !MERGED_SECTIONS.contains(&key.as_str()) && !merged.contains_key(key) {
        merged.insert(key.clone(), value.clone());
      }
    }
  }
  merged.insert("info".to_string(), Value::Object(merge_info(&objects)));
  merged.insert("paths".to_string(), Value::Object(paths));
  merged.insert("webhooks".to_string(), Value::Object(webhooks));
  merged.insert("tags".to_string(), Value::Array(merge_keyed_list(&objects, "tags", "name")));
  merged.insert("servers".to_string(), Value::Array(merge_keyed_list(&objects, "servers", "url")));
  merged.insert("components".to_string(), Value::Object(components));
  Ok(Value::Object(merged))
}

fn merge_info(documents: &[&Map<String, Value>]) -> Map<String, Value> {
  let mut info = Map::new();
  for fields in documents
    .iter()
    .filter_map(|document| document.get("info").and_then(Value::as_object))
  {
    for (key, value) in fields {
      if !info.contains_key(key) {
        info.insert(key.clone(), value.clone());
      }
    }
  }
  info
}

fn merge_routes(
  documents: &[&Map<String, Value>],
  section: &str,
  conflicts: &mut Vec<ConflictRecord>,
  conflict: impl Fn(String, String) -> ConflictRecord,
) -> Map<String, Value> {
  let mut merged = Map::new();
  let mut seen = HashSet::new();

  for routes in documents
    .iter()
    .filter_map(|document| document.get(section).and_then(Value::as_object))
  {
    for (path, item) in routes {
      let Some(fields) = item.as_object() else {
        if !merged.contains_key(path) {
          merged.insert(path.clone(), item.clone());
        }
        continue;
      };
      let target = merged
        .entry(path.clone())
        .or_insert_with(|| Value::Object(Map::new()));
      let Some(target) = target.as_object_mut() else {
        continue;
      };

      for (key, value) in fields {
        if !target.contains_key(key) {
          target.insert(key.clone(), value.clone());
        } else if HTTP_METHODS.contains(&key.as_str()) {
          let record = conflict(key.clone(), path.clone());
          if seen.insert(record.clone()) {
            conflicts.push(record);
          }
        }
      }
    }
  }
  merged
}

fn merge_components(documents: &[&Map<String, Value>], conflicts: &mut Vec<ConflictRecord>) -> Map<String, Value> {
  let mut merged = Map::new();
  let mut seen = HashSet::new();

  for components in documents
    .iter()
    .filter_map(|document| document.get("components").and_then(Value::as_object))
  {
    for (key, section) in components {
      let (Ok(category), Some(entries)) = (key.parse::<ComponentCategory>(), section.as_object()) else {
        if !merged.contains_key(key) {
          merged.insert(key.clone(), section.clone());
        }
        continue;
      };
      let target = merged
        .entry(key.clone())
        .or_insert_with(|| Value::Object(Map::new()));
      let Some(target) = target.as_object_mut() else {
        continue;
      };

      for (name, body) in entries {
        match target.get(name) {
          None => {
            target.insert(name.clone(), body.clone());
          }
          Some(existing) if existing == body => {}
          Some(_) => {
            let record = ConflictRecord::Component {
              component_type: category,
              name: name.clone(),
            };
            if seen.insert(record.clone()) {
              conflicts.push(record);
            }
          }
        }
      }
    }
  }
  merged
}

/// Scans documents last to first, keeping the first entry seen per key. Entries without a string
/// key are always kept.
fn merge_keyed_list(documents: &[&Map<String, Value>], section: &str, key_field: &str) -> Vec<Value> {
  let mut merged = Vec::new();
  let mut seen = HashSet::new();
  for entries in documents
    .iter()
    .rev()
    .filter_map(|document| document.get(section).and_then(Value::as_array))
  {
    for entry in entries {
      match entry.get(key_field).and_then(Value::as_str) {
        Some(key) if !seen.insert(key.to_string()) => {}
        _ => merged.push(entry.clone()),
      }
    }
  }
  merged
}
