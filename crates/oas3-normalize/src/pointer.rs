//! JSON pointer locators and reference linking.
//!
//! Local references use the URI fragment form of a JSON pointer (`#/components/schemas/Pet`).
//! Segments escape `~` as `~0` and `/` as `~1`, and the fragment itself may be percent-encoded.

use std::{borrow::Cow, collections::HashSet};

use percent_encoding::percent_decode_str;

use crate::{
  category::ComponentCategory,
  document::{DocumentGraph, Node, NodeId, REF_KEY, REF_VALUE_KEY, Value},
};

pub fn escape_segment(segment: &str) -> Cow<'_, str> {
  if segment.contains(['~', '/']) {
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
  } else {
    Cow::Borrowed(segment)
  }
}

/// Percent-decodes and unescapes one raw pointer segment.
pub fn decode_segment(raw: &str) -> String {
  let decoded = percent_decode_str(raw).decode_utf8_lossy();
  decoded.replace("~1", "/").replace("~0", "~")
}

/// Builds a local locator from unescaped segments. No segments yields `#`.
pub fn to_locator<S: AsRef<str>>(segments: &[S]) -> String {
  let mut locator = String::from("#");
  for segment in segments {
    locator.push('/');
    locator.push_str(&escape_segment(segment.as_ref()));
  }
  locator
}

/// Splits a local locator into unescaped segments. Returns `None` for external references.
pub fn parse_local_locator(locator: &str) -> Option<Vec<String>> {
  let fragment = locator.strip_prefix('#')?;
  if fragment.is_empty() {
    return Some(vec![]);
  }
  let path = fragment.strip_prefix('/')?;
  Some(path.split('/').map(decode_segment).collect())
}

pub fn component_locator(category: ComponentCategory, name: &str) -> String {
  to_locator(&["components", category.as_ref(), name])
}

/// Renames the component a locator points at, keeping any trailing segments untouched.
///
/// `rename` receives the category and the decoded component name and returns the new name, or
/// `None` to leave the locator alone.
pub fn rename_component_locator(
  locator: &str,
  rename: impl FnOnce(ComponentCategory, &str) -> Option<String>,
) -> Option<String> {
  let rest = locator.strip_prefix("#/components/")?;
  let (category_raw, rest) = rest.split_once('/')?;
  let category = category_raw.parse::<ComponentCategory>().ok()?;
  let (name_raw, tail) = match rest.split_once('/') {
    Some((name, tail)) => (name, Some(tail)),
    None => (rest, None),
  };

  let renamed = rename(category, &decode_segment(name_raw))?;
  let renamed = escape_segment(&renamed);
  Some(match tail {
    Some(tail) => format!("#/components/{category_raw}/{renamed}/{tail}"),
    None => format!("#/components/{category_raw}/{renamed}"),
  })
}

/// Attaches the in-memory target of every local `$ref` reachable from `root`.
///
/// Each pointer gets a `$ref-value` entry holding the node its locator addresses, which is what
/// [`crate::resolver`] reads. Targets are shared, not copied, so self-referencing documents become
/// cyclic graphs. Returns the number of pointers linked; locators that do not resolve are skipped.
pub fn link_references(graph: &mut DocumentGraph, root: &Value) -> usize {
  let mut pending = Vec::new();
  let mut visited = HashSet::new();
  let mut stack: Vec<NodeId> = root.as_node().into_iter().collect();

  while let Some(id) = stack.pop() {
    if !visited.insert(id) {
      continue;
    }
    let Some(node) = graph.get(id) else {
      continue;
    };
    if let Node::Map(entries) = node
      && let Some(locator) = entries.get(REF_KEY).and_then(Value::as_str)
    {
      pending.push((id, locator.to_string()));
    }
    for (key, child) in node.edges() {
      if key.as_field() == Some(REF_VALUE_KEY) {
        continue;
      }
      if let Value::Node(child) = child {
        stack.push(child);
      }
    }
  }

  let mut linked = 0;
  for (id, locator) in pending {
    let Some(segments) = parse_local_locator(&locator) else {
      continue;
    };
    let Some(target) = graph.walk(root, segments.iter().map(String::as_str)) else {
      continue;
    };
    if graph.set(id, REF_VALUE_KEY, target).is_ok() {
      linked += 1;
    }
  }
  linked
}
