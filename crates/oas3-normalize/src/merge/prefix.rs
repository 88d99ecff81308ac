use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{
  category::ComponentCategory,
  document::{HTTP_METHODS, REF_KEY},
  pointer::rename_component_locator,
};

type Renames = HashMap<(ComponentCategory, String), String>;

/// Renames every component of `document` to `prefix + name` and rewrites the local references
/// that point at them.
///
/// Only references whose target is defined in this document are rewritten. Security requirement
/// keys follow renamed `securitySchemes`, and discriminator mappings follow renamed schemas.
pub(crate) fn prefix_components(document: &mut Value, prefix: &str) {
  if prefix.is_empty() {
    return;
  }
  let Some(components) = document.get_mut("components").and_then(Value::as_object_mut) else {
    return;
  };

  let mut renames = Renames::new();
  for (key, section) in components.iter_mut() {
    let Ok(category) = key.parse::<ComponentCategory>() else {
      continue;
    };
    let Some(entries) = section.as_object_mut() else {
      continue;
    };
    let renamed = std::mem::take(entries)
      .into_iter()
      .map(|(name, body)| {
        let new_name = format!("{prefix}{name}");
        renames.insert((category, name), new_name.clone());
        (new_name, body)
      })
      .collect();
    *entries = renamed;
  }

  if renames.is_empty() {
    return;
  }
  rewrite_references(document, &renames);
  rewrite_security_requirements(document, &renames);
}

fn rename_locator(locator: &str, renames: &Renames) -> Option<String> {
  rename_component_locator(locator, |category, name| {
    renames.get(&(category, name.to_string())).cloned()
  })
}

fn rewrite_references(value: &mut Value, renames: &Renames) {
  match value {
    Value::Object(object) => {
      if let Some(Value::String(locator)) = object.get_mut(REF_KEY)
        && let Some(renamed) = rename_locator(locator, renames)
      {
        *locator = renamed;
      }
      if let Some(mapping) = object
        .get_mut("discriminator")
        .and_then(|discriminator| discriminator.get_mut("mapping"))
        .and_then(Value::as_object_mut)
      {
        for target in mapping.values_mut() {
          if let Value::String(locator) = target
            && let Some(renamed) = rename_locator(locator, renames)
          {
            *locator = renamed;
          }
        }
      }
      for child in object.values_mut() {
        rewrite_references(child, renames);
      }
    }
    Value::Array(items) => {
      for item in items {
        rewrite_references(item, renames);
      }
    }
    _ => {}
  }
}

fn rewrite_security_requirements(document: &mut Value, renames: &Renames) {
  if let Some(security) = document.get_mut("security") {
    rename_requirement_keys(security, renames);
  }
  for section in ["paths", "webhooks"] {
    let Some(items) = document.get_mut(section).and_then(Value::as_object_mut) else {
      continue;
    };
    for item in items.values_mut() {
      let Some(item) = item.as_object_mut() else {
        continue;
      };
      for (method, operation) in item.iter_mut() {
        if HTTP_METHODS.contains(&method.as_str())
          && let Some(security) = operation.get_mut("security")
        {
          rename_requirement_keys(security, renames);
        }
      }
    }
  }
}

/// Renames the scheme keys of a list of security requirement objects, keeping key order.
fn rename_requirement_keys(security: &mut Value, renames: &Renames) {
  let Some(requirements) = security.as_array_mut() else {
    return;
  };
  for requirement in requirements {
    let Some(schemes) = requirement.as_object_mut() else {
      continue;
    };
    let renamed: Map<String, Value> = std::mem::take(schemes)
      .into_iter()
      .map(|(scheme, scopes)| {
        let key = renames
          .get(&(ComponentCategory::SecuritySchemes, scheme.clone()))
          .cloned()
          .unwrap_or(scheme);
        (key, scopes)
      })
      .collect();
    *schemes = renamed;
  }
}
