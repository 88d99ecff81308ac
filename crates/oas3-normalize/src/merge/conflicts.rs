use itertools::Itertools;
use serde::Serialize;
use strum::Display;

use crate::category::ComponentCategory;

/// Location where two merge inputs disagree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConflictRecord {
  #[strum(to_string = "path '{method} {path}'")]
  Path { method: String, path: String },
  #[strum(to_string = "webhook '{method} {path}'")]
  Webhook { method: String, path: String },
  #[strum(to_string = "component '{component_type}/{name}'")]
  #[serde(rename_all = "camelCase")]
  Component {
    component_type: ComponentCategory,
    name: String,
  },
}

impl ConflictRecord {
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Path { .. } => "path",
      Self::Webhook { .. } => "webhook",
      Self::Component { .. } => "component",
    }
  }

  /// Section and key, e.g. `get` and `/pets`, or `schemas` and `Pet`.
  pub fn location(&self) -> (String, String) {
    match self {
      Self::Path { method, path } | Self::Webhook { method, path } => (method.clone(), path.clone()),
      Self::Component { component_type, name } => (component_type.to_string(), name.clone()),
    }
  }
}

/// A merge that could not be applied. Carries every conflict found, never a partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
  "{} merge conflict(s): {}",
  .conflicts.len(),
  .conflicts.iter().join(", ")
)]
pub struct MergeConflict {
  pub conflicts: Vec<ConflictRecord>,
}
