use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The fixed sections of an OpenAPI `components` object.
///
/// The string form (`Display`, `AsRef<str>`, `FromStr`) is the catalog key used in documents
/// and locators, e.g. `requestBodies`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ComponentCategory {
  Schemas,
  Parameters,
  Responses,
  Examples,
  RequestBodies,
  Headers,
  SecuritySchemes,
  Links,
  Callbacks,
  PathItems,
}

impl ComponentCategory {
  pub const fn singular(self) -> &'static str {
    match self {
      Self::Schemas => "Schema",
      Self::Parameters => "Parameter",
      Self::Responses => "Response",
      Self::Examples => "Example",
      Self::RequestBodies => "RequestBody",
      Self::Headers => "Header",
      Self::SecuritySchemes => "SecurityScheme",
      Self::Links => "Link",
      Self::Callbacks => "Callback",
      Self::PathItems => "PathItem",
    }
  }

  /// Prefix of the slot names the cycle breaker allocates in this category.
  pub fn circular_prefix(self) -> String {
    format!("Circular{}", self.singular())
  }
}
