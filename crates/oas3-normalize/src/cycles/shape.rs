use crate::{
  category::ComponentCategory,
  document::{EdgeKey, HTTP_METHODS, Node},
};

/// Structural role of a node, derived from where it was first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Shape {
  Document,
  /// `paths` or `webhooks`.
  Routes,
  /// A path item directly under [`Shape::Routes`]; stays in place.
  RouteItem,
  Operation,
  Components,
  /// A map whose values are components of one category (`components.schemas`, `properties`, ...).
  Named(ComponentCategory),
  /// A list whose items are components of one category (`parameters`, `allOf`, ...).
  List(ComponentCategory),
  /// An object that can live in the component catalog.
  Component(ComponentCategory),
  Content,
  MediaType,
  Encodings,
  Encoding,
  Opaque,
}

impl Shape {
  /// Catalog category a node of this shape is hoisted into.
  pub(crate) const fn hoist_category(self) -> Option<ComponentCategory> {
    match self {
      Self::Component(category) => Some(category),
      _ => None,
    }
  }

  /// Shape of the node reached from a node of this shape through `key`.
  pub(crate) fn child(self, key: &EdgeKey, child: &Node) -> Self {
    let shape = match (self, key) {
      (Self::Document, EdgeKey::Field(field)) => match field.as_str() {
        "paths" | "webhooks" => Self::Routes,
        "components" => Self::Components,
        _ => Self::Opaque,
      },
      (Self::Routes, EdgeKey::Field(_)) => Self::RouteItem,
      (Self::Components, EdgeKey::Field(field)) => field.parse().map_or(Self::Opaque, Self::Named),
      (Self::Named(category), EdgeKey::Field(_)) | (Self::List(category), EdgeKey::Index(_)) => {
        Self::Component(category)
      }
      (Self::RouteItem | Self::Component(ComponentCategory::PathItems), EdgeKey::Field(field)) => {
        path_item_child(field)
      }
      (Self::Operation, EdgeKey::Field(field)) => operation_child(field),
      (Self::Component(category), EdgeKey::Field(field)) => component_child(category, field),
      (Self::Content, EdgeKey::Field(_)) => Self::MediaType,
      (Self::MediaType, EdgeKey::Field(field)) => match field.as_str() {
        "schema" => Self::Component(ComponentCategory::Schemas),
        "examples" => Self::Named(ComponentCategory::Examples),
        "encoding" => Self::Encodings,
        _ => Self::Opaque,
      },
      (Self::Encodings, EdgeKey::Field(_)) => Self::Encoding,
      (Self::Encoding, EdgeKey::Field(field)) if field == "headers" => Self::Named(ComponentCategory::Headers),
      _ => Self::Opaque,
    };

    match (shape, child) {
      // draft-04 tuple `items` and similar list-valued schema slots
      (Self::Component(category), Node::Seq(_)) => Self::List(category),
      (Self::Named(_) | Self::Routes | Self::Content | Self::Encodings, Node::Seq(_))
      | (Self::List(_), Node::Map(_)) => Self::Opaque,
      _ => shape,
    }
  }
}

fn path_item_child(field: &str) -> Shape {
  if HTTP_METHODS.contains(&field) {
    Shape::Operation
  } else if field == "parameters" {
    Shape::List(ComponentCategory::Parameters)
  } else {
    Shape::Opaque
  }
}

fn operation_child(field: &str) -> Shape {
  match field {
    "parameters" => Shape::List(ComponentCategory::Parameters),
    "requestBody" => Shape::Component(ComponentCategory::RequestBodies),
    "responses" => Shape::Named(ComponentCategory::Responses),
    "callbacks" => Shape::Named(ComponentCategory::Callbacks),
    _ => Shape::Opaque,
  }
}

fn component_child(category: ComponentCategory, field: &str) -> Shape {
  match category {
    ComponentCategory::Schemas => schema_child(field),
    ComponentCategory::Parameters | ComponentCategory::Headers => match field {
      "schema" => Shape::Component(ComponentCategory::Schemas),
      "content" => Shape::Content,
      "examples" => Shape::Named(ComponentCategory::Examples),
      _ => Shape::Opaque,
    },
    ComponentCategory::Responses => match field {
      "headers" => Shape::Named(ComponentCategory::Headers),
      "content" => Shape::Content,
      "links" => Shape::Named(ComponentCategory::Links),
      _ => Shape::Opaque,
    },
    ComponentCategory::RequestBodies if field == "content" => Shape::Content,
    ComponentCategory::Callbacks => Shape::Component(ComponentCategory::PathItems),
    ComponentCategory::PathItems => path_item_child(field),
    ComponentCategory::RequestBodies
    | ComponentCategory::Examples
    | ComponentCategory::SecuritySchemes
    | ComponentCategory::Links => Shape::Opaque,
  }
}

fn schema_child(field: &str) -> Shape {
  match field {
    "properties" | "patternProperties" | "$defs" | "definitions" | "dependentSchemas" => {
      Shape::Named(ComponentCategory::Schemas)
    }
    "items" | "additionalItems" | "additionalProperties" | "not" | "contains" | "if" | "then" | "else"
    | "propertyNames" | "unevaluatedItems" | "unevaluatedProperties" | "contentSchema" => {
      Shape::Component(ComponentCategory::Schemas)
    }
    "allOf" | "anyOf" | "oneOf" | "prefixItems" => Shape::List(ComponentCategory::Schemas),
    _ => Shape::Opaque,
  }
}
