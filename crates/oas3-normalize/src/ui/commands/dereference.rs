use anyhow::Context;
use oas3_normalize::{
  CycleReport, DocumentGraph, break_cycles_with_report, document::REF_KEY, link_references, resolve_deep,
};
use serde_json::{Map, Value};

use crate::{
  ui::{Colors, cli::DereferenceCommand, logger::CommandLogger},
  utils::{load_document, write_document},
};

struct Inlined {
  document: Value,
  linked: usize,
  unresolved: usize,
  report: CycleReport,
}

fn count_references(value: &Value) -> usize {
  match value {
    Value::Object(object) => {
      usize::from(object.get(REF_KEY).is_some_and(Value::is_string)) + object.values().map(count_references).sum::<usize>()
    }
    Value::Array(items) => items.iter().map(count_references).sum(),
    _ => 0,
  }
}

/// Replaces every resolvable local `$ref` by its target. References that close a cycle come back
/// as pointers to catalog entries; references that do not resolve are dropped.
fn inline_document(source: &Value) -> anyhow::Result<Inlined> {
  let (mut graph, root) = DocumentGraph::from_json(source);
  let linked = link_references(&mut graph, &root);
  let resolved = resolve_deep(&mut graph, &root).context("the document root is a reference that does not resolve")?;
  let (document, report) = break_cycles_with_report(&graph, &resolved, &Map::new());
  Ok(Inlined {
    document,
    linked,
    unresolved: count_references(source).saturating_sub(linked),
    report,
  })
}

pub async fn dereference_document(command: DereferenceCommand, colors: &Colors) -> anyhow::Result<()> {
  let DereferenceCommand { input, output } = command;
  let logger = CommandLogger::new(colors, output.verbosity());

  logger.info(&format!("Loading OpenAPI document from: {}", input.display()));
  let document = load_document(&input).await?;

  logger.info("Inlining references...");
  let Inlined {
    document,
    linked,
    unresolved,
    report,
  } = inline_document(&document)?;

  logger.stat("References inlined:", linked);
  if unresolved > 0 {
    logger.warn(&format!("{unresolved} reference(s) could not be resolved locally and were dropped"));
  }
  logger.stat("Cycles:", report.back_edges);
  if !report.hoisted.is_empty() {
    logger.stat("Hoisted components:", report.hoisted.len());
  }
  for slot in &report.hoisted {
    logger.detail("Hoisted", slot.locator());
  }
  if report.location_pointers > 0 {
    logger.stat("Location pointers:", report.location_pointers);
  }

  logger.info(&format!("Writing to: {}", output.output.display()));
  write_document(&output.output, &document).await?;

  logger.success("Successfully dereferenced document");
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::ui::{cli::OutputArgs, colors::Theme};

  #[test]
  fn test_acyclic_references_are_inlined() {
    let document = json!({
      "paths": {
        "/pets": {
          "get": {
            "responses": {
              "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
            }
          }
        }
      },
      "components": { "schemas": { "Pet": { "type": "object", "properties": { "name": { "type": "string" } } } } }
    });

    let inlined = inline_document(&document).unwrap();
    assert_eq!(inlined.linked, 1);
    assert!(inlined.report.is_acyclic());
    assert_eq!(
      inlined.document["paths"]["/pets"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
      json!({ "type": "object", "properties": { "name": { "type": "string" } } })
    );
    assert_eq!(inlined.document["components"], document["components"]);
  }

  #[test]
  fn test_recursive_schema_keeps_its_catalog_name() {
    let document = json!({
      "paths": {
        "/nodes": {
          "get": {
            "responses": {
              "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Node" } } } }
            }
          }
        }
      },
      "components": {
        "schemas": {
          "Node": {
            "type": "object",
            "properties": { "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } } }
          }
        }
      }
    });

    let inlined = inline_document(&document).unwrap();
    assert_eq!(inlined.linked, 2);
    assert!(inlined.report.hoisted.is_empty());
    assert_eq!(inlined.document, document);
  }

  #[test]
  fn test_unresolvable_references_are_dropped() {
    let document = json!({ "components": { "schemas": { "Pet": { "$ref": "#/components/schemas/Missing" } } } });
    let inlined = inline_document(&document).unwrap();
    assert_eq!(inlined.linked, 0);
    assert_eq!(inlined.unresolved, 1);
    assert_eq!(inlined.document, json!({ "components": { "schemas": {} } }));
  }

  #[tokio::test]
  async fn test_dereference_command_writes_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("openapi.json");
    let output = dir.path().join("inlined.yaml");
    let document = json!({
      "openapi": "3.1.1",
      "components": { "schemas": { "Id": { "type": "string" }, "Pet": { "properties": { "id": { "$ref": "#/components/schemas/Id" } } } } }
    });
    tokio::fs::write(&input, document.to_string()).await.unwrap();

    let command = DereferenceCommand {
      input,
      output: OutputArgs {
        output: output.clone(),
        verbose: false,
        quiet: true,
      },
    };
    dereference_document(command, &Colors::new(false, Theme::Dark)).await.unwrap();

    let written: Value = serde_yaml::from_str(&tokio::fs::read_to_string(&output).await.unwrap()).unwrap();
    assert_eq!(
      written["components"]["schemas"]["Pet"],
      json!({ "properties": { "id": { "type": "string" } } })
    );
  }
}
