use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use oas3_normalize::merge::{ConflictRecord, MergeOptions, merge};
use serde_json::Value;

use crate::{
  ui::{
    Colors,
    cli::MergeCommand,
    colors::Role,
    logger::CommandLogger,
    term_width,
  },
  utils::{load_document, write_document},
};

pub async fn merge_documents(command: MergeCommand, colors: &Colors) -> anyhow::Result<()> {
  let MergeCommand {
    inputs,
    prefixes,
    output,
  } = command;
  let logger = CommandLogger::new(colors, output.verbosity());

  if prefixes.len() > inputs.len() {
    anyhow::bail!("{} prefixes given for {} input documents", prefixes.len(), inputs.len());
  }

  let mut documents = Vec::with_capacity(inputs.len());
  for input in &inputs {
    logger.info(&format!("Loading OpenAPI document from: {}", input.display()));
    documents.push(load_document(input).await?);
  }
  for (input, prefix) in inputs.iter().zip(&prefixes) {
    logger.detail("Prefix", format!("{prefix} for {}", input.display()));
  }

  logger.info(&format!("Merging {} documents...", documents.len()));
  let options = MergeOptions::with_component_prefixes(prefixes);
  let merged = match merge(&documents, &options) {
    Ok(merged) => merged,
    Err(error) => {
      eprintln!("{}", conflicts_table(&error.conflicts, colors));
      anyhow::bail!(
        "{} merge conflict(s), nothing was written; use --prefix to keep conflicting components apart",
        error.conflicts.len()
      );
    }
  };

  logger.stat("Documents merged:", documents.len());
  logger.stat("Paths:", section_len(&merged, "paths"));
  logger.stat("Webhooks:", section_len(&merged, "webhooks"));
  let components: usize = merged
    .get("components")
    .and_then(Value::as_object)
    .map_or(0, |components| components.values().filter_map(Value::as_object).map(serde_json::Map::len).sum());
  logger.stat("Components:", components);

  logger.info(&format!("Writing to: {}", output.output.display()));
  write_document(&output.output, &merged).await?;

  logger.success("Successfully merged documents");
  Ok(())
}

fn section_len(document: &Value, key: &str) -> usize {
  document.get(key).and_then(Value::as_object).map_or(0, serde_json::Map::len)
}

fn conflicts_table(conflicts: &[ConflictRecord], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  row.add_cell(Cell::new("CONFLICT").fg(colors.cell(Role::Label)));
  row.add_cell(Cell::new("SECTION").fg(colors.cell(Role::Label)));
  row.add_cell(Cell::new("NAME").fg(colors.cell(Role::Label)));
  table.set_header(row);

  for conflict in conflicts {
    let (section, name) = conflict.location();
    let mut row = Row::new();
    row.add_cell(
      Cell::new(conflict.kind())
        .fg(colors.cell(Role::Accent))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(section)
        .fg(colors.cell(Role::Value))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(name).fg(colors.cell(Role::Primary)));
    table.add_row(row);
  }

  table
}
