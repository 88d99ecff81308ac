use oas3_normalize::upgrade::{UPGRADED_VERSION, UpgradeOutcome, upgrade_with_outcome};

use crate::{
  ui::{Colors, cli::UpgradeCommand, logger::CommandLogger},
  utils::{load_document, write_document},
};

pub async fn upgrade_document(command: UpgradeCommand, colors: &Colors) -> anyhow::Result<()> {
  let UpgradeCommand { input, output } = command;
  let logger = CommandLogger::new(colors, output.verbosity());

  logger.info(&format!("Loading OpenAPI document from: {}", input.display()));
  let document = load_document(&input).await?;
  let declared = document
    .get("openapi")
    .and_then(serde_json::Value::as_str)
    .unwrap_or("none")
    .to_string();

  logger.info("Upgrading to OpenAPI 3.1...");
  let (upgraded, outcome) = upgrade_with_outcome(document);
  match outcome {
    UpgradeOutcome::Upgraded => logger.stat("Version:", format!("{declared} -> {UPGRADED_VERSION}")),
    UpgradeOutcome::Skipped => logger.warn(&format!(
      "{} declares version {declared}, only 3.0.x documents are upgraded; writing it unchanged",
      input.display()
    )),
  }
  logger.stat("Outcome:", outcome);

  logger.info(&format!("Writing to: {}", output.output.display()));
  write_document(&output.output, &upgraded).await?;

  logger.success("Successfully upgraded document");
  Ok(())
}
