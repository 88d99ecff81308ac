#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Colors, Commands, colors};

mod ui;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::Upgrade(command) => ui::commands::upgrade_document(command, &colors).await?,
    Commands::Merge(command) => ui::commands::merge_documents(command, &colors).await?,
    Commands::Dereference(command) => ui::commands::dereference_document(command, &colors).await?,
  }

  Ok(())
}
