use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::{
  Colors,
  colors::{ColorMode, ThemeMode},
  logger::Verbosity,
};

#[derive(Parser, Debug)]
#[command(name = "oas3-normalize")]
#[command(
  author,
  version,
  about = "Normalize OpenAPI documents: upgrade, merge and dereference",
  styles = Colors::clap_styles()
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Upgrade an OpenAPI 3.0 document to 3.1
  Upgrade(UpgradeCommand),
  /// Merge several OpenAPI documents into one
  Merge(MergeCommand),
  /// Inline every local reference, keeping only the references needed to break cycles
  Dereference(DereferenceCommand),
}

/// Options shared by every command that writes a document.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
  /// Path where the resulting document will be written (`.yaml`/`.yml` for YAML, JSON otherwise)
  #[arg(short, long, value_name = "FILE")]
  pub output: PathBuf,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

impl OutputArgs {
  pub const fn verbosity(&self) -> Verbosity {
    Verbosity::from_flags(self.quiet, self.verbose)
  }
}

#[derive(Args, Debug, Clone)]
pub struct UpgradeCommand {
  /// Path to the OpenAPI JSON or YAML document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  #[command(flatten)]
  pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct MergeCommand {
  /// Documents to merge, in priority order (repeat the flag)
  #[arg(short, long = "input", value_name = "FILE", required = true)]
  pub inputs: Vec<PathBuf>,

  /// Prefix for the component names of the input at the same position (repeat the flag)
  #[arg(long = "prefix", value_name = "PREFIX")]
  pub prefixes: Vec<String>,

  #[command(flatten)]
  pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DereferenceCommand {
  /// Path to the OpenAPI JSON or YAML document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  #[command(flatten)]
  pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_merge_arguments_keep_order() {
    let cli = Cli::try_parse_from([
      "oas3-normalize",
      "merge",
      "-i",
      "pets.yaml",
      "--input",
      "users.json",
      "--prefix",
      "pets_",
      "-o",
      "merged.json",
      "--color",
      "never",
    ])
    .unwrap();

    let Commands::Merge(command) = cli.command else {
      panic!("expected the merge command");
    };
    assert_eq!(command.inputs, [PathBuf::from("pets.yaml"), PathBuf::from("users.json")]);
    assert_eq!(command.prefixes, ["pets_"]);
    assert_eq!(command.output.output, PathBuf::from("merged.json"));
    assert_eq!(command.output.verbosity(), Verbosity::Normal);
  }

  #[test]
  fn test_quiet_and_verbose_conflict() {
    let result = Cli::try_parse_from(["oas3-normalize", "upgrade", "-i", "a.json", "-o", "b.json", "-q", "-v"]);
    assert!(result.is_err());
  }
}
