use std::fmt::Display;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use super::Colors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
  Quiet,
  Normal,
  Verbose,
}

impl Verbosity {
  pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
    match (quiet, verbose) {
      (true, _) => Self::Quiet,
      (false, true) => Self::Verbose,
      (false, false) => Self::Normal,
    }
  }
}

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Timestamped progress lines on stdout, warnings on stderr.
pub struct CommandLogger<'a> {
  colors: &'a Colors,
  verbosity: Verbosity,
}

impl<'a> CommandLogger<'a> {
  pub const fn new(colors: &'a Colors, verbosity: Verbosity) -> Self {
    Self { colors, verbosity }
  }

  pub fn is_quiet(&self) -> bool {
    self.verbosity == Verbosity::Quiet
  }

  pub fn is_verbose(&self) -> bool {
    self.verbosity == Verbosity::Verbose
  }

  pub fn info(&self, message: &str) {
    if !self.is_quiet() {
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.primary())
      );
    }
  }

  pub fn stat(&self, label: &str, value: impl Display) {
    if !self.is_quiet() {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.to_string().with(self.colors.value())
      );
    }
  }

  /// Indented detail line, printed with `--verbose` only.
  pub fn detail(&self, label: &str, value: impl Display) {
    if self.is_verbose() {
      println!(
        "              {}: {}",
        label.with(self.colors.accent()),
        value.to_string().with(self.colors.info())
      );
    }
  }

  pub fn warn(&self, message: &str) {
    eprintln!(
      "{} {}",
      "Warning:".with(self.colors.accent()),
      message.with(self.colors.primary())
    );
  }

  pub fn success(&self, message: &str) {
    if !self.is_quiet() {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.success())
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_verbosity_from_flags() {
    let cases = [
      (false, false, Verbosity::Normal),
      (false, true, Verbosity::Verbose),
      (true, false, Verbosity::Quiet),
      (true, true, Verbosity::Quiet),
    ];
    for (quiet, verbose, expected) in cases {
      assert_eq!(Verbosity::from_flags(quiet, verbose), expected, "failed for quiet={quiet} verbose={verbose}");
    }
  }

  #[test]
  fn test_timestamp_format() {
    let timestamp = format_timestamp();
    assert_eq!(timestamp.len(), "[00:00:00]".len());
    assert!(timestamp.starts_with('[') && timestamp.ends_with(']'));
  }
}
