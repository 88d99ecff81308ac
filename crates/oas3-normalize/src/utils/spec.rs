use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
  #[default]
  Json,
  Yaml,
}

impl DocumentFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }

  /// Pretty JSON or block YAML, newline terminated.
  pub fn render(self, document: &serde_json::Value) -> anyhow::Result<String> {
    match self {
      Self::Json => {
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        Ok(text)
      }
      Self::Yaml => Ok(serde_yaml::to_string(document)?),
    }
  }
}

pub struct DocumentLoader {
  file: AsyncMmapFile,
  format: DocumentFormat,
}

impl DocumentLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = DocumentFormat::from_path(path);
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<serde_json::Value> {
    match self.format {
      DocumentFormat::Json => Ok(serde_json::from_slice(self.file.as_slice())?),
      DocumentFormat::Yaml => Ok(serde_yaml::from_slice(self.file.as_slice())?),
    }
  }
}

pub async fn load_document(path: &Path) -> anyhow::Result<serde_json::Value> {
  DocumentLoader::open(path)
    .await?
    .parse()
    .with_context(|| format!("failed to parse {}", path.display()))
}

/// Writes `document` in the format named by the extension of `path`, creating parent directories.
pub async fn write_document(path: &Path, document: &serde_json::Value) -> anyhow::Result<()> {
  let text = DocumentFormat::from_path(path).render(document)?;
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(path, text)
    .await
    .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_format_from_path() {
    let cases = [
      ("openapi.yaml", DocumentFormat::Yaml),
      ("openapi.YML", DocumentFormat::Yaml),
      ("openapi.json", DocumentFormat::Json),
      ("openapi", DocumentFormat::Json),
      ("dir.yaml/openapi.txt", DocumentFormat::Json),
    ];
    for (path, expected) in cases {
      assert_eq!(DocumentFormat::from_path(Path::new(path)), expected, "failed for {path}");
    }
  }

  #[tokio::test]
  async fn test_yaml_document_is_loaded_as_json_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.yaml");
    tokio::fs::write(
      &path,
      "openapi: 3.0.3\npaths:\n  /pets:\n    get:\n      responses:\n        '200':\n          description: ok\n",
    )
    .await
    .unwrap();

    let document = load_document(&path).await.unwrap();
    assert_eq!(
      document,
      json!({ "openapi": "3.0.3", "paths": { "/pets": { "get": { "responses": { "200": { "description": "ok" } } } } } })
    );
  }

  #[tokio::test]
  async fn test_written_documents_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let document = json!({ "openapi": "3.1.1", "info": { "title": "Pets", "version": "1" }, "tags": [{ "name": "a" }] });

    for name in ["out/openapi.json", "out/openapi.yml"] {
      let path = dir.path().join(name);
      write_document(&path, &document).await.unwrap();
      assert_eq!(load_document(&path).await.unwrap(), document, "failed for {name}");
    }
  }

  #[tokio::test]
  async fn test_invalid_documents_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let error = load_document(&path).await.unwrap_err();
    assert!(error.to_string().contains("broken.json"), "unexpected error: {error}");
  }
}
