//! Project configuration loader describing the packaging layout.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::project::PackLayout;

const DEFAULT_CONFIG_FILE: &str = "webext.config.json";

/// Discoverable project configuration describing filesystem layout and build commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Relative path from the project root to the component sources.
  pub source_dir: String,
  /// Relative path to the static asset directory (manifest, icons).
  pub static_dir: String,
  /// Relative path the deployable output tree is written to.
  pub output_dir: String,
  /// Relative path the external build engine stages provisional artifacts into.
  pub staging_dir: String,
  /// File name of the artifact index emitted by the engine inside the staging dir.
  pub artifact_index_file: String,
  /// Source entry file for the popup component.
  pub popup_entry: String,
  /// Source entry file for the content-script component.
  pub content_entry: String,
  /// Source entry file for the background service worker.
  pub background_entry: String,
  /// Command used to invoke the external build engine for production builds.
  pub build_command: Vec<String>,
  /// Command the watch profile delegates full and incremental rebuilds to.
  pub dev_build_command: Vec<String>,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      source_dir: "src".into(),
      static_dir: "static".into(),
      output_dir: "dist".into(),
      staging_dir: "target/staging".into(),
      artifact_index_file: "artifacts.json".into(),
      popup_entry: "src/popup/popup.ts".into(),
      content_entry: "src/content/index.ts".into(),
      background_entry: "src/background/index.ts".into(),
      build_command: vec!["npm".into(), "run".into(), "compile".into()],
      dev_build_command: vec!["npm".into(), "run".into(), "build".into()],
    }
  }
}

impl ProjectConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to
  /// default values so downstream callers can continue operating with sensible
  /// assumptions.
  pub fn discover(project_root: &Path) -> Self {
    let candidate = project_root.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Convert the configuration into an owned layout description.
  pub fn into_layout(self) -> PackLayout {
    PackLayout {
      source_dir: self.source_dir,
      static_dir: self.static_dir,
      output_dir: self.output_dir,
      staging_dir: self.staging_dir,
      artifact_index_file: self.artifact_index_file,
      popup_entry: self.popup_entry,
      content_entry: self.content_entry,
      background_entry: self.background_entry,
      build_command: self.build_command,
      dev_build_command: self.dev_build_command,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let temp = tempdir().unwrap();
    let config = ProjectConfig::discover(temp.path());

    assert_eq!(config.output_dir, "dist");
    assert_eq!(config.artifact_index_file, "artifacts.json");
    assert_eq!(config.build_command, vec!["npm", "run", "compile"]);
  }

  #[test]
  fn discover_reads_partial_overrides() {
    let temp = tempdir().unwrap();
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"output_dir": "build/out", "build_command": ["vite", "build"]}"#,
    )
    .unwrap();

    let config = ProjectConfig::discover(temp.path());

    assert_eq!(config.output_dir, "build/out");
    assert_eq!(config.build_command, vec!["vite", "build"]);
    assert_eq!(config.source_dir, "src");
  }

  #[test]
  fn malformed_config_falls_back_to_defaults() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "not json").unwrap();

    let config = ProjectConfig::discover(temp.path());
    assert_eq!(config.static_dir, "static");
  }
}
