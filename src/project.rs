//! Resolved project layout and the build context handed to every stage.

use std::path::{Path, PathBuf};

/// Owned description of the project's filesystem layout.
///
/// Produced from [`crate::config::ProjectConfig`] and passed explicitly into the
/// resolver, router and finalization stages so the same engine can run against
/// arbitrary roots in tests.
#[derive(Debug, Clone)]
pub struct PackLayout {
  /// Directory containing the authored component sources.
  pub source_dir: String,
  /// Directory containing static assets (manifest descriptor, icons).
  pub static_dir: String,
  /// Directory the deployable output tree is written to.
  pub output_dir: String,
  /// Directory the external build engine writes provisional artifacts into.
  pub staging_dir: String,
  /// Name of the artifact index file the engine emits inside the staging dir.
  pub artifact_index_file: String,
  /// Source entry file for the popup component.
  pub popup_entry: String,
  /// Source entry file for the content-script component.
  pub content_entry: String,
  /// Source entry file for the background service worker.
  pub background_entry: String,
  /// Command invoked to run the external build engine for production builds.
  pub build_command: Vec<String>,
  /// Command invoked by the watch profile for full and incremental rebuilds.
  pub dev_build_command: Vec<String>,
}

/// Borrowed context tying a layout to a concrete project root.
#[derive(Debug, Clone, Copy)]
pub struct PackContext<'a> {
  /// Layout describing relative locations within the project.
  pub layout: &'a PackLayout,
  /// Root of the project being packaged.
  pub project_root: &'a Path,
}

impl<'a> PackContext<'a> {
  /// Create a context for the provided layout and project root.
  pub fn new(layout: &'a PackLayout, project_root: &'a Path) -> Self {
    Self {
      layout,
      project_root,
    }
  }

  /// Root of the component sources.
  pub fn source_root(&self) -> PathBuf {
    self.project_root.join(&self.layout.source_dir)
  }

  /// Root of the static asset sources.
  pub fn static_root(&self) -> PathBuf {
    self.project_root.join(&self.layout.static_dir)
  }

  /// Root of the deployable output tree.
  pub fn output_root(&self) -> PathBuf {
    self.project_root.join(&self.layout.output_dir)
  }

  /// Root of the engine's provisional staging directory.
  pub fn staging_root(&self) -> PathBuf {
    self.project_root.join(&self.layout.staging_dir)
  }

  /// Path of the artifact index file the engine writes after a compile pass.
  pub fn artifact_index_path(&self) -> PathBuf {
    self.staging_root().join(&self.layout.artifact_index_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;

  #[test]
  fn context_paths_join_the_project_root() {
    let layout = ProjectConfig::default().into_layout();
    let root = Path::new("/work/extension");
    let context = PackContext::new(&layout, root);

    assert_eq!(context.source_root(), root.join("src"));
    assert_eq!(context.static_root(), root.join("static"));
    assert_eq!(context.output_root(), root.join("dist"));
    assert_eq!(
      context.artifact_index_path(),
      root.join("target/staging").join("artifacts.json")
    );
  }
}
