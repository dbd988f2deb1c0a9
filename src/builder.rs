//! Production build orchestrator: run the engine, route artifacts, finalize.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use same_file::is_same_file;
use serde::Deserialize;

use crate::entries::Component;
use crate::project::PackContext;
use crate::router::{content_hash, route, Artifact, ArtifactKind};
use crate::stage::{finalize_with_report, FinalizeReport};

/// Artifact descriptor as serialized by the external build engine.
#[derive(Debug, Deserialize)]
struct ArtifactRecord {
  kind: ArtifactKind,
  name: String,
  #[serde(default)]
  origin: Option<String>,
  path: PathBuf,
  #[serde(default)]
  hash: Option<String>,
}

/// Outcome of one production build invocation.
#[derive(Debug)]
pub struct BuildReport {
  /// Destinations installed into the output tree, relative to the output root.
  pub installed: Vec<PathBuf>,
  /// Static assets staged by the finalization step.
  pub staged: FinalizeReport,
}

/// High-level helper driving one production build against a project root.
pub struct ExtensionBuilder<'a> {
  context: PackContext<'a>,
}

impl<'a> ExtensionBuilder<'a> {
  /// Create a builder for the provided build context.
  pub fn new(context: PackContext<'a>) -> Self {
    Self { context }
  }

  /// Run the full production build: engine pass, artifact routing, finalization.
  pub fn build(&self) -> Result<BuildReport> {
    self.run_engine()?;

    let index_path = self.context.artifact_index_path();
    let artifacts = load_artifact_index(&index_path, &self.context.staging_root())?;
    let installed = self.install_artifacts(artifacts)?;

    // Finalization must not begin before every artifact has been written.
    let staged = finalize_with_report(&self.context.output_root(), &self.context.static_root())?;

    Ok(BuildReport { installed, staged })
  }

  /// Invoke the external build engine, passing its failures through unchanged.
  fn run_engine(&self) -> Result<()> {
    let command = &self.context.layout.build_command;
    let Some((program, args)) = command.split_first() else {
      bail!("build_command is empty; configure the external build engine invocation");
    };

    let status = Command::new(program)
      .args(args)
      .current_dir(self.context.project_root)
      .status()
      .with_context(|| format!("failed to launch build engine `{program}`"))?;

    if !status.success() {
      bail!("build engine exited with {status}");
    }
    Ok(())
  }

  /// Route every artifact and install its bytes into the output tree.
  pub fn install_artifacts(&self, artifacts: Vec<Artifact>) -> Result<Vec<PathBuf>> {
    let output_root = self.context.output_root();
    let mut installed = Vec::with_capacity(artifacts.len());

    for mut artifact in artifacts {
      if artifact.kind == ArtifactKind::Chunk && artifact.hash.is_none() {
        let bytes = fs::read(&artifact.source).with_context(|| {
          format!("failed to read chunk content at {}", artifact.source.display())
        })?;
        artifact.hash = Some(content_hash(&bytes));
      }

      let relative = route(&artifact);
      let destination = output_root.join(&relative);
      if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }

      install_artifact(&artifact.source, &destination).with_context(|| {
        format!(
          "failed to install {} to {}",
          artifact.source.display(),
          destination.display()
        )
      })?;
      installed.push(relative);
    }

    Ok(installed)
  }
}

/// Load and decode the artifact index the engine emitted after its compile pass.
///
/// Provisional paths in the index are relative to the staging root; they are
/// resolved here so installation can read the content bytes directly. Descriptors
/// naming an origin outside the fixed component set keep routing through the
/// default rule rather than failing the build.
pub fn load_artifact_index(path: &Path, staging_root: &Path) -> Result<Vec<Artifact>> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("artifact index not found at {}", path.display()))?;
  let records: Vec<ArtifactRecord> =
    serde_json::from_str(&content).context("failed to parse artifact index JSON")?;

  Ok(
    records
      .into_iter()
      .map(|record| Artifact {
        kind: record.kind,
        name: record.name,
        origin: record.origin.as_deref().and_then(Component::from_name),
        source: staging_root.join(record.path),
        hash: record.hash,
      })
      .collect(),
  )
}

/// Place artifact bytes at their destination, preferring a hard link over a copy.
fn install_artifact(source: &Path, destination: &Path) -> std::io::Result<()> {
  if destination.exists() {
    if is_same_file(source, destination)? {
      return Ok(());
    }
    fs::remove_file(destination)?;
  }

  match fs::hard_link(source, destination) {
    Ok(_) => Ok(()),
    Err(err) => {
      if err.kind() == ErrorKind::AlreadyExists {
        Ok(())
      } else {
        fs::copy(source, destination).map(|_| ())
      }
    }
  }
}
