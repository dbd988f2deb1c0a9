//! Routing of build artifacts to deterministic destinations in the output tree.

use std::path::PathBuf;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::entries::Component;

/// Number of hex digits kept from a chunk's content digest.
const CHUNK_HASH_LEN: usize = 8;

/// Role of a file produced by the external build engine.
///
/// Descriptors with a kind outside the enumerated set deserialize as
/// [`ArtifactKind::GenericAsset`] so they resolve through the default routing rule
/// instead of aborting the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
  /// The compiled entry script of one component.
  EntryScript,
  /// A shared code-split unit not tied to a single entry.
  Chunk,
  /// A stylesheet emitted for one of the UI surfaces.
  Stylesheet,
  /// Any other emitted file.
  #[serde(other)]
  GenericAsset,
}

/// A single file produced by the build engine, consumed exactly once by [`route`].
#[derive(Debug, Clone)]
pub struct Artifact {
  /// Role of the artifact in the output tree.
  pub kind: ArtifactKind,
  /// Logical name assigned by the engine. Stylesheet names are bare stems; generic
  /// asset names carry their extension.
  pub name: String,
  /// Component the artifact originates from, when the engine attributes one.
  pub origin: Option<Component>,
  /// Provisional location the engine wrote the content bytes to.
  pub source: PathBuf,
  /// Content hash for chunks, when the engine supplied one.
  pub hash: Option<String>,
}

impl Artifact {
  /// Construct an artifact with no origin, provisional source or hash attached.
  pub fn new(kind: ArtifactKind, name: impl Into<String>) -> Self {
    Self {
      kind,
      name: name.into(),
      origin: None,
      source: PathBuf::new(),
      hash: None,
    }
  }
}

/// Compute the destination of an artifact, relative to the output root.
///
/// Pure over the artifact's declared fields: identical inputs yield identical paths
/// across rebuilds, so the manifest and the extension loader can reference fixed
/// locations. Every enumerated kind resolves; there are no failure modes.
pub fn route(artifact: &Artifact) -> PathBuf {
  match artifact.kind {
    ArtifactKind::EntryScript => {
      let component = artifact
        .origin
        .or_else(|| Component::from_name(&artifact.name));
      match component {
        Some(component) => PathBuf::from(component.script_destination()),
        // Closed lookup table; entry names outside the three known components
        // fall through to `<name>.js` at the output root.
        None => PathBuf::from(format!("{}.js", artifact.name)),
      }
    }
    ArtifactKind::Chunk => match &artifact.hash {
      Some(hash) => PathBuf::from(format!("chunks/{}-{}.js", artifact.name, hash)),
      None => PathBuf::from(format!("chunks/{}.js", artifact.name)),
    },
    ArtifactKind::Stylesheet => {
      // Only the popup and content surfaces carry styles; the background worker
      // never does. The substring match is a name heuristic carried over from the
      // original layout contract, not a structural guarantee.
      if artifact.name.contains("content") {
        PathBuf::from(format!("src/content/{}.css", artifact.name))
      } else {
        PathBuf::from(format!("src/popup/{}.css", artifact.name))
      }
    }
    ArtifactKind::GenericAsset => PathBuf::from(format!("assets/{}", artifact.name)),
  }
}

/// Short collision-resistant hash over a chunk's content bytes.
///
/// Used when the engine's descriptor did not carry a hash of its own; any stable
/// content-derived scheme satisfies the layout contract.
pub fn content_hash(bytes: &[u8]) -> String {
  let digest = Sha256::digest(bytes);
  let mut hex = String::with_capacity(CHUNK_HASH_LEN);
  for byte in digest.iter().take(CHUNK_HASH_LEN / 2) {
    hex.push_str(&format!("{byte:02x}"));
  }
  hex
}
