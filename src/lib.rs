#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod cli;
pub mod config;
pub mod entries;
pub mod project;
pub mod router;
pub mod stage;
pub mod watch;

pub use builder::{BuildReport, ExtensionBuilder};
pub use config::ProjectConfig;
pub use entries::{resolve_entries, Component};
pub use project::{PackContext, PackLayout};
pub use router::{content_hash, route, Artifact, ArtifactKind};
pub use stage::{finalize, finalize_with_report, FinalizeReport, ICON_SIZES};
