//! Post-build finalization staging static assets into the output tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Manifest descriptor file name mandated by the extension runtime.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory holding extension icons inside both the static sources and the output.
pub const ICONS_DIR: &str = "icons";

/// Icon sizes the extension runtime may ask for. Each size is optional.
pub const ICON_SIZES: [u32; 4] = [16, 32, 48, 128];

/// Summary of what finalization staged into the output tree.
#[derive(Debug, Clone)]
pub struct FinalizeReport {
  /// Destination the manifest descriptor was copied to.
  pub manifest: PathBuf,
  /// Icon sizes whose sources existed and were copied.
  pub icons: Vec<u32>,
}

/// Stage the manifest descriptor and any present icons into the output tree.
///
/// Runs once, strictly after the build engine has durably written every routed
/// artifact. The manifest is required: its absence is a configuration error that
/// fails the whole call. Icons are copy-if-present; a missing size is skipped
/// silently while any other copy failure still surfaces. Idempotent, so rerunning
/// against the same roots produces the same file set.
pub fn finalize(output_root: &Path, static_root: &Path) -> Result<()> {
  finalize_with_report(output_root, static_root).map(|_| ())
}

/// [`finalize`] variant returning what was staged, for callers that report it.
pub fn finalize_with_report(output_root: &Path, static_root: &Path) -> Result<FinalizeReport> {
  let icons_dir = output_root.join(ICONS_DIR);
  fs::create_dir_all(&icons_dir)
    .with_context(|| format!("failed to create {}", icons_dir.display()))?;

  let manifest_source = static_root.join(MANIFEST_FILE);
  if !manifest_source.exists() {
    bail!(
      "required extension manifest missing at {}",
      manifest_source.display()
    );
  }
  let manifest_destination = output_root.join(MANIFEST_FILE);
  fs::copy(&manifest_source, &manifest_destination).with_context(|| {
    format!(
      "failed to copy {} to {}",
      manifest_source.display(),
      manifest_destination.display()
    )
  })?;

  let mut copied_icons = Vec::new();
  for size in ICON_SIZES {
    let file_name = format!("icon{size}.png");
    let source = static_root.join(ICONS_DIR).join(&file_name);
    // Copy-if-exists rather than copy-and-catch: a genuinely absent icon is an
    // accepted outcome, any other copy failure still surfaces.
    if !source.exists() {
      continue;
    }
    let destination = icons_dir.join(&file_name);
    fs::copy(&source, &destination).with_context(|| {
      format!(
        "failed to copy {} to {}",
        source.display(),
        destination.display()
      )
    })?;
    copied_icons.push(size);
  }

  Ok(FinalizeReport {
    manifest: manifest_destination,
    icons: copied_icons,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn write_manifest(static_root: &Path) {
    fs::create_dir_all(static_root).unwrap();
    fs::write(static_root.join(MANIFEST_FILE), r#"{"manifest_version":3}"#).unwrap();
  }

  fn write_icon(static_root: &Path, size: u32) {
    let icons = static_root.join(ICONS_DIR);
    fs::create_dir_all(&icons).unwrap();
    fs::write(icons.join(format!("icon{size}.png")), [0u8; 4]).unwrap();
  }

  #[test]
  fn copies_manifest_and_present_icons_only() {
    let temp = tempdir().unwrap();
    let static_root = temp.path().join("static");
    let output_root = temp.path().join("dist");
    write_manifest(&static_root);
    write_icon(&static_root, 16);
    write_icon(&static_root, 128);

    let report = finalize_with_report(&output_root, &static_root).unwrap();

    assert!(output_root.join(MANIFEST_FILE).exists());
    assert_eq!(report.icons, vec![16, 128]);
    assert!(output_root.join("icons/icon16.png").exists());
    assert!(output_root.join("icons/icon128.png").exists());
    assert!(!output_root.join("icons/icon32.png").exists());
    assert!(!output_root.join("icons/icon48.png").exists());
  }

  #[test]
  fn fails_when_the_manifest_source_is_missing() {
    let temp = tempdir().unwrap();
    let static_root = temp.path().join("static");
    let output_root = temp.path().join("dist");
    fs::create_dir_all(&static_root).unwrap();

    let err = finalize(&output_root, &static_root).unwrap_err();
    assert!(err.to_string().contains("manifest"));
    // Step 1 completed before the failure; the icons directory remains as a
    // harmless side effect.
    assert!(output_root.join(ICONS_DIR).exists());
  }

  #[test]
  fn finalize_is_idempotent() {
    let temp = tempdir().unwrap();
    let static_root = temp.path().join("static");
    let output_root = temp.path().join("dist");
    write_manifest(&static_root);
    write_icon(&static_root, 48);

    finalize(&output_root, &static_root).unwrap();
    finalize(&output_root, &static_root).unwrap();

    let staged: Vec<_> = fs::read_dir(output_root.join(ICONS_DIR))
      .unwrap()
      .map(|entry| entry.unwrap().file_name())
      .collect();
    assert_eq!(staged, vec![std::ffi::OsString::from("icon48.png")]);

    let manifest = fs::read_to_string(output_root.join(MANIFEST_FILE)).unwrap();
    assert_eq!(manifest, r#"{"manifest_version":3}"#);
  }

  #[test]
  fn skips_all_icons_when_none_exist() {
    let temp = tempdir().unwrap();
    let static_root = temp.path().join("static");
    let output_root = temp.path().join("dist");
    write_manifest(&static_root);

    let report = finalize_with_report(&output_root, &static_root).unwrap();
    assert!(report.icons.is_empty());
    assert_eq!(fs::read_dir(output_root.join(ICONS_DIR)).unwrap().count(), 0);
  }
}
