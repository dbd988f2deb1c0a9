//! Command-line interface for the packaging tool.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::builder::ExtensionBuilder;
use crate::config::ProjectConfig;
use crate::project::PackContext;
use crate::watch::{watch, WatchEvent, WatchOptions};

#[derive(Parser)]
#[command(name = "webext-pack", version, about)]
struct Cli {
  #[command(subcommand)]
  command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
  /// Run the external build engine, route its artifacts and stage static assets.
  Build {
    /// Project root to build from.
    #[arg(long, default_value = ".")]
    root: PathBuf,
  },
  /// Watch component sources, delegating rebuilds to the external build script.
  Watch {
    /// Project root to watch.
    #[arg(long, default_value = ".")]
    root: PathBuf,
  },
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
  let cli = Cli::parse();
  let result = match cli.command {
    CliCommand::Build { root } => run_build(&root),
    CliCommand::Watch { root } => run_watch(&root),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run_build(root: &std::path::Path) -> Result<()> {
  let layout = ProjectConfig::discover(root).into_layout();
  let context = PackContext::new(&layout, root);

  let report = ExtensionBuilder::new(context).build()?;

  println!(
    "installed {} artifact(s) into {}",
    report.installed.len(),
    context.output_root().display()
  );
  println!("staged {}", report.staged.manifest.display());
  if report.staged.icons.is_empty() {
    println!("no icon sources present; skipped icon staging");
  } else {
    let sizes: Vec<String> = report
      .staged
      .icons
      .iter()
      .map(|size| size.to_string())
      .collect();
    println!("staged icon size(s): {}", sizes.join(", "));
  }
  Ok(())
}

fn run_watch(root: &std::path::Path) -> Result<()> {
  let layout = ProjectConfig::discover(root).into_layout();
  let context = PackContext::new(&layout, root);

  let running = Arc::new(AtomicBool::new(true));
  let handler_flag = running.clone();
  ctrlc::set_handler(move || {
    handler_flag.store(false, Ordering::SeqCst);
  })?;

  let options = WatchOptions {
    source: context.source_root(),
    project_root: root.to_path_buf(),
    build_command: layout.dev_build_command.clone(),
  };

  watch(options, running, |event| match event {
    WatchEvent::Started { source } => println!("watching {source}"),
    WatchEvent::FileChanged { path } => println!("changed: {path}"),
    WatchEvent::BuildStarted => println!("rebuilding..."),
    WatchEvent::BuildFinished => println!("rebuild complete"),
    WatchEvent::Error { message } => eprintln!("rebuild failed: {message}"),
    WatchEvent::Shutdown => println!("stopped"),
  })
}
