//! Development watch profile delegating rebuilds to the external build script.
//!
//! The reduced profile skips routing and finalization entirely: the external
//! script owns the output layout, and this loop only keeps it fresh. One full
//! build runs up front, then debounced source changes trigger re-runs.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Debounce duration in milliseconds.
const DEBOUNCE_MS: u64 = 100;

/// Options for a watch session.
#[derive(Debug, Clone)]
pub struct WatchOptions {
  /// Directory containing the component sources to watch.
  pub source: PathBuf,
  /// Project root the build command runs in.
  pub project_root: PathBuf,
  /// External build command re-run on every settled change batch.
  pub build_command: Vec<String>,
}

/// Events reported to the caller while watching.
#[derive(Debug, Clone)]
pub enum WatchEvent {
  /// The watch session started against a source directory.
  Started {
    /// Watched source directory, for display.
    source: String,
  },
  /// A watched file changed.
  FileChanged {
    /// Changed path, for display.
    path: String,
  },
  /// A delegated rebuild was launched.
  BuildStarted,
  /// The delegated rebuild finished successfully.
  BuildFinished,
  /// The delegated rebuild (or the watcher itself) reported an error.
  Error {
    /// Human-readable error description.
    message: String,
  },
  /// The session drained after an interrupt.
  Shutdown,
}

/// Watcher state for debouncing.
struct WatcherState {
  pending_changes: HashSet<PathBuf>,
  last_change: Option<Instant>,
}

impl WatcherState {
  fn new() -> Self {
    Self {
      pending_changes: HashSet::new(),
      last_change: None,
    }
  }

  fn add_change(&mut self, path: PathBuf) {
    self.pending_changes.insert(path);
    self.last_change = Some(Instant::now());
  }

  fn should_rebuild(&self) -> bool {
    match self.last_change {
      Some(last) => {
        !self.pending_changes.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
      }
      None => false,
    }
  }

  fn take_changes(&mut self) -> Vec<PathBuf> {
    let changes: Vec<_> = self.pending_changes.drain().collect();
    self.last_change = None;
    changes
  }
}

/// Watch component sources until `running` is cleared, rebuilding on change.
///
/// Runs the external build command once for an initial correct output tree, then
/// re-runs it after each debounced batch of changes. Build failures are reported
/// through the callback and do not stop the session.
pub fn watch(
  options: WatchOptions,
  running: Arc<AtomicBool>,
  event_callback: impl Fn(WatchEvent),
) -> Result<()> {
  event_callback(WatchEvent::Started {
    source: options.source.display().to_string(),
  });

  run_delegated_build(&options, &event_callback);

  let (tx, rx) = channel();
  let mut watcher = RecommendedWatcher::new(
    move |res: std::result::Result<Event, notify::Error>| {
      if let Ok(event) = res {
        for path in event.paths {
          let _ = tx.send(path);
        }
      }
    },
    notify::Config::default(),
  )
  .context("failed to initialize the file watcher")?;

  watcher
    .watch(&options.source, RecursiveMode::Recursive)
    .with_context(|| format!("failed to watch {}", options.source.display()))?;

  let mut state = WatcherState::new();

  while running.load(Ordering::SeqCst) {
    if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
      if !is_hidden(&path) {
        event_callback(WatchEvent::FileChanged {
          path: path.display().to_string(),
        });
        state.add_change(path);
      }
    }

    if state.should_rebuild() {
      let _changes = state.take_changes();
      run_delegated_build(&options, &event_callback);
    }
  }

  event_callback(WatchEvent::Shutdown);
  Ok(())
}

fn run_delegated_build(options: &WatchOptions, callback: &impl Fn(WatchEvent)) {
  callback(WatchEvent::BuildStarted);
  match spawn_build(options) {
    Ok(()) => callback(WatchEvent::BuildFinished),
    Err(err) => callback(WatchEvent::Error {
      message: err.to_string(),
    }),
  }
}

fn spawn_build(options: &WatchOptions) -> Result<()> {
  let Some((program, args)) = options.build_command.split_first() else {
    bail!("dev_build_command is empty; configure the external build script invocation");
  };

  let status = Command::new(program)
    .args(args)
    .current_dir(&options.project_root)
    .status()
    .with_context(|| format!("failed to launch build script `{program}`"))?;

  if !status.success() {
    bail!("build script exited with {status}");
  }
  Ok(())
}

fn is_hidden(path: &std::path::Path) -> bool {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .is_some_and(|name| name.starts_with('.'))
}
