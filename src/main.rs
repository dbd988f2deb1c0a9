//! `webext-pack` binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
  webext_pack::cli::run()
}
