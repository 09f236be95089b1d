//! Button Gate demo runner
//!
//! Runs a single authentication attempt from command-line options,
//! standing in for the host authentication framework:
//!
//! ```text
//! button-gate event_device=/dev/input/event3 lockfile=/run/button.lock keycode=256 timeout=10
//! ```
//!
//! The outcome is reported through the process exit status using the
//! same mapping a host framework would apply: 0 granted, 1 denied,
//! 2 misconfigured, 3 system failure.

use anyhow::Result;
use std::process::ExitCode;

use button_gate::{authenticate, StderrPrompt};

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut host = StderrPrompt;
    let outcome = authenticate(&mut host, 0, &args);

    log::info!("attempt finished: {outcome:?}");
    Ok(ExitCode::from(outcome.exit_code() as u8))
}
