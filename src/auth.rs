//! The authentication attempt itself
//!
//! One attempt runs synchronously on the calling thread:
//! resolve options, queue on the shared lock, validate and open the
//! device, wait for the press, and map the result into an outcome. The
//! lock guard's scoped ownership guarantees release on every path that
//! acquired it, including all error paths.
//!
//! On timeout the lock is deliberately held for one extra second before
//! release, so a press landing just after the watcher gave up is
//! absorbed instead of authenticating whichever attempt queues next.

use std::thread;
use std::time::Duration;

use crate::device::open_checked;
use crate::error::Result;
use crate::host::HostPrompt;
use crate::input::{wait_for_press, WaitResult};
use crate::lock::ExclusionGate;
use crate::options::Options;
use crate::outcome::Outcome;

/// Host flag requesting a silent attempt. Accepted for contract
/// compatibility but deliberately not honored: a presence check with no
/// user feedback tends to time out with the user staring at a frozen
/// prompt, so notifications are always delivered.
pub const FLAG_SILENT: u32 = 0x8000;

/// Grace period the lock is held after a timeout, absorbing stray
/// presses that arrive just too late.
pub const COOLDOWN: Duration = Duration::from_secs(1);

/// Run one authentication attempt.
///
/// `args` is the raw option sequence from the host (see
/// [`Options::resolve`]); `flags` is the host's bitmask, currently
/// ignored. Every failure is folded into the returned [`Outcome`];
/// this function never panics and never leaves the lock held.
pub fn authenticate<S: AsRef<str>>(
    host: &mut dyn HostPrompt,
    _flags: u32,
    args: &[S],
) -> Outcome {
    match run_attempt(host, args) {
        Ok(WaitResult::Matched) => Outcome::Success,
        Ok(WaitResult::TimedOut) => Outcome::AuthFailure,
        Err(err) => {
            log::error!("attempt aborted: {err}");
            Outcome::from(&err)
        }
    }
}

/// Second lifecycle entry point required by the host contract.
/// Presence authentication establishes no credentials, so this always
/// reports that it does not apply.
pub fn establish_credentials<S: AsRef<str>>(
    _host: &mut dyn HostPrompt,
    _flags: u32,
    _args: &[S],
) -> Outcome {
    Outcome::NotApplicable
}

fn run_attempt<S: AsRef<str>>(host: &mut dyn HostPrompt, args: &[S]) -> Result<WaitResult> {
    let opts = Options::resolve(args)?;

    host.info("Queueing for button");
    let gate = ExclusionGate::acquire(&opts.lockfile)?;

    let result = watch_device(host, &opts);

    if matches!(result, Ok(WaitResult::TimedOut)) {
        host.info("No button press in time; holding the line briefly");
        log::info!(
            "timed out after {}s, cooling down for {}s",
            opts.timeout.as_secs(),
            COOLDOWN.as_secs()
        );
        thread::sleep(COOLDOWN);
    }

    gate.release();
    result
}

/// The LOCKED half of the attempt: everything that runs while the lock
/// is held, separated out so `run_attempt` owns the single release.
fn watch_device(host: &mut dyn HostPrompt, opts: &Options) -> Result<WaitResult> {
    let mut device = open_checked(&opts.event_device, host)?;
    host.info("Please press the configured button");
    wait_for_press(&mut device, opts.keycode, opts.timeout)
}
