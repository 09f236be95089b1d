//! Deadline-bounded wait for a matching key press
//!
//! The wait budget is anchored to a single start instant captured once
//! at entry. Every loop iteration recomputes the remaining budget from
//! that anchor, so neither signal interruptions nor bursts of
//! irrelevant events extend the window. Some platforms' wait calls
//! decrement their timeout argument in place; tracking the deadline
//! ourselves keeps the arithmetic portable and correct.

use std::io::Read;
use std::os::fd::AsFd;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::error::{AuthError, Result};
use crate::input::event::{InputEvent, INPUT_EVENT_SIZE};

/// How a bounded wait ended, short of a system error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// A key-down of the configured keycode arrived in time.
    Matched,
    /// The deadline elapsed with no matching press.
    TimedOut,
}

/// Wait until `keycode` is pressed on `device` or `timeout` elapses.
///
/// The device is treated as an infinite record stream: a short read or
/// end-of-stream means it vanished and is a fatal error, never a
/// retried condition. Records that are not a key-down of `keycode`
/// (releases, repeats, other keys, non-key events) are discarded and
/// the wait continues against the same deadline.
pub fn wait_for_press<D>(device: &mut D, keycode: u16, timeout: Duration) -> Result<WaitResult>
where
    D: AsFd + Read,
{
    // Subtracting elapsed time from the budget, rather than adding the
    // budget to an Instant, stays total for any u64-seconds timeout.
    let start = Instant::now();

    loop {
        let remaining = timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            return Ok(WaitResult::TimedOut);
        }

        let ready = {
            let mut fds = [PollFd::new(device.as_fd(), PollFlags::POLLIN)];
            match poll(&mut fds, poll_budget(remaining)) {
                Ok(0) => return Ok(WaitResult::TimedOut),
                Ok(_) => true,
                // Interrupted by a signal: the deadline arithmetic at the
                // top of the loop preserves the elapsed time.
                Err(Errno::EINTR) => false,
                Err(errno) => {
                    return Err(AuthError::system("wait for input device", errno.into()));
                }
            }
        };
        if !ready {
            continue;
        }

        let mut raw = [0u8; INPUT_EVENT_SIZE];
        device
            .read_exact(&mut raw)
            .map_err(|e| AuthError::system("read from input device", e))?;

        let event = InputEvent::from_bytes(&raw);
        if event.is_press_of(keycode) {
            return Ok(WaitResult::Matched);
        }
        log::debug!(
            "discarding event type={:#x} code={} value={}",
            event.event_type,
            event.code,
            event.value
        );
    }
}

/// Remaining budget as a poll timeout, rounded up to whole
/// milliseconds so a sub-millisecond remainder cannot busy-spin.
fn poll_budget(remaining: Duration) -> PollTimeout {
    let ms = remaining.as_micros().div_ceil(1_000);
    i32::try_from(ms)
        .ok()
        .and_then(|ms| PollTimeout::try_from(ms).ok())
        .unwrap_or(PollTimeout::MAX)
}
