//! Option-string resolution for one authentication attempt
//!
//! The host hands the module a flat sequence of free-form strings. Each
//! recognized string has the shape `key=value`; everything else is
//! ignored. The resolver scans in order, so the last occurrence of a
//! repeated key wins.
//!
//! Numeric values parse permissively: malformed input yields 0 rather
//! than an error, preserving the original module's `atoi` behavior. A
//! zero keycode is then rejected as missing, while a zero timeout
//! silently falls back to the default.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AuthError, Result};

/// Wait budget applied when no `timeout` option is given.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Immutable configuration for a single attempt.
///
/// Resolution fails before any lock or device is touched if
/// `event_device`, `lockfile`, or `keycode` is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Path of the input-event device carrying the button.
    pub event_device: PathBuf,
    /// Path of the shared lockfile serializing attempts.
    pub lockfile: PathBuf,
    /// Key code whose key-down event authenticates.
    pub keycode: u16,
    /// Total wait budget for the press.
    pub timeout: Duration,
}

impl Options {
    /// Resolve a raw option sequence into a typed configuration.
    ///
    /// Recognized keys: `event_device`, `lockfile`, `keycode`,
    /// `timeout`. Unrecognized strings are skipped without complaint so
    /// the host can pass through options meant for other consumers.
    pub fn resolve<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut event_device = String::new();
        let mut lockfile = String::new();
        let mut keycode: u16 = 0;
        let mut timeout_secs: u64 = 0;

        for arg in args {
            let Some((key, value)) = arg.as_ref().split_once('=') else {
                continue;
            };
            match key {
                "event_device" => event_device = value.to_string(),
                "lockfile" => lockfile = value.to_string(),
                // Malformed numbers resolve to 0 on purpose; see module docs.
                "keycode" => keycode = value.parse().unwrap_or(0),
                "timeout" => timeout_secs = value.parse().unwrap_or(0),
                _ => {}
            }
        }

        log::info!(
            "resolved options: event_device={} lockfile={} keycode={} timeout={}s",
            event_device,
            lockfile,
            keycode,
            if timeout_secs == 0 {
                DEFAULT_TIMEOUT_SECS
            } else {
                timeout_secs
            }
        );

        if event_device.is_empty() {
            return Err(AuthError::MissingOption("event_device"));
        }
        if lockfile.is_empty() {
            return Err(AuthError::MissingOption("lockfile"));
        }
        if keycode == 0 {
            return Err(AuthError::MissingOption("keycode"));
        }

        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        Ok(Self {
            event_device: PathBuf::from(event_device),
            lockfile: PathBuf::from(lockfile),
            keycode,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
