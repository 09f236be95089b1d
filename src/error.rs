//! Error taxonomy for an authentication attempt
//!
//! Three failure classes exist: configuration errors (missing/invalid
//! options, detected before any resource is touched), system errors
//! (lock, device, or wait-primitive failures, always fatal to the
//! attempt), and the insecure-device rejection. A timed-out wait is
//! not an error; it surfaces as a normal [`crate::Outcome::AuthFailure`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A fatal error terminating the current authentication attempt.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required option was absent, empty, or zero.
    #[error("missing required option: {0}")]
    MissingOption(&'static str),

    /// An OS-level operation failed. Never retried; the underlying
    /// error text is surfaced to the diagnostics sink.
    #[error("{context}: {source}")]
    System {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// The input device is writable by users outside its owner/group,
    /// so synthetic events could be injected by an unprivileged local
    /// attacker.
    #[error("input device {0} is writable by others")]
    InsecureDevice(PathBuf),
}

impl AuthError {
    /// Wrap an OS error with a short context tag.
    pub fn system(context: &'static str, source: io::Error) -> Self {
        AuthError::System { context, source }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
