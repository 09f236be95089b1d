//! Terminal outcomes of an authentication attempt
//!
//! The host framework consumes exactly one of these per invocation and
//! maps it into its own result vocabulary. Pass/fail is communicated
//! only through the outcome, never through prompt text.

use crate::error::AuthError;

/// Final result of one attempt, in the host's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The configured keycode was pressed within the deadline:
    /// authentication granted.
    Success,
    /// The deadline elapsed with no matching press: authentication
    /// denied, no special category. An expected outcome, not an error.
    AuthFailure,
    /// Required options were missing or invalid: service misconfigured.
    ConfigError,
    /// A lock, device, or wait primitive failed: system-level failure.
    SystemError,
    /// The invoked lifecycle entry point has no work to do here
    /// (credential establishment).
    NotApplicable,
}

impl Outcome {
    /// Exit status used by the demo binary; stands in for the host
    /// framework's result mapping.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success | Outcome::NotApplicable => 0,
            Outcome::AuthFailure => 1,
            Outcome::ConfigError => 2,
            Outcome::SystemError => 3,
        }
    }
}

impl From<&AuthError> for Outcome {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::MissingOption(_) => Outcome::ConfigError,
            AuthError::System { .. } | AuthError::InsecureDevice(_) => Outcome::SystemError,
        }
    }
}
