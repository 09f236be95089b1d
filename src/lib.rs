//! Button Gate - presence-based button authentication
//!
//! A caller is authenticated only if a configured physical button (a
//! keycode on a Linux input-event device) is pressed within a bounded
//! time window. Concurrent attempts across processes serialize on an
//! advisory file lock so one caller's press can never authenticate
//! another caller's session.

pub mod auth;
pub mod device;
pub mod error;
pub mod host;
pub mod input;
pub mod lock;
pub mod options;
pub mod outcome;

pub use auth::{authenticate, establish_credentials, COOLDOWN, FLAG_SILENT};
pub use error::AuthError;
pub use host::{HostPrompt, NullPrompt, RecordingPrompt, StderrPrompt};
pub use lock::ExclusionGate;
pub use options::Options;
pub use outcome::Outcome;
