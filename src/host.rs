//! Callback seam toward the host authentication framework
//!
//! The core never prints to the user directly; it hands one-way text
//! notifications to whatever the host provides. A real integration
//! forwards these over the host's conversation channel. Notifications
//! fire at four points: before blocking on the lock, before waiting on
//! the device, on insecure-permission rejection, and on timeout.
//!
//! Severity-tagged diagnostics go through the `log` facade instead and
//! are not part of this trait.

/// One-way informational prompt channel back to the calling user.
///
/// No response is ever expected; implementations may drop messages
/// (e.g. a non-interactive host).
pub trait HostPrompt {
    /// Deliver a short informational message to the user.
    fn info(&mut self, text: &str);
}

/// Prompt sink that writes to stderr, used by the demo binary.
#[derive(Debug, Default)]
pub struct StderrPrompt;

impl HostPrompt for StderrPrompt {
    fn info(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

/// Prompt sink that discards everything, for non-interactive hosts.
#[derive(Debug, Default)]
pub struct NullPrompt;

impl HostPrompt for NullPrompt {
    fn info(&mut self, _text: &str) {}
}

/// Prompt sink that records messages in order, for tests.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    pub messages: Vec<String>,
}

impl RecordingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any recorded message contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl HostPrompt for RecordingPrompt {
    fn info(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
