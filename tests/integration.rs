//! End-to-end authentication attempts
//!
//! These tests drive the full attempt pipeline over real FIFOs and real
//! advisory locks: option resolution, lock queueing, device trust
//! checks, the bounded press wait, and the post-timeout cooldown.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::stat::Mode;
use nix::unistd::mkfifo;

use button_gate::input::{InputEvent, KEY_PRESS, KEY_RELEASE};
use button_gate::{authenticate, ExclusionGate, HostPrompt, Outcome, RecordingPrompt, COOLDOWN};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const KEYCODE: u16 = 256; // BTN_0

fn fifo_at(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    mkfifo(&path, Mode::from_bits_truncate(0o600)).unwrap();
    path
}

fn attempt_args(device: &Path, lockfile: &Path, timeout_secs: u64) -> Vec<String> {
    vec![
        format!("event_device={}", device.display()),
        format!("lockfile={}", lockfile.display()),
        format!("keycode={KEYCODE}"),
        format!("timeout={timeout_secs}"),
    ]
}

/// Opens the FIFO's write end (rendezvousing with the attempt's read
/// open), waits `delay`, then feeds it the given events.
fn press_after(fifo: PathBuf, delay: Duration, events: Vec<InputEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut writer = OpenOptions::new().write(true).open(&fifo).unwrap();
        thread::sleep(delay);
        for ev in events {
            writer.write_all(&ev.to_bytes()).unwrap();
        }
        // Keep the write end open long enough for the attempt to finish
        // reading; closing early would turn leftover waits into EOF.
        thread::sleep(Duration::from_secs(2));
    })
}

/// Prompt sink that timestamps each message, to reconstruct when an
/// attempt entered its waiting phase.
#[derive(Default)]
struct TimedPrompt {
    messages: Vec<(Instant, String)>,
}

impl HostPrompt for TimedPrompt {
    fn info(&mut self, text: &str) {
        self.messages.push((Instant::now(), text.to_string()));
    }
}

impl TimedPrompt {
    fn time_of(&self, needle: &str) -> Instant {
        self.messages
            .iter()
            .find(|(_, m)| m.contains(needle))
            .map(|(t, _)| *t)
            .unwrap_or_else(|| panic!("no prompt containing {needle:?}"))
    }
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn press_within_deadline_is_granted() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = fifo_at(dir.path(), "button");
    let lockfile = dir.path().join("button.lock");

    let writer = press_after(
        fifo.clone(),
        Duration::from_millis(100),
        vec![
            InputEvent::key(KEYCODE, KEY_RELEASE),
            InputEvent::key(KEYCODE, KEY_PRESS),
        ],
    );

    let mut host = RecordingPrompt::new();
    let outcome = authenticate(&mut host, 0, &attempt_args(&fifo, &lockfile, 5));
    writer.join().unwrap();

    assert_eq!(outcome, Outcome::Success);
    assert!(host.saw("Queueing for button"));
    assert!(host.saw("press the configured button"));
    // The lock must be free again after the attempt.
    assert!(ExclusionGate::try_acquire(&lockfile).unwrap().is_some());
}

#[test]
fn wrong_key_presses_do_not_authenticate() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = fifo_at(dir.path(), "button");
    let lockfile = dir.path().join("button.lock");

    let writer = press_after(
        fifo.clone(),
        Duration::from_millis(50),
        vec![
            InputEvent::key(KEYCODE + 1, KEY_PRESS),
            InputEvent::key(KEYCODE + 2, KEY_PRESS),
        ],
    );

    let mut host = RecordingPrompt::new();
    let outcome = authenticate(&mut host, 0, &attempt_args(&fifo, &lockfile, 1));
    writer.join().unwrap();

    assert_eq!(outcome, Outcome::AuthFailure);
}

#[test]
fn timeout_is_denied_after_the_cooldown() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = fifo_at(dir.path(), "button");
    let lockfile = dir.path().join("button.lock");

    let writer = press_after(fifo.clone(), Duration::from_millis(10), Vec::new());

    let mut host = RecordingPrompt::new();
    let start = Instant::now();
    let outcome = authenticate(&mut host, 0, &attempt_args(&fifo, &lockfile, 1));
    let elapsed = start.elapsed();
    writer.join().unwrap();

    assert_eq!(outcome, Outcome::AuthFailure);
    assert!(host.saw("No button press in time"));
    // One second of deadline plus the full cooldown before release.
    assert!(elapsed >= Duration::from_secs(1) + COOLDOWN, "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
    assert!(ExclusionGate::try_acquire(&lockfile).unwrap().is_some());
}

#[test]
fn partial_record_then_eof_is_a_system_failure() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = fifo_at(dir.path(), "button");
    let lockfile = dir.path().join("button.lock");

    let half_record = {
        let fifo = fifo.clone();
        thread::spawn(move || {
            let mut writer = OpenOptions::new().write(true).open(&fifo).unwrap();
            writer.write_all(&[0u8; 7]).unwrap();
            // Dropping the writer turns the stream into a short read.
        })
    };

    let mut host = RecordingPrompt::new();
    let outcome = authenticate(&mut host, 0, &attempt_args(&fifo, &lockfile, 5));
    half_record.join().unwrap();

    assert_eq!(outcome, Outcome::SystemError);
    assert!(ExclusionGate::try_acquire(&lockfile).unwrap().is_some());
}

#[test]
fn world_writable_device_is_refused_before_waiting() {
    let dir = tempfile::tempdir().unwrap();
    let device = dir.path().join("spoofable");
    let lockfile = dir.path().join("button.lock");

    // Even a stream already containing the right press must be refused.
    fs::write(&device, InputEvent::key(KEYCODE, KEY_PRESS).to_bytes()).unwrap();
    fs::set_permissions(&device, fs::Permissions::from_mode(0o666)).unwrap();

    let mut host = RecordingPrompt::new();
    let outcome = authenticate(&mut host, 0, &attempt_args(&device, &lockfile, 5));

    assert_eq!(outcome, Outcome::SystemError);
    assert!(host.saw("world-writable"));
    assert!(!host.saw("press the configured button"));
}

#[test]
fn missing_options_fail_before_any_resource() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("button.lock");

    let mut host = RecordingPrompt::new();
    let outcome = authenticate(
        &mut host,
        0,
        &[format!("lockfile={}", lockfile.display())],
    );

    assert_eq!(outcome, Outcome::ConfigError);
    assert!(!lockfile.exists());
    assert!(host.messages.is_empty());
}

#[test]
fn lockfile_is_created_owner_only() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("button.lock");

    let gate = ExclusionGate::acquire(&lockfile).unwrap();
    let mode = fs::metadata(&lockfile).unwrap().mode();
    gate.release();

    assert_eq!(mode & 0o077, 0, "lockfile mode {:o}", mode & 0o777);
}

// ---------------------------------------------------------------------------
// Cross-attempt serialization
// ---------------------------------------------------------------------------

#[test]
fn concurrent_attempts_never_overlap_their_waits() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("button.lock");
    let press_delay = Duration::from_millis(300);

    let mut attempts = Vec::new();
    for name in ["button-a", "button-b"] {
        let fifo = fifo_at(dir.path(), name);
        let lockfile = lockfile.clone();
        let writer = press_after(
            fifo.clone(),
            press_delay,
            vec![InputEvent::key(KEYCODE, KEY_PRESS)],
        );
        attempts.push(thread::spawn(move || {
            let mut host = TimedPrompt::default();
            let outcome = authenticate(&mut host, 0, &attempt_args(&fifo, &lockfile, 5));
            let finished = Instant::now();
            writer.join().unwrap();
            (outcome, host.time_of("press the configured button"), finished)
        }));
    }

    let results: Vec<_> = attempts.into_iter().map(|h| h.join().unwrap()).collect();
    let (a_outcome, a_wait, a_end) = results[0];
    let (b_outcome, b_wait, b_end) = results[1];

    assert_eq!(a_outcome, Outcome::Success);
    assert_eq!(b_outcome, Outcome::Success);
    // One attempt's waiting interval must fully precede the other's.
    assert!(a_end <= b_wait || b_end <= a_wait);
}
