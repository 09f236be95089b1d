//! Cross-process serialization of authentication attempts
//!
//! All concurrent attempts share one operator-configured lockfile and
//! take a blocking exclusive `flock` on it, so at most one attempt at a
//! time listens for the button. The file's content is irrelevant; only
//! its lock state matters. Acquisition blocks without bound and with no
//! staleness detection: if a holder never releases, later attempts wait
//! forever, and only holder-process death frees the lock (the kernel
//! drops advisory locks with the descriptor). This is a known
//! limitation of the scheme, kept as-is.
//!
//! The guard releases on drop, so every exit path of an attempt —
//! success, timeout, or error after acquisition — unlocks exactly once.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};

use crate::error::{AuthError, Result};

/// Exclusive hold on the shared lockfile for the current attempt.
///
/// Held from acquisition until drop (or explicit [`release`]); never
/// shared. While one attempt holds this, no other attempt may read the
/// device or decide an outcome.
///
/// [`release`]: ExclusionGate::release
#[derive(Debug)]
pub struct ExclusionGate {
    lock: Flock<File>,
}

impl ExclusionGate {
    /// Open (creating with owner-only permissions if absent) the
    /// lockfile and block until the exclusive lock is ours.
    ///
    /// Any number of callers queue here; release order is whatever the
    /// kernel picks, not FIFO. A signal interrupting the blocking lock
    /// is retried transparently.
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = open_lockfile(path)?;
        loop {
            match Flock::lock(file, FlockArg::LockExclusive) {
                Ok(lock) => return Ok(Self { lock }),
                Err((interrupted, Errno::EINTR)) => file = interrupted,
                Err((_, errno)) => {
                    return Err(AuthError::system("lock lockfile", errno.into()));
                }
            }
        }
    }

    /// Non-blocking acquisition. Returns `None` when another attempt
    /// currently holds the lock.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let file = open_lockfile(path)?;
        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => Ok(Some(Self { lock })),
            Err((_, errno)) if errno == Errno::EWOULDBLOCK => Ok(None),
            Err((_, errno)) => Err(AuthError::system("lock lockfile", errno.into())),
        }
    }

    /// Unlock and close. Equivalent to dropping the guard; the explicit
    /// form marks the release point in the attempt flow.
    pub fn release(self) {
        if let Err((_, errno)) = self.lock.unlock() {
            // The descriptor still closes on drop; nothing to recover.
            log::warn!("unlock lockfile: {errno}");
        }
    }
}

fn open_lockfile(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| AuthError::system("open lockfile", e))
}
