//! Input-device opening and trust validation
//!
//! The physical-presence guarantee only holds if the event stream
//! cannot be forged. A device node writable by arbitrary local users
//! could have synthetic key events injected into it (e.g. via uinput
//! style tricks or direct writes), so such a device is refused
//! outright. If the permission bits cannot be inspected at all, the
//! check is inconclusive and the attempt continues with a warning:
//! availability is deliberately preferred over paranoia here.

use std::fs::File;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::{AuthError, Result};
use crate::host::HostPrompt;

/// Permission bit granting write access to "others".
const S_IWOTH: u32 = 0o002;

/// Open the device read-only and refuse it if others may write to it.
///
/// A failed permission inspection degrades open: warn, notify, and
/// proceed with the opened device.
pub fn open_checked(path: &Path, host: &mut dyn HostPrompt) -> Result<File> {
    let device = File::open(path).map_err(|e| AuthError::system("open input device", e))?;

    match device.metadata() {
        Ok(meta) => {
            if meta.permissions().mode() & S_IWOTH != 0 {
                host.info("Input device is world-writable; refusing to trust it");
                return Err(AuthError::InsecureDevice(path.to_path_buf()));
            }
        }
        Err(e) => {
            log::warn!(
                "cannot inspect permissions of {}: {e}; continuing unchecked",
                path.display()
            );
            host.info("Could not verify input device permissions");
        }
    }

    Ok(device)
}
