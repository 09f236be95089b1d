//! Fixed-layout kernel input-event records
//!
//! The device delivers `struct input_event` records verbatim: a
//! timestamp pair, a 16-bit event type, a 16-bit event code, and a
//! 32-bit signed value, all in native byte order. No cross-platform
//! normalization happens here; the mechanism is bound to the Linux
//! input subsystem on 64-bit targets, where the timestamp fields are
//! two 64-bit integers.
//!
//! Only three fields carry meaning for authentication: the type must be
//! [`EV_KEY`], the code must match the configured keycode, and the
//! value must be [`KEY_PRESS`].

/// Event-type tag for key events.
pub const EV_KEY: u16 = 0x01;

/// Value of a key-down transition.
pub const KEY_PRESS: i32 = 1;
/// Value of a key-up transition.
pub const KEY_RELEASE: i32 = 0;
/// Value of an auto-repeat while held.
pub const KEY_REPEAT: i32 = 2;

/// Byte offset of the post-timestamp fields within a record.
const TIMESTAMP_SIZE: usize = 2 * std::mem::size_of::<i64>();

/// Size in bytes of one on-the-wire record.
pub const INPUT_EVENT_SIZE: usize = TIMESTAMP_SIZE + 2 + 2 + 4;

/// One decoded record. The timestamp is dropped at decode time since
/// nothing downstream consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    /// Decode one record from its raw wire bytes.
    pub fn from_bytes(raw: &[u8; INPUT_EVENT_SIZE]) -> Self {
        let t = TIMESTAMP_SIZE;
        Self {
            event_type: u16::from_ne_bytes([raw[t], raw[t + 1]]),
            code: u16::from_ne_bytes([raw[t + 2], raw[t + 3]]),
            value: i32::from_ne_bytes([raw[t + 4], raw[t + 5], raw[t + 6], raw[t + 7]]),
        }
    }

    /// Encode a record as wire bytes with a zeroed timestamp. Used to
    /// synthesize streams in tests and fixtures.
    pub fn to_bytes(self) -> [u8; INPUT_EVENT_SIZE] {
        let mut raw = [0u8; INPUT_EVENT_SIZE];
        let t = TIMESTAMP_SIZE;
        raw[t..t + 2].copy_from_slice(&self.event_type.to_ne_bytes());
        raw[t + 2..t + 4].copy_from_slice(&self.code.to_ne_bytes());
        raw[t + 4..t + 8].copy_from_slice(&self.value.to_ne_bytes());
        raw
    }

    /// Whether this record is a key-down of the given keycode.
    ///
    /// Releases and auto-repeats of the right key do not count; only a
    /// fresh press proves presence.
    pub fn is_press_of(&self, keycode: u16) -> bool {
        self.event_type == EV_KEY && self.code == keycode && self.value == KEY_PRESS
    }

    /// Convenience constructor for a key event.
    pub fn key(code: u16, value: i32) -> Self {
        Self {
            event_type: EV_KEY,
            code,
            value,
        }
    }
}
