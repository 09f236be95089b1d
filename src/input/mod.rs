//! Kernel input-event stream handling

mod event;
mod watcher;

pub use event::{InputEvent, EV_KEY, INPUT_EVENT_SIZE, KEY_PRESS, KEY_RELEASE, KEY_REPEAT};
pub use watcher::{wait_for_press, WaitResult};
