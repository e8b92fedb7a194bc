//! Playback session: state machine, tick scheduling and frame emission

mod controller;
mod state;
mod timer;

pub use controller::PlaybackController;
pub use state::{PlaybackInfo, PlaybackMode, PlaybackState, DEFAULT_INTERVAL_MS};
pub use timer::{TickHandle, TickTimer};
