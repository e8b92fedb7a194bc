use crate::frames::FrameGlobalId;
use serde::{Deserialize, Serialize};

/// Default tick period
pub const DEFAULT_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// No dataset loaded
    #[default]
    Idle,
    Playing,
    Paused,
    /// Ran past the last frame while playing; left only by `reset` or `load`
    Finished,
}

impl PlaybackMode {
    pub fn has_dataset(self) -> bool {
        !matches!(self, PlaybackMode::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// 0-based position on the frame timeline
    pub current_index: usize,
    pub mode: PlaybackMode,
    pub interval_ms: u64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self { current_index: 0, mode: PlaybackMode::Idle, interval_ms: DEFAULT_INTERVAL_MS }
    }
}

/// Read-only playback summary for status displays
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackInfo {
    pub current_index: usize,
    pub total_frames: usize,
    pub frame_global_id: Option<FrameGlobalId>,
    pub mode: PlaybackMode,
    pub interval_ms: u64,
    /// Playback time at the current index
    pub current_time_seconds: f64,
    pub total_time_seconds: f64,
}
