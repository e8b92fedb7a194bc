//! # gridiron_core - Tracking Data Playback Engine
//!
//! Turns per-frame positional tracking records of a field sport into an
//! ordered, time-driven sequence of render frames.
//!
//! ## Pipeline
//! - `ingest`: column validation and row normalization
//! - `frames`: dense, ordered frame ids over `(playId, framePhaseId)`
//! - `playback`: play / pause / step state machine driven by `advance`
//! - `render`: screen-space frames handed to a `FrameRenderer`
//!
//! ```rust
//! use gridiron_core::{NormalizedRecord, PlaybackController, FrameRecorder, PlaybackMode};
//!
//! let mut controller = PlaybackController::new(FrameRecorder::new());
//! controller
//!     .load(vec![NormalizedRecord::new("QB", "KC", 30.0, 26.0, 4.0, 90.0, 1, 1)])
//!     .unwrap();
//! assert_eq!(controller.mode(), PlaybackMode::Paused);
//! assert_eq!(controller.renderer().len(), 1);
//! ```

// Constructors mirror the record layout field for field
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod coords;
pub mod error;
pub mod frames;
pub mod ingest;
pub mod playback;
pub mod render;
pub mod snapshot;

pub use config::{EngineConfig, PlaybackConfig};
pub use coords::{CoordinateMapper, FieldSpec, ScreenSpec};
pub use error::{EngineError, Result};
pub use frames::{build_frames, AnimationFrame, FrameGlobalId, FrameKey, FrameTable};
pub use ingest::{
    normalize, normalize_game, normalize_with, ColumnMapping, DropReason, IngestReport,
    NormalizedRecord, RawTable,
};
pub use playback::{PlaybackController, PlaybackInfo, PlaybackMode, PlaybackState};
pub use render::{FrameComposer, FrameRecorder, FrameRenderer, Palette, RenderEntity, RenderFrame, Rgb};
pub use snapshot::{PlayerEntry, SnapshotBuilder, SnapshotError, SnapshotInput, TeamSlot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
