//! Canonical, ordered animation frames

mod indexer;

pub use indexer::{build_frames, AnimationFrame, FrameGlobalId, FrameKey, FrameTable};
