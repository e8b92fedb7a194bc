//! Frame Indexer
//!
//! Groups normalized records into animation frames keyed by a dense global id.
//!
//! The id is the dense rank of the `(play_id, frame_phase_id)` pair: records
//! are stable-sorted by that pair, and each new pair gets the next id starting
//! at 0. Records of one pair keep their input order, which is rendering order.

use crate::error::{EngineError, Result};
use crate::ingest::NormalizedRecord;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub type FrameGlobalId = u32;

/// Composite frame key. Field order gives the (play, phase) sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameKey {
    pub play_id: i64,
    pub frame_phase_id: i64,
}

impl FrameKey {
    pub fn of(record: &NormalizedRecord) -> Self {
        Self { play_id: record.play_id, frame_phase_id: record.frame_phase_id }
    }
}

/// One timestep of all tracked entities. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub id: FrameGlobalId,
    pub key: FrameKey,
    /// Rendering order
    pub entities: Vec<NormalizedRecord>,
}

impl AnimationFrame {
    /// Team of the first entity in rendering order.
    ///
    /// This is a positional heuristic: a leading ball row makes the empty
    /// label "home", and the designation may differ between frames.
    pub fn home_team(&self) -> Option<&str> {
        self.entities.first().map(|e| e.team_label.as_str())
    }
}

/// Frames by id plus the playback timeline
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    frames: FxHashMap<FrameGlobalId, AnimationFrame>,
    order: Vec<FrameGlobalId>,
}

impl FrameTable {
    pub fn get(&self, id: FrameGlobalId) -> Option<&AnimationFrame> {
        self.frames.get(&id)
    }

    /// Frame at a timeline position
    pub fn at(&self, index: usize) -> Option<&AnimationFrame> {
        self.order.get(index).and_then(|id| self.frames.get(id))
    }

    /// Ascending frame ids: the playback timeline
    pub fn order(&self) -> &[FrameGlobalId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.order.len().saturating_sub(1)
    }

    pub fn index_of(&self, id: FrameGlobalId) -> Option<usize> {
        self.order.binary_search(&id).ok()
    }

    pub fn key_of(&self, id: FrameGlobalId) -> Option<FrameKey> {
        self.get(id).map(|frame| frame.key)
    }

    /// Frames in timeline order
    pub fn iter(&self) -> impl Iterator<Item = &AnimationFrame> {
        self.order.iter().filter_map(|id| self.frames.get(id))
    }
}

/// Build the frame table from normalized records.
///
/// Fails with `EmptyDataset` when no record is left to index.
pub fn build_frames(mut records: Vec<NormalizedRecord>) -> Result<FrameTable> {
    if records.is_empty() {
        return Err(EngineError::EmptyDataset { total_rows: 0, dropped_rows: 0 });
    }

    // sort_by_key is stable
    records.sort_by_key(FrameKey::of);

    let mut built: Vec<AnimationFrame> = Vec::new();
    for record in records {
        let key = FrameKey::of(&record);
        let same_frame = built.last().is_some_and(|frame| frame.key == key);
        if same_frame {
            if let Some(frame) = built.last_mut() {
                frame.entities.push(record);
            }
        } else {
            let id = built.len() as FrameGlobalId;
            built.push(AnimationFrame { id, key, entities: vec![record] });
        }
    }

    let order: Vec<FrameGlobalId> = built.iter().map(|frame| frame.id).collect();
    let frames: FxHashMap<FrameGlobalId, AnimationFrame> =
        built.into_iter().map(|frame| (frame.id, frame)).collect();

    log::debug!("Indexed {} animation frames", order.len());

    Ok(FrameTable { frames, order })
}
