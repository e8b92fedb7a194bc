//! Record ingestion
//!
//! Validates the column set of a bulk load and turns its rows into
//! `NormalizedRecord`s. Does not sort; ordering is the indexer's job.

mod mapping;
mod normalize;
mod table;

pub use mapping::{ColumnMapping, Field, REQUIRED_FIELDS};
pub use normalize::{
    is_ball_name, normalize, normalize_game, normalize_with, DropReason, IngestReport, Normalized,
    NormalizedRecord, BALL_NAME,
};
pub use table::{is_missing, parse_float, parse_int, RawTable, RawTrackingRecord};
