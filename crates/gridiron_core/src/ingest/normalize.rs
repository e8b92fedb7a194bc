//! Raw rows → normalized tracking records
//!
//! Schema problems (a required column is absent) fail the whole load.
//! Value problems in a single row only drop that row: partial data is normal
//! in real tracking feeds.

use super::mapping::{ColumnMapping, Field};
use super::table::{parse_float, parse_int, RawTable, RawTrackingRecord};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel entity name of the ball
pub const BALL_NAME: &str = "football";

/// A tracking row whose keys and position parsed.
///
/// Position is not bounds-checked here; bounds are a render concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub entity_name: String,
    pub team_label: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub direction: f64,
    pub frame_phase_id: i64,
    pub play_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<i64>,
    pub source_row: usize,
}

impl NormalizedRecord {
    pub fn new(
        entity_name: impl Into<String>,
        team_label: impl Into<String>,
        x: f64,
        y: f64,
        speed: f64,
        direction: f64,
        frame_phase_id: i64,
        play_id: i64,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            team_label: team_label.into(),
            x,
            y,
            speed,
            direction,
            frame_phase_id,
            play_id,
            game_id: None,
            source_row: 0,
        }
    }

    pub fn is_ball(&self) -> bool {
        is_ball_name(&self.entity_name)
    }
}

pub fn is_ball_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(BALL_NAME)
}

/// Why a row was excluded (the row-level malformed-record warning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DropReason {
    MissingPlayId,
    MissingFramePhaseId,
    MissingX,
    MissingY,
    OtherGame,
}

impl RawTrackingRecord {
    /// Checks the keys and position, reporting the first problem found.
    pub fn normalize(self) -> std::result::Result<NormalizedRecord, DropReason> {
        let play_id = self.play_id.ok_or(DropReason::MissingPlayId)?;
        let frame_phase_id = self.frame_phase_id.ok_or(DropReason::MissingFramePhaseId)?;
        let x = self.x.ok_or(DropReason::MissingX)?;
        let y = self.y.ok_or(DropReason::MissingY)?;

        Ok(NormalizedRecord {
            entity_name: self.entity_name,
            team_label: self.team_label,
            x,
            y,
            speed: self.speed.unwrap_or(0.0),
            direction: self.direction.unwrap_or(0.0),
            frame_phase_id,
            play_id,
            game_id: self.game_id,
            source_row: self.source_row,
        })
    }
}

/// Row accounting for one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl IngestReport {
    pub fn dropped_rows(&self) -> usize {
        self.dropped.values().sum()
    }

    fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }
}

/// Normalized records in input order plus the row accounting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub report: IngestReport,
}

/// Column positions resolved once per table
struct ResolvedColumns {
    entity_name: usize,
    team_label: usize,
    x: usize,
    y: usize,
    speed: usize,
    direction: usize,
    frame_phase_id: usize,
    play_id: usize,
    game_id: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(table: &RawTable, mapping: &ColumnMapping) -> Result<Self> {
        let missing = mapping.missing_columns(table.columns());
        if !missing.is_empty() {
            return Err(EngineError::Schema { missing });
        }

        // Presence was checked above.
        let index = |field: Field| table.column_index(mapping.column(field)).unwrap_or_default();

        Ok(Self {
            entity_name: index(Field::EntityName),
            team_label: index(Field::TeamLabel),
            x: index(Field::X),
            y: index(Field::Y),
            speed: index(Field::Speed),
            direction: index(Field::Direction),
            frame_phase_id: index(Field::FramePhaseId),
            play_id: index(Field::PlayId),
            game_id: table.column_index(mapping.column(Field::GameId)),
        })
    }

    fn read(&self, table: &RawTable, row: usize) -> RawTrackingRecord {
        let text = |col: usize| table.cell(row, col).unwrap_or_default().to_string();
        let float = |col: usize| table.cell(row, col).and_then(parse_float);
        let int = |col: usize| table.cell(row, col).and_then(parse_int);

        RawTrackingRecord {
            entity_name: text(self.entity_name),
            team_label: text(self.team_label),
            x: float(self.x),
            y: float(self.y),
            speed: float(self.speed),
            direction: float(self.direction),
            frame_phase_id: int(self.frame_phase_id),
            play_id: int(self.play_id),
            game_id: self.game_id.and_then(int),
            source_row: row,
        }
    }
}

/// Normalize a table whose columns use the canonical field names.
pub fn normalize(table: &RawTable) -> Result<Normalized> {
    normalize_with(table, &ColumnMapping::default())
}

/// Normalize a table through a column mapping.
pub fn normalize_with(table: &RawTable, mapping: &ColumnMapping) -> Result<Normalized> {
    normalize_filtered(table, mapping, None)
}

/// Normalize only the rows of one game.
///
/// The game column becomes required; rows without a parseable game id are
/// dropped as `OtherGame`.
pub fn normalize_game(table: &RawTable, mapping: &ColumnMapping, game_id: i64) -> Result<Normalized> {
    if !table.has_column(mapping.column(Field::GameId)) {
        return Err(EngineError::Schema { missing: vec![mapping.game_id.clone()] });
    }
    normalize_filtered(table, mapping, Some(game_id))
}

fn normalize_filtered(table: &RawTable, mapping: &ColumnMapping, game: Option<i64>) -> Result<Normalized> {
    let columns = ResolvedColumns::resolve(table, mapping)?;

    let mut report = IngestReport { total_rows: table.len(), ..Default::default() };
    let mut records = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let raw = columns.read(table, row);
        if game.is_some() && raw.game_id != game {
            report.record_drop(DropReason::OtherGame);
            continue;
        }
        match raw.normalize() {
            Ok(record) => records.push(record),
            Err(reason) => report.record_drop(reason),
        }
    }
    report.kept_rows = records.len();

    if report.dropped_rows() > 0 {
        log::warn!(
            "Dropped {} of {} tracking rows: {:?}",
            report.dropped_rows(),
            report.total_rows,
            report.dropped
        );
    }
    log::debug!("Normalized {} tracking rows", report.kept_rows);

    Ok(Normalized { records, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 8] =
        ["entityName", "teamLabel", "x", "y", "speed", "direction", "framePhaseId", "playId"];

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::from_rows(&HEADER, rows)
    }

    #[test]
    fn test_schema_error_names_missing_fields() {
        let table = RawTable::from_rows(&["entityName", "teamLabel", "x", "y"], &[]);
        let err = normalize(&table).unwrap_err();
        assert_eq!(
            err,
            EngineError::Schema {
                missing: vec![
                    "speed".to_string(),
                    "direction".to_string(),
                    "framePhaseId".to_string(),
                    "playId".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let mut columns = HEADER.to_vec();
        columns.push("a");
        let table = RawTable::from_rows(&columns, &[&["Tom", "KC", "10", "20", "1", "90", "1", "7", "0.3"]]);
        let out = normalize(&table).unwrap();
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn test_rows_with_missing_keys_are_dropped() {
        let out = normalize(&table(&[
            &["A", "KC", "10", "20", "1", "0", "1", "7"],
            &["B", "KC", "10", "20", "1", "0", "", "7"],
            &["C", "KC", "10", "20", "1", "0", "1", "NA"],
            &["D", "KC", "abc", "20", "1", "0", "1", "7"],
            &["E", "KC", "10", "NaN", "1", "0", "1", "7"],
        ]))
        .unwrap();

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].entity_name, "A");
        assert_eq!(out.report.total_rows, 5);
        assert_eq!(out.report.kept_rows, 1);
        assert_eq!(out.report.dropped_rows(), 4);
        assert_eq!(out.report.dropped[&DropReason::MissingFramePhaseId], 1);
        assert_eq!(out.report.dropped[&DropReason::MissingPlayId], 1);
        assert_eq!(out.report.dropped[&DropReason::MissingX], 1);
        assert_eq!(out.report.dropped[&DropReason::MissingY], 1);
    }

    #[test]
    fn test_missing_speed_and_direction_default_to_zero() {
        let out = normalize(&table(&[&["football", "", "60", "26.65", "", "NA", "3", "1"]])).unwrap();
        let ball = &out.records[0];
        assert_eq!(ball.speed, 0.0);
        assert_eq!(ball.direction, 0.0);
        assert!(ball.is_ball());
        assert_eq!(ball.team_label, "");
    }

    #[test]
    fn test_input_order_is_preserved() {
        let out = normalize(&table(&[
            &["late", "KC", "1", "1", "0", "0", "5", "1"],
            &["early", "KC", "1", "1", "0", "0", "3", "1"],
        ]))
        .unwrap();
        let names: Vec<_> = out.records.iter().map(|r| r.entity_name.as_str()).collect();
        assert_eq!(names, ["late", "early"]);
        assert_eq!(out.records[1].source_row, 1);
    }

    #[test]
    fn test_out_of_bounds_positions_survive_normalization() {
        let out = normalize(&table(&[&["A", "KC", "-5", "70", "1", "0", "1", "1"]])).unwrap();
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn test_nfl_mapping() {
        let table = RawTable::from_rows(
            &["gameId", "playId", "displayName", "frameId", "club", "x", "y", "s", "a", "dir"],
            &[&["2022091200", "64", "Travis Kelce", "1.0", "KC", "40.1", "22.3", "3.2", "0.4", "271.5"]],
        );
        let out = normalize_with(&table, &ColumnMapping::nfl_tracking()).unwrap();
        let rec = &out.records[0];
        assert_eq!(rec.entity_name, "Travis Kelce");
        assert_eq!(rec.frame_phase_id, 1);
        assert_eq!(rec.play_id, 64);
        assert_eq!(rec.game_id, Some(2022091200));
        assert_eq!(rec.speed, 3.2);
    }

    #[test]
    fn test_game_filter() {
        let table = RawTable::from_rows(
            &["gameId", "entityName", "teamLabel", "x", "y", "speed", "direction", "framePhaseId", "playId"],
            &[
                &["1", "A", "KC", "1", "1", "0", "0", "1", "1"],
                &["2", "B", "KC", "1", "1", "0", "0", "1", "1"],
                &["", "C", "KC", "1", "1", "0", "0", "1", "1"],
            ],
        );
        let out = normalize_game(&table, &ColumnMapping::default(), 2).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].entity_name, "B");
        assert_eq!(out.report.dropped[&DropReason::OtherGame], 2);
    }

    #[test]
    fn test_game_filter_requires_game_column() {
        let err = normalize_game(&table(&[]), &ColumnMapping::default(), 1).unwrap_err();
        assert_eq!(err, EngineError::Schema { missing: vec!["gameId".to_string()] });
    }

    #[test]
    fn test_ball_name_is_case_insensitive() {
        assert!(is_ball_name("Football"));
        assert!(is_ball_name("FOOTBALL"));
        assert!(!is_ball_name("footballer"));
    }
}
