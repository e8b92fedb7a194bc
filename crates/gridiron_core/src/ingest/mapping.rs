use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical tracking fields the engine reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EntityName,
    TeamLabel,
    X,
    Y,
    Speed,
    Direction,
    FramePhaseId,
    PlayId,
    GameId,
}

/// Fields that must be present as columns for a load to proceed
pub const REQUIRED_FIELDS: [Field; 8] = [
    Field::EntityName,
    Field::TeamLabel,
    Field::X,
    Field::Y,
    Field::Speed,
    Field::Direction,
    Field::FramePhaseId,
    Field::PlayId,
];

impl Field {
    /// Canonical column name
    pub fn canonical_name(self) -> &'static str {
        match self {
            Field::EntityName => "entityName",
            Field::TeamLabel => "teamLabel",
            Field::X => "x",
            Field::Y => "y",
            Field::Speed => "speed",
            Field::Direction => "direction",
            Field::FramePhaseId => "framePhaseId",
            Field::PlayId => "playId",
            Field::GameId => "gameId",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Column name for each logical field.
///
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub entity_name: String,
    pub team_label: String,
    pub x: String,
    pub y: String,
    pub speed: String,
    pub direction: String,
    pub frame_phase_id: String,
    pub play_id: String,
    pub game_id: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            entity_name: Field::EntityName.canonical_name().to_string(),
            team_label: Field::TeamLabel.canonical_name().to_string(),
            x: Field::X.canonical_name().to_string(),
            y: Field::Y.canonical_name().to_string(),
            speed: Field::Speed.canonical_name().to_string(),
            direction: Field::Direction.canonical_name().to_string(),
            frame_phase_id: Field::FramePhaseId.canonical_name().to_string(),
            play_id: Field::PlayId.canonical_name().to_string(),
            game_id: Field::GameId.canonical_name().to_string(),
        }
    }
}

impl ColumnMapping {
    /// Headers of the NFL player tracking export
    pub fn nfl_tracking() -> Self {
        Self {
            entity_name: "displayName".to_string(),
            team_label: "club".to_string(),
            x: "x".to_string(),
            y: "y".to_string(),
            speed: "s".to_string(),
            direction: "dir".to_string(),
            frame_phase_id: "frameId".to_string(),
            play_id: "playId".to_string(),
            game_id: "gameId".to_string(),
        }
    }

    pub fn column(&self, field: Field) -> &str {
        match field {
            Field::EntityName => &self.entity_name,
            Field::TeamLabel => &self.team_label,
            Field::X => &self.x,
            Field::Y => &self.y,
            Field::Speed => &self.speed,
            Field::Direction => &self.direction,
            Field::FramePhaseId => &self.frame_phase_id,
            Field::PlayId => &self.play_id,
            Field::GameId => &self.game_id,
        }
    }

    /// Column names of required fields missing from `columns`, in field order
    pub fn missing_columns(&self, columns: &[String]) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .map(|&field| self.column(field))
            .filter(|name| !columns.iter().any(|c| c == name))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_uses_canonical_names() {
        let mapping = ColumnMapping::default();
        for field in REQUIRED_FIELDS {
            assert_eq!(mapping.column(field), field.canonical_name());
        }
    }

    #[test]
    fn test_missing_columns_in_field_order() {
        let mapping = ColumnMapping::default();
        let columns: Vec<String> =
            ["entityName", "teamLabel", "y", "speed", "direction"].iter().map(|s| s.to_string()).collect();
        assert_eq!(mapping.missing_columns(&columns), vec!["x", "framePhaseId", "playId"]);
    }

    #[test]
    fn test_nfl_mapping_deserializes_partially() {
        let mapping: ColumnMapping = serde_json::from_str(r#"{"speed": "s"}"#).unwrap();
        assert_eq!(mapping.speed, "s");
        assert_eq!(mapping.play_id, "playId");
    }
}
