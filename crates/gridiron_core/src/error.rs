use thiserror::Error;

/// Errors surfaced by the engine to its caller.
///
/// Row-level drops and per-entity render rejections are not errors; they are
/// reported as data (`ingest::IngestReport`, `render::EntityRejection`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("missing required fields: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("no frames survived filtering ({dropped_rows} of {total_rows} rows dropped)")]
    EmptyDataset { total_rows: usize, dropped_rows: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),
}

impl EngineError {
    /// Load failures leave the playback session untouched, so a caller can
    /// retry with different input.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, EngineError::Schema { .. } | EngineError::EmptyDataset { .. })
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::ConfigParse(err.to_string())
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
