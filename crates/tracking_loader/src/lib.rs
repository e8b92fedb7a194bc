//! Tracking Loader Library
//!
//! File-side tooling around `gridiron_core`:
//! CSV / JSON / Parquet → `RawTable`, column listing, per-game split with a
//! SHA256 manifest, host renderers and the replay driver used by the CLI.

pub mod columns;
pub mod renderers;
pub mod replay;
pub mod split;
pub mod table_io;

pub use columns::{describe_columns, ColumnKind, ColumnSummary};
pub use renderers::{CaptionRenderer, JsonLinesRenderer};
pub use replay::{open_session, play_to_end, Clock, ReplayOutcome};
pub use split::{read_manifest, split_by_game, verify_game_file, GameFile, SplitManifest, MANIFEST_FILE};
pub use table_io::{
    load_table, read_csv_table, read_json_table, read_parquet_table, write_csv_rows, write_json_rows,
    write_parquet_rows, write_table_rows, TableFormat,
};

use anyhow::{bail, Context, Result};
use gridiron_core::EngineConfig;
use std::fs;
use std::path::Path;

/// Load an engine config file (`.json`, `.yaml` or `.yml`).
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    let config = match extension.as_deref() {
        Some("json") => EngineConfig::from_json_str(&text),
        Some("yaml") | Some("yml") => EngineConfig::from_yaml_str(&text),
        _ => bail!("Unsupported config format (expected .json, .yaml or .yml): {}", path.display()),
    };
    config.with_context(|| format!("Invalid config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_yaml_config() -> Result<()> {
        let mut file = Builder::new().suffix(".yml").tempfile()?;
        file.write_all(b"playback:\n  interval_ms: 50\nvector_scale: 1.5\n")?;

        let config = load_config(file.path())?;
        assert_eq!(config.playback.interval_ms, 50);
        assert!((config.vector_scale - 1.5).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_reported_with_path() -> Result<()> {
        let mut file = Builder::new().suffix(".json").tempfile()?;
        file.write_all(br#"{"playback": {"interval_ms": 0}}"#)?;

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("interval_ms must be positive"));
        Ok(())
    }

    #[test]
    fn test_unknown_config_extension() -> Result<()> {
        let file = Builder::new().suffix(".toml").tempfile()?;
        assert!(load_config(file.path()).is_err());
        Ok(())
    }
}
