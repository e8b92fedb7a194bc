//! Per-game split
//!
//! One tracking export (a week of games) → `game_<id>.<ext>` per game plus a
//! manifest with row counts and SHA-256 checksums.

use crate::table_io::{write_table_rows, TableFormat};
use anyhow::{bail, Context, Result};
use gridiron_core::ingest::parse_int;
use gridiron_core::RawTable;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// One written game file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFile {
    pub game_id: i64,
    /// File name relative to the manifest
    pub file: String,
    pub rows: usize,
    /// SHA256 checksum (hex)
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitManifest {
    /// Column the split was keyed on
    pub column: String,
    /// Format of every game file
    pub format: TableFormat,
    /// Games in ascending id order
    pub games: Vec<GameFile>,
    /// Rows skipped for a missing or non-integral game id
    pub skipped_rows: usize,
    /// Creation time (RFC3339)
    pub created_at: String,
}

impl SplitManifest {
    pub fn total_rows(&self) -> usize {
        self.games.iter().map(|g| g.rows).sum()
    }
}

/// Write one file per distinct game id into `out_dir`.
///
/// # Arguments
///
/// * `table` - Source rows
/// * `column` - Game id column (e.g. "gameId")
/// * `out_dir` - Output directory, created if missing
/// * `format` - Game file format, usually the input's
///
/// # Returns
///
/// The manifest, also saved as `manifest.json` in `out_dir`
pub fn split_by_game(table: &RawTable, column: &str, out_dir: &Path, format: TableFormat) -> Result<SplitManifest> {
    let Some(index) = table.column_index(column) else {
        bail!("Column '{}' not found in input table", column);
    };

    // 1. Group row indices by game id
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    let mut skipped_rows = 0;
    for row in 0..table.len() {
        match table.cell(row, index).and_then(parse_int) {
            Some(game_id) => groups.entry(game_id).or_default().push(row),
            None => skipped_rows += 1,
        }
    }
    if skipped_rows > 0 {
        log::warn!("Skipped {} rows without a usable '{}' value", skipped_rows, column);
    }

    // 2. Write one file per game
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut games = Vec::with_capacity(groups.len());
    for (game_id, rows) in groups {
        let file = format!("game_{game_id}.{}", format.extension());
        let path = out_dir.join(&file);
        write_table_rows(table, &rows, &path, format)?;
        let checksum = file_checksum(&path)?;
        log::info!("Saved: {} ({} rows)", path.display(), rows.len());
        games.push(GameFile { game_id, file, rows: rows.len(), checksum });
    }

    // 3. Manifest
    let manifest = SplitManifest {
        column: column.to_string(),
        format,
        games,
        skipped_rows,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let manifest_path = manifest_path(out_dir);
    let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

    Ok(manifest)
}

pub fn manifest_path(out_dir: &Path) -> PathBuf {
    out_dir.join(MANIFEST_FILE)
}

pub fn read_manifest(out_dir: &Path) -> Result<SplitManifest> {
    let path = manifest_path(out_dir);
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse manifest: {}", path.display()))
}

/// Check a split game file against its manifest checksum.
pub fn verify_game_file(out_dir: &Path, game: &GameFile) -> Result<bool> {
    Ok(file_checksum(&out_dir.join(&game.file))? == game.checksum)
}

fn file_checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
