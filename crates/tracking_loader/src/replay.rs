//! Replay driver: load a table into a session and run it to the end

use anyhow::{Context, Result};
use gridiron_core::ingest::normalize_game;
use gridiron_core::{EngineConfig, FrameRenderer, IngestReport, PlaybackController, PlaybackMode, RawTable};
use serde::Serialize;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Feed each pending interval without waiting
    #[default]
    Virtual,
    /// Sleep for each pending interval
    Realtime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayOutcome {
    pub ticks: usize,
    pub frames: usize,
    pub playback_ms: u128,
    pub finished: bool,
}

/// Build a session from `table`, optionally keeping only one game.
///
/// The load emits the first frame through `renderer`.
pub fn open_session<R: FrameRenderer>(
    table: &RawTable,
    config: &EngineConfig,
    game: Option<i64>,
    renderer: R,
) -> Result<(PlaybackController<R>, IngestReport)> {
    let mut controller =
        PlaybackController::with_config(config, renderer).context("Invalid engine configuration")?;

    let report = match game {
        Some(game_id) => {
            let normalized =
                normalize_game(table, &config.columns, game_id).context("Failed to normalize tracking rows")?;
            controller.load_normalized(normalized.records, normalized.report)
        }
        None => controller.load_table(table, &config.columns),
    }
    .context("Failed to load tracking data")?;

    Ok((controller, report))
}

/// Play from the current frame until the session finishes.
pub fn play_to_end<R: FrameRenderer>(controller: &mut PlaybackController<R>, clock: Clock) -> ReplayOutcome {
    controller.play();

    let mut ticks = 0;
    let mut elapsed = Duration::ZERO;
    while let Some(wait) = controller.time_until_next_tick() {
        if clock == Clock::Realtime {
            thread::sleep(wait);
        }
        ticks += controller.advance(wait);
        elapsed += wait;
    }

    ReplayOutcome {
        ticks,
        frames: controller.frames().len(),
        playback_ms: elapsed.as_millis(),
        finished: controller.mode() == PlaybackMode::Finished,
    }
}
