//! Playback Controller
//!
//! Owns the frame table and the playback state of one session. Transport
//! commands and timer ticks are the only things that change the state, and
//! every change of the current index emits exactly one render frame.
//!
//! ```text
//! Idle --load--> Paused --play--> Playing --tick past last--> Finished
//!                  ^                 |                            |
//!                  +--pause / step---+                            |
//!                  +--------------reset / step / load-------------+
//! ```

use super::state::{PlaybackInfo, PlaybackMode, PlaybackState};
use super::timer::{TickHandle, TickTimer};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::frames::{build_frames, AnimationFrame, FrameTable};
use crate::ingest::{normalize_with, ColumnMapping, IngestReport, Normalized, NormalizedRecord, RawTable};
use crate::render::{FrameComposer, FrameRenderer};
use std::time::Duration;

pub struct PlaybackController<R: FrameRenderer> {
    frames: FrameTable,
    state: PlaybackState,
    timer: TickTimer,
    composer: FrameComposer,
    renderer: R,
    last_report: Option<IngestReport>,
}

impl<R: FrameRenderer> PlaybackController<R> {
    /// Controller with the continuous-playback defaults
    pub fn new(renderer: R) -> Self {
        Self {
            frames: FrameTable::default(),
            state: PlaybackState::default(),
            timer: TickTimer::new(),
            composer: FrameComposer::default(),
            renderer,
            last_report: None,
        }
    }

    pub fn with_config(config: &EngineConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        let mut controller = Self::new(renderer);
        controller.composer = config.composer();
        controller.state.interval_ms = config.playback.interval_ms;
        Ok(controller)
    }

    // ========== Accessors ==========

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.state.mode
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        if self.state.mode.has_dataset() {
            self.frames.at(self.state.current_index)
        } else {
            None
        }
    }

    pub fn composer(&self) -> &FrameComposer {
        &self.composer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Row accounting of the last successful `load_table`
    pub fn last_ingest_report(&self) -> Option<&IngestReport> {
        self.last_report.as_ref()
    }

    pub fn playback_info(&self) -> PlaybackInfo {
        let interval_s = self.state.interval_ms as f64 / 1000.0;
        PlaybackInfo {
            current_index: self.state.current_index,
            total_frames: self.frames.len(),
            frame_global_id: self.current_frame().map(|frame| frame.id),
            mode: self.state.mode,
            interval_ms: self.state.interval_ms,
            current_time_seconds: self.state.current_index as f64 * interval_s,
            total_time_seconds: self.frames.last_index() as f64 * interval_s,
        }
    }

    /// Until the pending tick fires; `None` unless playing
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.timer.time_until_due()
    }

    // ========== Loading ==========

    /// Replace the session with frames built from normalized records.
    ///
    /// On error nothing changes, including a running playback.
    pub fn load(&mut self, records: Vec<NormalizedRecord>) -> Result<()> {
        let frames = build_frames(records)?;
        self.install(frames, None);
        Ok(())
    }

    /// Normalize, index and install a raw table.
    pub fn load_table(&mut self, table: &RawTable, mapping: &ColumnMapping) -> Result<IngestReport> {
        let Normalized { records, report } = normalize_with(table, mapping)?;
        self.load_normalized(records, report)
    }

    /// Install records normalized elsewhere (e.g. filtered to one game).
    pub fn load_normalized(&mut self, records: Vec<NormalizedRecord>, report: IngestReport) -> Result<IngestReport> {
        let frames = build_frames(records).map_err(|err| match err {
            EngineError::EmptyDataset { .. } => EngineError::EmptyDataset {
                total_rows: report.total_rows,
                dropped_rows: report.dropped_rows(),
            },
            other => other,
        })?;
        self.install(frames, Some(report.clone()));
        Ok(report)
    }

    fn install(&mut self, frames: FrameTable, report: Option<IngestReport>) {
        self.timer.cancel();
        self.frames = frames;
        self.last_report = report;
        self.state.current_index = 0;
        self.state.mode = PlaybackMode::Paused;

        log::info!("Loaded {} animation frames", self.frames.len());
        self.emit_current();
    }

    // ========== Transport ==========

    /// Start auto-advance from the current index.
    pub fn play(&mut self) {
        match self.state.mode {
            PlaybackMode::Paused => {
                self.state.mode = PlaybackMode::Playing;
                self.schedule_tick();
            }
            mode => log::debug!("play ignored in {:?}", mode),
        }
    }

    /// Stop auto-advance. Idempotent.
    pub fn pause(&mut self) {
        if self.state.mode == PlaybackMode::Playing {
            self.timer.cancel();
            self.state.mode = PlaybackMode::Paused;
        }
    }

    pub fn step_forward(&mut self) {
        let target = self.state.current_index.saturating_add(1);
        self.move_paused(target);
    }

    pub fn step_back(&mut self) {
        let target = self.state.current_index.saturating_sub(1);
        self.move_paused(target);
    }

    /// Jump to a timeline position, clamped to the last frame.
    pub fn seek(&mut self, index: usize) {
        self.move_paused(index);
    }

    /// Back to the first frame; the way out of `Finished`.
    pub fn reset(&mut self) {
        self.move_paused(0);
    }

    /// Change the tick period. A pending tick is rescheduled with the new period.
    pub fn set_interval(&mut self, interval_ms: u64) -> Result<()> {
        if interval_ms == 0 {
            return Err(EngineError::InvalidConfig("interval_ms must be positive".into()));
        }
        self.state.interval_ms = interval_ms;
        if self.timer.is_pending() {
            self.schedule_tick();
        }
        Ok(())
    }

    /// Feed elapsed host time, firing every tick that comes due.
    ///
    /// Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let mut remaining = elapsed;
        let mut fired = 0;
        while let Some((handle, leftover)) = self.timer.advance(remaining) {
            remaining = leftover;
            fired += 1;
            self.tick(handle);
        }
        fired
    }

    // ========== Internals ==========

    /// Force `Paused`, cancelling any pending tick, then move to `target`
    /// clamped to the timeline. Emits the resulting frame even when the index
    /// did not change.
    fn move_paused(&mut self, target: usize) {
        if !self.state.mode.has_dataset() {
            log::debug!("transport ignored: no dataset loaded");
            return;
        }
        self.timer.cancel();
        self.state.mode = PlaybackMode::Paused;
        self.state.current_index = target.min(self.frames.last_index());
        self.emit_current();
    }

    fn schedule_tick(&mut self) {
        self.timer.schedule(Duration::from_millis(self.state.interval_ms));
    }

    fn tick(&mut self, handle: TickHandle) {
        if self.state.mode != PlaybackMode::Playing {
            return;
        }
        log::trace!("tick #{} at index {}", handle.generation(), self.state.current_index);

        if self.state.current_index >= self.frames.last_index() {
            self.state.mode = PlaybackMode::Finished;
            log::info!("Playback finished at frame index {}", self.state.current_index);
            return;
        }

        self.state.current_index += 1;
        self.emit_current();
        self.schedule_tick();
    }

    fn emit_current(&mut self) {
        if let Some(frame) = self.frames.at(self.state.current_index) {
            let rendered = self.composer.compose(frame);
            self.renderer.render(&rendered);
        }
    }
}
