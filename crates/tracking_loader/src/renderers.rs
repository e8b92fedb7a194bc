//! Host renderers writing frames to a byte sink
//!
//! `FrameRenderer::render` cannot fail, so the first write error is kept and
//! later frames are dropped; `finish` surfaces it.

use anyhow::{Context, Result};
use gridiron_core::{FrameRenderer, RenderFrame};
use std::io::{self, Write};

/// One summary line per frame
pub struct CaptionRenderer<W: Write> {
    out: W,
    frames: usize,
    error: Option<io::Error>,
}

impl<W: Write> CaptionRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0, error: None }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn finish(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err).context("Failed to write frame summary");
        }
        self.out.flush().context("Failed to flush frame summary")?;
        Ok(self.out)
    }
}

impl<W: Write> FrameRenderer for CaptionRenderer<W> {
    fn render(&mut self, frame: &RenderFrame) {
        if self.error.is_some() {
            return;
        }
        let ball = match &frame.ball_entity {
            Some(ball) => format!("({:.1}, {:.1})", ball.state.x, ball.state.y),
            None => "-".to_string(),
        };
        let line = writeln!(
            self.out,
            "{:<14} players={:<3} ball={:<14} skipped={}",
            frame.caption.as_deref().unwrap_or(""),
            frame.entities.len(),
            ball,
            frame.skipped_entities
        );
        match line {
            Ok(()) => self.frames += 1,
            Err(err) => self.error = Some(err),
        }
    }
}

/// One JSON object per frame, newline separated
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    frames: usize,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0, error: None }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn finish(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err).context("Failed to write JSON frames");
        }
        self.out.flush().context("Failed to flush JSON frames")?;
        Ok(self.out)
    }

    fn write_frame(&mut self, frame: &RenderFrame) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> FrameRenderer for JsonLinesRenderer<W> {
    fn render(&mut self, frame: &RenderFrame) {
        if self.error.is_some() {
            return;
        }
        match self.write_frame(frame) {
            Ok(()) => self.frames += 1,
            Err(err) => self.error = Some(err),
        }
    }
}
