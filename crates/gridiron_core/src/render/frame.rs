//! Render-ready frame description
//!
//! Composition turns an `AnimationFrame` into a `RenderFrame`: entities are
//! validated one by one (a bad entity is skipped, never the whole frame),
//! projected to screen space, and classified as ball, home or away.

use crate::coords::{CoordinateMapper, FieldSpec, YARD_LINE_SPACING};
use crate::frames::{AnimationFrame, FrameGlobalId};
use crate::ingest::{is_ball_name, NormalizedRecord};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const PINK: Rgb = Rgb(255, 192, 203);
    pub const SADDLE_BROWN: Rgb = Rgb(139, 69, 19);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Advisory colors; renderers may ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub home: Rgb,
    pub away: Rgb,
    pub ball: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self { home: Rgb::RED, away: Rgb::BLUE, ball: Rgb::PINK }
    }
}

impl Palette {
    /// Manual snapshot colors
    pub fn snapshot() -> Self {
        Self { ball: Rgb::SADDLE_BROWN, ..Self::default() }
    }

    pub fn side(&self, side: TeamSide) -> Rgb {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

/// Validated single-entity snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub name: String,
    pub team: String,
    /// Inside `[0, field width]`
    pub x: f64,
    /// Inside `[0, field height]`
    pub y: f64,
    /// Non-negative
    pub speed: f64,
    /// Degrees in `[0, 360)`
    pub direction: f64,
    pub is_ball: bool,
}

/// Why one entity was left out of a render frame
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EntityRejection {
    #[error("position ({x}, {y}) outside the field")]
    OutOfBounds { x: f64, y: f64 },
    #[error("invalid speed {0}")]
    InvalidSpeed(f64),
    #[error("invalid direction {0}")]
    InvalidDirection(f64),
}

impl EntityState {
    /// Out-of-bounds positions are rejected, not clamped.
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        x: f64,
        y: f64,
        speed: f64,
        direction: f64,
        field: &FieldSpec,
    ) -> Result<Self, EntityRejection> {
        if !field.contains(x, y) {
            return Err(EntityRejection::OutOfBounds { x, y });
        }
        if !speed.is_finite() || speed < 0.0 {
            return Err(EntityRejection::InvalidSpeed(speed));
        }
        if !direction.is_finite() {
            return Err(EntityRejection::InvalidDirection(direction));
        }

        let name = name.into();
        let is_ball = is_ball_name(&name);
        Ok(Self { name, team: team.into(), x, y, speed, direction: wrap_degrees(direction), is_ball })
    }

    pub fn from_record(record: &NormalizedRecord, field: &FieldSpec) -> Result<Self, EntityRejection> {
        Self::new(
            record.entity_name.as_str(),
            record.team_label.as_str(),
            record.x,
            record.y,
            record.speed,
            record.direction,
            field,
        )
    }
}

/// Wrap a finite heading into `[0, 360)`.
///
/// `rem_euclid` rounds tiny negative inputs up to exactly 360.
fn wrap_degrees(direction: f64) -> f64 {
    let wrapped = direction.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// An entity placed on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEntity {
    pub state: EntityState,
    pub position: Point2<f64>,
    pub motion: Vector2<f64>,
    /// `None` for the ball
    pub side: Option<TeamSide>,
    pub color: Rgb,
}

impl RenderEntity {
    /// Arrow tip in screen space
    pub fn motion_tip(&self) -> Point2<f64> {
        self.position + self.motion
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YardLine {
    pub yard: u32,
    pub x_px: f64,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub frame_global_id: FrameGlobalId,
    pub caption: Option<String>,
    pub field_lines: Vec<YardLine>,
    /// Players only, in rendering order
    pub entities: Vec<RenderEntity>,
    pub ball_entity: Option<RenderEntity>,
    /// Entities left out by per-entity validation
    pub skipped_entities: usize,
}

/// Yard lines every ten yards across the whole field, end zones included
pub fn field_lines(mapper: &CoordinateMapper) -> Vec<YardLine> {
    let last = mapper.field().width_units.floor().max(0.0) as u32;
    (0..=last)
        .step_by(YARD_LINE_SPACING as usize)
        .map(|yard| YardLine { yard, x_px: mapper.yard_line_x(f64::from(yard)) })
        .collect()
}

/// Builds render frames for one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameComposer {
    mapper: CoordinateMapper,
    palette: Palette,
}

impl Default for FrameComposer {
    fn default() -> Self {
        Self::new(CoordinateMapper::default(), Palette::default())
    }
}

impl FrameComposer {
    pub fn new(mapper: CoordinateMapper, palette: Palette) -> Self {
        Self { mapper, palette }
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Empty frame with field lines only
    pub fn blank(&self, frame_global_id: FrameGlobalId, caption: Option<String>) -> RenderFrame {
        RenderFrame {
            frame_global_id,
            caption,
            field_lines: field_lines(&self.mapper),
            entities: Vec::new(),
            ball_entity: None,
            skipped_entities: 0,
        }
    }

    /// Place one validated entity. Balls get no side.
    pub fn place(&self, state: EntityState, side: Option<TeamSide>) -> RenderEntity {
        let position = self.mapper.project(state.x, state.y);
        let motion = self.mapper.motion(state.speed, state.direction);
        let color = match side {
            Some(side) => self.palette.side(side),
            None => self.palette.ball,
        };
        RenderEntity { state, position, motion, side, color }
    }

    /// Add an entity to a frame: the first ball fills `ball_entity`, further
    /// balls are skipped.
    pub fn push(&self, frame: &mut RenderFrame, state: EntityState, side: TeamSide) {
        if state.is_ball {
            if frame.ball_entity.is_some() {
                log::debug!("Frame {}: extra ball entity skipped", frame.frame_global_id);
                frame.skipped_entities += 1;
            } else {
                frame.ball_entity = Some(self.place(state, None));
            }
        } else {
            frame.entities.push(self.place(state, Some(side)));
        }
    }

    /// Compose a playback frame.
    ///
    /// Home is the team of the frame's first entity in rendering order, taken
    /// before validation, and recomputed for every frame.
    pub fn compose(&self, frame: &AnimationFrame) -> RenderFrame {
        let mut out = self.blank(frame.id, Some(format!("Frame: {}", frame.id)));
        let home = frame.home_team().unwrap_or_default();

        for record in &frame.entities {
            match EntityState::from_record(record, self.mapper.field()) {
                Ok(state) => {
                    let side = if state.team == home { TeamSide::Home } else { TeamSide::Away };
                    self.push(&mut out, state, side);
                }
                Err(rejection) => {
                    log::debug!(
                        "Frame {}: skipping {} (row {}): {}",
                        frame.id,
                        record.entity_name,
                        record.source_row,
                        rejection
                    );
                    out.skipped_entities += 1;
                }
            }
        }
        out
    }
}
