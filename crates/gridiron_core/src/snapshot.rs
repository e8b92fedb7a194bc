//! Manual snapshot view
//!
//! A single still frame assembled by hand: two explicitly named teams, an
//! optional ball and a free-text caption. Team A always gets the home color
//! and team B the away color; there is no first-entity heuristic here.

use crate::coords::{CoordinateMapper, FieldSpec};
use crate::ingest::BALL_NAME;
use crate::render::{EntityRejection, EntityState, FrameComposer, Palette, RenderFrame, TeamSide};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Caption used when no extra text was given
pub const NO_EXTRA_INFO: &str = "[No extra info]";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("field `{0}` is required")]
    MissingField(&'static str),

    #[error("field `{field}` must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("ball ({x}, {y}) heading {direction} is outside the field")]
    BallOutOfBounds { x: f64, y: f64, direction: f64 },

    #[error("invalid ball: {0}")]
    InvalidBall(#[from] EntityRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSlot {
    A,
    B,
}

impl TeamSlot {
    pub fn label(self) -> &'static str {
        match self {
            TeamSlot::A => "Team A",
            TeamSlot::B => "Team B",
        }
    }

    pub fn side(self) -> TeamSide {
        match self {
            TeamSlot::A => TeamSide::Home,
            TeamSlot::B => TeamSide::Away,
        }
    }
}

/// One hand-entered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub direction: f64,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, SnapshotError> {
    let value = value.trim();
    if value.is_empty() {
        Err(SnapshotError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn number(field: &'static str, value: &str) -> Result<f64, SnapshotError> {
    let value = required(field, value)?;
    value
        .parse::<f64>()
        .map_err(|_| SnapshotError::InvalidNumber { field, value: value.to_string() })
}

fn parse_ball(x: &str, y: &str, speed: &str, direction: &str) -> Result<(f64, f64, f64, f64), SnapshotError> {
    Ok((number("x", x)?, number("y", y)?, number("speed", speed)?, number("direction", direction)?))
}

impl PlayerEntry {
    /// Parse form fields. Every field is required; presence is checked for all
    /// fields before any number is parsed.
    pub fn parse(name: &str, x: &str, y: &str, speed: &str, direction: &str) -> Result<Self, SnapshotError> {
        let name = required("name", name)?;
        for (field, value) in [("x", x), ("y", y), ("speed", speed), ("direction", direction)] {
            required(field, value)?;
        }
        Ok(Self {
            name: name.to_string(),
            x: number("x", x)?,
            y: number("y", y)?,
            speed: number("speed", speed)?,
            direction: number("direction", direction)?,
        })
    }
}

/// `name,x,y,speed,direction`
impl FromStr for PlayerEntry {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(5, ',');
        let mut next = || parts.next().unwrap_or("");
        let (name, x, y, speed, direction) = (next(), next(), next(), next(), next());
        Self::parse(name, x, y, speed, direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallInput {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub direction: f64,
}

/// Serialized form of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotInput {
    pub team_a: Vec<PlayerEntry>,
    pub team_b: Vec<PlayerEntry>,
    pub ball: Option<BallInput>,
    pub extra: String,
}

impl SnapshotInput {
    /// Builder holding this input. A rejected ball is returned alongside; the
    /// builder is still usable and renders without a ball.
    pub fn into_builder(self, field: FieldSpec) -> (SnapshotBuilder, Option<SnapshotError>) {
        let mut builder = SnapshotBuilder::with_field(field);
        for player in self.team_a {
            builder.add_player(TeamSlot::A, player);
        }
        for player in self.team_b {
            builder.add_player(TeamSlot::B, player);
        }
        builder.set_extra(self.extra);

        let ball_error = self
            .ball
            .and_then(|ball| builder.set_ball(ball.x, ball.y, ball.speed, ball.direction).err());
        (builder, ball_error)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    field: FieldSpec,
    team_a: Vec<PlayerEntry>,
    team_b: Vec<PlayerEntry>,
    ball: Option<EntityState>,
    extra: String,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::with_field(FieldSpec::default())
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(field: FieldSpec) -> Self {
        Self { field, team_a: Vec::new(), team_b: Vec::new(), ball: None, extra: String::new() }
    }

    pub fn add_player(&mut self, slot: TeamSlot, player: PlayerEntry) -> &mut Self {
        match slot {
            TeamSlot::A => self.team_a.push(player),
            TeamSlot::B => self.team_b.push(player),
        }
        self
    }

    pub fn players(&self, slot: TeamSlot) -> &[PlayerEntry] {
        match slot {
            TeamSlot::A => &self.team_a,
            TeamSlot::B => &self.team_b,
        }
    }

    /// Set the ball. On failure any previous ball is cleared.
    pub fn set_ball(&mut self, x: f64, y: f64, speed: f64, direction: f64) -> Result<(), SnapshotError> {
        self.ball = None;
        if !self.field.contains(x, y) || !(0.0..=360.0).contains(&direction) {
            log::warn!("Snapshot ball rejected: ({x}, {y}) heading {direction}");
            return Err(SnapshotError::BallOutOfBounds { x, y, direction });
        }
        let ball = EntityState::new(BALL_NAME, "", x, y, speed, direction, &self.field)?;
        self.ball = Some(ball);
        Ok(())
    }

    /// Text-form variant of `set_ball`; a parse failure also clears the ball.
    pub fn set_ball_text(&mut self, x: &str, y: &str, speed: &str, direction: &str) -> Result<(), SnapshotError> {
        match parse_ball(x, y, speed, direction) {
            Ok((x, y, speed, direction)) => self.set_ball(x, y, speed, direction),
            Err(err) => {
                self.ball = None;
                Err(err)
            }
        }
    }

    pub fn clear_ball(&mut self) {
        self.ball = None;
    }

    pub fn ball(&self) -> Option<&EntityState> {
        self.ball.as_ref()
    }

    pub fn set_extra(&mut self, extra: impl Into<String>) -> &mut Self {
        self.extra = extra.into();
        self
    }

    pub fn caption(&self) -> &str {
        if self.extra.is_empty() {
            NO_EXTRA_INFO
        } else {
            &self.extra
        }
    }

    /// Render as frame 0: team A, then team B, then the ball.
    pub fn render(&self, mapper: &CoordinateMapper, palette: &Palette) -> RenderFrame {
        let composer = FrameComposer::new(*mapper, *palette);
        let mut frame = composer.blank(0, Some(self.caption().to_string()));

        for slot in [TeamSlot::A, TeamSlot::B] {
            for player in self.players(slot) {
                let state = EntityState::new(
                    player.name.as_str(),
                    slot.label(),
                    player.x,
                    player.y,
                    player.speed,
                    player.direction,
                    mapper.field(),
                );
                match state {
                    Ok(mut state) => {
                        // a hand-entered player named like the ball is still a player
                        state.is_ball = false;
                        composer.push(&mut frame, state, slot.side());
                    }
                    Err(rejection) => {
                        log::debug!("Snapshot: skipping {}: {}", player.name, rejection);
                        frame.skipped_entities += 1;
                    }
                }
            }
        }

        if let Some(ball) = &self.ball {
            frame.ball_entity = Some(composer.place(ball.clone(), None));
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::render::Rgb;

    fn entry(name: &str, x: f64, y: f64) -> PlayerEntry {
        PlayerEntry { name: name.into(), x, y, speed: 3.0, direction: 90.0 }
    }

    fn render(builder: &SnapshotBuilder) -> RenderFrame {
        let cfg = EngineConfig::snapshot();
        builder.render(&cfg.mapper(), &cfg.palette)
    }

    #[test]
    fn test_parse_requires_every_field() {
        assert_eq!(PlayerEntry::parse("  ", "1", "2", "3", "4"), Err(SnapshotError::MissingField("name")));
        assert_eq!(PlayerEntry::parse("Kelce", "1", "2", "", "abc"), Err(SnapshotError::MissingField("speed")));
        assert_eq!(
            PlayerEntry::parse("Kelce", "1", "two", "3", "4"),
            Err(SnapshotError::InvalidNumber { field: "y", value: "two".into() })
        );

        let player = PlayerEntry::parse(" Kelce ", " 10.5", "20", "3", "45").unwrap();
        assert_eq!(player.name, "Kelce");
        assert!((player.x - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_str() {
        let player: PlayerEntry = "Hill,30,12.5,8,270".parse().unwrap();
        assert_eq!(player.name, "Hill");
        assert!((player.direction - 270.0).abs() < 1e-9);
        assert_eq!("Hill,30".parse::<PlayerEntry>(), Err(SnapshotError::MissingField("y")));
    }

    #[test]
    fn test_teams_get_fixed_colors_in_order() {
        let mut builder = SnapshotBuilder::new();
        builder.add_player(TeamSlot::B, entry("b1", 50.0, 10.0));
        builder.add_player(TeamSlot::A, entry("a1", 40.0, 10.0));
        builder.add_player(TeamSlot::A, entry("a2", 45.0, 10.0));

        let frame = render(&builder);
        let names: Vec<_> = frame.entities.iter().map(|e| e.state.name.as_str()).collect();
        assert_eq!(names, ["a1", "a2", "b1"]);
        assert_eq!(frame.entities[0].color, Rgb::RED);
        assert_eq!(frame.entities[2].color, Rgb::BLUE);
        assert_eq!(frame.entities[2].side, Some(TeamSide::Away));
        assert_eq!(frame.frame_global_id, 0);
    }

    #[test]
    fn test_caption_defaults() {
        let mut builder = SnapshotBuilder::new();
        assert_eq!(render(&builder).caption.as_deref(), Some(NO_EXTRA_INFO));
        builder.set_extra("3rd and 7");
        assert_eq!(render(&builder).caption.as_deref(), Some("3rd and 7"));
    }

    #[test]
    fn test_ball_out_of_bounds_clears_ball() {
        let mut builder = SnapshotBuilder::new();
        builder.set_ball(60.0, 26.0, 5.0, 0.0).unwrap();
        assert!(builder.ball().is_some());

        let err = builder.set_ball(121.0, 26.0, 5.0, 0.0).unwrap_err();
        assert!(matches!(err, SnapshotError::BallOutOfBounds { .. }));
        assert!(builder.ball().is_none());
        assert!(builder.set_ball(60.0, 26.0, 5.0, 361.0).is_err());
        assert!(render(&builder).ball_entity.is_none());
    }

    #[test]
    fn test_ball_uses_snapshot_scale_and_color() {
        let mut builder = SnapshotBuilder::new();
        builder.set_ball(60.0, 26.65, 5.0, 0.0).unwrap();
        let frame = render(&builder);
        let ball = frame.ball_entity.unwrap();
        assert_eq!(ball.color, Rgb::SADDLE_BROWN);
        assert!((ball.motion.x - 10.0).abs() < 1e-9);
        assert!(ball.motion.y.abs() < 1e-9);
    }

    #[test]
    fn test_ball_text_parse_failure_clears_ball() {
        let mut builder = SnapshotBuilder::new();
        builder.set_ball(60.0, 26.0, 5.0, 0.0).unwrap();
        let err = builder.set_ball_text("x", "26", "5", "0").unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidNumber { field: "x", .. }));
        assert!(builder.ball().is_none());
        builder.set_ball_text("10", "20", "1", "180").unwrap();
        assert!(builder.ball().is_some());
    }

    #[test]
    fn test_out_of_field_players_are_skipped() {
        let mut builder = SnapshotBuilder::new();
        builder.add_player(TeamSlot::A, entry("in", 10.0, 10.0));
        builder.add_player(TeamSlot::A, entry("out", -1.0, 10.0));
        let frame = render(&builder);
        assert_eq!(frame.entities.len(), 1);
        assert_eq!(frame.skipped_entities, 1);
    }

    #[test]
    fn test_input_from_json() {
        let input: SnapshotInput = serde_json::from_str(
            r#"{
                "team_a": [{"name": "QB", "x": 30, "y": 26, "speed": 0, "direction": 0}],
                "team_b": [{"name": "LB", "x": 35, "y": 26, "speed": 2, "direction": 180}],
                "ball": {"x": 500, "y": 26, "speed": 0, "direction": 0},
                "extra": "snap"
            }"#,
        )
        .unwrap();
        let (builder, ball_error) = input.into_builder(FieldSpec::default());
        assert!(matches!(ball_error, Some(SnapshotError::BallOutOfBounds { .. })));

        let frame = render(&builder);
        assert_eq!(frame.entities.len(), 2);
        assert!(frame.ball_entity.is_none());
        assert_eq!(frame.caption.as_deref(), Some("snap"));
    }
}
