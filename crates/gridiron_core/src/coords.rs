//! Field-space to screen-space mapping
//!
//! ## Coordinate Systems
//!
//! **Field coordinates** (tracking data, yards):
//! - X: 0 = back of the left end zone, 120 = back of the right end zone
//! - Y: 0 = near sideline, 53.3 = far sideline
//!
//! **Screen coordinates** (pixels):
//! - X grows right, Y grows down, origin at the top-left corner.
//!
//! Headings follow the navigational convention of the tracking feed: 0° points
//! along +x and angles grow counterclockwise, so the screen y component of a
//! motion vector is negated.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Field length including both end zones (yards)
pub const FIELD_WIDTH_UNITS: f64 = 120.0;
/// Field width sideline to sideline (yards)
pub const FIELD_HEIGHT_UNITS: f64 = 53.3;

pub const DEFAULT_SCREEN_WIDTH_PX: f64 = 960.0;
pub const DEFAULT_SCREEN_HEIGHT_PX: f64 = 400.0;

/// Arrow scale for dense multi-frame replay
pub const CONTINUOUS_VECTOR_SCALE: f64 = 0.5;
/// Arrow scale for the sparse single-snapshot view
pub const SNAPSHOT_VECTOR_SCALE: f64 = 2.0;

/// Spacing of the drawn yard lines
pub const YARD_LINE_SPACING: u32 = 10;

/// Linear scale from field units to pixels. No clamping.
pub fn to_screen(
    x: f64,
    y: f64,
    field_width_units: f64,
    field_height_units: f64,
    screen_width_px: f64,
    screen_height_px: f64,
) -> (f64, f64) {
    (x / field_width_units * screen_width_px, y / field_height_units * screen_height_px)
}

/// Screen-space motion arrow for a heading in degrees.
pub fn direction_vector(speed: f64, direction_degrees: f64, scale: f64) -> (f64, f64) {
    let rad = direction_degrees.to_radians();
    (rad.cos() * speed * scale, -rad.sin() * speed * scale)
}

/// Playable field bounds in field units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub width_units: f64,
    pub height_units: f64,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self { width_units: FIELD_WIDTH_UNITS, height_units: FIELD_HEIGHT_UNITS }
    }
}

impl FieldSpec {
    /// Inclusive bounds check; NaN is never inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width_units).contains(&x) && (0.0..=self.height_units).contains(&y)
    }
}

/// Output surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSpec {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for ScreenSpec {
    fn default() -> Self {
        Self { width_px: DEFAULT_SCREEN_WIDTH_PX, height_px: DEFAULT_SCREEN_HEIGHT_PX }
    }
}

/// Field bounds, screen size and arrow scale bundled for one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    field: FieldSpec,
    screen: ScreenSpec,
    vector_scale: f64,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CoordinateMapper {
    pub fn new(field: FieldSpec, screen: ScreenSpec, vector_scale: f64) -> Self {
        Self { field, screen, vector_scale }
    }

    pub fn builder() -> CoordinateMapperBuilder {
        CoordinateMapperBuilder::default()
    }

    pub fn field(&self) -> &FieldSpec {
        &self.field
    }

    pub fn screen(&self) -> &ScreenSpec {
        &self.screen
    }

    pub fn vector_scale(&self) -> f64 {
        self.vector_scale
    }

    /// Field position to pixel position
    pub fn project(&self, x: f64, y: f64) -> Point2<f64> {
        let (px, py) = to_screen(
            x,
            y,
            self.field.width_units,
            self.field.height_units,
            self.screen.width_px,
            self.screen.height_px,
        );
        Point2::new(px, py)
    }

    /// Motion arrow in pixels, relative to the projected position
    pub fn motion(&self, speed: f64, direction_degrees: f64) -> Vector2<f64> {
        let (dx, dy) = direction_vector(speed, direction_degrees, self.vector_scale);
        Vector2::new(dx, dy)
    }

    /// Screen x of a vertical yard line
    pub fn yard_line_x(&self, yard: f64) -> f64 {
        yard / self.field.width_units * self.screen.width_px
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapperBuilder {
    field: FieldSpec,
    screen: ScreenSpec,
    vector_scale: f64,
}

impl Default for CoordinateMapperBuilder {
    fn default() -> Self {
        Self {
            field: FieldSpec::default(),
            screen: ScreenSpec::default(),
            vector_scale: CONTINUOUS_VECTOR_SCALE,
        }
    }
}

impl CoordinateMapperBuilder {
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.field = field;
        self
    }

    pub fn screen_size(mut self, width_px: f64, height_px: f64) -> Self {
        self.screen = ScreenSpec { width_px, height_px };
        self
    }

    pub fn vector_scale(mut self, scale: f64) -> Self {
        self.vector_scale = scale;
        self
    }

    pub fn build(self) -> CoordinateMapper {
        CoordinateMapper::new(self.field, self.screen, self.vector_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_to_screen_is_linear() {
        let (px, py) = to_screen(60.0, 26.65, 120.0, 53.3, 960.0, 400.0);
        assert!((px - 480.0).abs() < EPS);
        assert!((py - 200.0).abs() < EPS);

        let (px, py) = to_screen(120.0, 53.3, 120.0, 53.3, 960.0, 400.0);
        assert!((px - 960.0).abs() < EPS);
        assert!((py - 400.0).abs() < EPS);
    }

    #[test]
    fn test_to_screen_does_not_clamp() {
        let (px, _) = to_screen(130.0, 0.0, 120.0, 53.3, 960.0, 400.0);
        assert!(px > 960.0);
    }

    #[test]
    fn test_direction_zero_points_right() {
        let (dx, dy) = direction_vector(10.0, 0.0, 0.5);
        assert!((dx - 5.0).abs() < EPS);
        assert!(dy.abs() < EPS);
    }

    #[test]
    fn test_direction_ninety_points_up_on_screen() {
        let (dx, dy) = direction_vector(10.0, 90.0, 0.5);
        assert!(dx.abs() < 1e-6);
        assert!((dy + 5.0).abs() < EPS);
    }

    #[test]
    fn test_snapshot_scale_quadruples_arrow() {
        let continuous = CoordinateMapper::default().motion(3.0, 45.0);
        let snapshot = CoordinateMapper::builder().vector_scale(SNAPSHOT_VECTOR_SCALE).build().motion(3.0, 45.0);
        assert!((snapshot.norm() - continuous.norm() * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_field_bounds_are_inclusive() {
        let field = FieldSpec::default();
        assert!(field.contains(0.0, 0.0));
        assert!(field.contains(120.0, 53.3));
        assert!(!field.contains(120.01, 10.0));
        assert!(!field.contains(10.0, -0.1));
        assert!(!field.contains(f64::NAN, 10.0));
    }

    #[test]
    fn test_builder_screen_size() {
        let mapper = CoordinateMapper::builder().screen_size(1200.0, 533.0).build();
        let p = mapper.project(120.0, 53.3);
        assert!((p.x - 1200.0).abs() < EPS);
        assert!((p.y - 533.0).abs() < 1e-6);
        assert!((mapper.yard_line_x(60.0) - 600.0).abs() < EPS);
    }
}
