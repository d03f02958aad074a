use foundation::math::{Vec2, Vec3};
use scene::{Globe, ScreenPoint, View};

/// Reference points captured on the first drag event of a gesture.
///
/// Every later step of the gesture is measured against these, not against
/// the previous step, so rounding never accumulates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragSession {
    /// Window coordinates (bottom-left origin) of the entity's reference point.
    pub reference_object_point: Vec2,
    /// Pointer location (top-left origin) when the gesture began.
    pub reference_cursor_point: ScreenPoint,
    /// Elevation of the reference point; the fallback sphere's altitude.
    pub reference_altitude: f64,
}

impl DragSession {
    /// Captures a session for an entity whose reference point resolved to
    /// `reference_point`. `None` if the point does not project on screen.
    pub fn capture(
        view: &dyn View,
        globe: &dyn Globe,
        reference_point: Vec3,
        cursor: ScreenPoint,
    ) -> Option<Self> {
        Some(Self {
            reference_object_point: view.project(reference_point)?,
            reference_cursor_point: cursor,
            reference_altitude: globe.position_from_point(reference_point).alt_m,
        })
    }

    /// Pixel delta of `cursor` from the gesture's starting pointer location.
    pub fn cursor_delta(&self, cursor: ScreenPoint) -> (i64, i64) {
        (
            i64::from(cursor.x) - i64::from(self.reference_cursor_point.x),
            i64::from(cursor.y) - i64::from(self.reference_cursor_point.y),
        )
    }

    /// Pointer coordinates (top-left origin) where the entity's reference
    /// point should appear when the pointer is at `cursor`.
    pub fn target_screen_point(&self, cursor: ScreenPoint, viewport_height: u32) -> Vec2 {
        let (dx, dy) = self.cursor_delta(cursor);
        Vec2::new(
            self.reference_object_point.x + dx as f64,
            f64::from(viewport_height) - self.reference_object_point.y + dy as f64 - 1.0,
        )
    }
}
