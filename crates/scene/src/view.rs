use foundation::math::{Ellipsoid, Geodetic, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::ray::Ray;

/// Pointer location in pixels, origin at the top-left of the viewport.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Camera queries used to map between the screen and the world.
///
/// Coordinate conventions:
/// - `project` returns window coordinates with the origin at the
///   bottom-left (y grows upward).
/// - `ray_from_screen_point` takes pointer coordinates with the origin at the
///   top-left (y grows downward).
pub trait View {
    /// Window coordinates of a world point; `None` if it is behind the eye.
    fn project(&self, point: Vec3) -> Option<Vec2>;

    /// Ray from the eye through a pointer location.
    fn ray_from_screen_point(&self, x: f64, y: f64) -> Option<Ray>;

    fn eye_position(&self) -> Geodetic;

    fn viewport_height(&self) -> u32;
}

/// Symmetric perspective camera looking at a point on the globe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveView {
    eye: Geodetic,
    eye_point: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    tan_half_fov: f64,
    width: u32,
    height: u32,
}

impl PerspectiveView {
    /// Camera at `eye` aimed at `target`, with vertical field of view
    /// `fov_y_deg` and a `width x height` viewport.
    ///
    /// `None` when the eye and target coincide or the viewport is empty.
    pub fn look_at(
        ellipsoid: &Ellipsoid,
        eye: Geodetic,
        target: Geodetic,
        fov_y_deg: f64,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        if width == 0 || height == 0 || fov_y_deg.is_nan() || fov_y_deg <= 0.0 || fov_y_deg >= 180.0 {
            return None;
        }

        let eye_point = ellipsoid.to_cartesian(eye);
        let forward = (ellipsoid.to_cartesian(target) - eye_point).normalize()?;

        // Keep north up on screen unless looking along the polar axis.
        let z = Vec3::new(0.0, 0.0, 1.0);
        let world_up = if forward.cross(z).length() < 1e-9 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            z
        };
        let right = forward.cross(world_up).normalize()?;
        let up = right.cross(forward);

        Some(Self {
            eye,
            eye_point,
            forward,
            right,
            up,
            tan_half_fov: (fov_y_deg.to_radians() * 0.5).tan(),
            width,
            height,
        })
    }

    fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl View for PerspectiveView {
    fn project(&self, point: Vec3) -> Option<Vec2> {
        let d = point - self.eye_point;
        let depth = d.dot(self.forward);
        if depth <= 0.0 {
            return None;
        }

        let x_ndc = d.dot(self.right) / (depth * self.tan_half_fov * self.aspect());
        let y_ndc = d.dot(self.up) / (depth * self.tan_half_fov);
        Some(Vec2::new(
            (x_ndc + 1.0) * 0.5 * self.width as f64,
            (y_ndc + 1.0) * 0.5 * self.height as f64,
        ))
    }

    fn ray_from_screen_point(&self, x: f64, y: f64) -> Option<Ray> {
        let y_window = self.height as f64 - y - 1.0;
        let x_ndc = 2.0 * x / self.width as f64 - 1.0;
        let y_ndc = 2.0 * y_window / self.height as f64 - 1.0;

        let dir = self.forward
            + self.right * (x_ndc * self.tan_half_fov * self.aspect())
            + self.up * (y_ndc * self.tan_half_fov);
        Ray::normalized(self.eye_point, dir)
    }

    fn eye_position(&self) -> Geodetic {
        self.eye
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }
}
