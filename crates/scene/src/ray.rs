use foundation::math::Vec3;
use foundation::math::precision::cmp_f64;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Builds a ray with a unit direction; `None` if `dir` has zero length.
    pub fn normalized(origin: Vec3, dir: Vec3) -> Option<Self> {
        Some(Self::new(origin, dir.normalize()?))
    }

    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// A ray hit in world coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub point: Vec3,
    /// Distance from the ray origin along its (unit) direction.
    pub distance: f64,
    /// The ray grazes the surface instead of crossing it.
    pub tangent: bool,
}

impl Intersection {
    pub fn new(point: Vec3, distance: f64) -> Self {
        Self {
            point,
            distance,
            tangent: false,
        }
    }

    pub fn tangent(point: Vec3, distance: f64) -> Self {
        Self {
            point,
            distance,
            tangent: true,
        }
    }
}

/// Orders hits nearest-first. Ties keep their input order.
pub fn sort_nearest_first(hits: &mut [Intersection]) {
    hits.sort_by(|a, b| cmp_f64(a.distance, b.distance));
}

/// Möller–Trumbore ray/triangle test; returns the hit distance along `ray`.
///
/// Back faces are accepted: terrain is hit from either side.
pub fn intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f64> {
    const EPS: f64 = 1e-12;
    const EDGE_TOLERANCE: f64 = 1e-9;

    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}
