use foundation::math::{Ellipsoid, Geodetic, Vec3};

use crate::elevation::{ElevationModel, FlatElevation};
use crate::ray::{Intersection, Ray};

/// Geodesy and elevation queries against the globe model.
pub trait Globe {
    fn point_from_position(&self, position: Geodetic) -> Vec3;

    fn position_from_point(&self, point: Vec3) -> Geodetic;

    /// Terrain height at a location, from the elevation model (not the mesh).
    fn elevation(&self, lat_rad: f64, lon_rad: f64) -> f64;

    fn max_elevation(&self) -> f64;

    /// Intersects `ray` with the globe's ellipsoid raised by `altitude`.
    ///
    /// Hits are ordered nearest-first and never lie behind the ray origin.
    /// `None` when the ray misses.
    fn intersect(&self, ray: &Ray, altitude: f64) -> Option<Vec<Intersection>>;
}

/// Ellipsoid of revolution carrying an elevation model.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipsoidGlobe<E> {
    ellipsoid: Ellipsoid,
    elevations: E,
}

impl EllipsoidGlobe<FlatElevation> {
    pub fn wgs84() -> Self {
        Self::new(Ellipsoid::WGS84, FlatElevation(0.0))
    }
}

impl<E: ElevationModel> EllipsoidGlobe<E> {
    pub fn new(ellipsoid: Ellipsoid, elevations: E) -> Self {
        Self {
            ellipsoid,
            elevations,
        }
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    pub fn elevations(&self) -> &E {
        &self.elevations
    }
}

impl<E: ElevationModel> Globe for EllipsoidGlobe<E> {
    fn point_from_position(&self, position: Geodetic) -> Vec3 {
        self.ellipsoid.to_cartesian(position)
    }

    fn position_from_point(&self, point: Vec3) -> Geodetic {
        self.ellipsoid.to_geodetic(point)
    }

    fn elevation(&self, lat_rad: f64, lon_rad: f64) -> f64 {
        self.elevations.elevation(lat_rad, lon_rad)
    }

    fn max_elevation(&self) -> f64 {
        self.elevations.max_elevation()
    }

    fn intersect(&self, ray: &Ray, altitude: f64) -> Option<Vec<Intersection>> {
        intersect_ellipsoid(
            ray,
            self.ellipsoid.a + altitude,
            self.ellipsoid.b + altitude,
        )
    }
}

/// Intersects a ray with an axis-aligned ellipsoid of equatorial radius
/// `equatorial` and polar radius `polar`, centered at the origin.
///
/// A ray starting outside yields the near and far hits; one starting inside
/// yields only the exit. Hits behind the origin are dropped.
pub fn intersect_ellipsoid(ray: &Ray, equatorial: f64, polar: f64) -> Option<Vec<Intersection>> {
    if equatorial <= 0.0 || polar <= 0.0 {
        return None;
    }

    // Stretch z so the ellipsoid becomes a sphere of radius `equatorial`;
    // the ray parameter is unchanged by the linear map.
    let m = equatorial / polar;
    let m2 = m * m;
    let o = ray.origin;
    let d = ray.dir;

    let a = d.x * d.x + d.y * d.y + d.z * d.z * m2;
    let b = 2.0 * (o.x * d.x + o.y * d.y + o.z * d.z * m2);
    let c = o.x * o.x + o.y * o.y + o.z * o.z * m2 - equatorial * equatorial;
    if a <= 0.0 {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let speed = d.length();
    let hit = |t: f64, tangent: bool| {
        let point = ray.point_at(t);
        if tangent {
            Intersection::tangent(point, t * speed)
        } else {
            Intersection::new(point, t * speed)
        }
    };

    let root = discriminant.sqrt();
    let hits: Vec<Intersection> = if discriminant == 0.0 {
        vec![hit(-b / (2.0 * a), true)]
    } else {
        let near = (-b - root) / (2.0 * a);
        let far = (-b + root) / (2.0 * a);
        if c >= 0.0 {
            vec![hit(near, false), hit(far, false)]
        } else {
            vec![hit(far, false)]
        }
    };

    let hits: Vec<Intersection> = hits.into_iter().filter(|h| h.distance >= 0.0).collect();
    if hits.is_empty() { None } else { Some(hits) }
}
