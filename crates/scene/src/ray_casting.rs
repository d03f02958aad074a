//! Ray casting against a globe's elevation model, for when no terrain mesh
//! answers the query.

use foundation::math::{Geodetic, Vec3};

use crate::globe::Globe;
use crate::ray::Ray;

/// Finds where a ray first meets the terrain described by `globe`'s elevations.
///
/// The ray is clipped to the shell bounding all terrain (the ellipsoid raised
/// by `Globe::max_elevation`), then sampled every `sample_length` meters and
/// refined down to `precision` meters.
pub fn intersect_ray_with_terrain(
    globe: &dyn Globe,
    origin: Vec3,
    direction: Vec3,
    sample_length: f64,
    precision: f64,
) -> Option<Geodetic> {
    let ray = Ray::normalized(origin, direction)?;
    let hits = globe.intersect(&ray, globe.max_elevation())?;

    let (start, end) = match hits.as_slice() {
        [] => return None,
        // Inside the shell, or grazing it: march from the eye.
        [only] => (origin, only.point),
        [near, far, ..] => (near.point, far.point),
    };

    let point = intersect_segment_with_terrain(globe, start, end, sample_length, precision)?;
    Some(globe.position_from_point(point))
}

/// Upper bound on samples taken along one segment at one refinement level.
pub const MAX_SEGMENT_SAMPLES: usize = 10_000;

/// Samples the segment `p1 -> p2` and returns the first sample at or below the
/// terrain, refined recursively while `sample_length > precision`.
pub fn intersect_segment_with_terrain(
    globe: &dyn Globe,
    p1: Vec3,
    p2: Vec3,
    sample_length: f64,
    precision: f64,
) -> Option<Vec3> {
    if sample_length.is_nan() || sample_length <= 0.0 {
        return None;
    }

    let length = p1.distance_to(p2);
    let dir = (p2 - p1).normalize().unwrap_or(Vec3::ZERO);

    // Long segments are sampled more coarsely than asked rather than without bound.
    let steps = (length / sample_length).ceil().min(MAX_SEGMENT_SAMPLES as f64) as usize;
    let step = if steps == 0 { 0.0 } else { length / steps as f64 };

    let mut last_above: Option<Vec3> = None;
    let mut hit: Option<Vec3> = None;
    for i in 0..=steps {
        let sample = if i == steps { p2 } else { p1 + dir * (step * i as f64) };
        let pos = globe.position_from_point(sample);
        if pos.alt_m <= globe.elevation(pos.lat_rad, pos.lon_rad) {
            hit = Some(sample);
            break;
        }
        last_above = Some(sample);
    }

    match (hit, last_above) {
        (Some(point), Some(above)) if sample_length > precision => Some(
            intersect_segment_with_terrain(globe, above, point, sample_length / 10.0, precision)
                .unwrap_or(point),
        ),
        (hit, _) => hit,
    }
}
