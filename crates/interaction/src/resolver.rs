use foundation::math::Geodetic;
use scene::ray_casting::intersect_ray_with_terrain;
use scene::{Globe, Ray, Terrain, View};
use tracing::trace;

use crate::config::DragConfig;

/// Maps a pick ray to the geodetic position it designates on the globe.
///
/// Strategies, in order:
/// 1. Near the surface: the rendered terrain mesh, then a march through the
///    globe's elevation model.
/// 2. A sphere at the reference altitude, which answers from any altitude.
#[derive(Clone, Copy)]
pub struct TerrainRayResolver<'a> {
    view: &'a dyn View,
    globe: &'a dyn Globe,
    terrain: Option<&'a dyn Terrain>,
    config: DragConfig,
}

impl<'a> TerrainRayResolver<'a> {
    pub fn new(
        view: &'a dyn View,
        globe: &'a dyn Globe,
        terrain: Option<&'a dyn Terrain>,
        config: DragConfig,
    ) -> Self {
        Self {
            view,
            globe,
            terrain,
            config,
        }
    }

    /// `None` when every strategy misses.
    pub fn resolve(&self, ray: &Ray, reference_altitude: f64) -> Option<Geodetic> {
        self.terrain_hit(ray)
            .or_else(|| self.sphere_hit(ray, reference_altitude))
    }

    /// Loaded terrain may be coarse or missing when seen from high above.
    pub fn is_near_surface(&self) -> bool {
        self.view.eye_position().alt_m < self.globe.max_elevation() * self.config.near_surface_factor
    }

    fn terrain_hit(&self, ray: &Ray) -> Option<Geodetic> {
        if !self.is_near_surface() {
            return None;
        }

        let mesh_hit = self
            .terrain
            .and_then(|terrain| terrain.intersect(ray))
            .and_then(|hits| hits.first().copied());
        if let Some(hit) = mesh_hit {
            return Some(self.globe.position_from_point(hit.point));
        }

        trace!("terrain mesh missed; marching elevation model");
        intersect_ray_with_terrain(
            self.globe,
            ray.origin,
            ray.dir,
            self.config.sample_length_m,
            self.config.precision_m,
        )
    }

    fn sphere_hit(&self, ray: &Ray, reference_altitude: f64) -> Option<Geodetic> {
        let hits = self.globe.intersect(ray, reference_altitude)?;
        let first = hits.first()?;
        Some(self.globe.position_from_point(first.point))
    }
}
