use foundation::bounds::Aabb3;
use foundation::math::{Ellipsoid, Geodetic, Vec3};
use tracing::debug;

use crate::elevation::{ElevationModel, Sector, bilinear};
use crate::globe::EllipsoidGlobe;
use crate::ray::{Intersection, Ray, intersect_triangle, sort_nearest_first};
use crate::spatial::{Bvh, Item as BvhItem};

/// Queries against the terrain geometry currently loaded for display.
pub trait Terrain {
    /// World point `position.alt_m` meters above the terrain surface at the
    /// position's latitude and longitude. `None` where no geometry is loaded.
    fn surface_point(&self, position: Geodetic) -> Option<Vec3>;

    /// Hits of `ray` with the terrain mesh, nearest-first. `None` on a miss.
    fn intersect(&self, ray: &Ray) -> Option<Vec<Intersection>>;
}

/// A single tessellated terrain tile covering `sector`.
///
/// Vertices sample the globe's elevation model on a regular `rows x cols`
/// grid; triangles are indexed by a BVH for ray queries.
#[derive(Debug, Clone)]
pub struct MeshTerrain {
    ellipsoid: Ellipsoid,
    sector: Sector,
    rows: usize,
    cols: usize,
    heights: Vec<f64>,
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bvh: Bvh,
}

impl MeshTerrain {
    /// Tessellates `sector` of `globe`. `rows` and `cols` count vertices and
    /// are raised to at least 2.
    pub fn tessellate<E: ElevationModel>(
        globe: &EllipsoidGlobe<E>,
        sector: Sector,
        rows: usize,
        cols: usize,
    ) -> Self {
        let rows = rows.max(2);
        let cols = cols.max(2);
        let ellipsoid = globe.ellipsoid();

        let mut heights = Vec::with_capacity(rows * cols);
        let mut vertices = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let lat_deg = lerp(sector.min_lat_deg, sector.max_lat_deg, r, rows);
            for c in 0..cols {
                let lon_deg = lerp(sector.min_lon_deg, sector.max_lon_deg, c, cols);
                let lat = lat_deg.to_radians();
                let lon = lon_deg.to_radians();
                let h = globe.elevations().elevation(lat, lon);
                heights.push(h);
                vertices.push(ellipsoid.to_cartesian(Geodetic::new(lat, lon, h)));
            }
        }

        let mut triangles = Vec::with_capacity((rows - 1) * (cols - 1) * 2);
        for r in 0..rows - 1 {
            for c in 0..cols - 1 {
                let sw = (r * cols + c) as u32;
                let se = sw + 1;
                let nw = sw + cols as u32;
                let ne = nw + 1;
                triangles.push([sw, se, ne]);
                triangles.push([sw, ne, nw]);
            }
        }

        let items = triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| BvhItem {
                index: i as u32,
                bounds: Aabb3::from_points(&(*tri).map(|v| vertices[v as usize])),
            })
            .collect();
        let bvh = Bvh::build(items);

        debug!(
            rows,
            cols,
            triangles = triangles.len(),
            "tessellated terrain tile"
        );

        Self {
            ellipsoid,
            sector,
            rows,
            cols,
            heights,
            vertices,
            triangles,
            bvh,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Terrain for MeshTerrain {
    fn surface_point(&self, position: Geodetic) -> Option<Vec3> {
        if !self.sector.contains(position.lat_rad, position.lon_rad) {
            return None;
        }
        let (u, v) = self.sector.normalized(position.lat_rad, position.lon_rad);
        let ground = bilinear(&self.heights, self.rows, self.cols, u, v);
        Some(
            self.ellipsoid
                .to_cartesian(position.with_alt(ground + position.alt_m)),
        )
    }

    fn intersect(&self, ray: &Ray) -> Option<Vec<Intersection>> {
        let dir = ray.dir.normalize()?;
        let ray = Ray::new(ray.origin, dir);

        let mut hits: Vec<Intersection> = self
            .bvh
            .candidates(&ray, f64::INFINITY)
            .into_iter()
            .filter_map(|i| {
                let [a, b, c] = self.triangles[i as usize];
                let t = intersect_triangle(
                    &ray,
                    self.vertices[a as usize],
                    self.vertices[b as usize],
                    self.vertices[c as usize],
                )?;
                Some(Intersection::new(ray.point_at(t), t))
            })
            .collect();

        if hits.is_empty() {
            return None;
        }
        sort_nearest_first(&mut hits);
        Some(hits)
    }
}

fn lerp(min: f64, max: f64, i: usize, n: usize) -> f64 {
    min + (max - min) * i as f64 / (n - 1) as f64
}
