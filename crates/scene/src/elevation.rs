use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic rectangle in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub min_lat_deg: f64,
    pub max_lat_deg: f64,
    pub min_lon_deg: f64,
    pub max_lon_deg: f64,
}

impl Sector {
    pub fn new(min_lat_deg: f64, max_lat_deg: f64, min_lon_deg: f64, max_lon_deg: f64) -> Self {
        Self {
            min_lat_deg,
            max_lat_deg,
            min_lon_deg,
            max_lon_deg,
        }
    }

    /// Inclusive of the edges, with slack for degree/radian round trips.
    pub fn contains(&self, lat_rad: f64, lon_rad: f64) -> bool {
        const EDGE_SLACK_DEG: f64 = 1e-9;
        let lat = lat_rad.to_degrees();
        let lon = lon_rad.to_degrees();
        (self.min_lat_deg - EDGE_SLACK_DEG..=self.max_lat_deg + EDGE_SLACK_DEG).contains(&lat)
            && (self.min_lon_deg - EDGE_SLACK_DEG..=self.max_lon_deg + EDGE_SLACK_DEG)
                .contains(&lon)
    }

    /// Normalized `(u, v)` of a location: `u` runs west to east, `v` south to north.
    pub fn normalized(&self, lat_rad: f64, lon_rad: f64) -> (f64, f64) {
        let u = (lon_rad.to_degrees() - self.min_lon_deg) / (self.max_lon_deg - self.min_lon_deg);
        let v = (lat_rad.to_degrees() - self.min_lat_deg) / (self.max_lat_deg - self.min_lat_deg);
        (u, v)
    }

    fn is_valid(&self) -> bool {
        self.min_lat_deg < self.max_lat_deg
            && self.min_lon_deg < self.max_lon_deg
            && self.min_lat_deg >= -90.0
            && self.max_lat_deg <= 90.0
    }
}

/// Height of the terrain above the ellipsoid.
pub trait ElevationModel {
    fn elevation(&self, lat_rad: f64, lon_rad: f64) -> f64;

    /// Upper bound of every value `elevation` can return.
    fn max_elevation(&self) -> f64;
}

/// Constant-height terrain.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FlatElevation(pub f64);

impl ElevationModel for FlatElevation {
    fn elevation(&self, _lat_rad: f64, _lon_rad: f64) -> f64 {
        self.0
    }

    fn max_elevation(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElevationGridError {
    #[error("grid needs at least 2x2 samples, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },
    #[error("expected {expected} height samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },
    #[error("invalid sector {0:?}")]
    InvalidSector(Sector),
}

#[derive(Deserialize)]
struct ElevationGridData {
    sector: Sector,
    rows: usize,
    cols: usize,
    heights: Vec<f64>,
}

/// Regular lat/lon height grid with bilinear interpolation.
///
/// Row 0 is the southern edge, column 0 the western edge. Locations outside
/// the sector sit at height 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ElevationGridData")]
pub struct ElevationGrid {
    sector: Sector,
    rows: usize,
    cols: usize,
    heights: Vec<f64>,
    max: f64,
}

impl ElevationGrid {
    pub fn new(
        sector: Sector,
        rows: usize,
        cols: usize,
        heights: Vec<f64>,
    ) -> Result<Self, ElevationGridError> {
        if rows < 2 || cols < 2 {
            return Err(ElevationGridError::TooSmall { rows, cols });
        }
        if heights.len() != rows * cols {
            return Err(ElevationGridError::SampleCount {
                expected: rows * cols,
                actual: heights.len(),
            });
        }
        if !sector.is_valid() {
            return Err(ElevationGridError::InvalidSector(sector));
        }
        let max = heights.iter().copied().fold(0.0, f64::max);
        Ok(Self {
            sector,
            rows,
            cols,
            heights,
            max,
        })
    }
}

impl TryFrom<ElevationGridData> for ElevationGrid {
    type Error = ElevationGridError;

    fn try_from(data: ElevationGridData) -> Result<Self, Self::Error> {
        ElevationGrid::new(data.sector, data.rows, data.cols, data.heights)
    }
}

impl ElevationModel for ElevationGrid {
    fn elevation(&self, lat_rad: f64, lon_rad: f64) -> f64 {
        if !self.sector.contains(lat_rad, lon_rad) {
            return 0.0;
        }
        let (u, v) = self.sector.normalized(lat_rad, lon_rad);
        bilinear(&self.heights, self.rows, self.cols, u, v)
    }

    fn max_elevation(&self) -> f64 {
        self.max
    }
}

/// Samples a row-major `rows x cols` grid at normalized `(u, v)` in `[0, 1]`.
pub(crate) fn bilinear(samples: &[f64], rows: usize, cols: usize, u: f64, v: f64) -> f64 {
    let fx = u.clamp(0.0, 1.0) * (cols - 1) as f64;
    let fy = v.clamp(0.0, 1.0) * (rows - 1) as f64;
    let c0 = (fx.floor() as usize).min(cols - 2);
    let r0 = (fy.floor() as usize).min(rows - 2);
    let tx = fx - c0 as f64;
    let ty = fy - r0 as f64;

    let h00 = samples[r0 * cols + c0];
    let h01 = samples[r0 * cols + c0 + 1];
    let h10 = samples[(r0 + 1) * cols + c0];
    let h11 = samples[(r0 + 1) * cols + c0 + 1];

    let south = h00 + (h01 - h00) * tx;
    let north = h10 + (h11 - h10) * tx;
    south + (north - south) * ty
}
