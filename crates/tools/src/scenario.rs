use foundation::math::{Ellipsoid, Geodetic};
use interaction::{DragError, SelectEvent};
use scene::prefabs::Placemark;
use scene::{
    ElevationGrid, ElevationModel, EllipsoidGlobe, MeshTerrain, PerspectiveView, SceneObject,
    SceneWindow, ScreenPoint, Sector,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sphere radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
    #[error("camera cannot look from its eye to its target")]
    InvalidCamera,
    #[error(transparent)]
    Drag(#[from] DragError),
}

/// Geodetic position in degrees, as written in scenario files.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDeg {
    pub lat_deg: f64,
    pub lon_deg: f64,
    #[serde(default)]
    pub alt_m: f64,
}

impl From<GeoDeg> for Geodetic {
    fn from(p: GeoDeg) -> Self {
        Geodetic::from_degrees(p.lat_deg, p.lon_deg, p.alt_m)
    }
}

impl From<Geodetic> for GeoDeg {
    fn from(p: Geodetic) -> Self {
        Self {
            lat_deg: p.lat_deg(),
            lon_deg: p.lon_deg(),
            alt_m: p.alt_m,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EllipsoidSpec {
    #[default]
    Wgs84,
    Sphere { radius_m: f64 },
}

impl EllipsoidSpec {
    pub fn ellipsoid(self) -> Result<Ellipsoid, ScenarioError> {
        match self {
            EllipsoidSpec::Wgs84 => Ok(Ellipsoid::WGS84),
            EllipsoidSpec::Sphere { radius_m } if radius_m.is_finite() && radius_m > 0.0 => {
                Ok(Ellipsoid::sphere(radius_m))
            }
            EllipsoidSpec::Sphere { radius_m } => Err(ScenarioError::InvalidRadius(radius_m)),
        }
    }
}

/// Elevation source of the scenario globe.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationSpec {
    Flat(f64),
    Grid(ElevationGrid),
}

impl Default for ElevationSpec {
    fn default() -> Self {
        ElevationSpec::Flat(0.0)
    }
}

impl ElevationModel for ElevationSpec {
    fn elevation(&self, lat_rad: f64, lon_rad: f64) -> f64 {
        match self {
            ElevationSpec::Flat(h) => *h,
            ElevationSpec::Grid(grid) => grid.elevation(lat_rad, lon_rad),
        }
    }

    fn max_elevation(&self) -> f64 {
        match self {
            ElevationSpec::Flat(h) => *h,
            ElevationSpec::Grid(grid) => grid.max_elevation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GlobeSpec {
    pub ellipsoid: EllipsoidSpec,
    pub elevation: ElevationSpec,
}

fn default_fov_y_deg() -> f64 {
    45.0
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct CameraSpec {
    pub eye: GeoDeg,
    pub target: GeoDeg,
    #[serde(default = "default_fov_y_deg")]
    pub fov_y_deg: f64,
    pub width: u32,
    pub height: u32,
}

/// Terrain tile tessellated from the globe's elevations.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct TerrainSpec {
    pub sector: Sector,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacemarkSpec {
    pub name: String,
    #[serde(default)]
    pub position: Option<GeoDeg>,
}

impl PlacemarkSpec {
    pub fn to_placemark(&self) -> Placemark {
        match self.position {
            Some(position) => Placemark::new(self.name.clone(), position.into()),
            None => Placemark::unplaced(self.name.clone()),
        }
    }
}

/// One recorded pointer event.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Pointer moved from `from` to `to` with the button held.
    Drag { from: ScreenPoint, to: ScreenPoint },
    DragEnd,
}

impl GestureEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GestureEvent::Drag { .. } => "drag",
            GestureEvent::DragEnd => "drag_end",
        }
    }

    /// Selection event for this step with `object` under the pointer.
    pub fn to_select_event<'a>(&self, object: &'a mut dyn SceneObject) -> SelectEvent<'a> {
        match *self {
            GestureEvent::Drag { from, to } => SelectEvent::drag(to, from, Some(object)),
            GestureEvent::DragEnd => SelectEvent::drag_end(),
        }
    }
}

/// A scene plus the gesture to replay over it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub globe: GlobeSpec,
    pub camera: CameraSpec,
    #[serde(default)]
    pub terrain: Option<TerrainSpec>,
    pub placemark: PlacemarkSpec,
    pub events: Vec<GestureEvent>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Assembles the globe, camera and optional terrain tile.
    pub fn build_window(&self) -> Result<SceneWindow, ScenarioError> {
        let ellipsoid = self.globe.ellipsoid.ellipsoid()?;
        let globe = EllipsoidGlobe::new(ellipsoid, self.globe.elevation.clone());
        let view = PerspectiveView::look_at(
            &ellipsoid,
            self.camera.eye.into(),
            self.camera.target.into(),
            self.camera.fov_y_deg,
            self.camera.width,
            self.camera.height,
        )
        .ok_or(ScenarioError::InvalidCamera)?;

        let mut window = SceneWindow::new().with_view(view);
        if let Some(tile) = self.terrain {
            window = window.with_terrain(MeshTerrain::tessellate(
                &globe, tile.sector, tile.rows, tile.cols,
            ));
        }
        Ok(window.with_globe(globe))
    }
}
