use super::Vec3;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// Geodetic coordinates in radians and meters.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_rad: f64, lon_rad: f64, alt_m: f64) -> Self {
        Self {
            lat_rad,
            lon_rad,
            alt_m,
        }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians(), alt_m)
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat_rad.to_degrees()
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon_rad.to_degrees()
    }

    /// Same latitude and longitude at a different altitude.
    pub fn with_alt(self, alt_m: f64) -> Self {
        Self { alt_m, ..self }
    }
}

/// Reference ellipsoid of revolution around the Z axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius (meters).
    pub a: f64,
    /// Polar radius (meters).
    pub b: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: WGS84_A,
        b: WGS84_B,
    };

    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn sphere(radius: f64) -> Self {
        Self::new(radius, radius)
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }

    /// Second eccentricity squared.
    pub fn ep2(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.b * self.b)
    }

    pub fn to_cartesian(&self, geo: Geodetic) -> Vec3 {
        let e2 = self.e2();
        let sin_lat = geo.lat_rad.sin();
        let cos_lat = geo.lat_rad.cos();
        let sin_lon = geo.lon_rad.sin();
        let cos_lon = geo.lon_rad.cos();

        let n = self.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let x = (n + geo.alt_m) * cos_lat * cos_lon;
        let y = (n + geo.alt_m) * cos_lat * sin_lon;
        let z = (n * (1.0 - e2) + geo.alt_m) * sin_lat;

        Vec3::new(x, y, z)
    }

    /// Bowring's approximation; exact on a sphere.
    pub fn to_geodetic(&self, point: Vec3) -> Geodetic {
        let e2 = self.e2();
        let ep2 = self.ep2();
        let p = (point.x * point.x + point.y * point.y).sqrt();
        let lon = point.y.atan2(point.x);

        let theta = (point.z * self.a).atan2(p * self.b);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        let lat = (point.z + ep2 * self.b * sin_theta * sin_theta * sin_theta)
            .atan2(p - e2 * self.a * cos_theta * cos_theta * cos_theta);

        // Height form that stays finite at the poles.
        let sin_lat = lat.sin();
        let alt = p * lat.cos() + point.z * sin_lat - self.a * (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Geodetic::new(lat, lon, alt)
    }
}
