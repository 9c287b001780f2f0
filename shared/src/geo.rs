use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    DEFAULT_RADIUS_M, EARTH_RADIUS_M, INITIAL_LATITUDE, INITIAL_LONGITUDE, MAX_RADIUS_M,
    MIN_RADIUS_M, RADIUS_STEP_M,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

/// A point on the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Fallback used when a selection is confirmed without an explicit origin.
    pub const ORIGIN: Self = Self {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate without range checks. Platform services and the
    /// map surface are trusted to hand back sane values.
    #[must_use]
    pub const fn unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, or 1.0 when the viewport is degenerate.
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        let ratio = self.width / self.height;
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Initial camera framing for the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    #[must_use]
    pub fn initial(center: Coordinate, latitude_delta: f64, viewport: Viewport) -> Self {
        Self {
            center,
            latitude_delta,
            longitude_delta: latitude_delta * viewport.aspect_ratio(),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::initial(
            Coordinate::unchecked(INITIAL_LATITUDE, INITIAL_LONGITUDE),
            crate::DEFAULT_LATITUDE_DELTA,
            Viewport::default(),
        )
    }
}

/// Search distance in meters, bounded to `[MIN_RADIUS_M, MAX_RADIUS_M]` and
/// quantized to `RADIUS_STEP_M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SearchRadius(u32);

impl SearchRadius {
    pub const MIN: Self = Self(MIN_RADIUS_M);
    pub const MAX: Self = Self(MAX_RADIUS_M);

    /// Rounds a raw slider value to the nearest step and clamps it.
    #[must_use]
    pub fn snap(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self::default();
        }
        let step = f64::from(RADIUS_STEP_M);
        let stepped = (raw / step).round() * step;
        let clamped = stepped.clamp(f64::from(MIN_RADIUS_M), f64::from(MAX_RADIUS_M));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meters = clamped as u32;
        Self(meters)
    }

    #[must_use]
    pub const fn meters(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn kilometers(self) -> f64 {
        f64::from(self.0) / 1000.0
    }

    /// Slider label, e.g. `Radius: 0.2 km`.
    #[must_use]
    pub fn label(self) -> String {
        format!("Radius: {} km", self.kilometers())
    }

    #[must_use]
    pub fn contains(self, center: Coordinate, point: Coordinate) -> bool {
        haversine_distance(center, point) <= f64::from(self.0)
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(DEFAULT_RADIUS_M)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Radius {0} m must be a multiple of 100 within [0, 2000]")]
pub struct InvalidRadius(pub u32);

impl TryFrom<u32> for SearchRadius {
    type Error = InvalidRadius;

    fn try_from(meters: u32) -> Result<Self, Self::Error> {
        if (MIN_RADIUS_M..=MAX_RADIUS_M).contains(&meters) && meters % RADIUS_STEP_M == 0 {
            Ok(Self(meters))
        } else {
            Err(InvalidRadius(meters))
        }
    }
}

impl From<SearchRadius> for u32 {
    fn from(radius: SearchRadius) -> Self {
        radius.0
    }
}

#[must_use]
pub fn haversine_distance(p1: Coordinate, p2: Coordinate) -> f64 {
    const EPSILON: f64 = 1e-10;

    if (p1.latitude - p2.latitude).abs() < EPSILON && (p1.longitude - p2.longitude).abs() < EPSILON
    {
        return 0.0;
    }

    let lat1_rad = p1.latitude.to_radians();
    let lat2_rad = p2.latitude.to_radians();
    let delta_lat = (p2.latitude - p1.latitude).to_radians();
    let delta_lon = (p2.longitude - p1.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().asin();

    let result = EARTH_RADIUS_M * c;

    if result.is_finite() {
        result
    } else {
        f64::MAX
    }
}

#[must_use]
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters < 0.0 {
        return "Unknown".to_string();
    }

    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else if meters < 10_000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{:.0} km", meters / 1000.0)
    }
}
