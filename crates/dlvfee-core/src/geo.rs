//! Great-circle distance between two lat/lng points.
//!
//! Uses the Haversine formula on a spherical Earth. For last-mile delivery
//! distances the error against an ellipsoidal model stays well under one
//! percent.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius. Changing it changes every quoted distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in decimal
/// degrees.
///
/// No range checking happens here: `NaN` or out-of-domain inputs flow
/// through the trigonometry unchanged. Use [`Coordinate`] when the inputs
/// come from outside the process.
#[must_use]
pub fn calculate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either value is not
    /// finite or falls outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if lat_ok && lng_ok {
            Ok(Self { lat, lng })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        calculate_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parses `"LAT,LNG"`, e.g. `"37.5665,126.9780"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG but got '{s}'"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("invalid latitude '{}': {e}", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("invalid longitude '{}': {e}", lng.trim()))?;
        Coordinate::new(lat, lng).map_err(|e| e.to_string())
    }
}
