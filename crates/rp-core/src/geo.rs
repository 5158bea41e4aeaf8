//! Geographic coordinate type and distance estimators.
//!
//! Two estimators are provided:
//!
//! | Function            | Result                                         |
//! |---------------------|------------------------------------------------|
//! | [`planar_distance`] | Euclidean distance in raw degree space         |
//! | [`haversine_km`]    | Great-circle distance in kilometres            |
//!
//! The planar estimate does no unit conversion.  It is a dimensionless proxy
//! used by the traffic heuristic, not a ground distance.
//!
//! `GeoPoint` is `f64` and validated on construction, so both estimators are
//! infallible once a point exists.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Mean Earth radius used by the haversine formula, kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A WGS-84 coordinate with latitude in `[-90, 90]` and longitude in
/// `[-180, 180]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(f64, f64)", into = "(f64, f64)")
)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range components.
    pub fn new(lat: f64, lng: f64) -> CoreResult<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if !valid {
            return Err(CoreError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    #[inline]
    pub fn lat(self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lng(self) -> f64 {
        self.lng
    }

    /// See [`planar_distance`].
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        planar_distance(self, other)
    }

    /// See [`haversine_km`].
    #[inline]
    pub fn haversine_km(self, other: GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

/// Straight-line distance in degree space:
/// `sqrt((b.lat - a.lat)^2 + (b.lng - a.lng)^2)`.
#[inline]
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = b.lat - a.lat;
    let d_lng = b.lng - a.lng;
    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

/// Haversine great-circle distance in kilometres.
///
/// Symmetric, exactly `0.0` for identical points, and never larger than half
/// the Earth's circumference (`π · EARTH_RADIUS_KM`).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance between two points encoded as `"lat,lng"` strings.
///
/// This is the string boundary used by callers that carry coordinates as
/// text.  New code should parse into [`GeoPoint`] once and call
/// [`haversine_km`] directly.
pub fn haversine_distance(a: &str, b: &str) -> CoreResult<f64> {
    let a: GeoPoint = a.parse()?;
    let b: GeoPoint = b.parse()?;
    Ok(haversine_km(a, b))
}

/// Parses `"lat,lng"`.  Whitespace around each component is ignored; exactly
/// two components are required.
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoreError::Parse(format!(
                "invalid point {s:?}: expected \"lat,lng\""
            )));
        };
        let component = |v: &str| {
            v.trim().parse::<f64>().map_err(|_| {
                CoreError::Parse(format!("invalid point {s:?}: {:?} is not a number", v.trim()))
            })
        };
        GeoPoint::new(component(lat)?, component(lng)?)
    }
}

impl TryFrom<(f64, f64)> for GeoPoint {
    type Error = CoreError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self, Self::Error> {
        GeoPoint::new(lat, lng)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(p: GeoPoint) -> (f64, f64) {
        (p.lat, p.lng)
    }
}

/// Formats as `"lat,lng"`, the same shape [`FromStr`] accepts.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}
