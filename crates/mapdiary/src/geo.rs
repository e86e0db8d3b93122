//! Geographic primitives: coordinates, map spans and great-circle distance.
//!
//! Every constructor here validates its input. A [`Coordinate`] or [`Span`]
//! that exists is finite and in range, so the clustering code downstream never
//! has to consider malformed geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting anything outside the valid range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if either value is non-finite,
    /// the latitude is outside `[-90, 90]` or the longitude is outside
    /// `[-180, 180]`. Out-of-range input is never clamped.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let reject = |reason| Error::InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(reject("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(reject("latitude out of range [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(reject("longitude out of range [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push `a` a hair past 1 for antipodal points.
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_KM * c
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// The angular extent of a visible map region, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    latitude_delta: f64,
    longitude_delta: f64,
}

#[derive(Deserialize)]
struct RawSpan {
    latitude_delta: f64,
    longitude_delta: f64,
}

impl TryFrom<RawSpan> for Span {
    type Error = Error;

    fn try_from(raw: RawSpan) -> Result<Self> {
        Self::new(raw.latitude_delta, raw.longitude_delta)
    }
}

impl Span {
    /// Create a span.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpan`] if either delta is non-finite or not
    /// positive, or if the span is wider than the globe (latitude delta above
    /// 180 or longitude delta above 360).
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Result<Self> {
        let reject = |reason| Error::InvalidSpan {
            latitude_delta,
            longitude_delta,
            reason,
        };

        if !latitude_delta.is_finite() || !longitude_delta.is_finite() {
            return Err(reject("span must be finite"));
        }
        if latitude_delta <= 0.0 || longitude_delta <= 0.0 {
            return Err(reject("span deltas must be positive"));
        }
        if latitude_delta > 180.0 {
            return Err(reject("latitude delta exceeds 180 degrees"));
        }
        if longitude_delta > 360.0 {
            return Err(reject("longitude delta exceeds 360 degrees"));
        }

        Ok(Self {
            latitude_delta,
            longitude_delta,
        })
    }

    /// Latitude delta in degrees.
    #[must_use]
    pub const fn latitude_delta(&self) -> f64 {
        self.latitude_delta
    }

    /// Longitude delta in degrees.
    #[must_use]
    pub const fn longitude_delta(&self) -> f64 {
        self.longitude_delta
    }
}

/// A visible map region: center plus span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Center of the visible area.
    pub center: Coordinate,
    /// Angular extent of the visible area.
    pub span: Span,
}

impl Region {
    /// Create a region from an already-validated center and span.
    #[must_use]
    pub const fn new(center: Coordinate, span: Span) -> Self {
        Self { center, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        let err = Coordinate::new(90.5, 0.0).unwrap_err();
        assert!(err.to_string().contains("latitude"));

        let err = Coordinate::new(0.0, -180.1).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_coordinate_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let paris = coord(48.8584, 2.2945);
        assert!(paris.distance_km(&paris).abs() < 1e-9);
    }

    #[test]
    fn test_distance_paris_london() {
        let paris = coord(48.8566, 2.3522);
        let london = coord(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let tokyo = coord(35.6762, 139.6503);
        let venice = coord(45.4408, 12.3155);
        let a = tokyo.distance_km(&venice);
        let b = venice.distance_km(&tokyo);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        let a = coord(0.0, 0.0);
        let b = coord(1.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((a.distance_km(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let west = coord(0.0, 179.95);
        let east = coord(0.0, -179.95);
        assert!(west.distance_km(&east) < 12.0);
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let d = a.distance_km(&b);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_deserialize_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"latitude": 4.1755, "longitude": 73.5093}"#)
            .unwrap();
        assert!((ok.latitude() - 4.1755).abs() < f64::EPSILON);

        let bad = serde_json::from_str::<Coordinate>(r#"{"latitude": 123.0, "longitude": 0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(coord(4.1755, 73.5093).to_string(), "4.1755, 73.5093");
    }

    #[test]
    fn test_span_validation() {
        assert!(Span::new(180.0, 360.0).is_ok());
        assert!(Span::new(0.0, 10.0).is_err());
        assert!(Span::new(10.0, -1.0).is_err());
        assert!(Span::new(181.0, 10.0).is_err());
        assert!(Span::new(10.0, 361.0).is_err());
        assert!(Span::new(f64::NAN, 10.0).is_err());
    }
}
