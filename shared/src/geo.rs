//! Great-circle distance for geofencing

use serde::{Deserialize, Serialize};

/// Mean earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine distance to another point, in miles
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        haversine_miles(*self, *other)
    }
}

/// Haversine distance between two points, in miles
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = GeoPoint::new(25.7617, -80.1918);
        assert!(haversine_miles(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Miami -> New York, roughly 1090 miles
        let miami = GeoPoint::new(25.7617, -80.1918);
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let d = miami.distance_miles(&nyc);
        assert!((d - 1090.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(51.5074, -0.1278);
        let b = GeoPoint::new(48.8566, 2.3522);
        assert!((haversine_miles(a, b) - haversine_miles(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_small_offset() {
        // 0.001 degrees of latitude is about 0.069 miles
        let a = GeoPoint::new(25.7617, -80.1918);
        let b = GeoPoint::new(25.7627, -80.1918);
        let d = haversine_miles(a, b);
        assert!(d > 0.06 && d < 0.08, "got {d}");
    }

    #[test]
    fn test_validity() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
