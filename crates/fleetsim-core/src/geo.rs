//! Geo Math
//!
//! Pure spherical-earth helpers used by the simulator:
//! - Haversine great-circle distance (km)
//! - Initial compass bearing (degrees clockwise from north)
//! - Linear interpolation between two waypoints

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Segment length substituted for coincident waypoints when dividing by distance
pub const MIN_SEGMENT_KM: f64 = 0.001;

/// A geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Waypoint {
    /// Create a new waypoint
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Great-circle distance between two points in kilometers (haversine)
///
/// Symmetric, and zero only when `a == b`.
pub fn distance_km(a: Waypoint, b: Waypoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Segment length guarded against zero, safe to use as a divisor
pub fn segment_length_km(a: Waypoint, b: Waypoint) -> f64 {
    let d = distance_km(a, b);
    if d > 0.0 {
        d
    } else {
        MIN_SEGMENT_KM
    }
}

/// Initial bearing from `a` to `b` in degrees, normalized into `[0, 360)`
pub fn bearing_deg(a: Waypoint, b: Waypoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    let bearing = (y.atan2(x).to_degrees() + 360.0) % 360.0;

    // Keep the half-open range even if rounding lands on 360
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Point at fraction `t` along the straight line from `from` to `to` (in degree space)
pub fn interpolate(from: Waypoint, to: Waypoint, t: f64) -> Waypoint {
    Waypoint {
        lat: from.lat + (to.lat - from.lat) * t,
        lng: from.lng + (to.lng - from.lng) * t,
    }
}
