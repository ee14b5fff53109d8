//! # Geographic Utilities
//!
//! Spherical geometry used to build route corridors and to measure progress
//! along a route.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`bearing`] | Initial great-circle bearing between two points |
//! | [`haversine_distance`] | Great-circle distance between two points |
//! | [`destination`] | Point reached from a start, bearing and distance |
//! | [`polyline_length`] | Total length of a route in meters |
//!
//! ## Example
//!
//! ```rust
//! use route_corridor::{GeoPoint, geo_utils};
//!
//! let start = GeoPoint::new(51.5074, -0.1278);
//! let north = geo_utils::destination(&start, 0.0, 500.0);
//!
//! let heading = geo_utils::bearing(&start, &north);
//! assert!(heading < 0.01 || heading > 359.99);
//!
//! let dist = geo_utils::haversine_distance(&start, &north);
//! assert!((dist - 500.0).abs() < 1.0);
//! ```
//!
//! ## Earth Radius
//!
//! Two radii are in play and they are deliberately not unified:
//!
//! - [`haversine_distance`] and [`bearing`] use the `geo` crate's
//!   [`Haversine`] metric space, which assumes the mean Earth radius
//!   ([`MEAN_RADIUS_M`], 6,371,008.8 m).
//! - [`destination`] uses the WGS84 equatorial radius
//!   ([`EQUATORIAL_RADIUS_M`], 6,378,137 m).
//!
//! Projecting a point with [`destination`] and measuring it back with
//! [`haversine_distance`] therefore reads about 0.112% short. Corridor
//! widths and every distance reported along a route depend on these exact
//! values, so changing either constant changes observable results.
//!
//! Reference: [Movable Type, "Calculate distance, bearing and more between
//! Latitude/Longitude points"](https://www.movable-type.co.uk/scripts/latlong.html)

use geo::{Bearing, Distance, Haversine, Point};
use crate::GeoPoint;

/// Radius used by [`destination`] (WGS84 semi-major axis).
pub const EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Radius assumed by the `geo` haversine metric behind [`haversine_distance`].
pub const MEAN_RADIUS_M: f64 = 6_371_008.8;

#[inline]
fn to_point(p: &GeoPoint) -> Point<f64> {
    Point::new(p.longitude, p.latitude)
}

// =============================================================================
// Bearing / Distance
// =============================================================================

/// Initial bearing from `from` to `to` along the great circle.
///
/// Returns degrees clockwise from true north, normalised into `[0, 360)`.
/// Identical points yield `0.0`.
#[inline]
pub fn bearing(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let degrees = Haversine::bearing(to_point(from), to_point(to));
    let normalised = degrees.rem_euclid(360.0);
    // rem_euclid can round a tiny negative value up to exactly 360.0
    if normalised >= 360.0 {
        0.0
    } else {
        normalised
    }
}

/// Calculate the great-circle distance between two points using the Haversine formula.
///
/// Returns the distance in meters along the Earth's surface (assuming a spherical Earth
/// with radius [`MEAN_RADIUS_M`]). This is the authoritative "distance between two
/// points" for everything measured along a route.
///
/// # Example
///
/// ```rust
/// use route_corridor::{GeoPoint, geo_utils};
///
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let paris = GeoPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    Haversine::distance(to_point(p1), to_point(p2))
}

/// Calculate the total length of a route in meters.
///
/// Sums the haversine distance between consecutive points. Empty or single-point
/// routes return 0.0.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Destination
// =============================================================================

/// Point reached by travelling `distance_meters` from `start` on the initial
/// bearing `bearing_deg`, following a great circle.
///
/// Spherical direct problem with angular distance `δ = d / R`:
///
/// ```text
/// φ2 = asin(sin φ1 · cos δ + cos φ1 · sin δ · cos θ)
/// λ2 = λ1 + atan2(sin θ · sin δ · cos φ1, cos δ − sin φ1 · sin φ2)
/// ```
///
/// `R` is [`EQUATORIAL_RADIUS_M`]. Longitude is not wrapped into
/// `[-180, 180]`; routes crossing the antimeridian are unsupported.
///
/// The returned point carries over `start`'s bearing and speed.
pub fn destination(start: &GeoPoint, bearing_deg: f64, distance_meters: f64) -> GeoPoint {
    let theta = bearing_deg.to_radians();
    let delta = distance_meters / EQUATORIAL_RADIUS_M;
    let phi1 = start.latitude.to_radians();
    let lambda1 = start.longitude.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    GeoPoint {
        latitude: phi2.to_degrees(),
        longitude: lambda2.to_degrees(),
        ..*start
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
