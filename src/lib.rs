//! # Route Corridor
//!
//! Route corridor geofencing and along-route advisory selection for vehicle HUDs.
//!
//! This library answers two questions for a vehicle following a known route:
//! - Is the vehicle inside a buffered corridor around the route?
//! - How far along the route is some point near it?
//!
//! Those answers decide whether cached route/condition data is still usable
//! and which upcoming advisory (incident, closure, construction, ...) is the
//! nearest one ahead.
//!
//! ## Features
//!
//! - **`parallel`** - Evaluate advisory candidates in parallel with rayon
//! - **`geojson`** - Decode conditions responses (route + advisories)
//! - **`http`** - Async client for the conditions/route endpoint
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use route_corridor::{GeoPoint, HudConfig, route};
//!
//! let config = HudConfig::default();
//!
//! // A short route heading due north
//! let path = vec![
//!     GeoPoint::new(45.000, 7.0),
//!     GeoPoint::new(45.002, 7.0),
//!     GeoPoint::new(45.004, 7.0),
//! ];
//!
//! let vehicle = GeoPoint::new(45.0005, 7.0);
//! assert!(route::is_within_corridor(&path, &vehicle, config.corridor_padding_meters));
//!
//! // Distance along the route from the vehicle to a point on the second segment
//! let target = GeoPoint::new(45.003, 7.0);
//! let d = route::distance_along(&path, &vehicle, &target, config.corridor_padding_meters);
//! assert!(d > 250.0 && d < 300.0);
//! ```
//!
//! ## Thread Safety
//!
//! Every geometric function is pure and may be called concurrently on
//! independent inputs. The only mutable state lives in [`HudSession`], which
//! is mutated through `&mut self`.

// Error type
pub mod error;
pub use error::{GeofenceError, Result};

// Spherical geometry
pub mod geo_utils;

// Polygon corridors and ray-cast containment
pub mod corridor;
pub use corridor::Corridor;

// Corridor tests and distance accumulation along a route
pub mod route;
pub use route::{RouteCorridors, PAST_ROUTE_END};

// Nearest-ahead advisory selection
pub mod advisory;
pub use advisory::{AdvisoryAnchor, AdvisoryMatch, nearest_ahead};

// Advisory text
pub mod message;
pub use message::{AdvisoryProperties, Condition, format_advisory, format_distance};

// Application-level state machine
pub mod session;
pub use session::{AdvisoryNotice, Conditions, FetchRequest, FetchState, HudSession, SessionAction};

// GeoJSON decoding of conditions responses
#[cfg(feature = "geojson")]
pub mod conditions;

// HTTP module for conditions fetching
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ClientConfig, ConditionsClient};

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("RouteCorridorRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with optional motion data.
///
/// Latitude and longitude are in degrees. `bearing` is the direction of travel
/// in degrees clockwise from true north and `speed` is in meters per second;
/// both are only present when the fix carries them.
///
/// # Example
/// ```
/// use route_corridor::GeoPoint;
/// let point = GeoPoint::new(51.5074, -0.1278).with_bearing(90.0);
/// assert_eq!(point.bearing, Some(90.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub bearing: Option<f64>,
    pub speed: Option<f64>,
}

impl GeoPoint {
    /// Create a new point without motion data.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, bearing: None, speed: None }
    }

    /// Create a point from a `[longitude, latitude]` pair, the axis order used
    /// on the wire.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Latitude/longitude aligned envelope.
///
/// A box starts empty and grows with [`expand`](Self::expand). Containment
/// may only be queried once at least one point has been added; asking an
/// empty box returns [`GeofenceError::EmptyBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    corners: Option<(GeoPoint, GeoPoint)>,
}

impl BoundingBox {
    /// An uninitialised box.
    pub fn empty() -> Self {
        Self { corners: None }
    }

    /// Fold a set of points into a box. Empty input gives an empty box.
    pub fn from_points(points: &[GeoPoint]) -> Self {
        points.iter().fold(Self::empty(), |bounds, p| bounds.expand(p))
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_none()
    }

    /// Smallest box containing `self` and `point`.
    ///
    /// An empty box becomes a degenerate box at `point`.
    pub fn expand(self, point: &GeoPoint) -> Self {
        let point = GeoPoint::new(point.latitude, point.longitude);
        let corners = match self.corners {
            None => (point, point),
            Some((low, high)) => (
                GeoPoint::new(
                    low.latitude.min(point.latitude),
                    low.longitude.min(point.longitude),
                ),
                GeoPoint::new(
                    high.latitude.max(point.latitude),
                    high.longitude.max(point.longitude),
                ),
            ),
        };
        Self { corners: Some(corners) }
    }

    /// Corner with the minimum latitude and longitude seen.
    pub fn low(&self) -> Option<GeoPoint> {
        self.corners.map(|(low, _)| low)
    }

    /// Corner with the maximum latitude and longitude seen.
    pub fn high(&self) -> Option<GeoPoint> {
        self.corners.map(|(_, high)| high)
    }

    /// Inclusive containment test on both axes.
    ///
    /// # Errors
    ///
    /// [`GeofenceError::EmptyBounds`] if no point was ever added.
    pub fn contains(&self, point: &GeoPoint) -> Result<bool> {
        let (low, high) = self.corners.ok_or(GeofenceError::EmptyBounds)?;
        Ok(low.latitude <= point.latitude
            && high.latitude >= point.latitude
            && low.longitude <= point.longitude
            && high.longitude >= point.longitude)
    }
}

/// Caller-supplied tuning for corridor tests and the fetch decision.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct HudConfig {
    /// Half-width of the corridor around each route segment.
    /// Default: 30.0 meters (consumer GPS accuracy plus lane offset)
    pub corridor_padding_meters: f64,

    /// How far ahead the conditions endpoint is asked to look.
    /// A cached route is reused while the vehicle is less than half of this
    /// from the route start. Default: 2000.0 meters
    pub lookahead_meters: f64,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            corridor_padding_meters: 30.0,
            lookahead_meters: 2000.0,
        }
    }
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{debug, info};

    /// Advisory candidate as passed across the FFI boundary.
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FfiAdvisory {
        pub id: String,
        pub point: GeoPoint,
        pub condition: String,
        pub subcondition: Option<String>,
    }

    /// Selected advisory with its distance and display text.
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FfiAdvisoryMatch {
        pub id: String,
        pub distance_meters: f64,
        pub message: String,
    }

    /// Check whether a point lies inside the corridor around a route.
    #[uniffi::export]
    pub fn ffi_is_within_corridor(path: Vec<GeoPoint>, point: GeoPoint, padding_meters: f64) -> bool {
        init_logging();
        debug!("[RouteCorridorRust] is_within_corridor: {} route points", path.len());
        route::is_within_corridor(&path, &point, padding_meters)
    }

    /// Distance along the route from `start` to `end`. -1 means past the route end.
    #[uniffi::export]
    pub fn ffi_distance_along(
        path: Vec<GeoPoint>,
        start: GeoPoint,
        end: GeoPoint,
        padding_meters: f64,
    ) -> f64 {
        init_logging();
        route::distance_along(&path, &start, &end, padding_meters)
    }

    /// Distance along the route from its first point to `end`.
    #[uniffi::export]
    pub fn ffi_distance_from_route_start(path: Vec<GeoPoint>, end: GeoPoint, padding_meters: f64) -> f64 {
        init_logging();
        route::distance_from_route_start(&path, &end, padding_meters)
    }

    /// Pick the nearest advisory ahead of the vehicle and format its message.
    #[uniffi::export]
    pub fn ffi_nearest_ahead(
        path: Vec<GeoPoint>,
        vehicle: GeoPoint,
        advisories: Vec<FfiAdvisory>,
        padding_meters: f64,
    ) -> Option<FfiAdvisoryMatch> {
        init_logging();
        info!(
            "[RouteCorridorRust] nearest_ahead: {} advisories over {} route points",
            advisories.len(),
            path.len()
        );

        let anchors: Vec<AdvisoryAnchor<AdvisoryProperties>> = advisories
            .into_iter()
            .map(|a| AdvisoryAnchor::new(
                a.id,
                a.point,
                AdvisoryProperties { condition: a.condition, subcondition: a.subcondition },
            ))
            .collect();

        let selected = advisory::nearest_ahead_parallel(&path, &vehicle, &anchors, padding_meters)?;
        Some(FfiAdvisoryMatch {
            id: selected.anchor.id.clone(),
            distance_meters: selected.distance_meters,
            message: format_advisory(&selected.anchor.payload, selected.distance_meters),
        })
    }

    /// Format an advisory message, e.g. "Road closed in 300 m".
    #[uniffi::export]
    pub fn ffi_format_advisory(condition: String, subcondition: Option<String>, distance_meters: f64) -> String {
        format_advisory(&AdvisoryProperties { condition, subcondition }, distance_meters)
    }

    /// Get default configuration.
    #[uniffi::export]
    pub fn default_hud_config() -> HudConfig {
        init_logging();
        info!("[RouteCorridorRust] default_hud_config called - Rust is active!");
        HudConfig::default()
    }

    // ========================================================================
    // Conditions Fetching (requires "http" feature)
    // ========================================================================

    /// Result of fetching conditions for a location.
    #[cfg(feature = "http")]
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FfiConditionsResult {
        /// Route geometry, empty when the response carried no route
        pub route: Vec<GeoPoint>,
        pub advisories: Vec<FfiAdvisory>,
        pub success: bool,
        pub error: Option<String>,
    }

    /// Fetch route and advisories around a location (blocking).
    #[cfg(feature = "http")]
    #[uniffi::export]
    pub fn fetch_conditions(api_key: String, location: GeoPoint, lookahead_meters: f64) -> FfiConditionsResult {
        init_logging();
        info!(
            "[RouteCorridorRust] fetch_conditions at {:.6},{:.6}",
            location.latitude, location.longitude
        );

        let config = crate::http::ClientConfig { api_key, ..Default::default() };
        match crate::http::fetch_conditions_sync(config, location, lookahead_meters) {
            Ok(conditions) => FfiConditionsResult {
                route: conditions.route.unwrap_or_default(),
                advisories: conditions
                    .advisories
                    .into_iter()
                    .map(|a| FfiAdvisory {
                        id: a.id,
                        point: a.point,
                        condition: a.payload.condition,
                        subcondition: a.payload.subcondition,
                    })
                    .collect(),
                success: true,
                error: None,
            },
            Err(e) => FfiConditionsResult {
                route: vec![],
                advisories: vec![],
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
