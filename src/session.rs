//! HUD session state.
//!
//! [`HudSession`] owns everything the display loop caches between location
//! fixes: the current route (as prebuilt [`RouteCorridors`]), the advisories
//! fetched with it, the previous fix, and whether a conditions fetch is
//! outstanding. It performs no I/O. The caller feeds it location fixes and
//! fetch results and acts on the returned [`SessionAction`].
//!
//! ```text
//!            on_location (off route / too far along)
//!   Idle ─────────────────────────────────────────────▶ InFlight
//!    ▲                                                     │
//!    └──────────────── complete_fetch (Ok or Err) ◀───────┘
//! ```
//!
//! At most one fetch is in flight. Route and advisories are replaced
//! together inside [`HudSession::complete_fetch`], so every query observes
//! one consistent snapshot.

use log::{debug, info, warn};

use crate::advisory::{select_nearest, AdvisoryAnchor};
use crate::{format_advisory, geo_utils, AdvisoryProperties, GeoPoint, HudConfig, Result, RouteCorridors};

/// Route and advisories decoded from one conditions response.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    /// Route geometry, when the response carried one.
    pub route: Option<Vec<GeoPoint>>,
    pub advisories: Vec<AdvisoryAnchor<AdvisoryProperties>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    InFlight,
}

/// Parameters for a conditions fetch around the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub location: GeoPoint,
    /// Direction of travel; 0 when the fix has none.
    pub bearing_deg: f64,
    pub lookahead_meters: f64,
}

/// The advisory to show and its text.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryNotice {
    pub advisory_id: String,
    pub distance_meters: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Refresh the display; `None` clears it.
    Display(Option<AdvisoryNotice>),
    /// Start a conditions fetch and report back through `complete_fetch`.
    Fetch(FetchRequest),
    /// Nothing to do until the outstanding fetch completes.
    Wait,
}

#[derive(Debug, Clone)]
pub struct HudSession {
    config: HudConfig,
    route: Option<RouteCorridors>,
    advisories: Vec<AdvisoryAnchor<AdvisoryProperties>>,
    fetch_state: FetchState,
    previous: Option<GeoPoint>,
}

impl HudSession {
    pub fn new(config: HudConfig) -> Self {
        Self {
            config,
            route: None,
            advisories: Vec::new(),
            fetch_state: FetchState::Idle,
            previous: None,
        }
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    pub fn route(&self) -> Option<&RouteCorridors> {
        self.route.as_ref()
    }

    pub fn advisories(&self) -> &[AdvisoryAnchor<AdvisoryProperties>] {
        &self.advisories
    }

    /// Handle a new location fix.
    ///
    /// A fix without a bearing inherits the bearing from the previous fix.
    /// The cached route is reused while the fix is inside its corridors and
    /// less than half the lookahead from the route start; the past-the-end
    /// sentinel also passes that comparison. Otherwise a fetch is requested
    /// unless one is already in flight.
    pub fn on_location(&mut self, mut location: GeoPoint) -> SessionAction {
        if location.bearing.is_none() {
            if let Some(previous) = &self.previous {
                location.bearing = Some(geo_utils::bearing(previous, &location));
            }
        }
        self.previous = Some(location);

        if let Some(route) = &self.route {
            if route.contains(&location)
                && route.distance_from_route_start(&location) < self.config.lookahead_meters / 2.0
            {
                return SessionAction::Display(self.current_notice(&location));
            }
        }

        match self.fetch_state {
            FetchState::InFlight => SessionAction::Wait,
            FetchState::Idle => {
                info!(
                    "Requesting conditions at {:.6},{:.6} bearing {:.1}",
                    location.latitude,
                    location.longitude,
                    location.bearing.unwrap_or(0.0)
                );
                self.fetch_state = FetchState::InFlight;
                SessionAction::Fetch(FetchRequest {
                    location,
                    bearing_deg: location.bearing.unwrap_or(0.0),
                    lookahead_meters: self.config.lookahead_meters,
                })
            }
        }
    }

    /// Apply the outcome of the fetch requested for `query_location`.
    ///
    /// The session always returns to [`FetchState::Idle`]. On success the
    /// advisories are replaced, the route is replaced only if the response
    /// carried one, and the display is refreshed for `query_location`.
    pub fn complete_fetch(&mut self, query_location: &GeoPoint, result: Result<Conditions>) -> SessionAction {
        self.fetch_state = FetchState::Idle;

        let conditions = match result {
            Ok(conditions) => conditions,
            Err(e) => {
                warn!("Failed to retrieve condition data for current position: {}", e);
                return SessionAction::Wait;
            }
        };

        if let Some(path) = conditions.route {
            debug!("Replacing route ({} points)", path.len());
            self.route = Some(RouteCorridors::build(path, self.config.corridor_padding_meters));
        }
        debug!("Replacing advisories ({} anchors)", conditions.advisories.len());
        self.advisories = conditions.advisories;

        SessionAction::Display(self.current_notice(query_location))
    }

    /// Nearest advisory ahead of `location` on the cached route.
    pub fn current_notice(&self, location: &GeoPoint) -> Option<AdvisoryNotice> {
        let route = self.route.as_ref()?;
        let candidates = self
            .advisories
            .iter()
            .map(|anchor| (anchor, route.distance_along(location, &anchor.point)));

        let (anchor, distance_meters) = select_nearest(candidates)?;
        Some(AdvisoryNotice {
            advisory_id: anchor.id.clone(),
            distance_meters,
            message: format_advisory(&anchor.payload, distance_meters),
        })
    }
}

impl Default for HudSession {
    fn default() -> Self {
        Self::new(HudConfig::default())
    }
}
