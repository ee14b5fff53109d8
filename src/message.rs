//! Advisory display text.
//!
//! Turns an advisory's condition category and its along-route distance into
//! the short line shown on the HUD, e.g. "Road closed in 300 m".

/// Advisory category as reported by the conditions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Incident,
    Pavement,
    Closed,
    Construction,
    Information,
    /// Anything else, kept verbatim.
    Other(String),
}

impl Condition {
    /// Parse a category string. Matching is exact; unknown values become
    /// [`Condition::Other`].
    pub fn parse(value: &str) -> Self {
        match value {
            "incident" => Self::Incident,
            "pavement" => Self::Pavement,
            "closed" => Self::Closed,
            "construction" => Self::Construction,
            "information" => Self::Information,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Properties carried by an advisory record.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvisoryProperties {
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subcondition: Option<String>,
}

impl AdvisoryProperties {
    pub fn condition(&self) -> Condition {
        Condition::parse(&self.condition)
    }
}

/// Round a distance down for display.
///
/// Under 1 km: whole hundreds of meters ("0 m", "300 m"). From 1 km up:
/// whole kilometers ("1 km", "2 km").
pub fn format_distance(distance_meters: f64) -> String {
    if distance_meters < 1000.0 {
        format!("{:.0} m", (distance_meters / 100.0).floor() * 100.0)
    } else {
        format!("{:.0} km", (distance_meters / 1000.0).floor())
    }
}

/// HUD line for an advisory at `distance_meters` ahead.
///
/// ```rust
/// use route_corridor::{AdvisoryProperties, format_advisory};
///
/// let props = AdvisoryProperties { condition: "closed".into(), subcondition: None };
/// assert_eq!(format_advisory(&props, 342.0), "Road closed in 300 m");
/// ```
pub fn format_advisory(properties: &AdvisoryProperties, distance_meters: f64) -> String {
    let distance = format_distance(distance_meters);
    match properties.condition() {
        Condition::Incident => format!("Accident in {}", distance),
        Condition::Pavement => format!("Slippery road in {}", distance),
        Condition::Closed => format!("Road closed in {}", distance),
        Condition::Construction => format!("Construction in {}", distance),
        Condition::Information => properties.subcondition.clone().unwrap_or_default(),
        Condition::Other(raw) => raw,
    }
}
