//! Decoding of conditions responses.
//!
//! The conditions endpoint answers with a GeoJSON-like collection:
//!
//! ```text
//! { "features": [
//!     { "type": "Route",   "geometry": { "type": "LineString", "coordinates": [[lon, lat], ...] } },
//!     { "type": "Feature", "id": 17, "geometry": { "type": "Point", "coordinates": [lon, lat] },
//!       "properties": { "condition": "closed" } }
//! ] }
//! ```
//!
//! Feature and geometry types are compared case-insensitively. The last
//! route feature wins. Advisories are reduced to a single anchor point: a
//! point's coordinate, or a line's first vertex. Other geometry kinds are
//! skipped.

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::advisory::AdvisoryAnchor;
use crate::session::Conditions;
use crate::{AdvisoryProperties, GeoPoint, GeofenceError, Result};

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<AdvisoryProperties>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// Decode a conditions response body.
pub fn decode(body: &[u8]) -> Result<Conditions> {
    let collection: RawCollection = serde_json::from_slice(body)?;
    let mut conditions = Conditions::default();

    for (index, feature) in collection.features.into_iter().enumerate() {
        match feature.kind.to_lowercase().as_str() {
            "route" => {
                let Some(geometry) = feature.geometry else {
                    debug!("Route feature {} has no geometry", index);
                    continue;
                };
                if !geometry.kind.eq_ignore_ascii_case("linestring") {
                    debug!("Unhandled route geometry type: {}", geometry.kind);
                    continue;
                }
                conditions.route = Some(line(&geometry.coordinates)?);
            }
            "feature" => {
                let Some(geometry) = feature.geometry else {
                    debug!("Advisory {} has no geometry", index);
                    continue;
                };
                let point = match geometry.kind.to_lowercase().as_str() {
                    "point" => position(&geometry.coordinates)?,
                    "linestring" => match line(&geometry.coordinates)?.first() {
                        Some(first) => *first,
                        None => {
                            debug!("Advisory {} has an empty line", index);
                            continue;
                        }
                    },
                    other => {
                        debug!("Unhandled geometry type: {}", other);
                        continue;
                    }
                };
                conditions.advisories.push(AdvisoryAnchor::new(
                    advisory_id(feature.id.as_ref(), index),
                    point,
                    feature.properties.unwrap_or_default(),
                ));
            }
            _ => {}
        }
    }

    debug!(
        "Decoded conditions: route={}, {} advisories",
        conditions.route.as_ref().map_or(0, Vec::len),
        conditions.advisories.len()
    );
    Ok(conditions)
}

fn advisory_id(id: Option<&Value>, index: usize) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => index.to_string(),
    }
}

/// `[lon, lat]` to a [`GeoPoint`].
fn position(value: &Value) -> Result<GeoPoint> {
    let pair: [f64; 2] = match value.as_array().map(Vec::as_slice) {
        Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => [lon, lat],
            _ => return Err(GeofenceError::InvalidGeometry(format!("non-numeric position {}", value))),
        },
        _ => return Err(GeofenceError::InvalidGeometry(format!("bad position {}", value))),
    };
    Ok(GeoPoint::from_lon_lat(pair))
}

fn line(value: &Value) -> Result<Vec<GeoPoint>> {
    value
        .as_array()
        .ok_or_else(|| GeofenceError::InvalidGeometry(format!("bad line {}", value)))?
        .iter()
        .map(position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Route",
                "geometry": {"type": "LineString", "coordinates": [[7.0, 45.0], [7.0, 45.002], [7.0, 45.004]]}
            },
            {
                "type": "Feature",
                "id": "closure-1",
                "geometry": {"type": "Point", "coordinates": [7.0, 45.003]},
                "properties": {"condition": "closed"}
            },
            {
                "type": "feature",
                "geometry": {"type": "LineString", "coordinates": [[7.0, 45.001], [7.0, 45.0015]]},
                "properties": {"condition": "information", "subcondition": "Speed camera"}
            },
            {
                "type": "Feature",
                "id": 42,
                "geometry": {"type": "Polygon", "coordinates": [[[7.0, 45.0], [7.1, 45.0], [7.0, 45.1], [7.0, 45.0]]]},
                "properties": {"condition": "incident"}
            },
            {"type": "Annotation"}
        ]
    }"#;

    #[test]
    fn test_decode_route_and_advisories() {
        let conditions = decode(RESPONSE.as_bytes()).unwrap();

        let route = conditions.route.unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route[1], GeoPoint::new(45.002, 7.0));

        // Polygon advisory and unknown feature type skipped
        assert_eq!(conditions.advisories.len(), 2);

        let closure = &conditions.advisories[0];
        assert_eq!(closure.id, "closure-1");
        assert_eq!(closure.point, GeoPoint::new(45.003, 7.0));
        assert_eq!(closure.payload.condition, "closed");
        assert_eq!(closure.payload.subcondition, None);

        // Line anchors on its first vertex, id falls back to index
        let info = &conditions.advisories[1];
        assert_eq!(info.id, "2");
        assert_eq!(info.point, GeoPoint::new(45.001, 7.0));
        assert_eq!(info.payload.subcondition.as_deref(), Some("Speed camera"));
    }

    #[test]
    fn test_numeric_id() {
        let body = r#"{"features": [
            {"type": "Feature", "id": 7, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
        ]}"#;
        let conditions = decode(body.as_bytes()).unwrap();
        assert_eq!(conditions.advisories[0].id, "7");
        assert_eq!(conditions.advisories[0].payload, AdvisoryProperties::default());
    }

    #[test]
    fn test_last_route_wins() {
        let body = r#"{"features": [
            {"type": "route", "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 1.0]]}},
            {"type": "ROUTE", "geometry": {"type": "linestring", "coordinates": [[5.0, 5.0], [5.0, 6.0]]}}
        ]}"#;
        let route = decode(body.as_bytes()).unwrap().route.unwrap();
        assert_eq!(route[0], GeoPoint::new(5.0, 5.0));
    }

    #[test]
    fn test_no_route() {
        let conditions = decode(br#"{"features": []}"#).unwrap();
        assert!(conditions.route.is_none());
        assert!(conditions.advisories.is_empty());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(decode(b"not json"), Err(GeofenceError::Json(_))));

        let bad_coords = r#"{"features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": ["a", "b"]}}
        ]}"#;
        assert!(matches!(
            decode(bad_coords.as_bytes()),
            Err(GeofenceError::InvalidGeometry(_))
        ));
    }
}
