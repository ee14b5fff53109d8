//! # Advisory Selection
//!
//! Picks the nearest advisory ahead of the vehicle along the route.
//!
//! Each advisory is reduced to a single [`AdvisoryAnchor`] point (the point
//! itself, or the first vertex of a line). For every anchor the distance along
//! the route from the vehicle is computed with [`route::distance_along`];
//! anchors at `0` (not located) or [`PAST_ROUTE_END`](route::PAST_ROUTE_END)
//! are skipped, and the smallest strictly positive distance wins. On ties the
//! earlier anchor is kept.

use crate::{route, GeoPoint};

/// Representative point of an advisory plus its opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryAnchor<T> {
    pub id: String,
    pub point: GeoPoint,
    pub payload: T,
}

impl<T> AdvisoryAnchor<T> {
    pub fn new(id: impl Into<String>, point: GeoPoint, payload: T) -> Self {
        Self { id: id.into(), point, payload }
    }
}

/// Selected anchor and its distance ahead, in meters (always > 0).
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryMatch<'a, T> {
    pub anchor: &'a AdvisoryAnchor<T>,
    pub distance_meters: f64,
}

/// Nearest advisory ahead of `vehicle` along `path`, if any.
///
/// Returns `None` for an empty anchor list or when no anchor yields a
/// positive distance.
///
/// # Example
///
/// ```rust
/// use route_corridor::{AdvisoryAnchor, GeoPoint, nearest_ahead};
///
/// let path = vec![GeoPoint::new(45.000, 7.0), GeoPoint::new(45.002, 7.0), GeoPoint::new(45.004, 7.0)];
/// let anchors = vec![
///     AdvisoryAnchor::new("far", GeoPoint::new(46.0, 8.0), ()),
///     AdvisoryAnchor::new("near", GeoPoint::new(45.003, 7.0), ()),
/// ];
///
/// let best = nearest_ahead(&path, &GeoPoint::new(45.001, 7.0), &anchors, 30.0).unwrap();
/// assert_eq!(best.anchor.id, "near");
/// ```
pub fn nearest_ahead<'a, T>(
    path: &[GeoPoint],
    vehicle: &GeoPoint,
    anchors: &'a [AdvisoryAnchor<T>],
    padding_meters: f64,
) -> Option<AdvisoryMatch<'a, T>> {
    let candidates = anchors.iter().map(|anchor| {
        let d = route::distance_along(path, vehicle, &anchor.point, padding_meters);
        (anchor, d)
    });
    select_nearest(candidates).map(|(anchor, distance_meters)| AdvisoryMatch { anchor, distance_meters })
}

/// Parallel variant of [`nearest_ahead`]; selects the same anchor.
#[cfg(feature = "parallel")]
pub fn nearest_ahead_parallel<'a, T: Sync>(
    path: &[GeoPoint],
    vehicle: &GeoPoint,
    anchors: &'a [AdvisoryAnchor<T>],
    padding_meters: f64,
) -> Option<AdvisoryMatch<'a, T>> {
    use rayon::prelude::*;

    let distances: Vec<f64> = anchors
        .par_iter()
        .map(|anchor| route::distance_along(path, vehicle, &anchor.point, padding_meters))
        .collect();

    select_nearest(anchors.iter().zip(distances))
        .map(|(anchor, distance_meters)| AdvisoryMatch { anchor, distance_meters })
}

/// Smallest strictly positive distance among `candidates`, first one on ties.
pub fn select_nearest<K>(candidates: impl IntoIterator<Item = (K, f64)>) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (key, d) in candidates {
        if d <= 0.0 {
            continue;
        }
        let closer = best.as_ref().map_or(true, |(_, best_d)| d < *best_d);
        if closer {
            best = Some((key, d));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::haversine_distance;
    use crate::route::PAST_ROUTE_END;

    const PADDING: f64 = 30.0;

    fn route() -> Vec<GeoPoint> {
        (0..5)
            .map(|i| GeoPoint::new(45.0 + i as f64 * 0.002, 7.0))
            .collect()
    }

    #[test]
    fn test_select_nearest_skips_non_positive() {
        let candidates = vec![("a", PAST_ROUTE_END), ("b", 0.0), ("c", 120.0), ("d", 340.0)];
        assert_eq!(select_nearest(candidates), Some(("c", 120.0)));
    }

    #[test]
    fn test_select_nearest_none_qualify() {
        assert_eq!(select_nearest(vec![("a", PAST_ROUTE_END), ("b", 0.0)]), None);
        assert_eq!(select_nearest(Vec::<(&str, f64)>::new()), None);
    }

    #[test]
    fn test_select_nearest_first_wins_ties() {
        let candidates = vec![("a", 50.0), ("b", 50.0), ("c", 70.0)];
        assert_eq!(select_nearest(candidates), Some(("a", 50.0)));
    }

    #[test]
    fn test_nearest_ahead_picks_closest_positive() {
        let path = route();
        let vehicle = GeoPoint::new(45.0005, 7.0);
        let anchors = vec![
            AdvisoryAnchor::new("off-route", GeoPoint::new(45.5, 7.5), "x"),
            AdvisoryAnchor::new("far", GeoPoint::new(45.0065, 7.0), "y"),
            AdvisoryAnchor::new("near", GeoPoint::new(45.0025, 7.0), "z"),
            AdvisoryAnchor::new("behind-same-segment", GeoPoint::new(45.0015, 7.0), "w"),
        ];

        let best = nearest_ahead(&path, &vehicle, &anchors, PADDING).unwrap();
        assert_eq!(best.anchor.id, "near");
        assert_eq!(best.anchor.payload, "z");

        let expected = haversine_distance(&vehicle, &path[1]) + haversine_distance(&path[1], &anchors[2].point);
        assert!((best.distance_meters - expected).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_ahead_empty_and_unmatched() {
        let path = route();
        let vehicle = GeoPoint::new(45.0005, 7.0);
        let none: Vec<AdvisoryAnchor<()>> = vec![];
        assert!(nearest_ahead(&path, &vehicle, &none, PADDING).is_none());

        let off_route = vec![AdvisoryAnchor::new("a", GeoPoint::new(10.0, 10.0), ())];
        assert!(nearest_ahead(&path, &vehicle, &off_route, PADDING).is_none());
    }

    #[test]
    fn test_nearest_ahead_short_route() {
        let anchors = vec![AdvisoryAnchor::new("a", GeoPoint::new(45.0, 7.0), ())];
        assert!(nearest_ahead(&[GeoPoint::new(45.0, 7.0)], &GeoPoint::new(45.0, 7.0), &anchors, PADDING).is_none());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let path = route();
        let vehicle = GeoPoint::new(45.0005, 7.0);
        let anchors: Vec<AdvisoryAnchor<usize>> = (0..40)
            .map(|i| AdvisoryAnchor::new(format!("a{}", i), GeoPoint::new(45.0 + i as f64 * 0.0003, 7.0), i))
            .collect();

        let seq = nearest_ahead(&path, &vehicle, &anchors, PADDING).unwrap();
        let par = nearest_ahead_parallel(&path, &vehicle, &anchors, PADDING).unwrap();
        assert_eq!(seq.anchor.id, par.anchor.id);
        assert_eq!(seq.distance_meters, par.distance_meters);
    }
}
