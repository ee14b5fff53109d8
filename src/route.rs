//! # Route Matching
//!
//! Corridor tests and along-route distance over an ordered path.
//!
//! Each consecutive pair of path vertices defines a segment, and each segment
//! gets its own rectangular [`Corridor`]. A point is "on the route" when any
//! segment corridor contains it.
//!
//! Two entry styles are provided:
//! - Free functions ([`is_within_corridor`], [`distance_along`],
//!   [`distance_from_route_start`]) build each corridor transiently while
//!   walking the path. Nothing is retained between calls.
//! - [`RouteCorridors`] builds every corridor once and indexes their bounding
//!   boxes in an R-tree, for callers that query the same route repeatedly.
//!
//! Both give identical answers.
//!
//! ## Distance convention
//!
//! Distances are signed meters:
//! - `0.0`: nothing located (also returned for routes with fewer than two points)
//! - `> 0.0`: meters travelled along the route
//! - [`PAST_ROUTE_END`] (`-1.0`): the end point was not found in any corridor,
//!   i.e. it lies beyond the known route

use std::borrow::Borrow;

use log::trace;
use rstar::{RTree, RTreeObject, AABB};

use crate::{geo_utils, Corridor, GeoPoint};

/// Sentinel distance: the target lies past the end of the known route.
pub const PAST_ROUTE_END: f64 = -1.0;

// ============================================================================
// Transient queries
// ============================================================================

/// Check whether `point` lies inside the corridor of any route segment.
///
/// Routes with fewer than two points have no segments and always return `false`.
pub fn is_within_corridor(path: &[GeoPoint], point: &GeoPoint, padding_meters: f64) -> bool {
    segment_corridors(path, padding_meters).any(|c| c.contains_point(point))
}

/// Distance along `path` from `start` to `end`, in meters.
///
/// Single forward pass over the segments with an accumulator starting at 0:
///
/// 1. If the segment corridor contains `start`, the accumulator restarts at
///    the distance from `start` to the segment's far endpoint. When `start`
///    falls in several overlapping corridors the later segment wins.
/// 2. Otherwise, if it contains `end`, the distance from the segment's first
///    endpoint to `end` is added and the walk stops.
/// 3. Otherwise, on the last segment, the result is [`PAST_ROUTE_END`].
/// 4. Otherwise, once the accumulator is positive, the whole segment length
///    is added.
///
/// A positive accumulator doubles as the "start located" flag, so a start
/// sitting exactly on a segment's far endpoint (zero progress) counts as not
/// located. `end` is never checked against the corridor that located `start`,
/// so a target in the same segment as the start is only found if a later
/// corridor also covers it.
///
/// # Example
///
/// ```rust
/// use route_corridor::{GeoPoint, route};
///
/// let path = vec![GeoPoint::new(45.000, 7.0), GeoPoint::new(45.002, 7.0), GeoPoint::new(45.004, 7.0)];
///
/// let ahead = route::distance_along(&path, &GeoPoint::new(45.001, 7.0), &GeoPoint::new(45.003, 7.0), 30.0);
/// assert!((ahead - 222.4).abs() < 1.0);
///
/// let beyond = route::distance_along(&path, &GeoPoint::new(45.001, 7.0), &GeoPoint::new(46.0, 8.0), 30.0);
/// assert_eq!(beyond, route::PAST_ROUTE_END);
/// ```
pub fn distance_along(path: &[GeoPoint], start: &GeoPoint, end: &GeoPoint, padding_meters: f64) -> f64 {
    walk_segments(path, segment_corridors(path, padding_meters), start, end)
}

/// Distance along `path` from its first point to `end`.
///
/// Empty paths return 0.
pub fn distance_from_route_start(path: &[GeoPoint], end: &GeoPoint, padding_meters: f64) -> f64 {
    match path.first() {
        Some(first) => distance_along(path, first, end, padding_meters),
        None => 0.0,
    }
}

fn segment_corridors(path: &[GeoPoint], padding_meters: f64) -> impl Iterator<Item = Corridor> + '_ {
    path.windows(2)
        .map(move |w| Corridor::around_segment(&w[0], &w[1], padding_meters))
}

/// Shared accumulation loop. `corridors` yields one corridor per segment of
/// `path`, in order.
fn walk_segments<C, I>(path: &[GeoPoint], corridors: I, start: &GeoPoint, end: &GeoPoint) -> f64
where
    C: Borrow<Corridor>,
    I: Iterator<Item = C>,
{
    let last = path.len().saturating_sub(2);
    let mut distance = 0.0;

    for (i, (segment, corridor)) in path.windows(2).zip(corridors).enumerate() {
        let corridor = corridor.borrow();
        let (l0, l1) = (&segment[0], &segment[1]);

        if corridor.contains_point(start) {
            distance = geo_utils::haversine_distance(start, l1);
            trace!("start located in segment {}, {:.1}m to its end", i, distance);
        } else if corridor.contains_point(end) {
            distance += geo_utils::haversine_distance(l0, end);
            trace!("end located in segment {}, total {:.1}m", i, distance);
            break;
        } else if i == last {
            trace!("end not located within {} segments", i + 1);
            distance = PAST_ROUTE_END;
        } else if distance > 0.0 {
            distance += geo_utils::haversine_distance(l0, l1);
        }
    }

    distance
}

// ============================================================================
// Prebuilt corridors
// ============================================================================

/// Bounding box of one segment corridor (used for spatial indexing).
#[derive(Debug, Clone)]
struct SegmentEnvelope {
    segment: usize,
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

impl RTreeObject for SegmentEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.min_lng, self.min_lat],
            [self.max_lng, self.max_lat],
        )
    }
}

/// All segment corridors of a route, built once.
///
/// Containment queries go through an R-tree over the corridor bounding boxes,
/// so only segments near the point are ray-cast. Distance queries walk the
/// stored corridors in order with the same rules as [`distance_along`].
///
/// # Example
///
/// ```rust
/// use route_corridor::{GeoPoint, RouteCorridors};
///
/// let path: Vec<GeoPoint> = (0..20)
///     .map(|i| GeoPoint::new(51.5 + i as f64 * 0.001, -0.12))
///     .collect();
/// let corridors = RouteCorridors::build(path, 30.0);
///
/// assert_eq!(corridors.segment_count(), 19);
/// assert!(corridors.contains(&GeoPoint::new(51.5105, -0.12)));
/// assert!(!corridors.contains(&GeoPoint::new(51.5105, -0.11)));
/// ```
#[derive(Debug, Clone)]
pub struct RouteCorridors {
    path: Vec<GeoPoint>,
    padding_meters: f64,
    corridors: Vec<Corridor>,
    index: RTree<SegmentEnvelope>,
}

impl RouteCorridors {
    /// Build corridors for every segment of `path`.
    pub fn build(path: Vec<GeoPoint>, padding_meters: f64) -> Self {
        let corridors: Vec<Corridor> = segment_corridors(&path, padding_meters).collect();

        let envelopes: Vec<SegmentEnvelope> = corridors
            .iter()
            .enumerate()
            .filter_map(|(segment, c)| {
                let low = c.bounds().low()?;
                let high = c.bounds().high()?;
                Some(SegmentEnvelope {
                    segment,
                    min_lat: low.latitude,
                    max_lat: high.latitude,
                    min_lng: low.longitude,
                    max_lng: high.longitude,
                })
            })
            .collect();

        Self {
            path,
            padding_meters,
            corridors,
            index: RTree::bulk_load(envelopes),
        }
    }

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    pub fn padding_meters(&self) -> f64 {
        self.padding_meters
    }

    pub fn segment_count(&self) -> usize {
        self.corridors.len()
    }

    pub fn corridor(&self, segment: usize) -> Option<&Corridor> {
        self.corridors.get(segment)
    }

    /// Total route length in meters.
    pub fn length_meters(&self) -> f64 {
        geo_utils::polyline_length(&self.path)
    }

    /// Same answer as [`is_within_corridor`] on this route.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let probe = AABB::from_point([point.longitude, point.latitude]);
        self.index
            .locate_in_envelope_intersecting(&probe)
            .any(|env| self.corridors[env.segment].contains_point(point))
    }

    /// Same answer as [`distance_along`] on this route.
    pub fn distance_along(&self, start: &GeoPoint, end: &GeoPoint) -> f64 {
        walk_segments(&self.path, self.corridors.iter(), start, end)
    }

    /// Same answer as [`distance_from_route_start`] on this route.
    pub fn distance_from_route_start(&self, end: &GeoPoint) -> f64 {
        match self.path.first() {
            Some(first) => self.distance_along(first, end),
            None => 0.0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::{destination, haversine_distance};

    const PADDING: f64 = 30.0;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    /// Four points due north, ~222m apart.
    fn straight_route() -> Vec<GeoPoint> {
        (0..4)
            .map(|i| GeoPoint::new(45.0 + i as f64 * 0.002, 7.0))
            .collect()
    }

    /// North for ~440m, then east for ~315m.
    fn l_route() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(45.000, 7.000),
            GeoPoint::new(45.002, 7.000),
            GeoPoint::new(45.004, 7.000),
            GeoPoint::new(45.004, 7.002),
            GeoPoint::new(45.004, 7.004),
        ]
    }

    #[test]
    fn test_degenerate_paths() {
        let p = GeoPoint::new(45.0, 7.0);
        let empty: Vec<GeoPoint> = vec![];
        let single = vec![p];

        assert!(!is_within_corridor(&empty, &p, PADDING));
        assert!(!is_within_corridor(&single, &p, PADDING));
        assert_eq!(distance_along(&empty, &p, &p, PADDING), 0.0);
        assert_eq!(distance_along(&single, &p, &p, PADDING), 0.0);
        assert_eq!(distance_from_route_start(&empty, &p, PADDING), 0.0);
        assert_eq!(distance_from_route_start(&single, &p, PADDING), 0.0);
    }

    #[test]
    fn test_within_corridor() {
        let path = l_route();
        assert!(is_within_corridor(&path, &GeoPoint::new(45.001, 7.0), PADDING));
        assert!(is_within_corridor(&path, &GeoPoint::new(45.004, 7.003), PADDING));
        assert!(is_within_corridor(&path, &destination(&GeoPoint::new(45.003, 7.0), 90.0, 20.0), PADDING));
        assert!(!is_within_corridor(&path, &destination(&GeoPoint::new(45.003, 7.0), 90.0, 45.0), PADDING));
        assert!(!is_within_corridor(&path, &GeoPoint::new(45.01, 7.01), PADDING));
    }

    #[test]
    fn test_distance_accumulates_over_segments() {
        let path = straight_route();
        let start = GeoPoint::new(45.0005, 7.0);
        let end = GeoPoint::new(45.005, 7.0);

        let expected = haversine_distance(&start, &path[1])
            + haversine_distance(&path[1], &path[2])
            + haversine_distance(&path[2], &end);
        let d = distance_along(&path, &start, &end, PADDING);
        assert!(approx_eq(d, expected, 1e-6));
        // Straight line, so this matches the direct distance
        assert!(approx_eq(d, haversine_distance(&start, &end), 1e-3));
    }

    #[test]
    fn test_distance_around_corner() {
        let path = l_route();
        let start = GeoPoint::new(45.001, 7.0);
        let end = GeoPoint::new(45.004, 7.003);

        let expected = haversine_distance(&start, &path[1])
            + haversine_distance(&path[1], &path[2])
            + haversine_distance(&path[2], &path[3])
            + haversine_distance(&path[3], &end);
        assert!(approx_eq(distance_along(&path, &start, &end, PADDING), expected, 1e-6));
    }

    #[test]
    fn test_distance_from_route_start() {
        let path = straight_route();
        let end = GeoPoint::new(45.003, 7.0);
        let d = distance_from_route_start(&path, &end, PADDING);
        // path[0] sits on the edge of the first corridor; either it is
        // located there (full first segment) or the walk starts from zero.
        let located = haversine_distance(&path[0], &path[1]) + haversine_distance(&path[1], &end);
        let unlocated = haversine_distance(&path[1], &end);
        assert!(approx_eq(d, located, 1e-6) || approx_eq(d, unlocated, 1e-6), "got {}", d);
    }

    #[test]
    fn test_sentinel_when_end_is_off_route() {
        let path = straight_route();
        let start = GeoPoint::new(45.001, 7.0);
        let d = distance_along(&path, &start, &GeoPoint::new(46.0, 8.0), PADDING);
        assert_eq!(d, PAST_ROUTE_END);
    }

    #[test]
    fn test_sentinel_when_nothing_located() {
        let path = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.0)];
        let d = distance_along(&path, &GeoPoint::new(0.5, 0.5), &GeoPoint::new(1.0, 1.0), PADDING);
        assert_eq!(d, PAST_ROUTE_END);
    }

    #[test]
    fn test_start_in_last_segment_is_not_sentinel() {
        // Locating the start in the final segment takes precedence over the
        // end-of-route check.
        let path = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.0)];
        let start = GeoPoint::new(0.002, 0.0);
        let d = distance_along(&path, &start, &GeoPoint::new(1.0, 1.0), PADDING);
        assert!(approx_eq(d, haversine_distance(&start, &path[1]), 1e-6));
    }

    #[test]
    fn test_end_before_start_located() {
        // End found first: progress is measured from that segment's start.
        let path = straight_route();
        let start = GeoPoint::new(45.005, 7.0);
        let end = GeoPoint::new(45.001, 7.0);
        let d = distance_along(&path, &start, &end, PADDING);
        assert!(approx_eq(d, haversine_distance(&path[0], &end), 1e-6));
    }

    #[test]
    fn test_target_in_start_segment_is_missed() {
        let path = straight_route();
        let start = GeoPoint::new(45.0005, 7.0);
        let end = GeoPoint::new(45.0015, 7.0);
        assert_eq!(distance_along(&path, &start, &end, PADDING), PAST_ROUTE_END);
    }

    #[test]
    fn test_overlap_later_segment_wins() {
        // Sharp reversal: the second segment doubles back over the first,
        // so a start near the middle is inside both corridors.
        let path = vec![
            GeoPoint::new(45.000, 7.0),
            GeoPoint::new(45.004, 7.0),
            GeoPoint::new(45.000, 7.0001),
            GeoPoint::new(44.996, 7.0001),
        ];
        let start = GeoPoint::new(45.002, 7.00005);
        let end = GeoPoint::new(44.998, 7.0001);

        let from_second = haversine_distance(&start, &path[2]) + haversine_distance(&path[2], &end);
        let d = distance_along(&path, &start, &end, PADDING);
        assert!(approx_eq(d, from_second, 1e-6), "got {}, expected {}", d, from_second);
    }

    #[test]
    fn test_distance_monotonic_along_route() {
        // A -> B -> C, start inside the first segment
        let path = vec![
            GeoPoint::new(45.000, 7.0),
            GeoPoint::new(45.002, 7.0),
            GeoPoint::new(45.004, 7.0),
        ];
        let start = GeoPoint::new(45.0002, 7.0);

        // Targets stop short of C: past C the end is no longer located.
        let mut previous = f64::NEG_INFINITY;
        for step in 1..38 {
            let target = GeoPoint::new(45.0002 + step as f64 * 0.0001, 7.0);
            let d = distance_along(&path, &start, &target, PADDING);
            assert!(d >= previous, "distance dropped to {} at step {}", d, step);
            previous = d;
        }
        // Last target is on the second segment, so it was measured
        assert!(previous > 0.0);
    }

    #[test]
    fn test_route_corridors_match_transient_queries() {
        let path = l_route();
        let corridors = RouteCorridors::build(path.clone(), PADDING);
        assert_eq!(corridors.segment_count(), path.len() - 1);

        let probes = [
            GeoPoint::new(45.0005, 7.0),
            GeoPoint::new(45.0035, 7.0002),
            GeoPoint::new(45.004, 7.0025),
            GeoPoint::new(45.0041, 7.0039),
            GeoPoint::new(45.002, 7.001),
            GeoPoint::new(44.9, 7.0),
            destination(&GeoPoint::new(45.001, 7.0), 270.0, 29.0),
            destination(&GeoPoint::new(45.001, 7.0), 270.0, 31.0),
        ];

        for p in &probes {
            assert_eq!(corridors.contains(p), is_within_corridor(&path, p, PADDING), "{:?}", p);
            assert_eq!(
                corridors.distance_from_route_start(p),
                distance_from_route_start(&path, p, PADDING),
                "{:?}",
                p
            );
            for q in &probes {
                assert_eq!(corridors.distance_along(p, q), distance_along(&path, p, q, PADDING));
            }
        }
    }

    #[test]
    fn test_route_corridors_empty_route() {
        let corridors = RouteCorridors::build(vec![], PADDING);
        let p = GeoPoint::new(0.0, 0.0);
        assert_eq!(corridors.segment_count(), 0);
        assert!(!corridors.contains(&p));
        assert_eq!(corridors.distance_from_route_start(&p), 0.0);
        assert_eq!(corridors.length_meters(), 0.0);
    }
}
