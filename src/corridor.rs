//! # Corridors
//!
//! A corridor is a simple polygon of geographic vertices, implicitly closed,
//! with the bounding box of those vertices precomputed. Containment uses a
//! ray-casting parity test: a ray is cast from the query point towards
//! increasing longitude and the polygon edges it crosses are counted. An odd
//! count means the point is inside.
//!
//! Latitude and longitude are treated as planar coordinates for the crossing
//! test, which is adequate for corridors a few tens of meters wide away from
//! the poles and the antimeridian.
//!
//! [`Corridor::around_segment`] builds the rectangle used for each route
//! segment.

use crate::{geo_utils, BoundingBox, GeoPoint, GeofenceError, Result};

/// Latitude nudge applied when a query point sits level with a horizontal edge.
pub const RAY_EPSILON: f64 = 1e-7;

/// A simple polygon geofence plus its bounding box.
///
/// The edge set is `(v0, v1), (v1, v2), ..., (vn-1, v0)`. The polygon may be
/// non-convex but must not self-intersect for containment to be meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct Corridor {
    vertices: Vec<GeoPoint>,
    bounds: BoundingBox,
}

impl Corridor {
    /// Build a corridor from its vertices, in edge order.
    ///
    /// # Errors
    ///
    /// [`GeofenceError::TooFewVertices`] for fewer than three vertices.
    pub fn new(vertices: Vec<GeoPoint>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeofenceError::TooFewVertices(vertices.len()));
        }
        let bounds = BoundingBox::from_points(&vertices);
        Ok(Self { vertices, bounds })
    }

    /// Rectangle buffering the segment `start -> end` by `padding_meters`
    /// on both lateral sides.
    ///
    /// The four corners are projected with [`geo_utils::destination`] on the
    /// two bearings perpendicular to the segment, in the order
    /// `start+left, start+right, end+right, end+left` (taking "left" as
    /// bearing + 90°). That order keeps the quadrilateral simple.
    ///
    /// The rectangle stops level with both endpoints: it is not extended
    /// along the segment's own bearing. Adjacent segment rectangles meet at
    /// the shared vertex, and at a turn the outer wedge between them is
    /// uncovered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use route_corridor::{Corridor, GeoPoint, geo_utils};
    ///
    /// let start = GeoPoint::new(0.0, 0.0);
    /// let end = GeoPoint::new(0.01, 0.0);
    /// let corridor = Corridor::around_segment(&start, &end, 30.0);
    ///
    /// let middle = GeoPoint::new(0.005, 0.0);
    /// assert!(corridor.contains_point(&middle));
    /// assert!(!corridor.contains_point(&geo_utils::destination(&middle, 90.0, 50.0)));
    /// ```
    pub fn around_segment(start: &GeoPoint, end: &GeoPoint, padding_meters: f64) -> Self {
        let heading = geo_utils::bearing(start, end);
        let left = (heading + 90.0) % 360.0;
        let right = (heading - 90.0).rem_euclid(360.0);

        let vertices = vec![
            geo_utils::destination(start, left, padding_meters),
            geo_utils::destination(start, right, padding_meters),
            geo_utils::destination(end, right, padding_meters),
            geo_utils::destination(end, left, padding_meters),
        ];
        let bounds = BoundingBox::from_points(&vertices);

        Self { vertices, bounds }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex at `index` in edge order.
    ///
    /// # Errors
    ///
    /// [`GeofenceError::VertexOutOfRange`] when `index >= vertex_count()`.
    pub fn vertex_at(&self, index: usize) -> Result<&GeoPoint> {
        self.vertices.get(index).ok_or(GeofenceError::VertexOutOfRange {
            index,
            count: self.vertices.len(),
        })
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Ray-casting containment test.
    ///
    /// The bounding box is checked first; a point outside it is outside the
    /// polygon.
    pub fn contains_point(&self, point: &GeoPoint) -> bool {
        // Bounds are non-empty by construction.
        if !self.bounds.contains(point).unwrap_or(false) {
            return false;
        }
        self.crossing_count(point) % 2 == 1
    }

    /// Number of polygon edges crossed by the eastward ray from `point`.
    pub fn crossing_count(&self, point: &GeoPoint) -> usize {
        let n = self.vertices.len();
        (0..n)
            .filter(|&i| ray_crosses_edge(point, &self.vertices[i], &self.vertices[(i + 1) % n]))
            .count()
    }
}

/// Whether the ray from `point` towards increasing longitude crosses the
/// edge `a -> b`.
fn ray_crosses_edge(point: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> bool {
    let (lower, upper) = if a.latitude > b.latitude { (b, a) } else { (a, b) };

    let px = point.longitude;
    let mut py = point.latitude;

    // A ray lying exactly on a horizontal edge is ambiguous
    if lower.latitude == py && upper.latitude == py {
        py += RAY_EPSILON;
    }

    if py > upper.latitude || py < lower.latitude || px > lower.longitude.max(upper.longitude) {
        return false;
    }

    // West of both endpoints: the edge spans the ray's latitude, so it is hit
    if px < lower.longitude.min(upper.longitude) {
        return true;
    }

    // Between the endpoints' longitudes: compare the slope from the lower
    // endpoint to the point against the edge's own slope.
    let edge_slope = if lower.longitude == upper.longitude {
        f64::MAX
    } else {
        (upper.latitude - lower.latitude) / (upper.longitude - lower.longitude)
    };
    let point_slope = if px == lower.longitude {
        f64::MAX
    } else {
        (py - lower.latitude) / (px - lower.longitude)
    };

    point_slope >= edge_slope
}
