//! Error type shared by every fallible operation in the crate.
//!
//! The geometric core is almost entirely total: degenerate routes produce
//! documented values (`false`, `0.0`, [`PAST_ROUTE_END`](crate::route::PAST_ROUTE_END))
//! instead of errors. The variants below cover precondition violations on
//! the geometry types plus the decoding and transport failures of the
//! optional `geojson` and `http` layers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeofenceError {
    /// Containment was queried on a bounding box that never saw a point.
    #[error("bounding box is empty")]
    EmptyBounds,

    #[error("vertex index {index} out of range for corridor with {count} vertices")]
    VertexOutOfRange { index: usize, count: usize },

    #[error("corridor needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[cfg(feature = "geojson")]
    #[error("failed to decode conditions payload: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("conditions request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The conditions endpoint answered with a non-success status.
    #[error("conditions request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, GeofenceError>;
