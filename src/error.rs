//! Defines [`GeoSqlError`], representing all errors returned by this crate.

use std::error::Error;

use thiserror::Error;

use crate::kind::GeometryKind;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoSqlError {
    /// A geometry type name that has no codec.
    #[error("Unsupported geometry kind: {0}")]
    UnsupportedGeometryKind(String),

    /// Encoding was asked for a geometry with no points or no rings.
    #[error("Empty geometry cannot be encoded as {0}")]
    EmptyGeometry(GeometryKind),

    /// WKT text does not start with the keyword of the expected kind.
    #[error("Expected {expected} WKT, found: {found}")]
    TypeMismatch {
        expected: GeometryKind,
        found: String,
    },

    /// Nesting depth of the coordinates does not match the geometry kind.
    #[error("{kind} expects coordinates nested {expected} deep, found {found}")]
    ShapeMismatch {
        kind: GeometryKind,
        expected: usize,
        found: usize,
    },

    /// A coordinate component that is not a number.
    #[error("Malformed coordinate: {0}")]
    MalformedCoordinate(String),

    /// Invalid JSON, or a document without a `coordinates` member.
    #[error("Malformed GeoJSON: {0}")]
    MalformedGeoJson(String),

    /// Radius unit outside of deg/km/m.
    #[error("Invalid radius unit: {0}")]
    InvalidRadiusUnit(String),

    /// A required configuration field is unset or unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Wraps an error raised by a host collaborator, e.g. an [`SqlExecutor`].
    ///
    /// [`SqlExecutor`]: crate::behavior::SqlExecutor
    #[error("External error: {0}")]
    External(#[from] Box<dyn Error + Send + Sync>),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoSqlError>;

impl From<serde_json::Error> for GeoSqlError {
    fn from(err: serde_json::Error) -> Self {
        GeoSqlError::MalformedGeoJson(err.to_string())
    }
}

impl From<geojson::Error> for GeoSqlError {
    fn from(err: geojson::Error) -> Self {
        GeoSqlError::MalformedGeoJson(err.to_string())
    }
}
