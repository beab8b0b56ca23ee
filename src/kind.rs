//! The closed set of geometry types this crate knows how to encode.

use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::GeoSqlError;

/// A geometry type tag.
///
/// Serialized with its GeoJSON name (`"Point"`, `"MultiPolygon"`, ...). Parsing is
/// case-insensitive, so WKT keywords such as `LINESTRING` are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

static KIND_NAMES: phf::Map<&'static str, GeometryKind> = phf_map! {
    "point" => GeometryKind::Point,
    "multipoint" => GeometryKind::MultiPoint,
    "linestring" => GeometryKind::LineString,
    "multilinestring" => GeometryKind::MultiLineString,
    "polygon" => GeometryKind::Polygon,
    "multipolygon" => GeometryKind::MultiPolygon,
};

impl GeometryKind {
    /// The GeoJSON `type` member for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    /// The WKT keyword for this kind.
    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
        }
    }

    /// How many array levels wrap the numbers of a coordinate tree of this kind.
    ///
    /// A point is one level (`[x, y]`), a polygon three (`[[[x, y], ...], ...]`).
    pub fn depth(&self) -> usize {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::MultiPoint | GeometryKind::LineString => 2,
            GeometryKind::MultiLineString | GeometryKind::Polygon => 3,
            GeometryKind::MultiPolygon => 4,
        }
    }

    /// Whether rings of this kind are closed on encode.
    pub fn has_rings(&self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryKind {
    type Err = GeoSqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KIND_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| GeoSqlError::UnsupportedGeometryKind(s.to_string()))
    }
}

impl TryFrom<String> for GeometryKind {
    type Error = GeoSqlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for GeometryKind {
    type Error = GeoSqlError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_names_and_keywords() {
        assert_eq!("Point".parse::<GeometryKind>().unwrap(), GeometryKind::Point);
        assert_eq!(
            "MULTILINESTRING".parse::<GeometryKind>().unwrap(),
            GeometryKind::MultiLineString
        );
        assert_eq!(
            " polygon ".parse::<GeometryKind>().unwrap(),
            GeometryKind::Polygon
        );
    }

    #[test]
    fn reject_unknown_name() {
        let err = "GeometryCollection".parse::<GeometryKind>().unwrap_err();
        assert!(matches!(err, GeoSqlError::UnsupportedGeometryKind(name) if name == "GeometryCollection"));
    }

    #[test]
    fn serde_uses_geojson_names() {
        let json = serde_json::to_string(&GeometryKind::MultiPoint).unwrap();
        assert_eq!(json, "\"MultiPoint\"");
        let kind: GeometryKind = serde_json::from_str("\"linestring\"").unwrap();
        assert_eq!(kind, GeometryKind::LineString);
        assert!(serde_json::from_str::<GeometryKind>("\"Circle\"").is_err());
    }
}
