use serde::Deserialize;

use crate::coord::{Coordinates, Geometry};
use crate::error::{GeoSqlError, Result};
use crate::kind::GeometryKind;

/// Extract the `coordinates` member of a GeoJSON object.
///
/// Nothing else in the document is inspected: the `type` member is not read and the nesting
/// is returned as found.
pub fn to_array(geojson: &str) -> Result<Coordinates> {
    let value: serde_json::Value = serde_json::from_str(geojson)?;
    let coordinates = value.get("coordinates").ok_or_else(|| {
        GeoSqlError::MalformedGeoJson("missing `coordinates` member".to_string())
    })?;
    Ok(Coordinates::deserialize(coordinates)?)
}

/// Parse a GeoJSON geometry, or a feature carrying one, into a typed [`Geometry`].
///
/// Unlike [`to_array`] this validates the document, and the kind is taken from its `type`
/// member.
pub fn read_geojson_geometry(geojson: &str) -> Result<Geometry> {
    let geometry = match geojson.parse::<geojson::GeoJson>()? {
        geojson::GeoJson::Geometry(geometry) => geometry,
        geojson::GeoJson::Feature(feature) => feature.geometry.ok_or_else(|| {
            GeoSqlError::MalformedGeoJson("feature without a geometry".to_string())
        })?,
        geojson::GeoJson::FeatureCollection(_) => {
            return Err(GeoSqlError::MalformedGeoJson(
                "expected a geometry, found a feature collection".to_string(),
            ))
        }
    };

    let (kind, coordinates) = match geometry.value {
        geojson::Value::Point(point) => (GeometryKind::Point, Coordinates::Position(point)),
        geojson::Value::MultiPoint(points) => {
            (GeometryKind::MultiPoint, Coordinates::Positions(points))
        }
        geojson::Value::LineString(line) => {
            (GeometryKind::LineString, Coordinates::Positions(line))
        }
        geojson::Value::MultiLineString(lines) => {
            (GeometryKind::MultiLineString, Coordinates::Rings(lines))
        }
        geojson::Value::Polygon(rings) => (GeometryKind::Polygon, Coordinates::Rings(rings)),
        geojson::Value::MultiPolygon(polygons) => {
            (GeometryKind::MultiPolygon, Coordinates::Polygons(polygons))
        }
        geojson::Value::GeometryCollection(_) => {
            return Err(GeoSqlError::UnsupportedGeometryKind(
                "GeometryCollection".to_string(),
            ))
        }
    };
    Geometry::try_new(kind, coordinates)
}
