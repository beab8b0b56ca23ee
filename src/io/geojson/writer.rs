use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::coord::{check_finite, Coordinates};
use crate::error::Result;
use crate::expr::{st_geom_from_geojson, Expression};
use crate::kind::GeometryKind;

/// The SRID used when a caller does not choose one: WGS 84.
pub const DEFAULT_SRID: u32 = 4326;

/// A GeoJSON geometry object with an optional named CRS.
///
/// Members serialize in the order `type`, `coordinates`, `crs`; `crs` is left out entirely when
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonDocument<'a> {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: Cow<'a, Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Crs>,
}

/// A named CRS member, `{"type": "name", "properties": {"name": "EPSG:4326"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    #[serde(rename = "type")]
    pub crs_type: String,
    pub properties: CrsProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

impl Crs {
    pub fn epsg(srid: u32) -> Self {
        Self {
            crs_type: "name".to_string(),
            properties: CrsProperties {
                name: format!("EPSG:{}", srid),
            },
        }
    }

    /// The numeric code of an `EPSG:<n>` or `urn:ogc:def:crs:EPSG::<n>` name.
    pub fn srid(&self) -> Option<u32> {
        let name = &self.properties.name;
        if !name.contains("EPSG") {
            return None;
        }
        name.rsplit(':').next()?.parse().ok()
    }
}

impl<'a> GeoJsonDocument<'a> {
    pub fn new(kind: GeometryKind, coordinates: &'a Coordinates, srid: Option<u32>) -> Self {
        Self {
            kind,
            coordinates: Cow::Borrowed(coordinates),
            crs: srid.map(Crs::epsg),
        }
    }
}

/// Serialize coordinates as a GeoJSON geometry object.
///
/// The coordinates are written as given; no check is made that their nesting fits `kind`.
/// A NaN or infinite component fails with [`MalformedCoordinate`](crate::GeoSqlError::MalformedCoordinate),
/// since JSON has no representation for it.
///
/// ```
/// use geosql::coord::Coordinates;
/// use geosql::io::geojson::to_geojson;
/// use geosql::kind::GeometryKind;
///
/// let point = Coordinates::Position(vec![1.5, 2.5]);
/// assert_eq!(
///     to_geojson(GeometryKind::Point, &point, None).unwrap(),
///     r#"{"type":"Point","coordinates":[1.5,2.5]}"#
/// );
/// ```
pub fn to_geojson(
    kind: GeometryKind,
    coordinates: &Coordinates,
    srid: Option<u32>,
) -> Result<String> {
    coordinates.positions().try_for_each(check_finite)?;
    Ok(serde_json::to_string(&GeoJsonDocument::new(
        kind,
        coordinates,
        srid,
    ))?)
}

/// `ST_GeomFromGeoJSON('<json>')` for the coordinates, or SQL `NULL` when there are none.
pub fn to_geometry_expression(
    kind: GeometryKind,
    coordinates: Option<&Coordinates>,
    srid: Option<u32>,
) -> Result<Expression> {
    match coordinates {
        Some(coordinates) if !coordinates.is_empty() => {
            Ok(st_geom_from_geojson(&to_geojson(kind, coordinates, srid)?))
        }
        _ => Ok(Expression::null()),
    }
}
