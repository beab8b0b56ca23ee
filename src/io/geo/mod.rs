//! Convert between coordinate trees and [`geo`] geometries.
//!
//! Only the first two components of every coordinate survive the trip into `geo`.

use crate::coord::{Coord, Coordinates, Geometry};
use crate::error::{GeoSqlError, Result};
use crate::kind::GeometryKind;

fn coord_to_geo(coord: &Coord) -> Result<geo::Coord<f64>> {
    match coord.as_slice() {
        [x, y, ..] => Ok(geo::Coord { x: *x, y: *y }),
        _ => Err(GeoSqlError::MalformedCoordinate(format!(
            "need at least x and y, found {} components",
            coord.len()
        ))),
    }
}

fn line_string_to_geo(coords: &[Coord]) -> Result<geo::LineString<f64>> {
    Ok(geo::LineString::new(
        coords.iter().map(coord_to_geo).collect::<Result<_>>()?,
    ))
}

fn polygon_to_geo(kind: GeometryKind, rings: &[Vec<Coord>]) -> Result<geo::Polygon<f64>> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or(GeoSqlError::EmptyGeometry(kind))?;
    Ok(geo::Polygon::new(
        line_string_to_geo(exterior)?,
        interiors
            .iter()
            .map(|ring| line_string_to_geo(ring))
            .collect::<Result<_>>()?,
    ))
}

impl TryFrom<&Geometry> for geo::Geometry<f64> {
    type Error = GeoSqlError;

    fn try_from(value: &Geometry) -> Result<Self> {
        let kind = value.kind();
        let out = match (kind, value.coordinates()) {
            (GeometryKind::Point, Coordinates::Position(coord)) => {
                geo::Geometry::Point(geo::Point(coord_to_geo(coord)?))
            }
            (GeometryKind::MultiPoint, Coordinates::Positions(coords)) => {
                geo::Geometry::MultiPoint(geo::MultiPoint::new(
                    coords
                        .iter()
                        .map(|coord| coord_to_geo(coord).map(geo::Point))
                        .collect::<Result<_>>()?,
                ))
            }
            (GeometryKind::LineString, Coordinates::Positions(coords)) => {
                geo::Geometry::LineString(line_string_to_geo(coords)?)
            }
            (GeometryKind::MultiLineString, Coordinates::Rings(lines)) => {
                geo::Geometry::MultiLineString(geo::MultiLineString::new(
                    lines
                        .iter()
                        .map(|line| line_string_to_geo(line))
                        .collect::<Result<_>>()?,
                ))
            }
            (GeometryKind::Polygon, Coordinates::Rings(rings)) => {
                geo::Geometry::Polygon(polygon_to_geo(kind, rings)?)
            }
            (GeometryKind::MultiPolygon, Coordinates::Polygons(polygons)) => {
                geo::Geometry::MultiPolygon(geo::MultiPolygon::new(
                    polygons
                        .iter()
                        .map(|rings| polygon_to_geo(kind, rings))
                        .collect::<Result<_>>()?,
                ))
            }
            (kind, coordinates) => {
                return Err(GeoSqlError::ShapeMismatch {
                    kind,
                    expected: kind.depth(),
                    found: coordinates.depth(),
                })
            }
        };
        Ok(out)
    }
}

fn coord_from_geo(coord: &geo::Coord<f64>) -> Coord {
    vec![coord.x, coord.y]
}

fn coords_of(line: &geo::LineString<f64>) -> Vec<Coord> {
    line.coords().map(coord_from_geo).collect()
}

fn rings_of(polygon: &geo::Polygon<f64>) -> Vec<Vec<Coord>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(coords_of)
        .collect()
}

impl TryFrom<&geo::Geometry<f64>> for Geometry {
    type Error = GeoSqlError;

    fn try_from(value: &geo::Geometry<f64>) -> Result<Self> {
        let (kind, coordinates) = match value {
            geo::Geometry::Point(point) => (
                GeometryKind::Point,
                Coordinates::Position(vec![point.x(), point.y()]),
            ),
            geo::Geometry::Line(line) => (
                GeometryKind::LineString,
                Coordinates::Positions(vec![
                    coord_from_geo(&line.start),
                    coord_from_geo(&line.end),
                ]),
            ),
            geo::Geometry::LineString(line) => (
                GeometryKind::LineString,
                Coordinates::Positions(coords_of(line)),
            ),
            geo::Geometry::MultiPoint(points) => (
                GeometryKind::MultiPoint,
                Coordinates::Positions(points.iter().map(|p| vec![p.x(), p.y()]).collect()),
            ),
            geo::Geometry::MultiLineString(lines) => (
                GeometryKind::MultiLineString,
                Coordinates::Rings(lines.iter().map(coords_of).collect()),
            ),
            geo::Geometry::Polygon(polygon) => {
                (GeometryKind::Polygon, Coordinates::Rings(rings_of(polygon)))
            }
            geo::Geometry::Rect(rect) => (
                GeometryKind::Polygon,
                Coordinates::Rings(rings_of(&rect.to_polygon())),
            ),
            geo::Geometry::Triangle(triangle) => (
                GeometryKind::Polygon,
                Coordinates::Rings(rings_of(&triangle.to_polygon())),
            ),
            geo::Geometry::MultiPolygon(polygons) => (
                GeometryKind::MultiPolygon,
                Coordinates::Polygons(polygons.iter().map(rings_of).collect()),
            ),
            geo::Geometry::GeometryCollection(_) => {
                return Err(GeoSqlError::UnsupportedGeometryKind(
                    "GeometryCollection".to_string(),
                ))
            }
        };
        Geometry::try_new(kind, coordinates)
    }
}
