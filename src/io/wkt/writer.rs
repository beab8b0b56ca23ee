use itertools::Itertools;

use crate::coord::{check_finite, close_ring, Coord, Coordinates};
use crate::error::{GeoSqlError, Result};
use crate::kind::GeometryKind;

/// Encode a coordinate tree as WKT for the given kind.
///
/// Components are space separated and points comma separated with no padding, e.g.
/// `LINESTRING(0 0,1 1)`. Polygon and MultiPolygon rings that are not closed get a copy of
/// their first point appended; an already closed ring is written as is.
///
/// Fails with [`GeoSqlError::EmptyGeometry`] instead of writing degenerate text such as
/// `POINT()`, with [`GeoSqlError::ShapeMismatch`] when the tree depth does not fit `kind` and
/// with [`GeoSqlError::MalformedCoordinate`] on a NaN or infinite component.
pub fn write_wkt(kind: GeometryKind, coordinates: &Coordinates) -> Result<String> {
    if coordinates.is_empty() {
        return Err(GeoSqlError::EmptyGeometry(kind));
    }
    if coordinates.depth() != kind.depth() {
        return Err(GeoSqlError::ShapeMismatch {
            kind,
            expected: kind.depth(),
            found: coordinates.depth(),
        });
    }

    let body = match coordinates {
        Coordinates::Position(coord) => position_to_wkt(kind, coord)?,
        Coordinates::Positions(coords) => positions_to_wkt(kind, coords)?,
        Coordinates::Rings(rings) => rings_to_wkt(kind, rings)?,
        Coordinates::Polygons(polygons) => {
            if polygons.is_empty() {
                return Err(GeoSqlError::EmptyGeometry(kind));
            }
            polygons
                .iter()
                .map(|rings| rings_to_wkt(kind, rings).map(|rings| format!("({})", rings)))
                .collect::<Result<Vec<_>>>()?
                .join(",")
        }
    };

    Ok(format!("{}({})", kind.wkt_keyword(), body))
}

fn position_to_wkt(kind: GeometryKind, coord: &Coord) -> Result<String> {
    if coord.is_empty() {
        return Err(GeoSqlError::EmptyGeometry(kind));
    }
    check_finite(coord)?;
    Ok(coord.iter().join(" "))
}

fn positions_to_wkt(kind: GeometryKind, coords: &[Coord]) -> Result<String> {
    if coords.is_empty() {
        return Err(GeoSqlError::EmptyGeometry(kind));
    }
    Ok(coords
        .iter()
        .map(|coord| position_to_wkt(kind, coord))
        .collect::<Result<Vec<_>>>()?
        .join(","))
}

fn rings_to_wkt(kind: GeometryKind, rings: &[Vec<Coord>]) -> Result<String> {
    if rings.is_empty() {
        return Err(GeoSqlError::EmptyGeometry(kind));
    }
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        let points = if kind.has_rings() {
            let mut closed = ring.clone();
            close_ring(&mut closed);
            positions_to_wkt(kind, &closed)?
        } else {
            positions_to_wkt(kind, ring)?
        };
        out.push(format!("({})", points));
    }
    Ok(out.join(","))
}
