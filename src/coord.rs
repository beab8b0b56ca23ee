//! The in-memory coordinate tree shared by every codec.

use serde::{Deserialize, Serialize};

use crate::error::{GeoSqlError, Result};
use crate::kind::GeometryKind;

/// An ordered sequence of numeric components, usually `[longitude, latitude]`.
///
/// The arity is not fixed: `[x, y, z]` and `[x, y, z, m]` pass through every codec unchanged.
pub type Coord = Vec<f64>;

/// A nested array of coordinates.
///
/// Variants are named by nesting depth rather than by geometry kind, because MultiPoint and
/// LineString (or Polygon and MultiLineString) share a shape. Pair it with a [`GeometryKind`]
/// through [`Geometry`] to get a checked combination.
///
/// This (de)serializes as bare JSON arrays. An empty array always reads back as an empty
/// [`Coordinates::Position`], since depth cannot be recovered from `[]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinates {
    Position(Coord),
    Positions(Vec<Coord>),
    Rings(Vec<Vec<Coord>>),
    Polygons(Vec<Vec<Vec<Coord>>>),
}

impl Coordinates {
    /// Nesting depth, matching [`GeometryKind::depth`].
    pub fn depth(&self) -> usize {
        match self {
            Coordinates::Position(_) => 1,
            Coordinates::Positions(_) => 2,
            Coordinates::Rings(_) => 3,
            Coordinates::Polygons(_) => 4,
        }
    }

    /// `true` when the outermost level holds nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Coordinates::Position(c) => c.is_empty(),
            Coordinates::Positions(c) => c.is_empty(),
            Coordinates::Rings(c) => c.is_empty(),
            Coordinates::Polygons(c) => c.is_empty(),
        }
    }

    /// Every point of the tree, in order.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Coordinates::Position(c) => Box::new(std::iter::once(c)),
            Coordinates::Positions(c) => Box::new(c.iter()),
            Coordinates::Rings(c) => Box::new(c.iter().flatten()),
            Coordinates::Polygons(c) => Box::new(c.iter().flatten().flatten()),
        }
    }
}

/// Fail with [`GeoSqlError::MalformedCoordinate`] on a NaN or infinite component.
pub(crate) fn check_finite(coord: &Coord) -> Result<()> {
    match coord.iter().find(|c| !c.is_finite()) {
        Some(c) => Err(GeoSqlError::MalformedCoordinate(format!(
            "`{}` is not a finite number",
            c
        ))),
        None => Ok(()),
    }
}

impl From<Coord> for Coordinates {
    fn from(value: Coord) -> Self {
        Coordinates::Position(value)
    }
}

impl From<Vec<Coord>> for Coordinates {
    fn from(value: Vec<Coord>) -> Self {
        Coordinates::Positions(value)
    }
}

impl From<Vec<Vec<Coord>>> for Coordinates {
    fn from(value: Vec<Vec<Coord>>) -> Self {
        Coordinates::Rings(value)
    }
}

impl From<Vec<Vec<Vec<Coord>>>> for Coordinates {
    fn from(value: Vec<Vec<Vec<Coord>>>) -> Self {
        Coordinates::Polygons(value)
    }
}

/// Append a copy of the first point when it differs from the last one.
///
/// Empty rings are left alone, and an already closed ring is never extended.
pub fn close_ring(ring: &mut Vec<Coord>) {
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            let first = first.clone();
            ring.push(first);
        }
    }
}

/// A [`GeometryKind`] together with coordinates of the matching depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    kind: GeometryKind,
    coordinates: Coordinates,
}

impl Geometry {
    /// Pair a kind with its coordinates, checking that the nesting depth agrees.
    ///
    /// An empty tree fails with [`GeoSqlError::EmptyGeometry`] whatever its depth, since `[]`
    /// always reads back as an empty position.
    pub fn try_new(kind: GeometryKind, coordinates: Coordinates) -> Result<Self> {
        if coordinates.is_empty() {
            return Err(GeoSqlError::EmptyGeometry(kind));
        }
        if kind.depth() != coordinates.depth() {
            return Err(GeoSqlError::ShapeMismatch {
                kind,
                expected: kind.depth(),
                found: coordinates.depth(),
            });
        }
        Ok(Self { kind, coordinates })
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn into_coordinates(self) -> Coordinates {
        self.coordinates
    }

    /// Close every ring of a Polygon or MultiPolygon. Other kinds are returned as is.
    pub fn normalize(mut self) -> Self {
        if self.kind.has_rings() {
            match &mut self.coordinates {
                Coordinates::Rings(rings) => rings.iter_mut().for_each(close_ring),
                Coordinates::Polygons(polygons) => polygons
                    .iter_mut()
                    .flat_map(|rings| rings.iter_mut())
                    .for_each(close_ring),
                _ => {}
            }
        }
        self
    }
}
