//! Property-based tests for the codecs.
//!
//! - WKT round-trips for every kind, up to ring closure
//! - GeoJSON round-trips with and without an SRID
//! - Encoding closed rings is stable
//! - Degree/meter radius conversion round-trips

use approx::assert_relative_eq;
use geosql::algorithm::buffer::{to_target_unit, BufferMode, RadiusUnit};
use geosql::io::geojson::{to_array, to_geojson};
use geosql::io::wkt::{read_wkt, write_wkt};
use geosql::{Coord, Coordinates, Geometry, GeometryKind};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Whole degrees and micro-degree decimals, both of which survive a JSON float parse exactly.
fn component() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-180i32..=180).prop_map(f64::from),
        (-180_000_000i64..=180_000_000).prop_map(|micro| micro as f64 / 1e6),
    ]
}

fn coord(arity: usize) -> impl Strategy<Value = Coord> {
    prop::collection::vec(component(), arity)
}

fn positions(arity: usize) -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::vec(coord(arity), 1..12)
}

fn rings(arity: usize) -> impl Strategy<Value = Vec<Vec<Coord>>> {
    prop::collection::vec(positions(arity), 1..4)
}

/// A kind together with coordinates of the matching shape; all points share one arity.
fn geometry() -> impl Strategy<Value = (GeometryKind, Coordinates)> {
    (2usize..=4).prop_flat_map(|arity| {
        prop_oneof![
            coord(arity).prop_map(|c| (GeometryKind::Point, Coordinates::Position(c))),
            positions(arity).prop_map(|c| (GeometryKind::MultiPoint, Coordinates::Positions(c))),
            positions(arity).prop_map(|c| (GeometryKind::LineString, Coordinates::Positions(c))),
            rings(arity).prop_map(|c| (GeometryKind::MultiLineString, Coordinates::Rings(c))),
            rings(arity).prop_map(|c| (GeometryKind::Polygon, Coordinates::Rings(c))),
            prop::collection::vec(rings(arity), 1..3)
                .prop_map(|c| (GeometryKind::MultiPolygon, Coordinates::Polygons(c))),
        ]
    })
}

fn normalize(kind: GeometryKind, coordinates: Coordinates) -> Coordinates {
    Geometry::try_new(kind, coordinates)
        .unwrap()
        .normalize()
        .into_coordinates()
}

// ============================================================================
// WKT
// ============================================================================

proptest! {
    #[test]
    fn proptest_wkt_round_trip((kind, coordinates) in geometry()) {
        let text = write_wkt(kind, &coordinates).unwrap();
        let decoded = read_wkt(kind, &text).unwrap();
        prop_assert_eq!(decoded, normalize(kind, coordinates));
    }

    #[test]
    fn proptest_wkt_encoding_is_stable((kind, coordinates) in geometry()) {
        let first = write_wkt(kind, &coordinates).unwrap();
        let again = write_wkt(kind, &normalize(kind, coordinates.clone())).unwrap();
        prop_assert_eq!(&first, &again);
        prop_assert_eq!(first, write_wkt(kind, &coordinates).unwrap());
    }

    #[test]
    fn proptest_wkt_rejects_other_kinds((kind, coordinates) in geometry()) {
        let text = write_wkt(kind, &coordinates).unwrap();
        let other = if kind == GeometryKind::Point { GeometryKind::LineString } else { GeometryKind::Point };
        prop_assert!(read_wkt(other, &text).is_err());
    }
}

// ============================================================================
// GeoJSON
// ============================================================================

proptest! {
    #[test]
    fn proptest_geojson_round_trip(
        (kind, coordinates) in geometry(),
        srid in prop::option::of(1u32..100_000),
    ) {
        let text = to_geojson(kind, &coordinates, srid).unwrap();
        prop_assert_eq!(srid.is_some(), text.contains("\"crs\""));
        prop_assert_eq!(to_array(&text).unwrap(), coordinates);
    }
}

// ============================================================================
// Radius conversion
// ============================================================================

proptest! {
    #[test]
    fn proptest_degree_meter_round_trip(radius in 1.0e-6f64..90.0) {
        let meters = to_target_unit(radius, RadiusUnit::Degree, BufferMode::Geography);
        let degrees = to_target_unit(meters, RadiusUnit::Meter, BufferMode::Geometry);
        assert_relative_eq!(degrees, radius, max_relative = 1e-12);
    }

    #[test]
    fn proptest_kilometer_paths_agree(radius in 1.0e-6f64..10_000.0) {
        let via_degrees = to_target_unit(
            to_target_unit(radius, RadiusUnit::Kilometer, BufferMode::Geometry),
            RadiusUnit::Degree,
            BufferMode::Geography,
        );
        let direct = to_target_unit(radius, RadiusUnit::Kilometer, BufferMode::Geography);
        assert_relative_eq!(via_degrees, direct, max_relative = 1e-12);
    }
}
