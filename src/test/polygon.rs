use crate::coord::{Coord, Coordinates};

fn open_triangle(x: f64, y: f64) -> Vec<Coord> {
    vec![vec![x, y], vec![x + 1., y], vec![x + 1., y + 1.]]
}

/// A single open ring.
pub(crate) fn polygon() -> Coordinates {
    Coordinates::Rings(vec![open_triangle(0., 0.)])
}

/// An open 10x10 exterior with an open triangular hole.
pub(crate) fn polygon_with_hole() -> Coordinates {
    Coordinates::Rings(vec![
        vec![vec![0., 0.], vec![10., 0.], vec![10., 10.], vec![0., 10.]],
        vec![vec![2., 2.], vec![4., 2.], vec![4., 4.]],
    ])
}

pub(crate) fn multi_polygon() -> Coordinates {
    Coordinates::Polygons(vec![vec![open_triangle(0., 0.)], vec![open_triangle(5., 5.)]])
}
