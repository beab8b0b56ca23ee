use crate::coord::Coordinates;

pub(crate) fn line_string() -> Coordinates {
    Coordinates::Positions(vec![vec![30., 10.], vec![10., 30.], vec![40., 40.]])
}
