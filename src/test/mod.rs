pub(crate) mod linestring;
pub(crate) mod polygon;

pub(crate) use linestring::line_string;
pub(crate) use multipoint::multi_point;
pub(crate) use point::point;
pub(crate) use polygon::{multi_polygon, polygon, polygon_with_hole};
pub(crate) use store::MemoryStore;
