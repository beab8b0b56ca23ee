//! Read and write [Well-Known Text](https://en.wikipedia.org/wiki/Well-known_text_representation_of_geometry)
//! in the compact form PostGIS returns from `ST_AsText`.

pub use reader::read_wkt;
pub use writer::write_wkt;

mod reader;
mod writer;
