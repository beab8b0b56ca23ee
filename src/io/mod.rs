//! Readers and writers for the text encodings of a geometry, and interoperability with the
//! `geo` crate.

pub mod geo;
pub mod geojson;
pub mod wkt;
