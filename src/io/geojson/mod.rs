//! Read from and write to [GeoJSON](https://geojson.org/) geometry objects.

pub use reader::{read_geojson_geometry, to_array};
pub use writer::{
    to_geojson, to_geometry_expression, Crs, CrsProperties, GeoJsonDocument, DEFAULT_SRID,
};

mod reader;
mod writer;
