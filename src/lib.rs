//! Codecs between coordinate arrays and the text forms a PostGIS-compatible database reads and
//! writes ([WKT](io::wkt) and [GeoJSON](io::geojson)), plus builders for the SQL expressions that
//! store them and derive [buffers](algorithm::buffer) from them.
//!
//! Everything here is a pure function of its inputs. The [`behavior`] module shows how a host
//! record layer drives the codecs through save and load without this crate doing any I/O.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use coord::{Coord, Coordinates, Geometry};
pub use error::{GeoSqlError, Result};
pub use expr::Expression;
pub use kind::GeometryKind;

pub mod algorithm;
pub mod behavior;
pub mod coord;
pub mod error;
pub mod expr;
pub mod io;
pub mod kind;
#[cfg(test)]
pub(crate) mod test;
