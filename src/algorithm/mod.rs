//! Computations that produce SQL for derived geometries.

pub mod buffer;
