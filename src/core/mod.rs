//! Foundation types: cells, grid bounds, neighbor enumeration.

pub mod grid;

pub use grid::{manhattan, Cell, Grid};
