//! Core value types produced by the reader

mod header;
mod row;

pub use header::Header;
pub use row::{Row, Value};
