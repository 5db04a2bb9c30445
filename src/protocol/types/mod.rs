//! User-facing data types parsed from gateway results.

mod column;
mod row;

pub use column::Column;
pub use row::Row;
