//! Column type for described tables (user-facing API).

use crate::error::Result;
use crate::protocol::schema;
use crate::protocol::types::Row;

/// A column of a described table.
///
/// All attributes keep the gateway's string rendering; the gateway reports
/// nullability as a bare boolean, which comes through as `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Flink SQL type, e.g. `INT` or `VARCHAR(64)`.
    pub data_type: String,
    /// Whether NULL values are allowed.
    pub nullable: String,
    /// Column comment; empty when the table declares none.
    pub comment: String,
}

impl Column {
    /// Build a column from one `DESCRIBE` result row.
    ///
    /// Extraction goes through the [`schema::DESCRIBE`] descriptor, so a row
    /// shorter than the layout fails with a malformed-row error rather than
    /// fabricating missing attributes.
    pub fn from_describe_row(row: &Row) -> Result<Self> {
        let layout = schema::DESCRIBE;
        Ok(Self {
            name: layout.field_str(row, "name")?,
            data_type: layout.field_str(row, "type")?,
            nullable: layout.field_str(row, "null")?,
            comment: layout.field_str(row, "comment")?,
        })
    }
}
