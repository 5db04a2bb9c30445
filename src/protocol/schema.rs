//! Result-schema descriptors for decode-by-name field extraction.
//!
//! The gateway returns positional rows whose layout depends on the statement
//! kind and the gateway version. Decoding against a named descriptor keeps
//! the positions in one place and fails loudly when a row is shorter than
//! the layout requires, instead of silently indexing past the end.

use crate::error::{Error, Result};
use crate::protocol::types::Row;

/// Ordered field layout of one result kind.
#[derive(Debug, Clone, Copy)]
pub struct ResultSchema {
    /// Statement kind this layout belongs to.
    pub name: &'static str,
    /// Field names in the order the gateway lays them out.
    pub fields: &'static [&'static str],
}

/// `SHOW CATALOGS` result layout.
pub const SHOW_CATALOGS: ResultSchema = ResultSchema {
    name: "SHOW CATALOGS",
    fields: &["catalog name"],
};

/// `SHOW DATABASES` result layout.
pub const SHOW_DATABASES: ResultSchema = ResultSchema {
    name: "SHOW DATABASES",
    fields: &["database name"],
};

/// `SHOW TABLES` result layout.
pub const SHOW_TABLES: ResultSchema = ResultSchema {
    name: "SHOW TABLES",
    fields: &["table name"],
};

/// `DESCRIBE` result layout (Flink 1.19+, comment column last).
pub const DESCRIBE: ResultSchema = ResultSchema {
    name: "DESCRIBE",
    fields: &["name", "type", "null", "key", "extras", "watermark", "comment"],
};

impl ResultSchema {
    /// Position of `field` in this layout.
    fn index_of(&self, field: &'static str) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// Extract the named field of `row` as a string.
    ///
    /// Asking for a field the layout does not define is a protocol error;
    /// a row shorter than the field's position is a malformed row.
    pub fn field_str(&self, row: &Row, field: &'static str) -> Result<String> {
        let index = self.index_of(field).ok_or_else(|| {
            Error::protocol(format!(
                "field '{field}' is not part of the {} layout",
                self.name
            ))
        })?;
        row.field_str(index).ok_or(Error::MalformedRow {
            schema: self.name,
            field,
            index,
            len: row.len(),
        })
    }
}
