//! Row type for gateway result payloads.

use serde_json::Value;

use crate::protocol::payload::RowData;

/// A row of opaque field values from a tabular gateway result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<Value>,
}

impl Row {
    /// Create a row from raw JSON field values.
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Get the raw field at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Field at `index` rendered as a string.
    ///
    /// JSON strings come back unquoted, `null` becomes the empty string, and
    /// other scalars (the gateway serializes nullability as a bare boolean)
    /// use their JSON rendering. `None` when the row is too short.
    pub fn field_str(&self, index: usize) -> Option<String> {
        self.fields.get(index).map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All raw field values.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

impl From<RowData> for Row {
    fn from(data: RowData) -> Self {
        Self::new(data.fields)
    }
}
