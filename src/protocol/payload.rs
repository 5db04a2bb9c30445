//! JSON wire types for the gateway's session/statement/result endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response to `POST {sessions_url}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_handle: String,
}

/// Request body for `POST {sessions_url}/{handle}/statements`.
#[derive(Debug, Serialize)]
pub struct StatementRequest<'a> {
    pub statement: &'a str,
}

/// Response to a statement submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    pub operation_handle: String,
}

/// Response to `GET .../operations/{handle}/result/0`.
///
/// The tag stays a plain string on the wire so an unrecognized value can be
/// reported verbatim instead of failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFetchResponse {
    pub result_type: String,
    #[serde(default)]
    pub results: Option<ResultData>,
}

/// Row container inside a result fetch. Absent when the result is not ready.
#[derive(Debug, Default, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub data: Vec<RowData>,
}

/// One positional row as the gateway serializes it.
#[derive(Debug, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub fields: Vec<Value>,
}

/// Readiness tag on a result fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    /// Operation still running; poll again.
    NotReady,
    /// Rows available, more may follow.
    Payload,
    /// Rows available and the result is final.
    Eos,
}

impl ResultType {
    /// Parse the wire tag. Unknown tags are a protocol error the caller
    /// reports with the offending value.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NOT_READY" => Some(Self::NotReady),
            "PAYLOAD" => Some(Self::Payload),
            "EOS" => Some(Self::Eos),
            _ => None,
        }
    }

    /// Wire representation of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotReady => "NOT_READY",
            Self::Payload => "PAYLOAD",
            Self::Eos => "EOS",
        }
    }

    /// Whether the result carries rows (as opposed to "poll again").
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Payload | Self::Eos)
    }
}
