//! Wire protocol for the gateway's REST session/statement/result endpoints.

pub mod payload;
pub mod schema;
pub mod types;

pub use payload::{
    CreateSessionResponse, ResultFetchResponse, ResultType, StatementRequest, StatementResponse,
};
pub use schema::ResultSchema;
pub use types::{Column, Row};
