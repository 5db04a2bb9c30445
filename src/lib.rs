//! Flink SQL Gateway discovery client.
//!
//! A client for the subset of the Flink SQL Gateway REST protocol needed for
//! read-only schema discovery: it opens a session, submits SQL statements
//! asynchronously, polls for results with bounded retries, and parses
//! tabular payloads into databases, tables, and columns.
//!
//! # Example
//!
//! ```no_run
//! use flink_gateway_rs::{GatewayConfig, GatewaySession, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = GatewayConfig::new("localhost:8083", "default_catalog");
//!     let mut session = GatewaySession::new(config)?;
//!     session.create_session().await?;
//!
//!     for database in session.list_databases(None).await? {
//!         for table in session.list_tables(&database).await? {
//!             let columns = session.describe_table(&database, &table).await?;
//!             println!("{database}.{table}: {} columns", columns.len());
//!         }
//!     }
//!
//!     session.close_session().await;
//!     Ok(())
//! }
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;

// Re-export main types
pub use check::{ConnectionStatus, TestConnectionResult, TestStepResult};
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use protocol::{Column, ResultType, Row};
pub use session::{GatewaySession, OperationHandle, ResultSet};
