//! High-level session API for the Flink SQL Gateway.
//!
//! The gateway's statement/operation split makes every read two round trips:
//! submit the statement, then poll the result endpoint until a terminal
//! state. [`GatewaySession`] hides that behind single-call discovery
//! operations.

use std::fmt;
use std::time::Duration;

use reqwest::Response;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::protocol::payload::{
    CreateSessionResponse, ResultFetchResponse, ResultType, StatementRequest, StatementResponse,
};
use crate::protocol::schema;
use crate::protocol::types::{Column, Row};

/// Opaque handle identifying one submitted statement's pending result.
///
/// Transient: only meaningful until the operation's result has been
/// retrieved, never persisted or reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle(String);

impl OperationHandle {
    /// The raw handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed result of one completed statement.
#[derive(Debug)]
pub struct ResultSet {
    /// Terminal tag the gateway answered with (`PAYLOAD` or `EOS`).
    pub result_type: ResultType,
    /// Rows in response order.
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// A session against one Flink SQL Gateway endpoint.
///
/// Holds one session handle and the gateway-side catalog/database context
/// that goes with it. Use one session per discovery pass, driven
/// sequentially; concurrent passes get independent sessions.
///
/// Lifecycle: built inactive, [`create_session`](Self::create_session) makes
/// it active, [`close_session`](Self::close_session) (or drop) ends it.
///
/// # Example
///
/// ```no_run
/// use flink_gateway_rs::{GatewayConfig, GatewaySession, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let config = GatewayConfig::new("localhost:8083", "default_catalog");
///     let mut session = GatewaySession::new(config)?;
///     session.create_session().await?;
///
///     for database in session.list_databases(None).await? {
///         let tables = session.list_tables(&database).await?;
///         println!("{database}: {tables:?}");
///     }
///
///     session.close_session().await;
///     Ok(())
/// }
/// ```
pub struct GatewaySession {
    http: reqwest::Client,
    config: GatewayConfig,
    handle: Option<String>,
    cancel: CancellationToken,
}

impl GatewaySession {
    /// Build an inactive session for the given configuration.
    ///
    /// Every HTTP call the session makes carries the configured connect and
    /// request timeouts, so a hung gateway cannot block a discovery pass
    /// indefinitely.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            config,
            handle: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the cancellation token observed by result polling and settle
    /// delays, so a caller can abort a long discovery scan.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The active session handle, if any.
    pub fn session_handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// Whether the session is active on the gateway side.
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// The configuration the session was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Create a gateway session and select the configured catalog.
    ///
    /// The catalog selection is part of the session contract: when it fails,
    /// the half-built session is torn down best-effort and the session stays
    /// inactive, so the error from either step always leaves the session
    /// unusable.
    pub async fn create_session(&mut self) -> Result<()> {
        let url = self.config.sessions_url();
        let response = self.http.post(&url).send().await?;
        let response = ensure_success(response, "create session").await?;
        let body: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| Error::protocol(format!("session response missing handle: {e}")))?;
        info!(session = %body.session_handle, "gateway session created");
        self.handle = Some(body.session_handle);

        let statement = format!("USE CATALOG {}", self.config.catalog);
        let operation = match self.execute_statement(&statement).await {
            Ok(operation) => operation,
            Err(e) => {
                self.close_session().await;
                return Err(e);
            }
        };
        if let Err(e) = self.wait_for_result(&operation).await {
            self.close_session().await;
            return Err(e);
        }
        Ok(())
    }

    /// Submit one SQL statement and return its operation handle.
    ///
    /// Requires an active session; without one this returns
    /// [`Error::NoActiveSession`] and performs no HTTP call.
    pub async fn execute_statement(&self, statement: &str) -> Result<OperationHandle> {
        let handle = self.handle.as_deref().ok_or(Error::NoActiveSession)?;
        let url = format!("{}/{}/statements", self.config.sessions_url(), handle);
        debug!(%statement, "submitting statement");
        let response = self
            .http
            .post(&url)
            .json(&StatementRequest { statement })
            .send()
            .await?;
        let response = ensure_success(response, "execute statement").await?;
        let body: StatementResponse = response
            .json()
            .await
            .map_err(|e| Error::protocol(format!("statement response missing handle: {e}")))?;
        debug!(operation = %body.operation_handle, "statement accepted");
        Ok(OperationHandle(body.operation_handle))
    }

    /// Poll until the operation's result is ready and return it parsed.
    ///
    /// Bounded-retry polling with a fixed interval: `NOT_READY` sleeps
    /// `retry_interval` and polls again, up to `max_retries` polls total.
    /// `PAYLOAD` and `EOS` return immediately. Any transport/HTTP failure or
    /// unrecognized tag aborts immediately without further polling; only
    /// `NOT_READY` is retried.
    pub async fn wait_for_result(&self, operation: &OperationHandle) -> Result<ResultSet> {
        let handle = self.handle.as_deref().ok_or(Error::NoActiveSession)?;
        let url = format!(
            "{}/{}/operations/{}/result/0",
            self.config.sessions_url(),
            handle,
            operation
        );

        for attempt in 1..=self.config.max_retries {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let response = self.http.get(&url).send().await?;
            let response = ensure_success(response, "fetch result").await?;
            let body: ResultFetchResponse = response
                .json()
                .await
                .map_err(|e| Error::protocol(format!("unreadable result payload: {e}")))?;

            let result_type = ResultType::from_tag(&body.result_type).ok_or_else(|| {
                Error::protocol(format!(
                    "unexpected resultType '{}' for operation {operation}",
                    body.result_type
                ))
            })?;
            if result_type.is_terminal() {
                // The rows container is absent only while the result is not
                // ready; a terminal answer without it is malformed, not an
                // empty catalog.
                let results = body.results.ok_or_else(|| {
                    Error::protocol(format!(
                        "{} result for operation {operation} is missing its rows payload",
                        result_type.as_str()
                    ))
                })?;
                let rows = results.data.into_iter().map(Row::from).collect();
                return Ok(ResultSet { result_type, rows });
            }
            debug!(
                attempt,
                max_retries = self.config.max_retries,
                operation = %operation,
                "result not ready, retrying"
            );
            self.pause(self.config.retry_interval).await?;
        }

        warn!(operation = %operation, attempts = self.config.max_retries, "result polling exhausted");
        Err(Error::RetryExhausted {
            attempts: self.config.max_retries,
        })
    }

    /// Close the gateway session, best effort.
    ///
    /// A no-op without an active handle. Teardown failures are logged and
    /// never surfaced; close always succeeds from the caller's point of view.
    pub async fn close_session(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let url = format!("{}/{}", self.config.sessions_url(), handle);
        match self.http.delete(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!(session = %handle, "gateway session closed");
            }
            Ok(response) => {
                warn!(session = %handle, status = %response.status(), "close session rejected");
            }
            Err(e) => {
                warn!(session = %handle, error = %e, "close session failed");
            }
        }
    }

    /// List the databases of the session's catalog.
    ///
    /// A discovery pass scoped to one known database passes it as
    /// `database_override` and gets a one-element list back with zero gateway
    /// round trips. Otherwise this runs `SHOW DATABASES` and extracts the
    /// name field of every row, in response order.
    pub async fn list_databases(&self, database_override: Option<&str>) -> Result<Vec<String>> {
        if let Some(database) = database_override {
            return Ok(vec![database.to_string()]);
        }
        let operation = self.execute_statement("SHOW DATABASES").await?;
        let result = self.wait_for_result(&operation).await?;
        result
            .iter()
            .map(|row| schema::SHOW_DATABASES.field_str(row, "database name"))
            .collect()
    }

    /// List the tables of one database.
    pub async fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        self.use_database(database).await?;
        let operation = self.execute_statement("SHOW TABLES").await?;
        let result = self.wait_for_result(&operation).await?;
        result
            .iter()
            .map(|row| schema::SHOW_TABLES.field_str(row, "table name"))
            .collect()
    }

    /// Describe one table's columns, in declaration order.
    ///
    /// A row shorter than the `DESCRIBE` layout fails this table's describe
    /// with [`Error::MalformedRow`]; the caller's wider scan decides whether
    /// to skip the table or escalate.
    pub async fn describe_table(&self, database: &str, table: &str) -> Result<Vec<Column>> {
        self.use_database(database).await?;
        let operation = self.execute_statement(&format!("DESCRIBE {table}")).await?;
        let result = self.wait_for_result(&operation).await?;
        result.iter().map(Column::from_describe_row).collect()
    }

    /// Switch the session's database context and let it settle.
    ///
    /// The gateway applies the switch asynchronously relative to the HTTP
    /// response, so after the `USE` operation completes this still pauses
    /// `settle_delay` before the caller issues the next statement.
    async fn use_database(&self, database: &str) -> Result<()> {
        let operation = self.execute_statement(&format!("USE {database}")).await?;
        self.wait_for_result(&operation).await?;
        self.pause(self.config.settle_delay).await
    }

    /// Cancellation-aware sleep.
    async fn pause(&self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

/// Map a non-2xx response to an HTTP error carrying the status.
async fn ensure_success(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    warn!(%status, context, "gateway rejected request");
    Err(Error::http(status.as_u16(), context))
}
