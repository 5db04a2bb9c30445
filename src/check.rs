//! Three-step connectivity check against a gateway.
//!
//! Each step really exercises the gateway (session creation, catalog
//! listing, database listing) under a per-step timeout budget and reports a
//! pass/fail record; the records aggregate into one overall result with a
//! timestamp. The check never returns an error: a broken gateway shows up as
//! failed steps, not as a propagating fault.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::timeout;
use tracing::warn;

use crate::config::GatewayConfig;
use crate::error::Result;
use crate::protocol::schema;
use crate::session::GatewaySession;

/// Default per-step timeout budget (three minutes).
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Outcome of one connectivity-check step.
///
/// A step that ran and failed always carries `error_log`; a step skipped
/// because no gateway session could be established has `passed: false` with
/// `error_log: None`, so the two are distinguishable in the serialized
/// record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStepResult {
    pub name: String,
    pub mandatory: bool,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log: Option<String>,
}

/// Overall connectivity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    Successful,
    Failed,
}

/// Aggregated connectivity-check result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionResult {
    pub last_updated_at: DateTime<Utc>,
    pub status: ConnectionStatus,
    pub steps: Vec<TestStepResult>,
}

impl TestConnectionResult {
    fn from_steps(steps: Vec<TestStepResult>) -> Self {
        let status = if steps.iter().all(|s| s.passed) {
            ConnectionStatus::Successful
        } else {
            ConnectionStatus::Failed
        };
        Self {
            last_updated_at: Utc::now(),
            status,
            steps,
        }
    }
}

/// Run the connectivity check: `CheckAccess`, `CheckCatalogs`,
/// `CheckDatabases`, each bounded by `step_timeout` (default three minutes).
///
/// The session is closed best-effort at the end regardless of outcome.
pub async fn test_connection(
    config: GatewayConfig,
    step_timeout: Option<Duration>,
) -> TestConnectionResult {
    let budget = step_timeout.unwrap_or(DEFAULT_STEP_TIMEOUT);
    let mut steps = Vec::with_capacity(3);

    let mut session = match GatewaySession::new(config) {
        Ok(session) => session,
        Err(e) => {
            steps.push(failed_step("CheckAccess", e.to_string()));
            steps.push(skipped_step("CheckCatalogs"));
            steps.push(skipped_step("CheckDatabases"));
            return TestConnectionResult::from_steps(steps);
        }
    };

    let access = run_step(
        "CheckAccess",
        "Connection Successful",
        budget,
        session.create_session(),
    )
    .await;
    let access_passed = access.passed;
    steps.push(access);

    if access_passed {
        steps.push(
            run_step(
                "CheckCatalogs",
                "Get Catalogs Successful",
                budget,
                fetch_catalogs(&session),
            )
            .await,
        );
        steps.push(
            run_step(
                "CheckDatabases",
                "Get Databases Successful",
                budget,
                fetch_databases(&session),
            )
            .await,
        );
    } else {
        steps.push(skipped_step("CheckCatalogs"));
        steps.push(skipped_step("CheckDatabases"));
    }

    session.close_session().await;
    TestConnectionResult::from_steps(steps)
}

async fn fetch_catalogs(session: &GatewaySession) -> Result<()> {
    let operation = session.execute_statement("SHOW CATALOGS").await?;
    let result = session.wait_for_result(&operation).await?;
    // Decoding validates the payload shape, not just reachability.
    for row in result.iter() {
        schema::SHOW_CATALOGS.field_str(row, "catalog name")?;
    }
    Ok(())
}

async fn fetch_databases(session: &GatewaySession) -> Result<()> {
    session.list_databases(None).await?;
    Ok(())
}

async fn run_step(
    name: &str,
    ok_message: &str,
    budget: Duration,
    step: impl Future<Output = Result<()>>,
) -> TestStepResult {
    match timeout(budget, step).await {
        Ok(Ok(())) => TestStepResult {
            name: name.to_string(),
            mandatory: true,
            passed: true,
            message: ok_message.to_string(),
            error_log: None,
        },
        Ok(Err(e)) => {
            warn!(step = name, error = %e, "connectivity step failed");
            failed_step(name, e.to_string())
        }
        Err(_) => {
            warn!(step = name, ?budget, "connectivity step timed out");
            failed_step(name, format!("Step timed out after {budget:?}"))
        }
    }
}

fn failed_step(name: &str, error_log: String) -> TestStepResult {
    TestStepResult {
        name: name.to_string(),
        mandatory: true,
        passed: false,
        message: format!("{name} failed"),
        error_log: Some(error_log),
    }
}

fn skipped_step(name: &str) -> TestStepResult {
    TestStepResult {
        name: name.to_string(),
        mandatory: true,
        passed: false,
        message: "Skipped: no gateway session".to_string(),
        error_log: None,
    }
}
