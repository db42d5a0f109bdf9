// SPDX-License-Identifier: Apache-2.0

//! Interceptor Pipeline
//!
//! Orchestrates a query execution:
//! 1. Pre-execution: blank/SELECT-prefix gate
//! 2. Execution: delegate to the engine, rows materialized eagerly
//! 3. Post-execution: exactly one audit record for the attempt

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use sqldesk_core::{DataEngine, EngineResult, QueryResult};

use super::audit::AuditStore;
use super::types::AuditRecord;
use crate::engine::sql_safety;

/// Validates, executes and audits ad-hoc queries
pub struct QueryExecutor {
    engine: Arc<dyn DataEngine>,
    audit: Arc<AuditStore>,
}

impl QueryExecutor {
    pub fn new(engine: Arc<dyn DataEngine>, audit: Arc<AuditStore>) -> Self {
        info!(driver = engine.driver_id(), "Query executor initialized");
        Self { engine, audit }
    }

    pub fn audit(&self) -> &AuditStore {
        &self.audit
    }

    /// Runs one statement. The audit record is written after the attempt,
    /// whatever its outcome.
    pub async fn execute(&self, sql: &str) -> EngineResult<QueryResult> {
        let statement = sql.trim();
        let start = Instant::now();

        let outcome = match sql_safety::validate(statement) {
            Ok(statement) => self.engine.execute(statement).await,
            Err(e) => {
                debug!("Statement rejected before execution: {}", e);
                Err(e)
            }
        };

        let elapsed_ms = start.elapsed().as_micros() as f64 / 1000.0;
        match &outcome {
            Ok(result) => {
                info!(rows = result.row_count, elapsed_ms, "Query succeeded");
                self.audit.log(AuditRecord::success(statement));
            }
            Err(e) => {
                warn!(elapsed_ms, "Query failed: {}", e);
                self.audit
                    .log(AuditRecord::failure(statement, e.to_string()));
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::types::{AuditRecord, AuditStatus};
    use async_trait::async_trait;
    use sqldesk_core::{EngineError, TableInfo, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Engine double that counts calls and returns a canned outcome.
    struct FakeEngine {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl FakeEngine {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(msg.to_string()),
            })
        }
    }

    #[async_trait]
    impl DataEngine for FakeEngine {
        fn driver_id(&self) -> &'static str {
            "fake"
        }

        async fn execute(&self, _query: &str) -> EngineResult<QueryResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(msg) => Err(EngineError::execution_error(msg.clone())),
                None => Ok(QueryResult::new(
                    vec!["a".into()],
                    vec![vec![Value::Int(1)]],
                )),
            }
        }

        async fn list_tables(&self) -> EngineResult<Vec<TableInfo>> {
            Ok(Vec::new())
        }
    }

    fn executor(engine: Arc<FakeEngine>, dir: &std::path::Path) -> QueryExecutor {
        let audit = Arc::new(AuditStore::new(dir.join("query_audit.log")));
        QueryExecutor::new(engine, audit)
    }

    fn records(executor: &QueryExecutor) -> Vec<AuditRecord> {
        executor.audit().recent(usize::MAX)
    }

    #[tokio::test]
    async fn test_success_is_audited_once() {
        let dir = tempdir().unwrap();
        let engine = FakeEngine::ok();
        let executor = executor(engine.clone(), dir.path());

        let result = executor.execute("  SELECT a FROM t  ").await.unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

        let records = records(&executor);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sql, "SELECT a FROM t");
        assert_eq!(records[0].status, AuditStatus::Success);
        assert_eq!(records[0].error, None);
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_engine() {
        let dir = tempdir().unwrap();
        let engine = FakeEngine::ok();
        let executor = executor(engine.clone(), dir.path());

        for input in ["", "   ", "\n"] {
            let err = executor.execute(input).await.unwrap_err();
            assert_eq!(err, EngineError::validation("empty statement"));
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        assert_eq!(records(&executor).len(), 3);
    }

    #[tokio::test]
    async fn test_non_select_is_rejected_and_audited() {
        let dir = tempdir().unwrap();
        let engine = FakeEngine::ok();
        let executor = executor(engine.clone(), dir.path());

        let err = executor.execute("DELETE FROM users").await.unwrap_err();
        assert_eq!(err, EngineError::validation("only SELECT allowed"));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);

        let records = records(&executor);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AuditStatus::Error);
        assert_eq!(records[0].error.as_deref(), Some("only SELECT allowed"));
    }

    #[tokio::test]
    async fn test_engine_failure_is_audited_verbatim() {
        let dir = tempdir().unwrap();
        let engine = FakeEngine::failing("no such table: nonexistent_table");
        let executor = executor(engine, dir.path());

        let err = executor
            .execute("SELECT * FROM nonexistent_table")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::execution_error("no such table: nonexistent_table")
        );

        let records = records(&executor);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].error.as_deref(),
            Some("no such table: nonexistent_table")
        );
    }
}
