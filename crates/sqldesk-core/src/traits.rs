//! DataEngine trait definition
//!
//! The seam between the query gateway and a concrete database driver.
//! Implementations open their own connection per call; nothing is pooled.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::types::{QueryResult, TableInfo};

#[async_trait]
pub trait DataEngine: Send + Sync {
    /// Returns the unique identifier for this driver (e.g. "sqlite")
    fn driver_id(&self) -> &'static str;

    /// Executes a statement and materializes every row.
    ///
    /// No validation happens here; callers decide what may reach the engine.
    async fn execute(&self, query: &str) -> EngineResult<QueryResult>;

    /// Lists every table with its columns and an exact row count, ordered by name.
    async fn list_tables(&self) -> EngineResult<Vec<TableInfo>>;
}
