//! Query Interceptor
//!
//! Everything that wraps a query execution:
//! - **Audit Logging**: one persistent record per execution attempt
//! - **Pipeline**: SELECT-only gate, engine call, audit append

pub mod audit;
pub mod pipeline;
pub mod types;

pub use audit::AuditStore;
pub use pipeline::QueryExecutor;
pub use types::*;
