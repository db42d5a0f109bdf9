// Data Engine Module
// Driver implementations and the statement gate in front of them

pub mod drivers;
pub mod sql_safety;

pub use sqldesk_core::{DataEngine, EngineError, EngineResult};
