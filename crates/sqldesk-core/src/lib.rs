// SPDX-License-Identifier: Apache-2.0

//! SQL Desk core: scalar values, result shapes, the `DataEngine` trait and
//! the unified error type shared by drivers and the HTTP layer.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::DataEngine;
pub use types::*;
