// SPDX-License-Identifier: Apache-2.0

pub mod csv;
pub mod types;

pub use self::csv::CsvExporter;
pub use types::*;
