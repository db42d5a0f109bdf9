// SPDX-License-Identifier: Apache-2.0

// Database Drivers
// One module per engine; only SQLite is wired in.

pub mod sqlite;

pub use sqlite::SqliteDriver;
