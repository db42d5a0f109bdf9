// SPDX-License-Identifier: Apache-2.0

//! Demo database bootstrap.
//!
//! Creates the `users` and `orders` tables shown on the query page and fills
//! them once. Nothing in the gateway depends on this schema.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Executor};
use tracing::info;

use sqldesk_core::{EngineError, EngineResult};

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        age INTEGER,
        city TEXT,
        created_at TEXT
    )
"#;

const CREATE_ORDERS: &str = r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        product TEXT NOT NULL,
        amount REAL,
        status TEXT,
        order_date TEXT,
        FOREIGN KEY (user_id) REFERENCES users (id)
    )
"#;

const DEMO_USERS: [(&str, &str, i64, &str, &str); 5] = [
    ("张三", "zhangsan@example.com", 25, "北京", "2024-01-15 10:30:00"),
    ("李四", "lisi@example.com", 30, "上海", "2024-01-16 11:20:00"),
    ("王五", "wangwu@example.com", 28, "广州", "2024-01-17 14:15:00"),
    ("赵六", "zhaoliu@example.com", 35, "深圳", "2024-01-18 09:45:00"),
    ("钱七", "qianqi@example.com", 22, "杭州", "2024-01-19 16:30:00"),
];

const DEMO_ORDERS: [(i64, &str, f64, &str, &str); 6] = [
    (1, "iPhone 15", 7999.00, "completed", "2024-02-01 10:00:00"),
    (1, "AirPods Pro", 1999.00, "completed", "2024-02-02 11:30:00"),
    (2, "MacBook Pro", 15999.00, "pending", "2024-02-03 14:20:00"),
    (3, "iPad Air", 4999.00, "completed", "2024-02-04 09:15:00"),
    (4, "Apple Watch", 2999.00, "shipped", "2024-02-05 16:45:00"),
    (5, "Magic Keyboard", 899.00, "completed", "2024-02-06 13:20:00"),
];

/// Creates the demo tables and inserts the sample rows when `users` is empty.
///
/// Returns the number of users inserted (0 when the data was already there).
pub async fn init_database(path: &Path) -> EngineResult<usize> {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&opts)
        .await
        .map_err(|e| EngineError::connection_failed(e.to_string()))?;

    let inserted = seed(&mut conn).await;
    let _ = conn.close().await;
    let inserted = inserted?;

    if inserted > 0 {
        info!(
            users = inserted,
            orders = DEMO_ORDERS.len(),
            "Seeded demo database at {:?}",
            path
        );
    }
    Ok(inserted)
}

async fn seed(conn: &mut SqliteConnection) -> EngineResult<usize> {
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| EngineError::internal(e.to_string()))?;

    for ddl in [CREATE_USERS, CREATE_ORDERS] {
        (&mut *tx)
            .execute(ddl)
            .await
            .map_err(|e| EngineError::internal(e.to_string()))?;
    }

    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| EngineError::internal(e.to_string()))?;
    if existing > 0 {
        return Ok(0);
    }

    for (name, email, age, city, created_at) in DEMO_USERS {
        sqlx::query(
            "INSERT INTO users (name, email, age, city, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(age)
        .bind(city)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| EngineError::internal(e.to_string()))?;
    }

    for (user_id, product, amount, status, order_date) in DEMO_ORDERS {
        sqlx::query(
            "INSERT INTO orders (user_id, product, amount, status, order_date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(product)
        .bind(amount)
        .bind(status)
        .bind(order_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| EngineError::internal(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| EngineError::internal(e.to_string()))?;

    Ok(DEMO_USERS.len())
}
