// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed business metrics store.
//!
//! [`MetricsDatabase`] holds an in-memory database seeded with account and
//! sales data. Each query is mapped to one fixed SQL statement by keyword;
//! all SQL runs on tokio-rusqlite's background thread via `call()`.

use async_trait::async_trait;
use rusqlite::Connection;
use supervisor_core::{ensure_query, SupervisorError, ToolBackend};
use tracing::{debug, info};

/// Reply when the query maps to no known metric.
pub const NO_DATA: &str = "No data available for this query.";

const TOOL_NAME: &str = "database_query";

/// Accounts created on or after this date count as "last week".
const LAST_WEEK_START: &str = "2025-10-18";

const CREATED_DATES: [&str; 7] = [
    "2025-10-18",
    "2025-10-19",
    "2025-10-20",
    "2025-10-21",
    "2025-10-22",
    "2025-10-23",
    "2025-10-24",
];

const SEED_ACCOUNTS: usize = 42;

const SEED_SALES: [(&str, f64, &str, &str); 6] = [
    ("2025-07-15", 250_000.0, "Q3", "July"),
    ("2025-07-20", 150_000.0, "Q3", "July"),
    ("2025-08-10", 300_000.0, "Q3", "August"),
    ("2025-08-25", 200_000.0, "Q3", "August"),
    ("2025-09-05", 180_000.0, "Q3", "September"),
    ("2025-09-18", 120_000.0, "Q3", "September"),
];

/// A metric the database knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    AccountsCreated,
    PremiumAccounts,
    TotalAccounts,
    QuarterRevenue,
    MonthRevenue(&'static str),
    TotalRevenue,
}

impl Metric {
    /// Maps a natural-language query to a metric by keyword.
    pub fn from_query(query: &str) -> Option<Self> {
        let q = query.to_lowercase();
        if q.contains("account") {
            if q.contains("how many") || q.contains("created") {
                Some(Self::AccountsCreated)
            } else if q.contains("premium") {
                Some(Self::PremiumAccounts)
            } else {
                Some(Self::TotalAccounts)
            }
        } else if q.contains("sales") || q.contains("revenue") {
            if q.contains("q3") || q.contains("quarter") {
                Some(Self::QuarterRevenue)
            } else if q.contains("september") {
                Some(Self::MonthRevenue("September"))
            } else if q.contains("august") {
                Some(Self::MonthRevenue("August"))
            } else {
                Some(Self::TotalRevenue)
            }
        } else {
            None
        }
    }

    fn answer(self, conn: &Connection) -> Result<String, rusqlite::Error> {
        match self {
            Self::AccountsCreated => {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM accounts WHERE created_date >= date(?1)",
                    [LAST_WEEK_START],
                    |row| row.get(0),
                )?;
                Ok(format!("{count} new accounts were created last week."))
            }
            Self::PremiumAccounts => {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM accounts WHERE account_type = 'premium'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(format!("There are {count} premium accounts."))
            }
            Self::TotalAccounts => {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
                Ok(format!("There are {count} total accounts."))
            }
            Self::QuarterRevenue => {
                let total: f64 = conn.query_row(
                    "SELECT COALESCE(SUM(amount), 0) FROM sales WHERE quarter = 'Q3'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(format!(
                    "Total sales revenue for Q3 is ${:.1}M.",
                    total / 1_000_000.0
                ))
            }
            Self::MonthRevenue(month) => {
                let total: f64 = conn.query_row(
                    "SELECT COALESCE(SUM(amount), 0) FROM sales WHERE month = ?1",
                    [month],
                    |row| row.get(0),
                )?;
                Ok(format!("Sales revenue for {month} is ${}.", format_dollars(total)))
            }
            Self::TotalRevenue => {
                let total: f64 = conn.query_row(
                    "SELECT COALESCE(SUM(amount), 0) FROM sales",
                    [],
                    |row| row.get(0),
                )?;
                Ok(format!(
                    "Total sales revenue is ${:.1}M.",
                    total / 1_000_000.0
                ))
            }
        }
    }
}

/// Structured-data backend, registered as `database_query`.
pub struct MetricsDatabase {
    conn: tokio_rusqlite::Connection,
}

impl MetricsDatabase {
    /// Opens an in-memory database and seeds it.
    pub async fn open_in_memory() -> Result<Self, SupervisorError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| {
                SupervisorError::unavailable(TOOL_NAME, format!("failed to open database: {e}"))
            })?;

        conn.call(seed)
            .await
            .map_err(|e| sql_failure("failed to seed database", e))?;

        info!(accounts = SEED_ACCOUNTS, sales = SEED_SALES.len(), "metrics database ready");
        Ok(Self { conn })
    }

    /// Runs raw SQL against the store. Intended for setup and tests.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SupervisorError> {
        let sql = sql.to_string();
        self.conn
            .call(move |conn| conn.execute_batch(&sql))
            .await
            .map_err(|e| sql_failure("database error", e))
    }
}

#[async_trait]
impl ToolBackend for MetricsDatabase {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    async fn execute(&self, query: &str) -> Result<String, SupervisorError> {
        let query = ensure_query(query)?;
        let Some(metric) = Metric::from_query(query) else {
            return Ok(NO_DATA.to_string());
        };
        debug!(?metric, "running metric query");

        self.conn
            .call(move |conn| metric.answer(conn))
            .await
            .map_err(|e| sql_failure("database error", e))
    }
}

/// Wraps a failed `call()` as `ToolExecution`, keeping the SQLite error as its source.
fn sql_failure(context: &str, e: tokio_rusqlite::Error<rusqlite::Error>) -> SupervisorError {
    let cause: Box<dyn std::error::Error + Send + Sync> = match e {
        tokio_rusqlite::Error::Error(inner) => Box::new(inner),
        other => Box::new(other),
    };
    SupervisorError::ToolExecution {
        tool: TOOL_NAME.to_string(),
        message: format!("{context}: {cause}"),
        source: Some(cause),
    }
}

fn seed(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "CREATE TABLE accounts (
             id INTEGER PRIMARY KEY,
             created_date TEXT NOT NULL,
             account_type TEXT NOT NULL,
             status TEXT NOT NULL
         );
         CREATE TABLE sales (
             id INTEGER PRIMARY KEY,
             sale_date TEXT NOT NULL,
             amount REAL NOT NULL,
             quarter TEXT NOT NULL,
             month TEXT NOT NULL
         );",
    )?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO accounts (created_date, account_type, status) VALUES (?1, ?2, 'active')",
        )?;
        for i in 0..SEED_ACCOUNTS {
            // Every third account is premium; later days see more sign-ups.
            let day = CREATED_DATES[(i / 5).min(CREATED_DATES.len() - 1)];
            let account_type = if i % 3 == 1 { "premium" } else { "standard" };
            insert.execute((day, account_type))?;
        }

        let mut insert = tx.prepare(
            "INSERT INTO sales (sale_date, amount, quarter, month) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (date, amount, quarter, month) in SEED_SALES {
            insert.execute((date, amount, quarter, month))?;
        }
    }
    tx.commit()
}

/// Formats an amount as `1,234,567.89`.
fn format_dollars(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{cents}")
}
