//! Shared test fixtures: a spy connection and a couple of tables.

#![allow(dead_code)]

use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use tableqb::{Connection, Outcome, Param, Row, Table, WriteResult};

/// One statement the spy received.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub sql: String,
    pub params: Vec<Param>,
}

/// A connection that records every submission and answers from a scripted queue.
///
/// With nothing scripted it answers with an empty result set.
#[derive(Default)]
pub struct SpyConnection {
    submitted: Mutex<Vec<Submitted>>,
    answers: Mutex<VecDeque<Result<Outcome, String>>>,
}

impl SpyConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rows for the next submission.
    pub fn answer_rows(self, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("row must be an object, got {other}"),
            })
            .collect();
        self.answer(Ok(Outcome::Rows(rows)))
    }

    /// Queue a write result for the next submission.
    pub fn answer_write(self, result: WriteResult) -> Self {
        self.answer(Ok(Outcome::Write(result)))
    }

    /// Queue a driver error for the next submission.
    pub fn answer_error(self, message: &str) -> Self {
        self.answer(Err(message.to_string()))
    }

    fn answer(self, answer: Result<Outcome, String>) -> Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// The only statement submitted so far.
    pub fn single(&self) -> Submitted {
        let submitted = self.submitted();
        assert_eq!(submitted.len(), 1, "expected exactly one submission");
        submitted.into_iter().next().unwrap()
    }
}

impl Connection for SpyConnection {
    type Error = String;

    async fn submit(&self, sql: &str, params: &[Param]) -> Result<Outcome, String> {
        self.submitted.lock().unwrap().push(Submitted {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        let answer = self.answers.lock().unwrap().pop_front();
        answer.unwrap_or_else(|| Ok(Outcome::Rows(Vec::new())))
    }
}

/// A driver error type with structured fields, like a real driver's.
#[derive(Debug)]
pub struct DriverFailure {
    pub code: &'static str,
    pub errno: u16,
    pub message: String,
}

impl std::fmt::Display for DriverFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Always fails with a structured error.
pub struct FailingConnection;

impl Connection for FailingConnection {
    type Error = DriverFailure;

    async fn submit(&self, _: &str, _: &[Param]) -> Result<Outcome, DriverFailure> {
        Err(DriverFailure {
            code: "ER_NO_SUCH_TABLE",
            errno: 1146,
            message: "Table 'shop.users' doesn't exist".to_string(),
        })
    }
}

// ============================================
// Tables
// ============================================

/// Schema marker for the shop database.
pub struct Shop;

#[derive(Debug, Clone, PartialEq, Deserialize, Table)]
#[table(name = "users", schema = Shop)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Table)]
#[table(name = "orders", schema = Shop)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    #[table(column = "total")]
    #[serde(rename = "total")]
    pub total_cents: i64,
}

/// A hand-registered table with string columns and untyped rows.
pub struct AuditLog;

impl Table for AuditLog {
    const NAME: &'static str = "audit_log";
    type Row = Row;
    type Column = &'static str;
    type Schema = Shop;
}

pub fn user_row(id: u64, email: &str, role: &str) -> Value {
    json!({"id": id, "email": email, "role": role})
}

pub fn ident(name: &str) -> Param {
    Param::ident(name)
}

pub fn value(v: impl Into<Value>) -> Param {
    Param::value(v)
}
