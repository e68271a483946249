//! Driver-facing connection seam.
//!
//! The builder never opens, pools or closes connections. It only needs something that accepts a
//! SQL template plus positional parameters and eventually answers with rows or a write result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A row as returned by the driver: column name to scalar value.
pub type Row = serde_json::Map<String, Value>;

/// A positional parameter.
///
/// Identifiers and values are distinguished so the driver can escape each correctly: identifiers
/// fill `??` slots, values fill `?` slots.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Database, table or column name.
    Ident(String),
    /// Literal value. Arrays expand to lists and objects to `col = val` assignment lists.
    Value(Value),
}

impl Param {
    /// Create an identifier parameter.
    pub fn ident(name: impl Into<String>) -> Self {
        Param::Ident(name.into())
    }

    /// Create a value parameter.
    pub fn value(value: impl Into<Value>) -> Self {
        Param::Value(value.into())
    }

    /// Returns the identifier name if this is an identifier parameter.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Param::Ident(name) => Some(name),
            Param::Value(_) => None,
        }
    }

    /// Returns the value if this is a value parameter.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Param::Ident(_) => None,
            Param::Value(value) => Some(value),
        }
    }
}

/// The descriptor a driver returns after an insert, update or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriteResult {
    /// Auto-generated identifier of the inserted row (0 if none).
    pub insert_id: u64,
    /// Rows matched by the statement.
    pub affected_rows: u64,
    /// Rows actually changed by the statement.
    pub changed_rows: u64,
    pub warning_count: u32,
    /// Server status message, if any.
    pub message: String,
}

impl WriteResult {
    /// Create a write result for a single inserted row.
    pub fn inserted(insert_id: u64) -> Self {
        Self {
            insert_id,
            affected_rows: 1,
            ..Self::default()
        }
    }

    /// Create a write result that only reports affected rows.
    pub fn affected(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            ..Self::default()
        }
    }
}

/// What a driver answers with for one submitted statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Result set of a read.
    Rows(Vec<Row>),
    /// Descriptor of a write.
    Write(WriteResult),
}

impl Outcome {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Outcome::Rows(_) => "rows",
            Outcome::Write(_) => "write result",
        }
    }
}

/// A database connection the builder submits statements through.
///
/// Implementations own escaping: `??` slots receive [`Param::Ident`] and `?` slots receive
/// [`Param::Value`], in order. See [`render`](crate::render) for the reference rendering.
///
/// A driver exposing a callback API instead of futures can be adapted with
/// [`Callbacks`](crate::Callbacks).
pub trait Connection: Send + Sync {
    /// Driver error type. Only its `Display` text reaches the caller.
    type Error: std::fmt::Display + Send;

    /// Submit a statement and wait for the driver's answer.
    fn submit(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl std::future::Future<Output = Result<Outcome, Self::Error>> + Send;
}

impl<C: Connection> Connection for &C {
    type Error = C::Error;

    fn submit(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl std::future::Future<Output = Result<Outcome, Self::Error>> + Send {
        (**self).submit(sql, params)
    }
}

impl<C: Connection> Connection for Arc<C> {
    type Error = C::Error;

    fn submit(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl std::future::Future<Output = Result<Outcome, Self::Error>> + Send {
        (**self).submit(sql, params)
    }
}

impl<C: Connection> Connection for Box<C> {
    type Error = C::Error;

    fn submit(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl std::future::Future<Output = Result<Outcome, Self::Error>> + Send {
        (**self).submit(sql, params)
    }
}

/// Write results that carry insert identifiers.
///
/// Covers both a single insert and a batch of them, so
/// [`QueryBuilder::and_get`](crate::QueryBuilder::and_get) can reload either.
pub trait InsertIds {
    /// Every insert identifier, in order.
    fn insert_ids(&self) -> Vec<u64>;
}

impl InsertIds for WriteResult {
    fn insert_ids(&self) -> Vec<u64> {
        vec![self.insert_id]
    }
}

impl InsertIds for Option<WriteResult> {
    fn insert_ids(&self) -> Vec<u64> {
        self.iter().map(|r| r.insert_id).collect()
    }
}

impl InsertIds for Vec<WriteResult> {
    fn insert_ids(&self) -> Vec<u64> {
        self.as_slice().insert_ids()
    }
}

impl InsertIds for [WriteResult] {
    fn insert_ids(&self) -> Vec<u64> {
        self.iter().map(|r| r.insert_id).collect()
    }
}

impl<const N: usize> InsertIds for [WriteResult; N] {
    fn insert_ids(&self) -> Vec<u64> {
        self.as_slice().insert_ids()
    }
}
