//! Compile-time table registry.
//!
//! A table is a type implementing [`Table`]. It names the SQL table, the row shape rows decode
//! into, the column type that operations accept, and the schema marker that ties it to a
//! [`QueryBuilder`](crate::QueryBuilder). Nothing here exists at runtime except the name strings.
//!
//! # Example
//!
//! ```ignore
//! use serde::Deserialize;
//! use tableqb::Table;
//!
//! #[derive(Debug, Deserialize, Table)]
//! #[table(name = "users")]
//! struct User {
//!     id: i64,
//!     email: String,
//! }
//!
//! // Generated: `UserColumn::Id`, `UserColumn::Email`
//! ```

use serde::de::DeserializeOwned;

/// A column of some table, rendered as an identifier placeholder.
pub trait Column: Copy + Send + Sync + 'static {
    /// The SQL column name.
    fn name(self) -> &'static str;
}

/// Loosely typed tables may use plain strings as columns.
impl Column for &'static str {
    fn name(self) -> &'static str {
        self
    }
}

/// A registered table.
///
/// Usually derived with `#[derive(Table)]`; implement by hand for tables whose row shape is not a
/// struct you own.
pub trait Table {
    /// SQL table name.
    const NAME: &'static str;

    /// Shape each driver row is decoded into.
    type Row: DeserializeOwned + Send;

    /// Columns accepted by lookups, filters and assignments on this table.
    type Column: Column;

    /// Schema marker; a `QueryBuilder<S>` only accepts tables with `Schema = S`.
    type Schema;
}
