//! The query builder: seven single-table operations over an injected connection.
//!
//! Every operation follows the same shape: plan a [`Statement`] (or decide to [`Plan::Skip`]),
//! submit it through the caller's [`Connection`], then reshape the driver's [`Outcome`].
//! Database, table and column names always travel as identifier parameters (`??`), values as
//! value parameters (`?`).

use crate::config::QbConfig;
use crate::connection::{Connection, InsertIds, Outcome, Row, WriteResult};
use crate::error::{QbError, QbResult};
use crate::statement::{Plan, Statement};
use crate::table::{Column, Table};
use crate::value::{Assignments, Filter, Join, Lookup};
use serde_json::Value;
use std::marker::PhantomData;

/// Row cap applied by [`QueryBuilder::get_all`].
pub const GET_ALL_LIMIT: usize = 100;

/// Column [`QueryBuilder::and_get`] reloads inserted rows by.
///
/// Every table used with `and_get` must have a column with exactly this name.
pub const ID_COLUMN: &str = "id";

/// Single-table query builder for one database.
///
/// `S` is the schema marker: only tables declaring `type Schema = S` are accepted, so a builder
/// cannot be pointed at a table it was not registered for.
///
/// # Example
///
/// ```ignore
/// let qb = QueryBuilder::<()>::new("shop");
///
/// let user = qb.get_one_by::<User>(&conn, UserColumn::Email, "a@b.c").await?;
/// let admins = qb
///     .get_many_where::<User>(
///         &conn,
///         &Filter::new().field(UserColumn::Role, vec!["admin", "owner"]),
///         Join::And,
///     )
///     .await?;
/// ```
pub struct QueryBuilder<S = ()> {
    config: QbConfig,
    _schema: PhantomData<fn() -> S>,
}

impl<S> QueryBuilder<S> {
    /// Create a builder for `database` with default configuration.
    pub fn new(database: impl Into<String>) -> Self {
        Self::with_config(QbConfig::new(database))
    }

    /// Create a builder from an explicit configuration.
    pub fn with_config(config: QbConfig) -> Self {
        Self {
            config,
            _schema: PhantomData,
        }
    }

    /// The database name statements are qualified with.
    pub fn database(&self) -> &str {
        &self.config.database
    }

    pub fn config(&self) -> &QbConfig {
        &self.config
    }

    // ==================== Planning ====================

    /// `<prefix> ??.??` for the database and table.
    fn on_table<T: Table>(&self, prefix: &str) -> Statement {
        let mut stmt = Statement::new(prefix);
        stmt.push_ident(self.config.database.as_str())
            .push(".")
            .push_ident(T::NAME);
        stmt
    }

    /// `SELECT * FROM ??.?? WHERE ?? = ?` (or `IN (?)` for a list).
    pub fn one_by_stmt<T>(&self, column: T::Column, value: impl Into<Lookup>) -> Plan
    where
        T: Table<Schema = S>,
    {
        self.select_by::<T>(column, value.into())
    }

    /// Same shape as [`one_by_stmt`](Self::one_by_stmt); an empty list skips.
    pub fn many_by_stmt<T>(&self, column: T::Column, value: impl Into<Lookup>) -> Plan
    where
        T: Table<Schema = S>,
    {
        self.select_by::<T>(column, value.into())
    }

    fn select_by<T: Table>(&self, column: T::Column, lookup: Lookup) -> Plan {
        if lookup.is_empty_list() {
            return Plan::Skip;
        }
        let mut stmt = self.on_table::<T>("SELECT * FROM ");
        stmt.push(" WHERE ").push_lookup(column.name(), &lookup);
        Plan::Run(stmt)
    }

    /// `SELECT * FROM ??.?? LIMIT 100`.
    pub fn all_stmt<T>(&self) -> Statement
    where
        T: Table<Schema = S>,
    {
        let mut stmt = self.on_table::<T>("SELECT * FROM ");
        stmt.push(&format!(" LIMIT {GET_ALL_LIMIT}"));
        stmt
    }

    /// `SELECT * FROM ??.??` with one parenthesized condition per filter entry.
    ///
    /// An empty filter omits `WHERE`. Any empty list skips, whatever the other entries or the
    /// join: nothing in an `IN` list means nothing can match.
    pub fn many_where_stmt<T>(&self, filter: &Filter<T>, join: Join) -> Plan
    where
        T: Table<Schema = S>,
    {
        if filter.has_empty_list() {
            return Plan::Skip;
        }
        let mut stmt = self.on_table::<T>("SELECT * FROM ");
        for (i, (column, lookup)) in filter.iter().enumerate() {
            stmt.push(if i == 0 { " WHERE (" } else { join.keyword() });
            if i > 0 {
                stmt.push("(");
            }
            stmt.push_lookup(column.name(), lookup).push(")");
        }
        Plan::Run(stmt)
    }

    /// `DELETE FROM ??.?? WHERE ?? IN (?)` for a list, `DELETE FROM ??.?? WHERE ?? = ?` for a
    /// single value. `None` and empty lists skip.
    pub fn delete_by_stmt<T>(&self, column: T::Column, value: Option<Lookup>) -> Plan
    where
        T: Table<Schema = S>,
    {
        let Some(lookup) = value else {
            return Plan::Skip;
        };
        if lookup.is_empty_list() {
            return Plan::Skip;
        }
        let mut stmt = self.on_table::<T>("DELETE FROM ");
        stmt.push(" WHERE ").push_lookup(column.name(), &lookup);
        Plan::Run(stmt)
    }

    /// `INSERT INTO ??.?? SET ?` with the assignments as one object parameter, or a bare
    /// `INSERT INTO ??.??` when there is nothing to assign.
    pub fn create_one_stmt<T>(&self, fields: &Assignments<T>) -> Statement
    where
        T: Table<Schema = S>,
    {
        let mut stmt = self.on_table::<T>("INSERT INTO ");
        if !fields.is_empty() {
            stmt.push(" SET ").push_value(Value::Object(fields.to_object()));
        }
        stmt
    }

    /// `SELECT * FROM ??.?? WHERE ?? IN (?)` over the `id` column. No ids skips.
    pub fn by_ids_stmt<T>(&self, ids: &[u64]) -> Plan
    where
        T: Table<Schema = S>,
    {
        if ids.is_empty() {
            return Plan::Skip;
        }
        let mut stmt = self.on_table::<T>("SELECT * FROM ");
        stmt.push(" WHERE ")
            .push_lookup(ID_COLUMN, &Lookup::from(ids.to_vec()));
        Plan::Run(stmt)
    }

    // ==================== Operations ====================

    /// Fetch the first row where `column` matches `value`.
    ///
    /// Resolves `None` when nothing matches; zero rows is never an error.
    pub async fn get_one_by<T>(
        &self,
        conn: &impl Connection,
        column: T::Column,
        value: impl Into<Lookup>,
    ) -> QbResult<Option<T::Row>>
    where
        T: Table<Schema = S>,
    {
        let Plan::Run(stmt) = self.one_by_stmt::<T>(column, value) else {
            self.log_skip("get_one_by", T::NAME);
            return Ok(None);
        };
        let rows = self.fetch_rows(conn, "get_one_by", T::NAME, &stmt).await?;
        rows.into_iter().next().map(decode_row::<T>).transpose()
    }

    /// Fetch every row where `column` equals `value`, or is in `value` when it is a list.
    ///
    /// An empty list resolves to no rows without querying.
    pub async fn get_many_by<T>(
        &self,
        conn: &impl Connection,
        column: T::Column,
        value: impl Into<Lookup>,
    ) -> QbResult<Vec<T::Row>>
    where
        T: Table<Schema = S>,
    {
        let plan = self.many_by_stmt::<T>(column, value);
        self.fetch_plan::<T>(conn, "get_many_by", plan).await
    }

    /// Fetch up to [`GET_ALL_LIMIT`] rows of the table. There is no cursor.
    pub async fn get_all<T>(&self, conn: &impl Connection) -> QbResult<Vec<T::Row>>
    where
        T: Table<Schema = S>,
    {
        let plan = Plan::Run(self.all_stmt::<T>());
        self.fetch_plan::<T>(conn, "get_all", plan).await
    }

    /// Fetch rows matching every entry of `filter` (`Join::And`) or any of them (`Join::Or`).
    pub async fn get_many_where<T>(
        &self,
        conn: &impl Connection,
        filter: &Filter<T>,
        join: Join,
    ) -> QbResult<Vec<T::Row>>
    where
        T: Table<Schema = S>,
    {
        let plan = self.many_where_stmt(filter, join);
        self.fetch_plan::<T>(conn, "get_many_where", plan).await
    }

    /// Delete rows where `column` matches `value`.
    ///
    /// `None` is a no-op that resolves `Ok(None)` without querying, as is an empty list.
    ///
    /// A single value emits `DELETE FROM`, not the `DELETE * FROM` form older callers of this
    /// API produced, which servers reject.
    pub async fn delete_by<T, L>(
        &self,
        conn: &impl Connection,
        column: T::Column,
        value: Option<L>,
    ) -> QbResult<Option<WriteResult>>
    where
        T: Table<Schema = S>,
        L: Into<Lookup>,
    {
        let Plan::Run(stmt) = self.delete_by_stmt::<T>(column, value.map(Into::into)) else {
            self.log_skip("delete_by", T::NAME);
            return Ok(None);
        };
        self.write(conn, "delete_by", T::NAME, &stmt).await.map(Some)
    }

    /// Insert one row and resolve with the driver's write result.
    pub async fn create_one<T>(
        &self,
        conn: &impl Connection,
        fields: &Assignments<T>,
    ) -> QbResult<WriteResult>
    where
        T: Table<Schema = S>,
    {
        let stmt = self.create_one_stmt(fields);
        self.write(conn, "create_one", T::NAME, &stmt).await
    }

    /// Await pending insert(s), then reload the inserted rows by [`ID_COLUMN`].
    ///
    /// `pending` may yield a single [`WriteResult`] or a batch of them. If it fails, its error is
    /// returned unchanged. No insert ids resolves to no rows without querying.
    pub async fn and_get<T, W>(
        &self,
        conn: &impl Connection,
        pending: impl std::future::Future<Output = QbResult<W>>,
    ) -> QbResult<Vec<T::Row>>
    where
        T: Table<Schema = S>,
        W: InsertIds,
    {
        let ids = pending.await?.insert_ids();
        let plan = self.by_ids_stmt::<T>(&ids);
        self.fetch_plan::<T>(conn, "and_get", plan).await
    }

    // ==================== Execution ====================

    async fn fetch_plan<T: Table>(
        &self,
        conn: &impl Connection,
        op: &'static str,
        plan: Plan,
    ) -> QbResult<Vec<T::Row>> {
        let Plan::Run(stmt) = plan else {
            self.log_skip(op, T::NAME);
            return Ok(Vec::new());
        };
        let rows = self.fetch_rows(conn, op, T::NAME, &stmt).await?;
        rows.into_iter().map(decode_row::<T>).collect()
    }

    async fn fetch_rows(
        &self,
        conn: &impl Connection,
        op: &'static str,
        table: &'static str,
        stmt: &Statement,
    ) -> QbResult<Vec<Row>> {
        match self.submit(conn, op, table, stmt).await? {
            Outcome::Rows(rows) => Ok(rows),
            other => Err(QbError::UnexpectedOutcome {
                expected: "rows",
                got: other.kind(),
            }),
        }
    }

    async fn write(
        &self,
        conn: &impl Connection,
        op: &'static str,
        table: &'static str,
        stmt: &Statement,
    ) -> QbResult<WriteResult> {
        match self.submit(conn, op, table, stmt).await? {
            Outcome::Write(result) => Ok(result),
            other => Err(QbError::UnexpectedOutcome {
                expected: "write result",
                got: other.kind(),
            }),
        }
    }

    async fn submit(
        &self,
        conn: &impl Connection,
        op: &'static str,
        table: &'static str,
        stmt: &Statement,
    ) -> QbResult<Outcome> {
        self.log_submit(op, table, stmt);
        conn.submit(&stmt.sql, &stmt.params).await.map_err(|err| {
            let err = QbError::driver(err);
            self.log_failure(op, table, &err);
            err
        })
    }

    // ==================== Logging ====================

    #[cfg(feature = "tracing")]
    fn log_submit(&self, op: &'static str, table: &'static str, stmt: &Statement) {
        use tracing::Level;

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.config.truncate_sql(&stmt.sql);
        emit_at_level!(
            self.config.log_level,
            target: "tableqb.sql",
            op,
            table,
            param_count = stmt.params.len(),
            sql = %sql,
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log_submit(&self, _op: &'static str, _table: &'static str, _stmt: &Statement) {}

    #[cfg(feature = "tracing")]
    fn log_skip(&self, op: &'static str, table: &'static str) {
        tracing::trace!(target: "tableqb.sql", op, table, "skipped: nothing can match");
    }

    #[cfg(not(feature = "tracing"))]
    fn log_skip(&self, _op: &'static str, _table: &'static str) {}

    #[cfg(feature = "tracing")]
    fn log_failure(&self, op: &'static str, table: &'static str, err: &QbError) {
        tracing::debug!(target: "tableqb.sql", op, table, error = %err, "driver reported failure");
    }

    #[cfg(not(feature = "tracing"))]
    fn log_failure(&self, _op: &'static str, _table: &'static str, _err: &QbError) {}
}

impl<S> Clone for QueryBuilder<S> {
    fn clone(&self) -> Self {
        Self::with_config(self.config.clone())
    }
}

impl<S> std::fmt::Debug for QueryBuilder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("config", &self.config)
            .finish()
    }
}

fn decode_row<T: Table>(row: Row) -> QbResult<T::Row> {
    serde_json::from_value(Value::Object(row)).map_err(|e| QbError::decode(T::NAME, e))
}
