//! Builder configuration.

/// Configuration for a [`QueryBuilder`](crate::QueryBuilder).
///
/// Only the database name is required; logging options default to `DEBUG` level with SQL
/// truncated to 200 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QbConfig {
    /// Database every statement is qualified with (`db.table`).
    pub database: String,
    /// Tracing event level for submitted statements.
    #[cfg(feature = "tracing")]
    pub log_level: tracing::Level,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl QbConfig {
    /// Create a configuration for `database` with default logging.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            #[cfg(feature = "tracing")]
            log_level: tracing::Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    #[cfg(feature = "tracing")]
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// The SQL as logged: cut to `max_sql_length` bytes on a char boundary, with `...` appended.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let end = (0..=max).rev().find(|&i| sql.is_char_boundary(i)).unwrap_or(0);
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}
