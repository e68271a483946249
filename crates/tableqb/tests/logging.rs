//! SQL events emitted on the `tableqb.sql` target.

#![cfg(feature = "tracing")]

mod common;

use common::*;
use std::io;
use std::sync::{Arc, Mutex};
use tableqb::{QbConfig, QueryBuilder};
use tracing::Level;
use tracing::subscriber::DefaultGuard;

/// Formatted log output shared with the subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Install a thread-local subscriber capturing every level.
fn capture() -> (Captured, DefaultGuard) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    (captured, tracing::subscriber::set_default(subscriber))
}

#[tokio::test]
async fn submitted_statement_is_logged_at_debug() {
    let (captured, _guard) = capture();
    let conn = SpyConnection::new();

    QueryBuilder::<Shop>::new("shop")
        .get_one_by::<User>(&conn, UserColumn::Email, "a@x.io")
        .await
        .unwrap();

    let lines = captured.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    let line = &lines[0];
    assert!(line.contains("DEBUG"), "{line}");
    assert!(line.contains("tableqb.sql"), "{line}");
    assert!(line.contains("get_one_by"), "{line}");
    assert!(line.contains("users"), "{line}");
    assert!(line.contains("param_count=4"), "{line}");
    assert!(line.contains("sql=SELECT * FROM ??.?? WHERE ?? = ?"), "{line}");
}

#[tokio::test]
async fn configured_level_and_truncation_apply() {
    let (captured, _guard) = capture();
    let conn = SpyConnection::new();
    let config = QbConfig::new("shop").log_level(Level::INFO).max_sql_length(8);

    QueryBuilder::<Shop>::with_config(config)
        .get_all::<User>(&conn)
        .await
        .unwrap();

    let lines = captured.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("INFO"), "{}", lines[0]);
    assert!(lines[0].contains("sql=SELECT *..."), "{}", lines[0]);
    assert!(!lines[0].contains("LIMIT"), "{}", lines[0]);
}

#[tokio::test]
async fn skipped_statement_is_traced() {
    let (captured, _guard) = capture();
    let conn = SpyConnection::new();

    QueryBuilder::<Shop>::new("shop")
        .get_many_by::<User>(&conn, UserColumn::Id, Vec::<u64>::new())
        .await
        .unwrap();

    assert_eq!(conn.count(), 0);
    let lines = captured.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("TRACE"), "{}", lines[0]);
    assert!(lines[0].contains("tableqb.sql"), "{}", lines[0]);
    assert!(lines[0].contains("skipped: nothing can match"), "{}", lines[0]);
    assert!(lines[0].contains("get_many_by"), "{}", lines[0]);
}

#[tokio::test]
async fn driver_failure_is_logged_after_the_statement() {
    let (captured, _guard) = capture();

    let err = QueryBuilder::<Shop>::new("shop")
        .get_all::<User>(&FailingConnection)
        .await
        .unwrap_err();
    assert!(err.is_driver());

    let lines = captured.lines();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(lines[0].contains("sql=SELECT * FROM ??.?? LIMIT 100"), "{}", lines[0]);
    assert!(lines[1].contains("DEBUG"), "{}", lines[1]);
    assert!(lines[1].contains("driver reported failure"), "{}", lines[1]);
    assert!(lines[1].contains("get_all"), "{}", lines[1]);
}
