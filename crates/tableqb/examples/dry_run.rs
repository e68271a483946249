//! Print the SQL every operation would send, without a database.
//!
//! Run with: `cargo run --example dry_run -p tableqb`

use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tableqb::{
    Assignments, Connection, Filter, Join, Outcome, Param, QbResult, QueryBuilder, Table,
    WriteResult, render,
};

#[derive(Debug, Deserialize, Table)]
#[table(name = "users")]
#[allow(dead_code)]
struct User {
    id: u64,
    email: String,
    role: String,
}

/// Renders each statement, prints it, and answers with nothing (or a fresh insert id).
#[derive(Default)]
struct DryRun {
    next_id: AtomicU64,
}

impl Connection for DryRun {
    type Error = tableqb::QbError;

    async fn submit(&self, sql: &str, params: &[Param]) -> Result<Outcome, Self::Error> {
        println!("  {}", render(sql, params)?);
        if sql.starts_with("SELECT") {
            Ok(Outcome::Rows(Vec::new()))
        } else {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            Ok(Outcome::Write(WriteResult::inserted(id)))
        }
    }
}

#[tokio::main]
async fn main() -> QbResult<()> {
    let conn = DryRun::default();
    let qb = QueryBuilder::<()>::new("shop");

    println!("get_one_by:");
    qb.get_one_by::<User>(&conn, UserColumn::Email, "alice@example.com")
        .await?;

    println!("get_many_by:");
    qb.get_many_by::<User>(&conn, UserColumn::Id, vec![1u64, 2, 3])
        .await?;
    qb.get_many_by::<User>(&conn, UserColumn::Id, Vec::<u64>::new())
        .await?;
    println!("  (empty list: nothing sent)");

    println!("get_all:");
    qb.get_all::<User>(&conn).await?;

    println!("get_many_where:");
    let filter = Filter::<User>::new()
        .field(UserColumn::Role, vec!["admin", "owner"])
        .field(UserColumn::Email, "root@example.com");
    qb.get_many_where(&conn, &filter, Join::And).await?;
    qb.get_many_where(&conn, &filter, Join::Or).await?;

    println!("delete_by:");
    qb.delete_by::<User, _>(&conn, UserColumn::Id, Some(vec![7u64, 8]))
        .await?;
    qb.delete_by::<User, u64>(&conn, UserColumn::Id, None).await?;
    println!("  (None: nothing sent)");

    println!("create_one + and_get:");
    let fields = Assignments::<User>::new()
        .set(UserColumn::Email, "new@example.com")
        .set(UserColumn::Role, "member");
    qb.and_get::<User, _>(&conn, qb.create_one(&conn, &fields))
        .await?;

    Ok(())
}
