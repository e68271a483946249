//! # tableqb
//!
//! A minimal typed query builder for single-table operations over an existing SQL driver.
//!
//! ## Features
//!
//! - **Placeholder SQL**: every statement is a `?`/`??` template plus positional parameters;
//!   names travel as identifiers and values as values, so the driver escapes both correctly
//! - **Typed tables**: `#[derive(Table)]` ties a row struct to its table name and column enum,
//!   so unknown tables and foreign columns fail to compile
//! - **Driver-agnostic**: implement [`Connection`] (or [`CallbackDriver`] for callback APIs);
//!   no pooling, transactions or schema work happens here
//! - **Short-circuits**: lookups that cannot match (empty `IN` lists, undefined deletes) resolve
//!   without a round trip
//!
//! ## Operations
//!
//! ```ignore
//! use tableqb::{Assignments, Filter, Join, QueryBuilder, Table};
//!
//! #[derive(Debug, serde::Deserialize, Table)]
//! #[table(name = "users")]
//! struct User {
//!     id: u64,
//!     email: String,
//!     role: String,
//! }
//!
//! let qb = QueryBuilder::<()>::new("shop");
//!
//! // SELECT * FROM `shop`.`users` WHERE `email` = ?
//! let user = qb.get_one_by::<User>(&conn, UserColumn::Email, "a@b.c").await?;
//!
//! // SELECT * FROM `shop`.`users` WHERE (`role` IN (?)) OR (`email` = ?)
//! let users = qb
//!     .get_many_where::<User>(
//!         &conn,
//!         &Filter::new()
//!             .field(UserColumn::Role, vec!["admin", "owner"])
//!             .field(UserColumn::Email, "root@b.c"),
//!         Join::Or,
//!     )
//!     .await?;
//!
//! // INSERT INTO `shop`.`users` SET ?, then SELECT ... WHERE `id` IN (?)
//! let created = qb
//!     .and_get::<User, _>(
//!         &conn,
//!         qb.create_one::<User>(&conn, &Assignments::new().set(UserColumn::Email, "new@b.c")),
//!     )
//!     .await?;
//! ```

extern crate self as tableqb;

pub mod builder;
pub mod callback;
pub mod config;
pub mod connection;
pub mod error;
pub mod render;
pub mod statement;
pub mod table;
pub mod value;

pub use builder::{GET_ALL_LIMIT, ID_COLUMN, QueryBuilder};
pub use callback::{Callback, CallbackDriver, CallbackError, Callbacks};
pub use config::QbConfig;
pub use connection::{Connection, InsertIds, Outcome, Param, Row, WriteResult};
pub use error::{QbError, QbResult};
pub use render::render;
pub use statement::{Plan, Statement};
pub use table::{Column, Table};
pub use value::{Assignments, Filter, Join, Lookup};

#[cfg(feature = "derive")]
pub use tableqb_derive::Table;

pub mod prelude {
    //! Common imports.
    pub use crate::{
        Assignments, Column, Connection, Filter, Join, Lookup, QbError, QbResult, QueryBuilder,
        Table, WriteResult,
    };
}
