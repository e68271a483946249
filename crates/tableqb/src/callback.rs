//! Adapter for drivers that answer through a completion callback.
//!
//! Many drivers expose `submit(sql, params, callback)` rather than returning a future. Wrap such
//! a driver in [`Callbacks`] to get a [`Connection`]: every submission gets its own single-use
//! channel, and the returned future resolves when the driver invokes the callback.
//!
//! ```ignore
//! struct Legacy;
//!
//! impl CallbackDriver for Legacy {
//!     type Error = String;
//!
//!     fn submit(&self, sql: &str, params: &[Param], done: Callback<String>) {
//!         // hand `done` to the driver's event loop ...
//!     }
//! }
//!
//! let conn = Callbacks::new(Legacy);
//! let users = qb.get_all::<User>(&conn).await?;
//! ```

use crate::connection::{Connection, Outcome, Param};
use thiserror::Error;
use tokio::sync::oneshot;

/// Completion callback handed to a [`CallbackDriver`]. Invoke it exactly once.
pub type Callback<E> = Box<dyn FnOnce(Result<Outcome, E>) + Send + 'static>;

/// A driver with a callback-style submit.
pub trait CallbackDriver: Send + Sync {
    type Error: std::fmt::Display + Send + 'static;

    /// Start the statement and arrange for `done` to be called with its result.
    fn submit(&self, sql: &str, params: &[Param], done: Callback<Self::Error>);
}

/// Error of a callback-adapted submission.
#[derive(Debug, Error)]
pub enum CallbackError<E: std::fmt::Display> {
    /// The driver reported a failure.
    #[error("{0}")]
    Driver(E),

    /// The driver dropped the callback without invoking it.
    #[error("driver dropped the completion callback without answering")]
    Dropped,
}

/// A [`Connection`] over a [`CallbackDriver`].
#[derive(Debug, Clone, Default)]
pub struct Callbacks<D> {
    driver: D,
}

impl<D: CallbackDriver> Callbacks<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_inner(self) -> D {
        self.driver
    }
}

impl<D: CallbackDriver> Connection for Callbacks<D> {
    type Error = CallbackError<D::Error>;

    fn submit(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl std::future::Future<Output = Result<Outcome, Self::Error>> + Send {
        let (tx, rx) = oneshot::channel();
        self.driver.submit(
            sql,
            params,
            Box::new(move |result| {
                // Receiver gone means the caller stopped waiting.
                let _ = tx.send(result);
            }),
        );
        async move {
            match rx.await {
                Ok(result) => result.map_err(CallbackError::Driver),
                Err(_) => Err(CallbackError::Dropped),
            }
        }
    }
}
