//! PostgreSQL transactions over pooled `diesel-async` connections.

use std::fmt::Display;

use async_trait::async_trait;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, TransactionManager};
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::{TransactionHandle, TransactionProvider};

use super::pool::DbPool;

const BEGIN_FAILED: &str = "unable to begin transaction";
const COMMIT_FAILED: &str = "unable to commit transaction";
const ROLLBACK_FAILED: &str = "unable to roll back transaction";

fn transaction_error(message: &'static str, cause: impl Display) -> Error {
    let detail = cause.to_string();
    debug!(%detail, message, "transaction step failed");
    Error::internal(message, detail)
}

/// Opens one PostgreSQL transaction per unit of work.
#[derive(Clone)]
pub struct DieselTransactionProvider {
    pool: DbPool,
}

impl DieselTransactionProvider {
    /// Create a provider drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionProvider for DieselTransactionProvider {
    type Handle = DieselTransaction;

    async fn begin(&self) -> Result<Self::Handle, Error> {
        let mut conn = self
            .pool
            .get_owned()
            .await
            .map_err(|err| transaction_error(BEGIN_FAILED, err))?;

        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(|err| transaction_error(BEGIN_FAILED, err))?;

        Ok(DieselTransaction { conn })
    }
}

/// An open transaction holding its pooled connection.
///
/// If the handle is dropped before commit or rollback the connection still
/// reports an open transaction, so the pool discards it and the server rolls
/// the work back when the session closes.
pub struct DieselTransaction {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

impl DieselTransaction {
    /// Connection that repositories run their statements on.
    pub(crate) fn connection(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl TransactionHandle for DieselTransaction {
    async fn commit(&mut self) -> Result<(), Error> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(|err| transaction_error(COMMIT_FAILED, err))
    }

    async fn rollback(&mut self) -> Result<(), Error> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(|err| transaction_error(ROLLBACK_FAILED, err))
    }
}
