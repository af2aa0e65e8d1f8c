//! Immediate write transactions on a dedicated pooled connection.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection};

use crate::error::DatabaseError;
use crate::{Error, Result};

use super::Database;

/// A `BEGIN IMMEDIATE` transaction holding SQLite's write lock
///
/// Finish it with [`commit`](Self::commit) or [`rollback`](Self::rollback).
/// If it is dropped unfinished (an early `?` return, or the owning task being
/// cancelled mid-await) the connection is closed rather than handed back to
/// the pool, and SQLite discards the open transaction with it.
pub struct WriteTx {
    conn: PoolConnection<Sqlite>,
    finished: bool,
}

impl WriteTx {
    /// The connection to run statements on
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Commit and release the connection back to the pool
    pub async fn commit(mut self) -> Result<()> {
        sqlx::query("COMMIT")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::TransactionFailed(format!(
                    "Failed to commit: {}",
                    e
                )))
            })?;
        self.finished = true;
        Ok(())
    }

    /// Roll back and release the connection back to the pool
    pub async fn rollback(mut self) -> Result<()> {
        sqlx::query("ROLLBACK")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::TransactionFailed(format!(
                    "Failed to roll back: {}",
                    e
                )))
            })?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for WriteTx {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("write transaction dropped unfinished, closing its connection");
            self.conn.close_on_drop();
        }
    }
}

impl Database {
    /// Start a write transaction, waiting up to the busy timeout for the lock
    pub async fn begin_write(&self) -> Result<WriteTx> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            Error::Database(DatabaseError::ConnectionFailed(format!(
                "Failed to acquire connection: {}",
                e
            )))
        })?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::TransactionFailed(format!(
                    "Failed to begin transaction: {}",
                    e
                )))
            })?;

        Ok(WriteTx {
            conn,
            finished: false,
        })
    }
}
