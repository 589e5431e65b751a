//! Ports for opening and releasing a store transaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::Error;

/// Source of transaction handles.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Handle type driven adapters operate on.
    type Handle: TransactionHandle;

    /// Open a new transaction.
    ///
    /// Adapters bound the wait for a connection with their own timeout.
    async fn begin(&self) -> Result<Self::Handle, Error>;
}

/// One open transaction.
///
/// The owner calls exactly one of [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). A handle dropped without either must leave
/// the store rolling the work back.
#[async_trait]
pub trait TransactionHandle: Send + Sync + 'static {
    /// Make the work permanent.
    async fn commit(&mut self) -> Result<(), Error>;

    /// Discard the work.
    async fn rollback(&mut self) -> Result<(), Error>;
}

/// Counts observed by a [`FixtureTransactionProvider`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionCounts {
    /// Transactions opened.
    pub begun: usize,
    /// Commits attempted.
    pub committed: usize,
    /// Rollbacks attempted.
    pub rolled_back: usize,
}

#[derive(Debug, Default)]
struct Ledger {
    begun: AtomicUsize,
    committed: AtomicUsize,
    rolled_back: AtomicUsize,
}

/// In-memory provider that records every begin, commit and rollback.
///
/// Individual steps can be scripted to fail.
///
/// # Examples
/// ```
/// use payments::domain::ports::{FixtureTransactionProvider, TransactionCounts};
///
/// let provider = FixtureTransactionProvider::new().failing_commit();
/// assert_eq!(provider.counts(), TransactionCounts::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureTransactionProvider {
    ledger: Arc<Ledger>,
    fail_begin: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

impl FixtureTransactionProvider {
    /// A provider whose every step succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `begin` fail with `INTERNAL`.
    #[must_use]
    pub const fn failing_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    /// Make `commit` fail with `INTERNAL`.
    #[must_use]
    pub const fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Make `rollback` fail with `INTERNAL`.
    #[must_use]
    pub const fn failing_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    /// Snapshot of the recorded counts.
    #[must_use]
    pub fn counts(&self) -> TransactionCounts {
        TransactionCounts {
            begun: self.ledger.begun.load(Ordering::SeqCst),
            committed: self.ledger.committed.load(Ordering::SeqCst),
            rolled_back: self.ledger.rolled_back.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl TransactionProvider for FixtureTransactionProvider {
    type Handle = FixtureTransaction;

    async fn begin(&self) -> Result<FixtureTransaction, Error> {
        if self.fail_begin {
            return Err(Error::internal("unable to begin transaction", "fixture begin failure"));
        }
        self.ledger.begun.fetch_add(1, Ordering::SeqCst);
        Ok(FixtureTransaction {
            ledger: Arc::clone(&self.ledger),
            fail_commit: self.fail_commit,
            fail_rollback: self.fail_rollback,
        })
    }
}

/// Handle issued by [`FixtureTransactionProvider`].
#[derive(Debug)]
pub struct FixtureTransaction {
    ledger: Arc<Ledger>,
    fail_commit: bool,
    fail_rollback: bool,
}

#[async_trait]
impl TransactionHandle for FixtureTransaction {
    async fn commit(&mut self) -> Result<(), Error> {
        self.ledger.committed.fetch_add(1, Ordering::SeqCst);
        if self.fail_commit {
            return Err(Error::internal("unable to commit transaction", "fixture commit failure"));
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), Error> {
        self.ledger.rolled_back.fetch_add(1, Ordering::SeqCst);
        if self.fail_rollback {
            return Err(Error::internal(
                "unable to roll back transaction",
                "fixture rollback failure",
            ));
        }
        Ok(())
    }
}
