//! Transaction-scoped execution of units of work.
//!
//! [`TransactionCoordinator::run`] opens a transaction, lends its handle to a
//! unit of work and then releases it exactly once: commit when the unit of
//! work succeeds, rollback when it fails or panics. Panics are caught here and
//! nowhere else in the domain, and only so the release step still runs.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use scoped_futures::ScopedBoxFuture;
use tracing::{debug, warn};

use super::Error;
use super::ports::{TransactionHandle, TransactionProvider};

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Runs units of work inside store transactions.
///
/// # Examples
/// ```
/// use payments::domain::TransactionCoordinator;
/// use payments::domain::ports::FixtureTransactionProvider;
/// use scoped_futures::ScopedFutureExt;
/// use std::sync::Arc;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let provider = Arc::new(FixtureTransactionProvider::new());
/// let coordinator = TransactionCoordinator::new(Arc::clone(&provider));
/// let answer = coordinator
///     .run(|_tx| async move { Ok(42) }.scope_boxed())
///     .await
///     .expect("unit of work succeeds");
/// assert_eq!(answer, 42);
/// assert_eq!(provider.counts().committed, 1);
/// # });
/// ```
#[derive(Debug)]
pub struct TransactionCoordinator<P> {
    provider: Option<Arc<P>>,
}

impl<P> TransactionCoordinator<P> {
    /// Coordinate transactions opened by `provider`.
    pub const fn new(provider: Arc<P>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A coordinator with no provider; every run fails with `INTERNAL`.
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { provider: None }
    }
}

impl<P> Clone for TransactionCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P> Default for TransactionCoordinator<P> {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl<P: TransactionProvider> TransactionCoordinator<P> {
    /// Run `unit_of_work` against a freshly opened transaction.
    ///
    /// Exactly one commit or rollback is issued once the transaction is open.
    /// When the unit of work fails, its error is returned even if the rollback
    /// fails too. A commit failure is returned only for a successful unit of
    /// work. A panic is converted to an error after rollback:
    /// - a panic carrying an [`Error`] returns that error;
    /// - a panic carrying a message returns `INTERNAL` with the message as
    ///   detail;
    /// - any other panic returns the rollback error, or `INTERNAL` when the
    ///   rollback succeeded.
    ///
    /// # Errors
    /// Returns `INTERNAL` when no provider is configured, the provider's error
    /// when the transaction cannot be opened, and otherwise the outcome
    /// described above.
    pub async fn run<'a, T, F>(&self, unit_of_work: F) -> Result<T, Error>
    where
        T: Send + 'a,
        F: for<'r> FnOnce(&'r mut P::Handle) -> ScopedBoxFuture<'a, 'r, Result<T, Error>>
            + Send
            + 'a,
    {
        let Some(provider) = self.provider.as_ref() else {
            return Err(Error::internal(
                INTERNAL_SERVER_ERROR,
                "transaction provider not configured",
            ));
        };

        let handle = provider.begin().await?;
        debug!("transaction opened");
        let mut scope = TransactionScope::new(handle);
        let outcome = AssertUnwindSafe(async { unit_of_work(scope.handle_mut()).await })
            .catch_unwind()
            .await;
        scope.release(outcome).await
    }
}

/// What a panic payload told us about the failure.
enum AbortCause {
    Error(Error),
    Message(String),
    Opaque,
}

impl AbortCause {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<Error>() {
            Ok(error) => Self::Error(*error),
            Err(payload) => {
                if let Some(message) = payload.downcast_ref::<&'static str>() {
                    Self::Message((*message).to_owned())
                } else if let Some(message) = payload.downcast_ref::<String>() {
                    Self::Message(message.clone())
                } else {
                    Self::Opaque
                }
            }
        }
    }
}

/// Owns an open handle until it has been committed or rolled back.
struct TransactionScope<H: TransactionHandle> {
    handle: H,
    released: bool,
}

impl<H: TransactionHandle> TransactionScope<H> {
    const fn new(handle: H) -> Self {
        Self {
            handle,
            released: false,
        }
    }

    const fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    async fn commit(&mut self) -> Result<(), Error> {
        self.released = true;
        let result = self.handle.commit().await;
        debug!(ok = result.is_ok(), "transaction committed");
        result
    }

    async fn rollback(&mut self) -> Result<(), Error> {
        self.released = true;
        let result = self.handle.rollback().await;
        debug!(ok = result.is_ok(), "transaction rolled back");
        result
    }

    async fn release<T>(
        mut self,
        outcome: Result<Result<T, Error>, Box<dyn Any + Send>>,
    ) -> Result<T, Error> {
        match outcome {
            Ok(Ok(value)) => self.commit().await.map(|()| value),
            Ok(Err(error)) => {
                self.rollback_after(&error).await;
                Err(error)
            }
            Err(payload) => {
                let cause = AbortCause::from_payload(payload);
                warn!("unit of work panicked; rolling back");
                match cause {
                    AbortCause::Error(error) => {
                        self.rollback_after(&error).await;
                        Err(error)
                    }
                    AbortCause::Message(message) => {
                        let error = Error::internal(INTERNAL_SERVER_ERROR, message);
                        self.rollback_after(&error).await;
                        Err(error)
                    }
                    AbortCause::Opaque => match self.rollback().await {
                        Ok(()) => Err(Error::internal(
                            INTERNAL_SERVER_ERROR,
                            "unit of work aborted",
                        )),
                        Err(rollback_error) => Err(rollback_error),
                    },
                }
            }
        }
    }

    /// Roll back after `cause`; a rollback failure is logged, not returned.
    async fn rollback_after(&mut self, cause: &Error) {
        if let Err(rollback_error) = self.rollback().await {
            warn!(
                cause = %cause,
                error = %rollback_error,
                detail = rollback_error.detail(),
                "rollback failed after unit of work error"
            );
        }
    }
}

impl<H: TransactionHandle> Drop for TransactionScope<H> {
    fn drop(&mut self) {
        if !self.released {
            warn!("transaction scope dropped before release; store will discard the transaction");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Release guarantees of the coordinator, observed through the fixture
    //! provider's counters.

    use super::*;
    use crate::domain::GenericCode;
    use crate::domain::ports::{FixtureTransactionProvider, TransactionCounts};
    use rstest::{fixture, rstest};
    use scoped_futures::ScopedFutureExt;

    fn coordinator(
        provider: &FixtureTransactionProvider,
    ) -> TransactionCoordinator<FixtureTransactionProvider> {
        TransactionCoordinator::new(Arc::new(provider.clone()))
    }

    fn explode(message: &'static str) -> Result<u8, Error> {
        panic!("{message}")
    }

    fn explode_with<P: Any + Send + 'static>(payload: P) -> Result<u8, Error> {
        std::panic::panic_any(payload)
    }

    const fn counts(committed: usize, rolled_back: usize) -> TransactionCounts {
        TransactionCounts {
            begun: 1,
            committed,
            rolled_back,
        }
    }

    #[fixture]
    fn provider() -> FixtureTransactionProvider {
        FixtureTransactionProvider::new()
    }

    #[rstest]
    #[tokio::test]
    async fn success_commits_once(provider: FixtureTransactionProvider) {
        let value = coordinator(&provider)
            .run(|_tx| async move { Ok("done") }.scope_boxed())
            .await
            .expect("unit of work succeeds");

        assert_eq!(value, "done");
        assert_eq!(provider.counts(), counts(1, 0));
    }

    #[rstest]
    #[tokio::test]
    async fn failure_rolls_back_once_and_returns_unit_error(provider: FixtureTransactionProvider) {
        let err = coordinator(&provider)
            .run(|_tx| {
                async move { Err::<(), _>(Error::not_found("unable to get payment", "no rows")) }
                    .scope_boxed()
            })
            .await
            .expect_err("unit of work fails");

        assert!(err.is(GenericCode::NotFound));
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn unit_error_wins_over_rollback_error() {
        let provider = FixtureTransactionProvider::new().failing_rollback();
        let err = coordinator(&provider)
            .run(|_tx| {
                async move { Err::<(), _>(Error::already_exists("duplicate", "id")) }.scope_boxed()
            })
            .await
            .expect_err("unit of work fails");

        assert!(err.is(GenericCode::AlreadyExists));
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn commit_error_surfaces_after_success() {
        let provider = FixtureTransactionProvider::new().failing_commit();
        let err = coordinator(&provider)
            .run(|_tx| async move { Ok(1) }.scope_boxed())
            .await
            .expect_err("commit fails");

        assert_eq!(err.message(), "unable to commit transaction");
        assert_eq!(provider.counts(), counts(1, 0));
    }

    #[rstest]
    #[tokio::test]
    async fn panic_with_message_rolls_back_and_reports_message(
        provider: FixtureTransactionProvider,
    ) {
        let err = coordinator(&provider)
            .run(|_tx| async move { explode("invariant violated") }.scope_boxed())
            .await
            .expect_err("panic is converted");

        assert!(err.is(GenericCode::Internal));
        assert_eq!(err.detail(), "invariant violated");
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn panic_before_future_is_built_still_rolls_back(provider: FixtureTransactionProvider) {
        let err = coordinator(&provider)
            .run(|_tx| {
                let first = explode("closure failed before its future");
                async move { first }.scope_boxed()
            })
            .await
            .expect_err("panic is converted");

        assert!(err.is(GenericCode::Internal));
        assert_eq!(err.detail(), "closure failed before its future");
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn panic_carrying_error_returns_it_even_if_rollback_fails() {
        let provider = FixtureTransactionProvider::new().failing_rollback();
        let err = coordinator(&provider)
            .run(|_tx| {
                async move { explode_with(Error::invalid_argument("bad", "payload")) }.scope_boxed()
            })
            .await
            .expect_err("panic is converted");

        assert!(err.is(GenericCode::InvalidArgument));
        assert_eq!(err.detail(), "payload");
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn opaque_panic_reports_successful_rollback_as_internal(
        provider: FixtureTransactionProvider,
    ) {
        let err = coordinator(&provider)
            .run(|_tx| async move { explode_with(7_u32) }.scope_boxed())
            .await
            .expect_err("panic is converted");

        assert!(err.is(GenericCode::Internal));
        assert_eq!(err.detail(), "unit of work aborted");
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn opaque_panic_reports_rollback_failure() {
        let provider = FixtureTransactionProvider::new().failing_rollback();
        let err = coordinator(&provider)
            .run(|_tx| async move { explode_with(7_u32) }.scope_boxed())
            .await
            .expect_err("panic is converted");

        assert_eq!(err.message(), "unable to roll back transaction");
        assert_eq!(provider.counts(), counts(0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn begin_failure_skips_unit_of_work() {
        let provider = FixtureTransactionProvider::new().failing_begin();
        let err = coordinator(&provider)
            .run(|_tx| async move { explode("must not run") }.scope_boxed())
            .await
            .expect_err("begin fails");

        assert_eq!(err.message(), "unable to begin transaction");
        assert_eq!(provider.counts(), TransactionCounts::default());
    }

    #[rstest]
    #[tokio::test]
    async fn unconfigured_coordinator_fails_internal() {
        let coordinator = TransactionCoordinator::<FixtureTransactionProvider>::unconfigured();
        let err = coordinator
            .run(|_tx| async move { Ok(()) }.scope_boxed())
            .await
            .expect_err("no provider");

        assert!(err.is(GenericCode::Internal));
        assert_eq!(err.detail(), "transaction provider not configured");
    }

    #[rstest]
    #[tokio::test]
    async fn unit_of_work_borrows_surrounding_state(provider: FixtureTransactionProvider) {
        let mut seen = Vec::new();
        let items = vec![1, 2, 3];
        coordinator(&provider)
            .run(|_tx| {
                async {
                    seen.extend(items.iter().copied());
                    Ok(())
                }
                .scope_boxed()
            })
            .await
            .expect("unit of work succeeds");

        assert_eq!(seen, items);
        assert_eq!(provider.counts(), counts(1, 0));
    }
}
