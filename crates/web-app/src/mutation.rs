//! Mutation
//!
//! Tracks a single user-initiated server mutation of a view. While a mutation is pending, further
//! submissions are rejected. Results arriving after the view has been unmounted are discarded.
//! Failed mutations are only repeated on request.

use std::{
    cell::{Cell, RefCell},
    fmt::Display,
    future::Future,
    rc::Rc,
};

use futures_util::future::{FutureExt, LocalBoxFuture};
use log::debug;

type Operation<T> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<T, String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState<T> {
    Idle,
    Pending,
    Success(T),
    Error(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("mutation is already pending")]
    Duplicate,
    #[error("view was closed before the mutation finished")]
    Unmounted,
    #[error("no mutation to retry")]
    NothingToRetry,
    #[error("{0}")]
    Failed(String),
}

pub struct Mutation<T> {
    state: Rc<RefCell<MutationState<T>>>,
    operation: Rc<RefCell<Option<Operation<T>>>>,
    mounted: Rc<Cell<bool>>,
}

impl<T> Clone for Mutation<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            operation: self.operation.clone(),
            mounted: self.mounted.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Mutation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Mutation<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MutationState::Idle)),
            operation: Rc::new(RefCell::new(None)),
            mounted: Rc::new(Cell::new(true)),
        }
    }

    #[must_use]
    pub fn state(&self) -> MutationState<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(*self.state.borrow(), MutationState::Pending)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        match &*self.state.borrow() {
            MutationState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Executes `operation` unless another execution is pending.
    ///
    /// The operation is kept so that a failed execution can be retried.
    pub async fn run<F, Fut, E>(&self, operation: F) -> Result<T, MutationError>
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        E: Display,
    {
        if self.is_pending() {
            return Err(MutationError::Duplicate);
        }
        let operation: Operation<T> = Rc::new(move || {
            operation()
                .map(|result| result.map_err(|err| err.to_string()))
                .boxed_local()
        });
        *self.operation.borrow_mut() = Some(operation.clone());
        self.execute(&operation).await
    }

    /// Executes the last operation again.
    pub async fn retry(&self) -> Result<T, MutationError> {
        if self.is_pending() {
            return Err(MutationError::Duplicate);
        }
        let Some(operation) = self.operation.borrow().clone() else {
            return Err(MutationError::NothingToRetry);
        };
        self.execute(&operation).await
    }

    pub fn reset(&self) {
        if !self.is_pending() {
            *self.state.borrow_mut() = MutationState::Idle;
        }
    }

    /// Discards the results of all pending and future executions.
    pub fn unmount(&self) {
        self.mounted.set(false);
    }

    async fn execute(&self, operation: &Operation<T>) -> Result<T, MutationError> {
        if !self.mounted.get() {
            return Err(MutationError::Unmounted);
        }
        *self.state.borrow_mut() = MutationState::Pending;
        let result = operation().await;
        if !self.mounted.get() {
            debug!("discarding result of mutation after unmount");
            return Err(MutationError::Unmounted);
        }
        match result {
            Ok(value) => {
                *self.state.borrow_mut() = MutationState::Success(value.clone());
                Ok(value)
            }
            Err(message) => {
                *self.state.borrow_mut() = MutationState::Error(message.clone());
                Err(MutationError::Failed(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::{
        channel::oneshot,
        executor::{LocalPool, block_on},
        task::LocalSpawnExt,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_run_success() {
        let mutation = Mutation::<u32>::new();

        assert_eq!(
            block_on(mutation.run(|| async { Ok::<_, String>(42) })),
            Ok(42)
        );
        assert_eq!(mutation.state(), MutationState::Success(42));
    }

    #[test]
    fn test_run_failure_and_retry() {
        let mutation = Mutation::<u32>::new();
        let calls = Rc::new(Cell::new(0));

        let result = block_on(mutation.run({
            let calls = calls.clone();
            move || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move {
                    if attempt == 1 {
                        Err("409 Conflict".to_string())
                    } else {
                        Ok(attempt)
                    }
                }
            }
        }));

        assert_eq!(result, Err(MutationError::Failed("409 Conflict".to_string())));
        assert_eq!(mutation.error(), Some("409 Conflict".to_string()));

        assert_eq!(block_on(mutation.retry()), Ok(2));
        assert_eq!(mutation.state(), MutationState::Success(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_retry_without_run() {
        let mutation = Mutation::<()>::new();

        assert_eq!(
            block_on(mutation.retry()),
            Err(MutationError::NothingToRetry)
        );
        assert_eq!(mutation.state(), MutationState::Idle);
    }

    fn spawn_gated(
        pool: &LocalPool,
        mutation: &Mutation<u32>,
        results: &Rc<RefCell<Vec<Result<u32, MutationError>>>>,
    ) -> oneshot::Sender<u32> {
        let (sender, receiver) = oneshot::channel::<u32>();
        let receiver = Rc::new(RefCell::new(Some(receiver)));
        let mutation = mutation.clone();
        let results = results.clone();
        pool.spawner()
            .spawn_local(async move {
                let result = mutation
                    .run(move || {
                        let receiver = receiver.borrow_mut().take();
                        async move {
                            match receiver {
                                Some(receiver) => receiver.await.map_err(|err| err.to_string()),
                                None => Err("gate already used".to_string()),
                            }
                        }
                    })
                    .await;
                results.borrow_mut().push(result);
            })
            .unwrap();
        sender
    }

    #[test]
    fn test_duplicate_submission_is_rejected() {
        let mut pool = LocalPool::new();
        let mutation = Mutation::<u32>::new();
        let results = Rc::new(RefCell::new(vec![]));

        let sender = spawn_gated(&pool, &mutation, &results);
        pool.run_until_stalled();
        assert!(mutation.is_pending());

        assert_eq!(
            block_on(mutation.run(|| async { Ok::<_, String>(2) })),
            Err(MutationError::Duplicate)
        );
        assert_eq!(block_on(mutation.retry()), Err(MutationError::Duplicate));

        sender.send(1).unwrap();
        pool.run_until_stalled();

        assert_eq!(*results.borrow(), vec![Ok(1)]);
        assert_eq!(mutation.state(), MutationState::Success(1));
    }

    #[test]
    fn test_result_after_unmount_is_discarded() {
        let mut pool = LocalPool::new();
        let mutation = Mutation::<u32>::new();
        let results = Rc::new(RefCell::new(vec![]));

        let sender = spawn_gated(&pool, &mutation, &results);
        pool.run_until_stalled();
        mutation.unmount();
        sender.send(1).unwrap();
        pool.run_until_stalled();

        assert_eq!(*results.borrow(), vec![Err(MutationError::Unmounted)]);
        assert_eq!(mutation.state(), MutationState::Pending);
    }

    #[test]
    fn test_reset() {
        let mutation = Mutation::<u32>::new();
        block_on(mutation.run(|| async { Err::<u32, _>("failed") })).unwrap_err();

        mutation.reset();

        assert_eq!(mutation.state(), MutationState::Idle);
    }
}
