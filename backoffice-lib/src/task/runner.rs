//! Last-call-wins wrapper around an async operation

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::AsyncState;
use super::Phase;
use crate::error::ErrorDescriptor;

type Operation<A, T> =
    Arc<dyn Fn(A, CancellationToken) -> BoxFuture<'static, Result<T, ErrorDescriptor>> + Send + Sync>;
type Hook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type SettledHook = Arc<dyn Fn() + Send + Sync>;

struct Slot<T> {
    state: AsyncState<T>,
    /// Bumped by every `execute`; a finishing call only writes state if it
    /// still holds the latest generation.
    generation: u64,
    token: Option<CancellationToken>,
}

struct TaskInner<A, T> {
    operation: Operation<A, T>,
    slot: Mutex<Slot<T>>,
}

struct Hooks<T> {
    on_success: Option<Hook<T>>,
    on_error: Option<Hook<ErrorDescriptor>>,
    on_settled: Option<SettledHook>,
}

impl<T> Clone for Hooks<T> {
    fn clone(&self) -> Self {
        Self {
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            on_settled: self.on_settled.clone(),
        }
    }
}

/// Tracks idle/loading/success/error state for an async operation.
///
/// The wrapped operation receives a [`CancellationToken`] for every call.
/// Starting a new call cancels the previous token, and results of a
/// superseded call never touch the state or the success/error hooks.
/// The settled hook runs once per [`execute`](Self::execute) regardless.
///
/// Cloning is cheap; clones share state. Hooks are set with the builder
/// methods before the task is cloned.
///
/// # Example
///
/// ```no_run
/// use backoffice_lib::task::AsyncTask;
/// use backoffice_lib::{FetchClient, fetch::RequestOptions};
///
/// # async fn example(client: FetchClient) {
/// let task = AsyncTask::new(move |path: String, cancel| {
///     let client = client.clone();
///     async move {
///         client
///             .get(&path, RequestOptions::new().cancel_token(cancel))
///             .await
///     }
/// })
/// .on_error(|error| log::error!("load failed: {}", error));
///
/// let _ = task.execute("/api/customers".to_string()).await;
/// # }
/// ```
pub struct AsyncTask<A, T> {
    inner: Arc<TaskInner<A, T>>,
    hooks: Arc<Hooks<T>>,
}

impl<A, T> Clone for AsyncTask<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            hooks: Arc::clone(&self.hooks),
        }
    }
}

impl<A, T> fmt::Debug for AsyncTask<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.lock();
        f.debug_struct("AsyncTask")
            .field("phase", &slot.state.phase)
            .field("generation", &slot.generation)
            .finish_non_exhaustive()
    }
}

impl<A, T> TaskInner<A, T> {
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        // State stays consistent across a panicking hook, so poisoning is ignored.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<A, T> AsyncTask<A, T>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
{
    /// Wraps `operation`.
    pub fn new<F, Fut>(operation: F) -> Self
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ErrorDescriptor>> + Send + 'static,
    {
        let operation: Operation<A, T> = Arc::new(
            move |args: A, token: CancellationToken| -> BoxFuture<'static, Result<T, ErrorDescriptor>> {
                Box::pin(operation(args, token))
            },
        );
        Self {
            inner: Arc::new(TaskInner {
                operation,
                slot: Mutex::new(Slot {
                    state: AsyncState::default(),
                    generation: 0,
                    token: None,
                }),
            }),
            hooks: Arc::new(Hooks {
                on_success: None,
                on_error: None,
                on_settled: None,
            }),
        }
    }

    fn hooks_mut(&mut self) -> &mut Hooks<T> {
        Arc::make_mut(&mut self.hooks)
    }

    /// Called with the payload when the latest call succeeds.
    pub fn on_success(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.hooks_mut().on_success = Some(Arc::new(hook));
        self
    }

    /// Called with the error when the latest call fails.
    pub fn on_error(mut self, hook: impl Fn(&ErrorDescriptor) + Send + Sync + 'static) -> Self {
        self.hooks_mut().on_error = Some(Arc::new(hook));
        self
    }

    /// Called once after every `execute`, whatever the outcome.
    pub fn on_settled(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks_mut().on_settled = Some(Arc::new(hook));
        self
    }

    /// Runs the operation, superseding any call still in flight.
    ///
    /// Returns this call's own result, even when a newer call has since
    /// taken over the state.
    pub async fn execute(&self, args: A) -> Result<T, ErrorDescriptor> {
        let (generation, token) = {
            let mut slot = self.inner.lock();
            if let Some(previous) = slot.token.take() {
                log::debug!("superseding in-flight call {}", slot.generation);
                previous.cancel();
            }
            slot.generation += 1;
            let token = CancellationToken::new();
            slot.token = Some(token.clone());
            slot.state.phase = Phase::Loading;
            slot.state.error = None;
            (slot.generation, token)
        };

        let result = (self.inner.operation)(args, token).await;

        let current = {
            let mut slot = self.inner.lock();
            let current = slot.generation == generation;
            if current {
                slot.token = None;
                match &result {
                    Ok(payload) => {
                        slot.state.payload = Some(payload.clone());
                        slot.state.phase = Phase::Success;
                        slot.state.error = None;
                    }
                    Err(error) => {
                        slot.state.phase = Phase::Error;
                        slot.state.error = Some(error.clone());
                    }
                }
            } else {
                log::debug!("discarding result of superseded call {}", generation);
            }
            current
        };

        if current {
            match &result {
                Ok(payload) => {
                    if let Some(hook) = &self.hooks.on_success {
                        hook(payload);
                    }
                }
                Err(error) => {
                    if let Some(hook) = &self.hooks.on_error {
                        hook(error);
                    }
                }
            }
        }
        if let Some(hook) = &self.hooks.on_settled {
            hook();
        }

        result
    }

    /// Signals the in-flight call to abort.
    ///
    /// The operation decides how to honor the token; its result is still
    /// applied if no newer call has started.
    pub fn cancel(&self) {
        if let Some(token) = &self.inner.lock().token {
            token.cancel();
        }
    }

    /// Returns to idle without cancelling in-flight work.
    pub fn reset(&self) {
        self.inner.lock().state = AsyncState::default();
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AsyncState<T> {
        self.inner.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().state.phase
    }

    pub fn payload(&self) -> Option<T> {
        self.inner.lock().state.payload.clone()
    }

    pub fn error(&self) -> Option<ErrorDescriptor> {
        self.inner.lock().state.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn delayed() -> AsyncTask<(u64, &'static str), String> {
        AsyncTask::new(|(delay_ms, value): (u64, &'static str), _cancel: CancellationToken| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if value == "fail" {
                return Err(ErrorDescriptor::new(ErrorKind::Unknown, "BOOM", "boom"));
            }
            Ok(value.to_string())
        })
    }

    #[tokio::test]
    async fn test_success_transitions() {
        let task = delayed();
        assert_eq!(task.phase(), Phase::Idle);

        let result = task.execute((0, "done")).await;
        assert_eq!(result.unwrap(), "done");

        let state = task.state();
        assert!(state.is_success());
        assert_eq!(state.payload.as_deref(), Some("done"));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_error_keeps_payload() {
        let task = delayed();
        task.execute((0, "first")).await.unwrap();

        let error = task.execute((0, "fail")).await.unwrap_err();
        assert_eq!(error.code, "BOOM");

        let state = task.state();
        assert!(state.is_error());
        assert_eq!(state.payload.as_deref(), Some("first"));
        assert_eq!(state.error.unwrap().code, "BOOM");
    }

    #[tokio::test]
    async fn test_loading_clears_previous_error() {
        let task = delayed();
        let _ = task.execute((0, "fail")).await;
        assert!(task.state().error.is_some());

        let running = task.clone();
        let handle = tokio::spawn(async move { running.execute((50, "ok")).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let state = task.state();
        assert!(state.is_loading());
        assert!(state.error.is_none());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_last_call_wins() {
        let task = delayed();

        let slow = task.clone();
        let first = tokio::spawn(async move { slow.execute((80, "stale")).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = task.execute((0, "fresh")).await;

        assert_eq!(second.unwrap(), "fresh");
        // The superseded call still returns its own value to its caller.
        assert_eq!(first.await.unwrap().unwrap(), "stale");
        assert_eq!(task.payload().as_deref(), Some("fresh"));
        assert!(task.state().is_success());
    }

    #[tokio::test]
    async fn test_superseded_call_is_cancelled() {
        let task: AsyncTask<(), bool> = AsyncTask::new(|_, cancel: CancellationToken| async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(ErrorDescriptor::cancelled("/test")),
                _ = tokio::time::sleep(Duration::from_millis(50)) => Ok(true),
            }
        });

        let first_task = task.clone();
        let first = tokio::spawn(async move { first_task.execute(()).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = task.execute(()).await;

        assert!(first.await.unwrap().unwrap_err().is_cancelled());
        assert!(second.unwrap());
        assert!(task.state().is_success());
    }

    #[tokio::test]
    async fn test_hooks_fire_for_current_call_only() {
        let successes = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let settled = Arc::new(AtomicUsize::new(0));

        let (s, e, d) = (successes.clone(), errors.clone(), settled.clone());
        let task = delayed()
            .on_success(move |_| {
                s.fetch_add(1, Ordering::SeqCst);
            })
            .on_error(move |_| {
                e.fetch_add(1, Ordering::SeqCst);
            })
            .on_settled(move || {
                d.fetch_add(1, Ordering::SeqCst);
            });

        let slow = task.clone();
        let first = tokio::spawn(async move { slow.execute((60, "fail")).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        task.execute((0, "fresh")).await.unwrap();
        let _ = first.await.unwrap();

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
        assert_eq!(settled.load(Ordering::SeqCst), 2);
        assert_eq!(task.payload().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_cancel_signals_in_flight_call() {
        let task: AsyncTask<(), ()> = AsyncTask::new(|_, cancel: CancellationToken| async move {
            cancel.cancelled().await;
            Err(ErrorDescriptor::cancelled("/test"))
        });

        let running = task.clone();
        let handle = tokio::spawn(async move { running.execute(()).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        task.cancel();

        assert!(handle.await.unwrap().unwrap_err().is_cancelled());
        assert!(task.state().is_error());
    }

    #[tokio::test]
    async fn test_reset() {
        let task = delayed();
        task.execute((0, "done")).await.unwrap();
        task.reset();

        let state = task.state();
        assert!(state.is_idle());
        assert!(state.payload.is_none());
        assert!(state.error.is_none());
    }
}
