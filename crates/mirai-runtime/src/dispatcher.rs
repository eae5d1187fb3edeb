//! Event dispatcher.
//!
//! Handlers are registered per event kind with [`EventDispatcher::on`], or for
//! every kind with [`EventDispatcher::on_any`]. How they run is chosen by the
//! [`ExecutionPolicy`]:
//!
//! - `SingleThread`: handlers are awaited in registration order inside
//!   [`dispatch`](EventDispatcher::dispatch)
//! - `ThreadPool`: each handler is spawned onto the tokio runtime and
//!   `dispatch` returns immediately
//!
//! A panicking handler is logged and does not affect the others.
//!
//! ```rust,ignore
//! use mirai_runtime::{EventDispatcher, ExecutionPolicy};
//! use mirai_core::event::GroupMessage;
//!
//! let dispatcher = EventDispatcher::new(ExecutionPolicy::ThreadPool);
//! dispatcher.on(|msg: GroupMessage| async move {
//!     tracing::info!(sender = %msg.sender.id, "{}", msg.message.content);
//! });
//!
//! dispatcher.dispatch_json(raw).await?;
//! dispatcher.shutdown().await;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, Level, debug, error, span, trace};

use mirai_core::{ClosedVariant, Event, EventType, Payload, VariantTag};

use crate::config::{DispatchConfig, ExecutionPolicy};
use crate::error::{RuntimeError, RuntimeResult};

/// A type-erased handler. Returns `None` when the event is not its kind.
type Handler = Arc<dyn Fn(&Event) -> Option<BoxFuture<'static, ()>> + Send + Sync>;

/// Routes decoded events to registered async handlers.
pub struct EventDispatcher {
    policy: ExecutionPolicy,
    handlers: RwLock<HashMap<EventType, Vec<Handler>>>,
    any_handlers: RwLock<Vec<Handler>>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(ExecutionPolicy::default())
    }
}

impl EventDispatcher {
    pub fn new(policy: ExecutionPolicy) -> Self {
        Self {
            policy,
            handlers: RwLock::new(HashMap::new()),
            any_handlers: RwLock::new(Vec::new()),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.execution)
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// Registers a handler for one event kind, selected by payload type.
    ///
    /// The handler receives its own clone of the payload.
    pub fn on<E, F, Fut>(&self, handler: F)
    where
        E: Payload<Event> + Clone + Send,
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let erased: Handler = Arc::new(move |event: &Event| {
            event
                .get_if::<E>()
                .cloned()
                .map(|payload| handler(payload).boxed())
        });
        self.handlers.write().entry(E::TAG).or_default().push(erased);
        trace!(event_type = %E::TAG, "Registered event handler");
    }

    /// Registers a handler for every event.
    pub fn on_any<F, Fut>(&self, handler: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let erased: Handler = Arc::new(move |event: &Event| Some(handler(event.clone()).boxed()));
        self.any_handlers.write().push(erased);
    }

    /// Number of handlers that would run for `kind`.
    pub fn handler_count(&self, kind: EventType) -> usize {
        let typed = self.handlers.read().get(&kind).map_or(0, Vec::len);
        typed + self.any_handlers.read().len()
    }

    /// A token cancelled when [`shutdown`](Self::shutdown) starts.
    ///
    /// Long-running handlers can watch it to stop early.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Dispatches an event and returns how many handlers it was routed to.
    pub async fn dispatch(&self, event: Event) -> RuntimeResult<usize> {
        if self.shutdown.is_cancelled() {
            return Err(RuntimeError::ShutDown);
        }

        let span = span!(Level::DEBUG, "dispatch", event_type = %event.type_name());

        // Collected up front so no lock is held across an await.
        let futures: Vec<_> = {
            let handlers = self.handlers.read();
            let any_handlers = self.any_handlers.read();
            handlers
                .get(&event.tag())
                .into_iter()
                .flatten()
                .chain(any_handlers.iter())
                .filter_map(|handler| handler(&event))
                .collect()
        };

        let count = futures.len();
        if count == 0 {
            trace!(event_type = %event.type_name(), "No handler for event");
            return Ok(0);
        }

        match self.policy {
            ExecutionPolicy::SingleThread => {
                async {
                    for (index, future) in futures.into_iter().enumerate() {
                        run_guarded(future, index).await;
                    }
                }
                .instrument(span)
                .await;
            }
            ExecutionPolicy::ThreadPool => {
                for (index, future) in futures.into_iter().enumerate() {
                    self.tracker
                        .spawn(run_guarded(future, index).instrument(span.clone()));
                }
            }
        }

        debug!(
            event_type = %event.type_name(),
            handlers = count,
            policy = %self.policy,
            "Event dispatched"
        );
        Ok(count)
    }

    /// Decodes a JSON event document and dispatches it.
    pub async fn dispatch_json(&self, json: &str) -> RuntimeResult<usize> {
        let event = Event::from_json(json)?;
        self.dispatch(event).await
    }

    /// Stops accepting events and waits for spawned handlers to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.close();
        debug!(pending = self.tracker.len(), "Waiting for event handlers");
        self.tracker.wait().await;
    }
}

async fn run_guarded(future: BoxFuture<'static, ()>, index: usize) {
    if let Err(panic) = AssertUnwindSafe(future).catch_unwind().await {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_owned());
        error!(handler = index, panic = %message, "Event handler panicked");
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let kinds: Vec<_> = EventType::ALL
            .iter()
            .filter(|kind| handlers.contains_key(kind))
            .map(|kind| kind.name())
            .collect();
        f.debug_struct("EventDispatcher")
            .field("policy", &self.policy)
            .field("kinds", &kinds)
            .field("any_handlers", &self.any_handlers.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirai_core::event::{BotOnlineEvent, GroupMessage, MemberJoinEvent};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GROUP_MESSAGE: &str = r#"{
        "type": "GroupMessage",
        "messageChain": [
            {"type": "Source", "id": 1, "time": 0},
            {"type": "Plain", "text": "hello"}
        ],
        "sender": {
            "id": 10001,
            "memberName": "alice",
            "permission": "MEMBER",
            "group": {"id": 42, "name": "g", "permission": "MEMBER"}
        }
    }"#;

    const BOT_ONLINE: &str = r#"{"type": "BotOnlineEvent", "qq": 123}"#;

    #[tokio::test]
    async fn test_single_thread_runs_in_order() {
        let dispatcher = EventDispatcher::new(ExecutionPolicy::SingleThread);
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&log);
        dispatcher.on(move |msg: GroupMessage| {
            let log = Arc::clone(&first);
            async move { log.lock().push(format!("typed:{}", msg.message.content)) }
        });
        let second = Arc::clone(&log);
        dispatcher.on_any(move |event: Event| {
            let log = Arc::clone(&second);
            async move { log.lock().push(format!("any:{}", event.type_name())) }
        });

        assert_eq!(dispatcher.handler_count(EventType::GroupMessage), 2);
        assert_eq!(dispatcher.dispatch_json(GROUP_MESSAGE).await.unwrap(), 2);
        assert_eq!(*log.lock(), vec!["typed:hello", "any:GroupMessage"]);
    }

    #[tokio::test]
    async fn test_unhandled_kind_is_skipped() {
        let dispatcher = EventDispatcher::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        dispatcher.on(move |_: MemberJoinEvent| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(dispatcher.dispatch_json(BOT_ONLINE).await.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.handler_count(EventType::BotOnlineEvent), 0);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_isolated() {
        let dispatcher = EventDispatcher::new(ExecutionPolicy::SingleThread);
        let calls = Arc::new(AtomicUsize::new(0));

        dispatcher.on(|_: BotOnlineEvent| async { panic!("handler failure") });
        let counter = Arc::clone(&calls);
        dispatcher.on(move |event: BotOnlineEvent| {
            let counter = Arc::clone(&counter);
            async move {
                assert_eq!(event.qq.0, 123);
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(dispatcher.dispatch_json(BOT_ONLINE).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_thread_pool_and_shutdown() {
        let dispatcher = EventDispatcher::from_config(&DispatchConfig {
            execution: ExecutionPolicy::ThreadPool,
        });
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        dispatcher.on(move |_: GroupMessage| {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        for _ in 0..4 {
            dispatcher.dispatch_json(GROUP_MESSAGE).await.unwrap();
        }
        let token = dispatcher.shutdown_token();
        dispatcher.shutdown().await;

        assert!(token.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(
            dispatcher.dispatch_json(GROUP_MESSAGE).await,
            Err(RuntimeError::ShutDown)
        ));
    }

    #[tokio::test]
    async fn test_dispatch_json_reports_decode_errors() {
        let dispatcher = EventDispatcher::default();
        let err = dispatcher
            .dispatch_json(r#"{"type": "Unknown"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Decode(_)));
    }
}
