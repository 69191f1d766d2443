//! Engine - orchestration state for the catalogue runners
//!
//! The Engine owns the TEA state, the message channel, the fetch tasks, the
//! shutdown signal and the event broadcaster. Runners feed it messages and
//! subscribe to its events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};

use catalog_api::{CollectionSource, PageQuery};
use catalog_core::prelude::*;

use crate::actions::FetchTaskMap;
use crate::category_store::CategoriesStatus;
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::state::AppState;
use crate::view::CatalogView;

/// How long shutdown waits for each fetch task
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    view: CatalogView,
    in_flight: Option<PageQuery>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            view: state.view(),
            in_flight: state.pagination.in_flight(),
        }
    }
}

/// Orchestration engine for the plant catalogue.
///
/// Encapsulates:
/// - TEA state management
/// - Message channel
/// - Fetch task tracking
/// - Shutdown signaling (the cancellation token of fetch tasks)
/// - Event broadcasting for external consumers
pub struct Engine<S> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin reader).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Running fetch tasks
    pub fetch_tasks: FetchTaskMap,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Settings the state was built from
    pub settings: Settings,

    source: Arc<S>,

    /// Subscribers receive EngineEvents after each message processing cycle.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S> Engine<S>
where
    S: CollectionSource + Send + Sync + 'static,
{
    pub fn new(source: S, settings: Settings) -> Self {
        Self::with_shared_source(Arc::new(source), settings)
    }

    /// Create an engine over a source the caller keeps a handle to
    pub fn with_shared_source(source: Arc<S>, settings: Settings) -> Self {
        let state = AppState::with_settings(&settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(256);

        debug!(
            "Engine created (page size {}, dedupe {})",
            state.pagination.page_size(),
            settings.catalog.dedupe_by_id
        );

        Self {
            state,
            msg_tx,
            msg_rx,
            fetch_tasks: Arc::new(std::sync::Mutex::new(HashMap::new())),
            shutdown_tx,
            shutdown_rx,
            settings,
            source,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Open the catalogue: fetch categories and the first page
    pub fn start(&mut self) {
        self.process_message(Message::Start);
    }

    /// Process a single message through the TEA update cycle and emit
    /// events for what changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.source,
            &self.msg_tx,
            &self.fetch_tasks,
            &self.shutdown_rx,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Process messages until no fetch task is running and the channel is
    /// empty. Returns the number of messages processed.
    ///
    /// Does not return while a fetch is held open.
    pub async fn run_until_idle(&mut self) -> usize {
        let mut count = 0;
        loop {
            count += self.drain_pending_messages();

            if !self.has_running_tasks() {
                // A finished task has already queued its result
                let late = self.drain_pending_messages();
                count += late;
                if late == 0 {
                    break;
                }
                continue;
            }

            match self.msg_rx.recv().await {
                Some(msg) => {
                    self.process_message(msg);
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Whether any fetch task has not finished yet
    pub fn has_running_tasks(&self) -> bool {
        match self.fetch_tasks.lock() {
            Ok(tasks) => tasks.values().any(|task| !task.is_finished()),
            Err(_) => false,
        }
    }

    /// Current render-ready view
    pub fn view(&self) -> CatalogView {
        self.state.view()
    }

    /// Get a clone of the message sender
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Initiate shutdown: signal fetch tasks and wait for them.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        // Signal all fetch tasks to stop
        let _ = self.shutdown_tx.send(true);

        let tasks: Vec<_> = match self.fetch_tasks.lock() {
            Ok(mut map) => map.drain().collect(),
            Err(e) => {
                warn!("Fetch task map poisoned during shutdown: {}", e);
                Vec::new()
            }
        };

        for (kind, handle) in tasks {
            match tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => debug!("{:?} fetch task stopped", kind),
                Ok(Err(e)) => warn!("{:?} fetch task panicked: {}", kind, e),
                Err(_) => warn!("{:?} fetch task did not stop in time", kind),
            }
        }
        info!("Engine shut down");
    }

    /// Compare pre/post snapshots and emit events for what changed.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        let (before, after) = (&pre.view, &post.view);

        if before.categories_status != after.categories_status {
            match after.categories_status {
                CategoriesStatus::Loaded | CategoriesStatus::Empty => {
                    self.emit(EngineEvent::CategoriesLoaded {
                        count: after.categories.len().saturating_sub(1),
                    });
                }
                CategoriesStatus::Failed => {
                    if let Some(error) = after.categories_error.clone() {
                        self.emit(EngineEvent::CategoriesFailed { error });
                    }
                }
                CategoriesStatus::NotRequested | CategoriesStatus::Loading => {}
            }
        }

        // The in-flight page resolved
        if let Some(query) = pre.in_flight {
            if post.in_flight.is_none() {
                match after.items_error.clone() {
                    Some(error) => self.emit(EngineEvent::PageFailed {
                        page: query.page,
                        error,
                    }),
                    None => self.emit(EngineEvent::PageLoaded {
                        page: query.page,
                        total_loaded: after.total_loaded,
                    }),
                }
            }
        }

        if !before.exhausted && after.exhausted {
            self.emit(EngineEvent::Exhausted {
                total_loaded: after.total_loaded,
            });
        }

        if before.active_category != after.active_category {
            self.emit(EngineEvent::CategorySelected {
                key: after.active_category.clone(),
                visible: after.visible_items.len(),
            });
        }

        if before != after {
            self.emit(EngineEvent::StateChanged(Box::new(after.clone())));
        }
    }

    /// send() returns Err only if there are no receivers
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_api::test_utils::{test_category, test_plants, FakeResponse, FakeSource};
    use catalog_core::FetchErrorKind;
    use tokio::sync::broadcast::error::TryRecvError;

    fn drain_events(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        events
    }

    fn labels(events: &[EngineEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.event_type()).collect()
    }

    #[tokio::test]
    async fn test_start_loads_categories_and_first_page() {
        let source = Arc::new(
            FakeSource::new()
                .with_categories(vec![test_category("indoor", "Indoor")])
                .with_page(1, test_plants(1, 8, &["indoor"])),
        );
        let mut engine = Engine::with_shared_source(source.clone(), Settings::default());
        let mut events = engine.subscribe();

        engine.start();
        engine.run_until_idle().await;

        let view = engine.view();
        assert_eq!(view.categories.len(), 2);
        assert_eq!(view.visible_items.len(), 8);
        assert!(!view.is_initial_loading);
        assert_eq!(source.category_calls(), 1);
        assert_eq!(source.page_requests(), vec![PageQuery::new(1, 8)]);

        let labels = labels(&drain_events(&mut events));
        assert!(labels.contains(&"categories_loaded"));
        assert!(labels.contains(&"page_loaded"));
        assert_eq!(labels.last(), Some(&"state_changed"));
    }

    #[tokio::test]
    async fn test_page_failure_emits_event() {
        let source = FakeSource::new();
        source.push_page(1, FakeResponse::Network("offline".to_string()));
        let mut engine = Engine::new(source, Settings::default());
        let mut events = engine.subscribe();

        engine.start();
        engine.run_until_idle().await;

        let events = drain_events(&mut events);
        let failed = events.iter().find_map(|e| match e {
            EngineEvent::PageFailed { page, error } => Some((*page, error.kind)),
            _ => None,
        });
        assert_eq!(failed, Some((1, FetchErrorKind::Network)));
        assert!(!engine.view().is_initial_loading);
    }

    #[tokio::test]
    async fn test_exhausted_event_on_short_page() {
        let source = FakeSource::new().with_page(1, test_plants(1, 3, &["a"]));
        let mut engine = Engine::new(source, Settings::default());
        let mut events = engine.subscribe();

        engine.start();
        engine.run_until_idle().await;

        let events = drain_events(&mut events);
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::Exhausted { total_loaded: 3 })));
    }

    #[tokio::test]
    async fn test_unchanged_state_emits_nothing() {
        let mut engine = Engine::new(FakeSource::new(), Settings::default());
        engine.start();
        engine.run_until_idle().await;

        let mut events = engine.subscribe();
        // Exhausted after the empty first page: this is a no-op
        engine.process_message(Message::ScrollProgress {
            distance_from_end: 2.0,
        });
        assert!(drain_events(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_category_selection_event() {
        let source = FakeSource::new()
            .with_categories(vec![test_category("indoor", "Indoor")])
            .with_page(1, test_plants(1, 4, &["indoor"]));
        let mut engine = Engine::new(source, Settings::default());
        engine.start();
        engine.run_until_idle().await;

        let mut events = engine.subscribe();
        engine.process_message(Message::SelectCategory {
            key: "indoor".to_string(),
        });

        let events = drain_events(&mut events);
        assert!(matches!(
            &events[0],
            EngineEvent::CategorySelected { key, visible: 4 } if key == "indoor"
        ));
        assert!(!engine.has_running_tasks());
    }

    #[tokio::test]
    async fn test_shutdown_stops_held_fetch() {
        let source = FakeSource::new().with_page(1, test_plants(1, 8, &["a"]));
        let _gate = source.hold_page(1);
        let mut engine = Engine::new(source, Settings::default());
        let mut events = engine.subscribe();

        engine.start();
        tokio::task::yield_now().await;
        assert!(engine.has_running_tasks());

        tokio::time::timeout(Duration::from_secs(5), engine.shutdown())
            .await
            .expect("shutdown should not hang");

        assert!(!engine.has_running_tasks());
        let labels = labels(&drain_events(&mut events));
        assert_eq!(labels.last(), Some(&"shutdown"));
        // Nothing was delivered for the cancelled page
        while let Ok(msg) = engine.msg_rx.try_recv() {
            assert!(!matches!(msg, Message::PageLoaded { .. }));
        }
    }
}
