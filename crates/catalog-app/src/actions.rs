//! Action handlers: UpdateAction dispatch and fetch task spawning
//!
//! Fetch tasks never touch state. Each one races its request against the
//! shutdown signal and reports back with a completion [`Message`]. A result
//! that arrives after shutdown, or after the message loop went away, is
//! dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use catalog_api::{CollectionSource, PageQuery};
use catalog_core::prelude::*;
use catalog_core::FetchFailure;

use crate::handler::UpdateAction;
use crate::message::Message;

/// What a fetch task is fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Categories,
    Page(u32),
}

/// Convenience type alias for fetch task tracking
pub type FetchTaskMap = Arc<std::sync::Mutex<HashMap<FetchKind, JoinHandle<()>>>>;

/// Execute an action by spawning a fetch task
pub fn handle_action<S>(
    action: UpdateAction,
    source: Arc<S>,
    msg_tx: mpsc::Sender<Message>,
    fetch_tasks: FetchTaskMap,
    shutdown_rx: watch::Receiver<bool>,
) where
    S: CollectionSource + Send + Sync + 'static,
{
    match action {
        UpdateAction::FetchCategories => {
            let fetch = async move {
                match source.fetch_categories().await {
                    Ok(categories) => Message::CategoriesLoaded { categories },
                    Err(e) => {
                        error!("Failed to fetch categories: {}", e);
                        Message::CategoriesFailed {
                            error: FetchFailure::from(e),
                        }
                    }
                }
            };
            spawn_fetch(FetchKind::Categories, fetch, msg_tx, fetch_tasks, shutdown_rx);
        }

        UpdateAction::FetchPage(query) => {
            let page = query.page;
            let fetch = async move { fetch_page(source.as_ref(), query).await };
            spawn_fetch(FetchKind::Page(page), fetch, msg_tx, fetch_tasks, shutdown_rx);
        }
    }
}

async fn fetch_page<S: CollectionSource>(source: &S, query: PageQuery) -> Message {
    match source.fetch_page(query).await {
        Ok(items) => {
            debug!("Page {} returned {} items", query.page, items.len());
            Message::PageLoaded {
                page: query.page,
                items,
            }
        }
        Err(e) => {
            error!("Failed to fetch page {}: {}", query.page, e);
            Message::PageFailed {
                page: query.page,
                error: FetchFailure::from(e),
            }
        }
    }
}

fn spawn_fetch<F>(
    kind: FetchKind,
    fetch: F,
    msg_tx: mpsc::Sender<Message>,
    fetch_tasks: FetchTaskMap,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    F: Future<Output = Message> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        if *shutdown_rx.borrow() {
            debug!("Shutdown in progress, not starting {:?} fetch", kind);
            return;
        }

        let message = tokio::select! {
            message = fetch => message,
            // Also resolves if the engine dropped the sender
            _ = shutdown_rx.wait_for(|stop| *stop) => {
                debug!("{:?} fetch cancelled by shutdown", kind);
                return;
            }
        };

        if *shutdown_rx.borrow() {
            debug!("Discarding {:?} result after shutdown", kind);
            return;
        }
        if msg_tx.send(message).await.is_err() {
            debug!("Message channel closed, discarding {:?} result", kind);
        }
    });

    match fetch_tasks.lock() {
        Ok(mut tasks) => {
            tasks.retain(|_, task| !task.is_finished());
            tasks.insert(kind, handle);
        }
        Err(e) => warn!("Fetch task map poisoned, not tracking {:?}: {}", kind, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_api::test_utils::{test_category, test_plants, FakeResponse, FakeSource};
    use catalog_core::FetchErrorKind;
    use std::time::Duration;

    struct Harness {
        source: Arc<FakeSource>,
        msg_tx: mpsc::Sender<Message>,
        msg_rx: mpsc::Receiver<Message>,
        tasks: FetchTaskMap,
        shutdown_tx: watch::Sender<bool>,
        shutdown_rx: watch::Receiver<bool>,
    }

    impl Harness {
        fn new(source: FakeSource) -> Self {
            let (msg_tx, msg_rx) = mpsc::channel(16);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            Self {
                source: Arc::new(source),
                msg_tx,
                msg_rx,
                tasks: Arc::new(std::sync::Mutex::new(HashMap::new())),
                shutdown_tx,
                shutdown_rx,
            }
        }

        fn dispatch(&self, action: UpdateAction) {
            handle_action(
                action,
                self.source.clone(),
                self.msg_tx.clone(),
                self.tasks.clone(),
                self.shutdown_rx.clone(),
            );
        }

        fn take_task(&self, kind: FetchKind) -> JoinHandle<()> {
            self.tasks.lock().unwrap().remove(&kind).unwrap()
        }
    }

    #[tokio::test]
    async fn test_categories_fetch_sends_loaded() {
        let mut h = Harness::new(
            FakeSource::new().with_categories(vec![test_category("kitchen", "Cozinha")]),
        );
        h.dispatch(UpdateAction::FetchCategories);

        match h.msg_rx.recv().await {
            Some(Message::CategoriesLoaded { categories }) => {
                assert_eq!(categories.len(), 1);
                assert_eq!(categories[0].key, "kitchen");
            }
            other => panic!("expected CategoriesLoaded, got {other:?}"),
        }
        assert_eq!(h.source.category_calls(), 1);
    }

    #[tokio::test]
    async fn test_page_failure_is_classified() {
        let source = FakeSource::new();
        source.push_page(1, FakeResponse::BadResponse("HTTP 500".into()));
        let mut h = Harness::new(source);

        h.dispatch(UpdateAction::FetchPage(PageQuery::new(1, 8)));

        match h.msg_rx.recv().await {
            Some(Message::PageFailed { page, error }) => {
                assert_eq!(page, 1);
                assert_eq!(error.kind, FetchErrorKind::BadResponse);
            }
            other => panic!("expected PageFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_fetch_sends_items() {
        let mut h = Harness::new(FakeSource::new().with_page(2, test_plants(9, 8, &["a"])));
        h.dispatch(UpdateAction::FetchPage(PageQuery::new(2, 8)));

        match h.msg_rx.recv().await {
            Some(Message::PageLoaded { page, items }) => {
                assert_eq!(page, 2);
                assert_eq!(items.len(), 8);
            }
            other => panic!("expected PageLoaded, got {other:?}"),
        }
        assert_eq!(h.source.page_requests(), vec![PageQuery::new(2, 8)]);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_held_fetch() {
        let source = FakeSource::new().with_page(1, test_plants(1, 8, &["a"]));
        let _gate = source.hold_page(1);
        let mut h = Harness::new(source);

        h.dispatch(UpdateAction::FetchPage(PageQuery::new(1, 8)));
        tokio::task::yield_now().await;

        h.shutdown_tx.send(true).unwrap();
        let task = h.take_task(FetchKind::Page(1));
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("task should stop on shutdown")
            .unwrap();

        assert!(h.msg_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_no_fetch_after_shutdown() {
        let mut h = Harness::new(FakeSource::new());
        h.shutdown_tx.send(true).unwrap();

        h.dispatch(UpdateAction::FetchCategories);
        h.take_task(FetchKind::Categories).await.unwrap();

        assert_eq!(h.source.category_calls(), 0);
        assert!(h.msg_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_is_not_an_error() {
        let h = Harness::new(FakeSource::new().with_page(1, test_plants(1, 1, &["a"])));
        let Harness {
            source,
            msg_tx,
            msg_rx,
            tasks,
            shutdown_rx,
            shutdown_tx: _shutdown_tx,
        } = h;
        drop(msg_rx);

        handle_action(
            UpdateAction::FetchPage(PageQuery::new(1, 8)),
            source.clone(),
            msg_tx,
            tasks.clone(),
            shutdown_rx,
        );
        let task = tasks.lock().unwrap().remove(&FetchKind::Page(1)).unwrap();
        tokio_test::assert_ok!(task.await);
        assert_eq!(source.page_calls(), 1);
    }
}
