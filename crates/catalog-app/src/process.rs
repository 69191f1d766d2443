//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function and
//! dispatches the resulting actions.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use catalog_api::CollectionSource;

use crate::actions::{handle_action, FetchTaskMap};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<S>(
    state: &mut AppState,
    message: Message,
    source: &Arc<S>,
    msg_tx: &mpsc::Sender<Message>,
    fetch_tasks: &FetchTaskMap,
    shutdown_rx: &watch::Receiver<bool>,
) where
    S: CollectionSource + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(
                action,
                source.clone(),
                msg_tx.clone(),
                fetch_tasks.clone(),
                shutdown_rx.clone(),
            );
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
