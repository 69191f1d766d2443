//! Headless mode runner - main event loop
//!
//! Feeds stdin commands into the engine and writes every engine event to
//! stdout as NDJSON.

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use catalog_api::CollectionSource;
use catalog_app::config::Settings;
use catalog_app::{signals, Engine, EngineEvent, Message};
use catalog_core::prelude::Result;

use super::HeadlessEvent;

/// Run in headless mode - output JSON events and read commands from stdin
pub async fn run_headless<S>(source: S, settings: Settings) -> Result<()>
where
    S: CollectionSource + Send + Sync + 'static,
{
    info!("═══════════════════════════════════════════════════════");
    info!("Plant Catalog starting in HEADLESS mode");
    info!("API: {}", settings.api.base_url);
    info!("═══════════════════════════════════════════════════════");

    let mut engine = Engine::new(source, settings);
    let mut events = engine.subscribe();

    signals::spawn_signal_handler(engine.msg_sender());

    // Blocking stdin reads stay off the runtime
    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    engine.start();
    emit_engine_events(&mut events);

    let result = headless_event_loop(&mut engine, &mut events).await;

    engine.shutdown().await;
    emit_engine_events(&mut events);

    info!("Plant Catalog headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<S>(
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()>
where
    S: CollectionSource + Send + Sync + 'static,
{
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                emit_engine_events(events);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Write every queued engine event to stdout
fn emit_engine_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from(&event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Parse one stdin line into a message.
///
/// `Ok(None)` for blank lines; `Err` carries a message for the user.
pub fn parse_command(line: &str) -> std::result::Result<Option<Message>, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };
    let argument = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments for '{}'", command));
    }

    let message = match (command, argument) {
        ("q" | "quit", None) => Message::Quit,
        ("retry", None) => Message::RetryPage,
        ("refresh", None) => Message::Refresh,
        ("select", Some(key)) => Message::SelectCategory {
            key: key.to_string(),
        },
        ("select", None) => return Err("usage: select <category-key>".to_string()),
        ("scroll", Some(distance)) => {
            let distance_from_end = distance
                .parse::<f64>()
                .map_err(|_| format!("invalid scroll distance '{}'", distance))?;
            Message::ScrollProgress { distance_from_end }
        }
        ("scroll", None) => return Err("usage: scroll <distance-from-end>".to_string()),
        (other, _) => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(message))
}

/// Read commands from stdin and send them to the message channel (blocking)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => match parse_command(&line) {
                Ok(Some(message)) => {
                    let quit = matches!(message, Message::Quit);
                    info!("Stdin: {:?}", message);
                    if msg_tx.blocking_send(message).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(reason) => {
                    warn!("Rejected stdin command '{}': {}", line.trim(), reason);
                    HeadlessEvent::error(reason, false).emit();
                }
            },
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
