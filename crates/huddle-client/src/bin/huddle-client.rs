//! # huddle-client
//!
//! Headless driver for the participant/media core. Replays a JSON-lines
//! event script (a path argument, or stdin) through the session queue
//! with a logging render surface, then prints the final participant list
//! as JSON.

use std::io::Read;

use anyhow::Context;
use huddle_client::script::{load_script, parse_script};
use huddle_client::{init_logging, spawn_session, ClientConfig, LogSurface, Session};
use huddle_shared::constants::APP_NAME;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("Starting {} client v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let events = match std::env::args().nth(1) {
        Some(path) => load_script(&path).with_context(|| format!("loading script {path}"))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading script from stdin")?;
            parse_script(&text)?
        }
    };
    info!(events = events.len(), "Replaying session events");

    let session = Session::new(&config, LogSurface::new());
    let (handle, task) = spawn_session(session, config.queue_capacity);

    for event in events {
        handle.send(event).await?;
    }

    let roster = handle.roster().await?;
    handle.shutdown().await?;
    let session = task.await.context("session task failed")?;

    info!(
        participants = roster.len(),
        frames_drawn = session.surface().frames_drawn(),
        presenter = ?session.presenter_label(),
        "Replay finished"
    );

    println!("{}", serde_json::to_string_pretty(&roster)?);
    Ok(())
}
