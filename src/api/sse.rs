//! Server-Sent Events support
//!
//! A stream starts with an `init` event replaying the transcript as render
//! commands, followed by live commands from the session runtime.

use crate::session::RenderCommand;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    replay: Vec<RenderCommand>,
    broadcast_rx: tokio::sync::broadcast::Receiver<RenderCommand>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&replay)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(command) => Some(Ok(command_event(&command))),
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn init_event(replay: &[RenderCommand]) -> Event {
    let data = json!({
        "type": "init",
        "commands": replay,
    });
    Event::default().event("init").data(data.to_string())
}

fn command_event(command: &RenderCommand) -> Event {
    let data = serde_json::to_string(command).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(command.event_type()).data(data)
}
