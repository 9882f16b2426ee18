//! Render commands sent to the browser

use crate::assets::{AssetId, AssetLibrary};
use crate::conversation::{Message, Role};
use crate::llm::ApiErrorKind;
use serde::Serialize;
use tokio::sync::broadcast;

/// One instruction for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Draw a chat bubble
    RenderMessage {
        role: Role,
        text: String,
        asset: Option<AssetId>,
        /// Where to fetch the asset; `None` when it is unavailable
        image: Option<String>,
    },
    /// Placeholder shown while the completion request runs
    ShowTransientIndicator {
        asset: AssetId,
        image: Option<String>,
    },
    ClearTransientIndicator,
    /// Visible error turn; the conversation continues
    Error { kind: ApiErrorKind, message: String },
}

impl RenderCommand {
    pub fn message(message: &Message, assets: &AssetLibrary) -> Self {
        RenderCommand::RenderMessage {
            role: message.role,
            text: message.text.clone(),
            asset: message.asset,
            image: message.asset.and_then(|id| assets.url(id)),
        }
    }

    pub fn indicator(asset: AssetId, assets: &AssetLibrary) -> Self {
        RenderCommand::ShowTransientIndicator {
            asset,
            image: assets.url(asset),
        }
    }

    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            RenderCommand::RenderMessage { .. } => "render_message",
            RenderCommand::ShowTransientIndicator { .. } => "show_transient_indicator",
            RenderCommand::ClearTransientIndicator => "clear_transient_indicator",
            RenderCommand::Error { .. } => "error",
        }
    }
}

/// Receives render commands from a session
pub trait Presenter: Send + Sync {
    fn present(&self, command: RenderCommand);
}

impl<T: Presenter + ?Sized> Presenter for std::sync::Arc<T> {
    fn present(&self, command: RenderCommand) {
        (**self).present(command);
    }
}

/// Fans render commands out to every connected browser tab of a session
#[derive(Debug, Clone)]
pub struct BroadcastPresenter {
    tx: broadcast::Sender<RenderCommand>,
}

impl BroadcastPresenter {
    pub fn new(tx: broadcast::Sender<RenderCommand>) -> Self {
        Self { tx }
    }
}

impl Presenter for BroadcastPresenter {
    fn present(&self, command: RenderCommand) {
        // No subscribers is fine: the transcript endpoint replays history
        let _ = self.tx.send(command);
    }
}
