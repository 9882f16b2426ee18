//! Per-session turn loop

use super::{Presenter, RenderCommand, SessionEvent, SessionId, Transcript};
use crate::assets::{AssetId, AssetLibrary};
use crate::config::UiProfile;
use crate::conversation::Message;
use crate::llm::{ApiError, ChatService};
use crate::mood::MoodSelector;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Owns the state of one browser session and processes its turns in order
pub struct SessionRuntime<C, P>
where
    C: ChatService + 'static,
    P: Presenter + 'static,
{
    session_id: SessionId,
    profile: Arc<UiProfile>,
    assets: Arc<AssetLibrary>,
    transcript: Arc<RwLock<Transcript>>,
    mood: MoodSelector,
    chat: C,
    presenter: P,
    event_rx: mpsc::Receiver<SessionEvent>,
}

impl<C, P> SessionRuntime<C, P>
where
    C: ChatService + 'static,
    P: Presenter + 'static,
{
    pub fn new(
        session_id: SessionId,
        profile: Arc<UiProfile>,
        assets: Arc<AssetLibrary>,
        transcript: Arc<RwLock<Transcript>>,
        chat: C,
        presenter: P,
        event_rx: mpsc::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            session_id,
            profile,
            assets,
            transcript,
            mood: MoodSelector::default(),
            chat,
            presenter,
            event_rx,
        }
    }

    #[cfg(test)]
    pub fn mood(&self) -> &MoodSelector {
        &self.mood
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            match event {
                SessionEvent::UserMessage { text } => {
                    // Failures are already reported to the presenter
                    let _ = self.handle_user_message(text).await;
                }
            }
        }

        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
    }

    /// Run one full turn for a user message.
    ///
    /// On success the assistant message is recorded with the selected asset
    /// and the one-shot override is consumed. On failure the user message
    /// stays in history and an error is rendered.
    ///
    /// Every transcript change is presented before the write lock is
    /// released.
    pub async fn handle_user_message(&mut self, text: String) -> Result<(), ApiError> {
        let user_message = Message::user(text);
        if self.profile.mood_detection {
            self.mood.observe(&user_message.text);
        }

        let history = {
            let mut transcript = self.transcript.write().await;
            transcript.messages.append(user_message.clone());
            transcript.awaiting_reply = true;
            self.presenter
                .present(RenderCommand::message(&user_message, &self.assets));
            self.presenter
                .present(RenderCommand::indicator(AssetId::LoadingIndicator, &self.assets));
            transcript.messages.to_chat_turns()
        };

        let result = self.chat.generate(&history).await;

        let mut transcript = self.transcript.write().await;
        transcript.awaiting_reply = false;
        self.presenter.present(RenderCommand::ClearTransientIndicator);

        match result {
            Ok(reply) => {
                let asset = self
                    .profile
                    .mood_detection
                    .then(|| self.mood.selected_asset());
                let assistant_message = Message::assistant(reply, asset);
                self.presenter
                    .present(RenderCommand::message(&assistant_message, &self.assets));
                transcript.messages.append(assistant_message);
                self.mood.complete_turn();

                tracing::debug!(
                    session_id = %self.session_id,
                    asset = ?asset,
                    mood = ?self.mood.state(),
                    "Assistant turn recorded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    kind = e.kind.as_str(),
                    error = %e,
                    "Turn failed, keeping user message in history"
                );
                self.presenter.present(RenderCommand::Error {
                    kind: e.kind,
                    message: e.message.clone(),
                });
                Err(e)
            }
        }
    }
}
