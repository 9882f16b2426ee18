//! Browser sessions
//!
//! Every browser session owns its own conversation history and mood state,
//! driven by a dedicated runtime task. Nothing mutable is shared between
//! sessions.

pub mod render;
mod runtime;

#[cfg(test)]
pub mod testing;

pub use render::{BroadcastPresenter, Presenter, RenderCommand};
pub use runtime::SessionRuntime;

use crate::assets::{AssetId, AssetLibrary};
use crate::config::UiProfile;
use crate::conversation::{ConversationStore, Message};
use crate::llm::ChatService;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

/// Production runtime wiring
pub type ProductionRuntime = SessionRuntime<Arc<dyn ChatService>, BroadcastPresenter>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

/// Input to a session runtime
#[derive(Debug, Clone)]
pub enum SessionEvent {
    UserMessage { text: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session id: {0}")]
    InvalidId(String),
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session {0} is no longer running")]
    Closed(SessionId),
    #[error("Message text is empty")]
    EmptyMessage,
}

/// Session state visible outside the runtime.
///
/// The runtime changes it and broadcasts the matching render commands while
/// holding the write lock, so a snapshot taken under the read lock lines up
/// exactly with the commands a new subscriber receives afterwards.
#[derive(Debug, Default)]
pub struct Transcript {
    pub messages: ConversationStore,
    /// A completion request is in flight
    pub awaiting_reply: bool,
}

impl Transcript {
    /// Commands that redraw the current state on a freshly opened page
    pub fn replay(&self, assets: &AssetLibrary) -> Vec<RenderCommand> {
        let mut commands: Vec<RenderCommand> = self
            .messages
            .all()
            .iter()
            .map(|m| RenderCommand::message(m, assets))
            .collect();
        if self.awaiting_reply {
            commands.push(RenderCommand::indicator(AssetId::LoadingIndicator, assets));
        }
        commands
    }
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<SessionEvent>,
    pub broadcast_tx: broadcast::Sender<RenderCommand>,
    pub transcript: Arc<RwLock<Transcript>>,
    /// Last chat message or stream connection
    pub last_active: Instant,
}

/// Registry of live sessions
pub struct SessionManager {
    chat: Arc<dyn ChatService>,
    assets: Arc<AssetLibrary>,
    profile: Arc<UiProfile>,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionManager {
    pub fn new(chat: Arc<dyn ChatService>, assets: Arc<AssetLibrary>, profile: UiProfile) -> Self {
        Self {
            chat,
            assets,
            profile: Arc::new(profile),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn profile(&self) -> &UiProfile {
        &self.profile
    }

    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    /// Start a fresh session with empty history and default mood
    pub async fn create(&self) -> SessionId {
        let session_id = SessionId::new();

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let transcript = Arc::new(RwLock::new(Transcript::default()));

        let runtime: ProductionRuntime = SessionRuntime::new(
            session_id,
            self.profile.clone(),
            self.assets.clone(),
            transcript.clone(),
            self.chat.clone(),
            BroadcastPresenter::new(broadcast_tx.clone()),
            event_rx,
        );

        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(session_id = %session_id, "Session runtime finished");
        });

        self.sessions.write().await.insert(
            session_id,
            SessionHandle {
                event_tx,
                broadcast_tx,
                transcript,
                last_active: Instant::now(),
            },
        );

        tracing::info!(session_id = %session_id, "Session created");
        session_id
    }

    pub async fn get(&self, session_id: SessionId) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(SessionError::NotFound(session_id))
    }

    /// Look up a session and mark it as active
    async fn touch(&self, session_id: SessionId) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .get_mut(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        handle.last_active = Instant::now();
        Ok(handle.clone())
    }

    /// Queue a user message; turns run in arrival order
    pub async fn send(&self, session_id: SessionId, text: String) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let handle = self.touch(session_id).await?;
        handle
            .event_tx
            .send(SessionEvent::UserMessage { text })
            .await
            .map_err(|_| SessionError::Closed(session_id))
    }

    /// Subscribe to a session's render commands.
    ///
    /// Returns the commands that redraw the current state together with a
    /// receiver for everything after it. Nothing is shown twice or missed.
    pub async fn attach(
        &self,
        session_id: SessionId,
    ) -> Result<(Vec<RenderCommand>, broadcast::Receiver<RenderCommand>), SessionError> {
        let handle = self.touch(session_id).await?;
        let transcript = handle.transcript.read().await;
        let broadcast_rx = handle.broadcast_tx.subscribe();
        Ok((transcript.replay(&self.assets), broadcast_rx))
    }

    pub async fn transcript(&self, session_id: SessionId) -> Result<Vec<Message>, SessionError> {
        let handle = self.get(session_id).await?;
        let transcript = handle.transcript.read().await;
        Ok(transcript.messages.all().to_vec())
    }

    /// Drop a session. Its runtime stops once queued turns have finished.
    pub async fn close(&self, session_id: SessionId) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(&session_id).is_none() {
            return Err(SessionError::NotFound(session_id));
        }
        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    /// Drop sessions that nobody is watching and that have been quiet for
    /// at least `idle_timeout`. Returns how many were removed.
    pub async fn reap_idle(&self, idle_timeout: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|session_id, handle| {
            let watched = handle.broadcast_tx.receiver_count() > 0;
            let keep = watched || handle.last_active.elapsed() < idle_timeout;
            if !keep {
                tracing::info!(session_id = %session_id, "Idle session closed");
            }
            keep
        });

        let reaped = before - sessions.len();
        if reaped > 0 {
            tracing::info!(reaped, remaining = sessions.len(), "Reaped idle sessions");
        }
        reaped
    }

    /// Periodically reap idle sessions until the manager is dropped
    pub fn spawn_reaper(self: &Arc<Self>, idle_timeout: Duration) -> JoinHandle<()> {
        let manager = Arc::downgrade(self);
        let period = (idle_timeout / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                manager.reap_idle(idle_timeout).await;
            }
        })
    }
}
