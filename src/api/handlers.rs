//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, ProfileResponse, SessionResponse, SuccessResponse,
    TranscriptResponse,
};
use super::ui::{get_index_html, serve_static};
use super::AppState;
use crate::assets::AssetId;
use crate::session::{SessionError, SessionId};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat page
        .route("/", get(serve_spa))
        .route("/ui/*path", get(serve_static))
        // Layout and fixed images
        .route("/api/profile", get(get_profile))
        // Session lifecycle
        .route("/api/sessions/new", post(create_session))
        .route("/api/sessions/:id", get(get_transcript))
        .route("/api/sessions/:id/stream", get(stream_session))
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/close", post(close_session))
        // Decorative images
        .route("/api/assets/:id", get(get_asset))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn serve_spa() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let profile = state.sessions.profile();
    let assets = state.sessions.assets();
    let avatar = profile.avatar_asset();
    let sidebar = profile.sidebar_asset();

    Json(ProfileResponse {
        layout: profile.layout,
        mood_detection: profile.mood_detection,
        avatar,
        avatar_image: avatar.and_then(|id| assets.url(id)),
        sidebar,
        sidebar_image: sidebar.and_then(|id| assets.url(id)),
    })
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session_id = state.sessions.create().await;
    Json(SessionResponse { session_id })
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let session_id: SessionId = id.parse()?;
    let messages = state.sessions.transcript(session_id).await?;

    Ok(Json(TranscriptResponse {
        session_id,
        messages,
    }))
}

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id: SessionId = id.parse()?;
    let (replay, broadcast_rx) = state.sessions.attach(session_id).await?;

    Ok(sse_stream(replay, broadcast_rx))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session_id: SessionId = id.parse()?;
    state.sessions.send(session_id, req.text).await?;

    Ok(Json(ChatResponse { queued: true }))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let session_id: SessionId = id.parse()?;
    state.sessions.close(session_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Assets
// ============================================================

async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let asset: AssetId = id
        .parse()
        .map_err(|e: crate::assets::UnknownAssetId| AppError::NotFound(e.to_string()))?;
    let bytes = state
        .sessions
        .assets()
        .get(asset)
        .ok_or_else(|| AppError::NotFound(format!("Asset {asset} is not available")))?;

    Ok((
        [
            (header::CONTENT_TYPE, asset.media_type()),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        bytes.to_vec(),
    )
        .into_response())
}

async fn get_version() -> &'static str {
    concat!("mendako-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
            SessionError::InvalidId(_) | SessionError::Closed(_) | SessionError::EmptyMessage => {
                AppError::BadRequest(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLibrary, FsAssetLoader};
    use crate::config::UiProfile;
    use crate::session::testing::MockChatService;
    use crate::session::SessionManager;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(assets: AssetLibrary) -> (Router, AppState) {
        let chat = Arc::new(MockChatService::new());
        chat.queue_response("hello");
        let state = AppState::new(SessionManager::new(
            chat,
            Arc::new(assets),
            UiProfile::default(),
        ));
        (create_router(state.clone()), state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_session_then_read_transcript() {
        let (app, _) = app_with(AssetLibrary::default());

        let response = app
            .clone()
            .oneshot(Request::post("/api/sessions/new").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let id = body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::get(format!("/api/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["messages"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_invalid_and_unknown_session_ids() {
        let (app, _) = app_with(AssetLibrary::default());

        let response = app
            .clone()
            .oneshot(Request::get("/api/sessions/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(
                Request::get(format!("/api/sessions/{}", SessionId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closed_session_is_gone() {
        let (app, state) = app_with(AssetLibrary::default());
        let id = state.sessions.create().await;

        let response = app
            .clone()
            .oneshot(
                Request::post(format!("/api/sessions/{id}/close"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get(format!("/api/sessions/{id}/stream"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_text() {
        let (app, state) = app_with(AssetLibrary::default());
        let id = state.sessions.create().await;

        let response = app
            .oneshot(
                Request::post(format!("/api/sessions/{id}/chat"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_is_queued() {
        let (app, state) = app_with(AssetLibrary::default());
        let id = state.sessions.create().await;

        let response = app
            .oneshot(
                Request::post(format!("/api/sessions/{id}/chat"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"こんにちは"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["queued"], true);
    }

    #[tokio::test]
    async fn test_asset_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MendakoNaki.gif"), b"GIF89a").unwrap();
        let assets = AssetLibrary::preload(&FsAssetLoader::new(dir.path()), &AssetId::ALL);
        let (app, _) = app_with(assets);

        let response = app
            .clone()
            .oneshot(Request::get("/api/assets/crying").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"GIF89a");

        for missing in ["/api/assets/startled", "/api/assets/unknown"] {
            let response = app
                .clone()
                .oneshot(Request::get(missing).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_profile() {
        let (app, _) = app_with(AssetLibrary::default());

        let response = app
            .oneshot(Request::get("/api/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["layout"], "single");
        assert_eq!(json["mood_detection"], true);
        assert_eq!(json["avatar"], "conversing");
        assert_eq!(json["avatar_image"], serde_json::Value::Null);
        assert_eq!(json["sidebar"], serde_json::Value::Null);
    }
}
