//! Process configuration
//!
//! Everything is read from environment variables. The API credential is
//! required; every other setting has a default. The layout, mood and asset
//! flags select between the single-column mood variant and the two-column
//! static variant of the UI.

use crate::assets::AssetId;
use crate::llm::DEFAULT_MODEL;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_SESSION_IDLE_SECS: u64 = 15 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set; export your Gemini API key before starting the server")]
    MissingApiKey,
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Page layout of the chat UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    Single,
    /// Chat on the left, a fixed image column on the right
    TwoColumn,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Layout::Single),
            "two-column" => Ok(Layout::TwoColumn),
            other => Err(format!("expected 'single' or 'two-column', got '{other}'")),
        }
    }
}

/// Presentation flags shared by every session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiProfile {
    pub layout: Layout,
    pub mood_detection: bool,
    pub assets: Vec<AssetId>,
}

impl UiProfile {
    pub fn is_enabled(&self, id: AssetId) -> bool {
        self.assets.contains(&id)
    }

    /// Small image next to every assistant bubble
    pub fn avatar_asset(&self) -> Option<AssetId> {
        [AssetId::Conversing, AssetId::LoadingIndicator]
            .into_iter()
            .find(|id| self.is_enabled(*id))
    }

    /// Image pinned in the side column of the two-column layout
    pub fn sidebar_asset(&self) -> Option<AssetId> {
        match self.layout {
            Layout::Single => None,
            Layout::TwoColumn => [AssetId::LoadingIndicator, AssetId::Conversing]
                .into_iter()
                .find(|id| self.is_enabled(*id)),
        }
    }
}

impl Default for UiProfile {
    fn default() -> Self {
        Self {
            layout: Layout::Single,
            mood_detection: true,
            assets: AssetId::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub port: u16,
    pub asset_dir: PathBuf,
    /// Unwatched sessions are dropped after this much inactivity
    pub session_idle_timeout: Duration,
    pub profile: UiProfile,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup("GEMINI_MODEL")
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let port = match lookup("MENDAKO_PORT") {
            Some(p) => p.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "MENDAKO_PORT",
                value: p.clone(),
                reason: e.to_string(),
            })?,
            None => 8000,
        };

        let session_idle_secs = match lookup("MENDAKO_SESSION_IDLE_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "MENDAKO_SESSION_IDLE_SECS",
                    value: v.clone(),
                    reason: "expected a positive number of seconds".to_string(),
                })?,
            None => DEFAULT_SESSION_IDLE_SECS,
        };

        let layout = match lookup("MENDAKO_LAYOUT") {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                var: "MENDAKO_LAYOUT",
                value: v.clone(),
                reason,
            })?,
            None => Layout::default(),
        };

        let mood_detection = match lookup("MENDAKO_MOOD") {
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                var: "MENDAKO_MOOD",
                value: v.clone(),
                reason: "expected true/false".to_string(),
            })?,
            None => true,
        };

        let assets = match lookup("MENDAKO_ASSETS") {
            Some(v) => parse_asset_list(&v)?,
            None => AssetId::ALL.to_vec(),
        };

        Ok(Self {
            api_key,
            model,
            base_url: lookup("GEMINI_BASE_URL").filter(|u| !u.is_empty()),
            port,
            asset_dir: lookup("MENDAKO_ASSET_DIR").map_or_else(|| PathBuf::from("assets"), PathBuf::from),
            session_idle_timeout: Duration::from_secs(session_idle_secs),
            profile: UiProfile {
                layout,
                mood_detection,
                assets,
            },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_asset_list(value: &str) -> Result<Vec<AssetId>, ConfigError> {
    let mut assets = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part.parse::<AssetId>().map_err(|e| ConfigError::Invalid {
            var: "MENDAKO_ASSETS",
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        if !assets.contains(&id) {
            assets.push(id);
        }
    }
    Ok(assets)
}
