//! One-shot mood override state machine
//!
//! `Default` shows the persistent baseline asset. A matching user message
//! moves the machine to `Overridden`, which wins for exactly one assistant
//! turn and then falls back to `Default`.

use super::classifier::{Categories, KeywordClassifier};
use crate::assets::AssetId;

/// Current mood of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodState {
    Default { default_asset: AssetId },
    Overridden { default_asset: AssetId, one_shot: AssetId },
}

impl MoodState {
    pub fn new(default_asset: AssetId) -> Self {
        MoodState::Default { default_asset }
    }

    pub fn default_asset(self) -> AssetId {
        match self {
            MoodState::Default { default_asset } | MoodState::Overridden { default_asset, .. } => {
                default_asset
            }
        }
    }

    pub fn one_shot_asset(self) -> Option<AssetId> {
        match self {
            MoodState::Default { .. } => None,
            MoodState::Overridden { one_shot, .. } => Some(one_shot),
        }
    }

    /// Asset for the upcoming assistant turn: the override if any, else the default
    pub fn selected_asset(self) -> AssetId {
        self.one_shot_asset().unwrap_or(self.default_asset())
    }

    fn with_one_shot(self, one_shot: AssetId) -> Self {
        MoodState::Overridden {
            default_asset: self.default_asset(),
            one_shot,
        }
    }

    fn cleared(self) -> Self {
        MoodState::Default {
            default_asset: self.default_asset(),
        }
    }
}

impl Default for MoodState {
    fn default() -> Self {
        MoodState::new(AssetId::Conversing)
    }
}

/// Chooses the decorative asset for each assistant turn of one session
#[derive(Debug, Clone, Default)]
pub struct MoodSelector {
    classifier: KeywordClassifier,
    state: MoodState,
}

impl MoodSelector {
    pub fn state(&self) -> MoodState {
        self.state
    }

    /// Classify a user message and update the pending override.
    ///
    /// Matching categories are applied in evaluation order, each one
    /// overwriting the previous, so the last match wins. A message with no
    /// match leaves any pending override in place.
    pub fn observe(&mut self, text: &str) -> Categories {
        let categories = self.classifier.classify(text);
        for category in &categories {
            self.state = self.state.with_one_shot(category.asset());
        }
        if !categories.is_empty() {
            tracing::debug!(
                categories = ?categories,
                one_shot = %self.state.selected_asset(),
                "Mood override set"
            );
        }
        categories
    }

    pub fn selected_asset(&self) -> AssetId {
        self.state.selected_asset()
    }

    /// Consume the override after an assistant turn has been recorded.
    pub fn complete_turn(&mut self) {
        self.state = self.state.cleared();
    }
}
