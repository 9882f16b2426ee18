//! Mood detection for decorative assets
//!
//! Classifies user text with fixed keyword sets and decides which asset
//! accompanies the next assistant turn.

mod classifier;
mod selector;

#[cfg(test)]
mod proptests;

pub use selector::MoodSelector;
