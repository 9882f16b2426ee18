//! Property-based tests for mood selection
//!
//! Invariants:
//! - Neutral text never changes the selected asset
//! - An override lasts exactly one assistant turn
//! - When several categories match, the last in evaluation order wins
//! - Classification is a pure function of its input

use super::classifier::{Category, KeywordClassifier};
use super::MoodSelector;
use crate::assets::AssetId;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// ASCII text can never contain one of the Japanese keywords
fn arb_neutral_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?]{0,60}"
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Positive),
        Just(Category::Negative),
        Just(Category::Surprise),
    ]
}

fn arb_keyword(category: Category) -> impl Strategy<Value = String> {
    let keywords = KeywordClassifier::default().keywords(category);
    proptest::sample::select(keywords).prop_map(str::to_string)
}

/// Text containing exactly the keywords of the given categories, padded with neutral filler
fn arb_text_for(categories: Vec<Category>) -> impl Strategy<Value = (Vec<Category>, String)> {
    let parts: Vec<_> = categories.iter().map(|c| arb_keyword(*c)).collect();
    (parts, arb_neutral_text(), arb_neutral_text()).prop_map(move |(keywords, head, tail)| {
        (categories.clone(), format!("{head}{}{tail}", keywords.join(" ")))
    })
}

fn arb_categorized_text() -> impl Strategy<Value = (Vec<Category>, String)> {
    proptest::collection::vec(arb_category(), 1..4).prop_flat_map(arb_text_for)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_neutral_text_keeps_default(texts in proptest::collection::vec(arb_neutral_text(), 1..20)) {
        let mut selector = MoodSelector::default();
        for text in &texts {
            prop_assert!(selector.observe(text).is_empty());
            prop_assert_eq!(selector.selected_asset(), AssetId::Conversing);
            selector.complete_turn();
        }
    }

    #[test]
    fn prop_classify_is_idempotent(text in ".{0,80}") {
        let classifier = KeywordClassifier::default();
        prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
    }

    #[test]
    fn prop_classify_finds_every_embedded_category((categories, text) in arb_categorized_text()) {
        let found = KeywordClassifier::default().classify(&text);
        for category in &categories {
            prop_assert!(found.contains(category));
        }
    }

    #[test]
    fn prop_last_category_in_order_wins((_, text) in arb_categorized_text()) {
        let classifier = KeywordClassifier::default();
        let expected = classifier
            .classify(&text)
            .into_iter()
            .next_back()
            .map(Category::asset);

        let mut selector = MoodSelector::default();
        selector.observe(&text);
        prop_assert_eq!(Some(selector.selected_asset()), expected);
    }

    #[test]
    fn prop_override_lasts_one_turn(
        (_, text) in arb_categorized_text(),
        follow_ups in proptest::collection::vec(arb_neutral_text(), 1..5),
    ) {
        let mut selector = MoodSelector::default();
        selector.observe(&text);
        prop_assert!(selector.state().one_shot_asset().is_some());
        selector.complete_turn();

        for follow_up in &follow_ups {
            selector.observe(follow_up);
            prop_assert_eq!(selector.selected_asset(), AssetId::Conversing);
            selector.complete_turn();
        }
    }
}
