//! Keyword-based emotion classification
//!
//! Matching is plain case-sensitive substring containment: no tokenization,
//! no normalization. A text may hit several categories at once.

use crate::assets::AssetId;
use std::collections::BTreeSet;

/// Emotional category of a user message.
///
/// Variant order is the evaluation order used by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Positive,
    Negative,
    Surprise,
}

impl Category {
    /// Asset shown for one turn after this category is detected
    pub fn asset(self) -> AssetId {
        match self {
            Category::Positive => AssetId::Celebration,
            Category::Negative => AssetId::Crying,
            Category::Surprise => AssetId::Startled,
        }
    }
}

/// Categories matched by one text, iterated in evaluation order
pub type Categories = BTreeSet<Category>;

const POSITIVE_KEYWORDS: &[&str] = &[
    "嬉しい", "うれしい", "嬉", "楽しい", "たのしい", "楽", "感謝", "ありがとう", "有難う",
    "有り難う", "最高", "やった", "よかった", "良", "楽しかった",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "かなしい", "悲", "寂", "さびしい", "怒", "むかつく", "悪", "嫌", "いやだ", "つらい", "辛",
    "苦", "疲", "痛", "病", "しんどい",
];

const SURPRISE_KEYWORDS: &[&str] = &[
    "びっくり", "驚", "おどろき", "まじ", "本当", "ほんと", "えっ", "えー", "うそ", "ウソ",
    "信じられない", "しんじられない", "嘘", "ヤバい", "やばい",
];

/// Static keyword sets, one per category
#[derive(Debug, Clone, Copy)]
pub struct KeywordClassifier {
    sets: [(Category, &'static [&'static str]); 3],
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            sets: [
                (Category::Positive, POSITIVE_KEYWORDS),
                (Category::Negative, NEGATIVE_KEYWORDS),
                (Category::Surprise, SURPRISE_KEYWORDS),
            ],
        }
    }
}

impl KeywordClassifier {
    pub fn classify(&self, text: &str) -> Categories {
        if text.is_empty() {
            return Categories::new();
        }
        self.sets
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(category, _)| *category)
            .collect()
    }

    #[cfg(test)]
    pub fn keywords(&self, category: Category) -> &'static [&'static str] {
        self.sets
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(&[], |(_, keywords)| keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_matches_nothing() {
        assert!(KeywordClassifier::default().classify("").is_empty());
    }

    #[test]
    fn test_neutral_text_matches_nothing() {
        assert!(KeywordClassifier::default().classify("今日は雨です").is_empty());
    }

    #[test]
    fn test_positive_substring() {
        let categories = KeywordClassifier::default().classify("ありがとう！");
        assert_eq!(categories, Categories::from([Category::Positive]));
    }

    #[test]
    fn test_multiple_categories() {
        let categories = KeywordClassifier::default().classify("びっくりして悲しい");
        assert_eq!(
            categories,
            Categories::from([Category::Negative, Category::Surprise])
        );
    }

    #[test]
    fn test_single_kanji_keyword_matches_inside_word() {
        // "良" is a keyword, so any word containing it counts as positive
        let categories = KeywordClassifier::default().classify("不良品");
        assert!(categories.contains(&Category::Positive));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let classifier = KeywordClassifier::default();
        assert!(classifier.classify("ウソでしょ").contains(&Category::Surprise));
        // Half-width katakana is not normalized
        assert!(classifier.classify("ｳｿ").is_empty());
    }

    #[test]
    fn test_keyword_sets_are_disjoint() {
        let classifier = KeywordClassifier::default();
        let all = [Category::Positive, Category::Negative, Category::Surprise];
        for a in all {
            for b in all.iter().filter(|b| **b != a) {
                for kw in classifier.keywords(a) {
                    assert!(!classifier.keywords(*b).contains(kw), "{kw} in {a:?} and {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_category_assets() {
        assert_eq!(Category::Positive.asset(), AssetId::Celebration);
        assert_eq!(Category::Negative.asset(), AssetId::Crying);
        assert_eq!(Category::Surprise.asset(), AssetId::Startled);
    }
}
