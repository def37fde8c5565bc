//! Prompt classification
//!
//! A keyword rule table evaluated top to bottom. The first rule with any
//! keyword contained in the lowercased prompt decides the category.

use crate::catalog::PromptCategory;

/// A classification rule: any keyword match selects `category`
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub category: PromptCategory,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Rules in priority order
pub const CLASSIFICATION_RULES: &[Rule] = &[
    Rule {
        keywords: &["glucose", "sugar", "blood"],
        category: PromptCategory::Glucose,
    },
    Rule {
        keywords: &["food", "eat", "diet", "meal"],
        category: PromptCategory::Diet,
    },
    Rule {
        keywords: &["exercise", "activity", "workout"],
        category: PromptCategory::Exercise,
    },
    Rule {
        keywords: &["medicine", "medication", "insulin"],
        category: PromptCategory::Medication,
    },
];

/// Classify a free-text prompt. Never fails; unmatched or empty input is `General`.
pub fn classify(prompt: &str) -> PromptCategory {
    let lowered = prompt.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or(PromptCategory::General, |rule| rule.category)
}
