pub mod catalog;
pub mod tokens;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use tokens::{BudgetBand, Condition, Priority, Region, Urgency};

/// One answer as captured by the quiz UI. The wire shape is loose by
/// design: single-select answers arrive as bare tokens, ranked lists as
/// arrays, scale questions as numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Answer {
    Token(String),
    Ranked(Vec<String>),
    Scale(f64),
}

impl Answer {
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(value.into())
    }

    pub fn ranked<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ranked(values.into_iter().map(Into::into).collect())
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Ranked view of the answer. A bare token reads as a one-item list so
    /// single-select and ranked answers can share accessors.
    pub fn as_ranked(&self) -> Vec<&str> {
        match self {
            Self::Token(value) => vec![value.as_str()],
            Self::Ranked(values) => values.iter().map(String::as_str).collect(),
            Self::Scale(_) => Vec::new(),
        }
    }
}

/// The full response set for one questionnaire run, keyed by question id.
///
/// Accessors never panic: a missing key, an unexpected answer shape, or an
/// unknown token all resolve to `None` and leave the caller on its neutral
/// scoring path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ResponseSet {
    answers: BTreeMap<String, Answer>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, answer: Answer) -> &mut Self {
        self.answers.insert(question_id.into(), answer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }

    pub fn token(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).and_then(Answer::as_token)
    }

    pub fn condition(&self) -> Option<Condition> {
        self.token(catalog::CONDITION).and_then(|t| t.parse().ok())
    }

    pub fn budget(&self) -> Option<BudgetBand> {
        self.token(catalog::BUDGET).and_then(|t| t.parse().ok())
    }

    pub fn region(&self) -> Option<Region> {
        self.token(catalog::LOCATION).and_then(|t| t.parse().ok())
    }

    pub fn urgency(&self) -> Option<Urgency> {
        self.token(catalog::URGENCY).and_then(|t| t.parse().ok())
    }

    /// Ranked priorities, first entry most important. Unknown tokens are
    /// dropped rather than failing the whole list.
    pub fn priorities(&self) -> Vec<Priority> {
        self.get(catalog::PRIORITIES)
            .map(|answer| {
                answer
                    .as_ranked()
                    .into_iter()
                    .filter_map(|t| t.parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_tolerate_missing_and_malformed_answers() {
        let empty = ResponseSet::new();
        assert!(empty.condition().is_none());
        assert!(empty.budget().is_none());
        assert!(empty.priorities().is_empty());

        let mut garbled = ResponseSet::new();
        garbled.insert(catalog::CONDITION, Answer::Scale(3.0));
        garbled.insert(catalog::BUDGET, Answer::token("whatever"));
        garbled.insert(catalog::PRIORITIES, Answer::ranked(["cost", "nonsense", "speed"]));
        assert!(garbled.condition().is_none());
        assert!(garbled.budget().is_none());
        assert_eq!(garbled.priorities(), vec![Priority::Cost, Priority::Speed]);
    }

    #[test]
    fn deserializes_mixed_answer_shapes() {
        let raw = r#"{
            "condition": "chronic-pain",
            "priorities": ["cost", "speed"],
            "pain-level": 7
        }"#;
        let responses: ResponseSet = serde_json::from_str(raw).expect("response set json");
        assert_eq!(responses.condition(), Some(Condition::ChronicPain));
        assert_eq!(responses.priorities(), vec![Priority::Cost, Priority::Speed]);
        assert_eq!(responses.get("pain-level"), Some(&Answer::Scale(7.0)));
    }

    #[test]
    fn single_token_reads_as_one_item_ranked_list() {
        let mut responses = ResponseSet::new();
        responses.insert(catalog::PRIORITIES, Answer::token("support"));
        assert_eq!(responses.priorities(), vec![Priority::Support]);
    }
}
