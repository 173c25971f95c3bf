//! The versioned question catalog backing the quiz UI.
//!
//! Display copy lives with the front end; the matcher only cares about
//! question ids and their enumerated option tokens.

use serde::Serialize;

use crate::questionnaire::tokens::{BudgetBand, Condition, Priority, Region, Urgency};
use crate::questionnaire::{Answer, ResponseSet};

pub const CATALOG_VERSION: u32 = 3;

pub const CONDITION: &str = "condition";
pub const BUDGET: &str = "budget";
pub const LOCATION: &str = "location";
pub const URGENCY: &str = "urgency";
pub const PRIORITIES: &str = "priorities";

pub const CONDITION_DETAIL: &str = "condition-detail";
pub const SYMPTOM_FREQUENCY: &str = "symptom-frequency";
pub const PREVIOUS_TREATMENTS: &str = "previous-treatments";
pub const FORMAT_PREFERENCE: &str = "format-preference";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleSelect,
    RankedSelect,
    Scale,
    FreeText,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSpec {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: QuestionKind,
    /// Enumerated option tokens; empty for scale and free-text questions.
    pub options: Vec<&'static str>,
    /// Ranked questions accept at most this many tokens.
    pub max_selections: Option<usize>,
}

pub fn questions() -> Vec<QuestionSpec> {
    vec![
        QuestionSpec {
            id: CONDITION,
            prompt: "What condition are you seeking treatment for?",
            kind: QuestionKind::SingleSelect,
            options: Condition::ALL.iter().map(Condition::as_slug).collect(),
            max_selections: None,
        },
        QuestionSpec {
            id: BUDGET,
            prompt: "What monthly budget are you comfortable with?",
            kind: QuestionKind::SingleSelect,
            options: BudgetBand::ALL.iter().map(BudgetBand::as_slug).collect(),
            max_selections: None,
        },
        QuestionSpec {
            id: LOCATION,
            prompt: "Where would you prefer to be seen?",
            kind: QuestionKind::SingleSelect,
            options: Region::ALL.iter().map(Region::as_slug).collect(),
            max_selections: None,
        },
        QuestionSpec {
            id: URGENCY,
            prompt: "How soon do you want your first appointment?",
            kind: QuestionKind::SingleSelect,
            options: Urgency::ALL.iter().map(Urgency::as_slug).collect(),
            max_selections: None,
        },
        QuestionSpec {
            id: PRIORITIES,
            prompt: "Rank what matters most to you (up to three)",
            kind: QuestionKind::RankedSelect,
            options: Priority::ALL.iter().map(Priority::as_slug).collect(),
            max_selections: Some(3),
        },
    ]
}

/// Follow-up detail questions unlocked after the primary quiz. Presence of
/// any answer here feeds the confidence bonus; individual values are not
/// scored against clinics.
pub fn advanced_questions() -> Vec<QuestionSpec> {
    vec![
        QuestionSpec {
            id: CONDITION_DETAIL,
            prompt: "Tell us a little more about your condition",
            kind: QuestionKind::FreeText,
            options: Vec::new(),
            max_selections: None,
        },
        QuestionSpec {
            id: SYMPTOM_FREQUENCY,
            prompt: "How often do your symptoms affect you?",
            kind: QuestionKind::SingleSelect,
            options: vec!["daily", "most-days", "weekly", "occasionally"],
            max_selections: None,
        },
        QuestionSpec {
            id: PREVIOUS_TREATMENTS,
            prompt: "Which treatments have you already tried?",
            kind: QuestionKind::RankedSelect,
            options: vec![
                "prescription-medication",
                "over-the-counter",
                "physiotherapy",
                "talking-therapy",
                "none",
            ],
            max_selections: Some(5),
        },
        QuestionSpec {
            id: FORMAT_PREFERENCE,
            prompt: "Do you have a preferred treatment format?",
            kind: QuestionKind::SingleSelect,
            options: vec!["flower", "oil", "either", "not-sure"],
            max_selections: None,
        },
    ]
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationNote {
    pub question_id: String,
    pub detail: String,
}

/// Check a response set against the catalog. Notes are advisory: scoring
/// stays total over any shape, so nothing here rejects the set.
pub fn validate(responses: &ResponseSet) -> Vec<ValidationNote> {
    let known = questions();
    let advanced = advanced_questions();
    let mut notes = Vec::new();

    for question_id in responses.question_ids() {
        let spec = known
            .iter()
            .chain(advanced.iter())
            .find(|q| q.id == question_id);
        let Some(spec) = spec else {
            notes.push(ValidationNote {
                question_id: question_id.to_string(),
                detail: "question id not in catalog".to_string(),
            });
            continue;
        };
        let Some(answer) = responses.get(question_id) else {
            continue;
        };
        if spec.options.is_empty() {
            continue;
        }
        for token in answer.as_ranked() {
            if !spec.options.iter().any(|option| *option == token) {
                notes.push(ValidationNote {
                    question_id: question_id.to_string(),
                    detail: format!("unknown option token: {token}"),
                });
            }
        }
        if let (Some(max), Answer::Ranked(values)) = (spec.max_selections, answer) {
            if values.len() > max {
                notes.push(ValidationNote {
                    question_id: question_id.to_string(),
                    detail: format!("{} selections exceed the limit of {max}", values.len()),
                });
            }
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_responses_produce_no_notes() {
        let mut responses = ResponseSet::new();
        responses.insert(CONDITION, Answer::token("chronic-pain"));
        responses.insert(BUDGET, Answer::token("150-250"));
        responses.insert(PRIORITIES, Answer::ranked(["cost", "speed"]));
        assert!(validate(&responses).is_empty());
    }

    #[test]
    fn flags_unknown_questions_and_tokens_without_rejecting() {
        let mut responses = ResponseSet::new();
        responses.insert("shoe-size", Answer::token("9"));
        responses.insert(CONDITION, Answer::token("glaucoma"));
        responses.insert(
            PRIORITIES,
            Answer::ranked(["cost", "speed", "support", "variety"]),
        );
        let notes = validate(&responses);
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().any(|n| n.question_id == "shoe-size"));
        assert!(notes.iter().any(|n| n.detail.contains("glaucoma")));
        assert!(notes.iter().any(|n| n.detail.contains("limit")));
    }

    #[test]
    fn every_question_id_is_unique() {
        let mut ids: Vec<&str> = questions()
            .iter()
            .chain(advanced_questions().iter())
            .map(|q| q.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
