//! Reason generation: an ordered rule table over the score breakdown.
//!
//! Each rule pairs a predicate with a canned sentence; rules fire in a
//! fixed sequence so output is stable for a given breakdown.

use crate::matching::ScoreBreakdown;
use crate::questionnaire::Condition;

/// A sub-score at or above this clears its reason rule.
pub const REASON_THRESHOLD: f64 = 82.0;
/// Five criteria plus the detail bonus.
pub const MAX_REASONS: usize = 6;

pub const GENERIC_REASON: &str = "Good overall match for your needs";

type ReasonPredicate = fn(&ScoreBreakdown) -> bool;
type ReasonTemplate = fn(Option<Condition>) -> String;

const RULES: [(ReasonPredicate, ReasonTemplate); 6] = [
    (
        |b| b.condition >= REASON_THRESHOLD,
        |condition| {
            format!(
                "Specialises in {} care",
                condition.unwrap_or(Condition::Other)
            )
        },
    ),
    (
        |b| b.budget >= REASON_THRESHOLD,
        |_| "Pricing fits comfortably within your monthly budget".to_string(),
    ),
    (
        |b| b.priorities >= REASON_THRESHOLD,
        |_| "Strong fit for the priorities you ranked highest".to_string(),
    ),
    (
        |b| b.location >= REASON_THRESHOLD,
        |_| "Well placed for where you want to be seen".to_string(),
    ),
    (
        |b| b.urgency >= REASON_THRESHOLD,
        |_| "Can usually see new patients within your timeframe".to_string(),
    ),
    (
        |b| b.strain_bonus > 0.0,
        |_| "Treatment options align with the detail you shared".to_string(),
    ),
];

/// Build the visible reason list: deduplicated, capped, never empty.
pub fn build_reasons(breakdown: &ScoreBreakdown, condition: Option<Condition>) -> Vec<String> {
    let mut reasons = Vec::new();
    for (applies, template) in RULES {
        if !applies(breakdown) {
            continue;
        }
        let message = template(condition);
        if !reasons.contains(&message) {
            reasons.push(message);
        }
        if reasons.len() == MAX_REASONS {
            break;
        }
    }
    if reasons.is_empty() {
        reasons.push(GENERIC_REASON.to_string());
    }
    reasons
}
