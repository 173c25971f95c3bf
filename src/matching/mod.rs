pub mod jitter;
pub mod normalize;
pub mod reasons;
pub mod scorer;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::directory::ClinicRecord;
use crate::questionnaire::ResponseSet;

pub use jitter::{JitterSource, MAX_JITTER_POINTS};

pub const MIN_MATCH_PERCENTAGE: u8 = 60;
pub const MAX_MATCH_PERCENTAGE: u8 = 99;
pub const DEFAULT_RESULT_LIMIT: usize = 3;

/// Per-criterion sub-scores behind one composite, kept on the result for
/// diagnostics and tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub condition: f64,
    pub budget: f64,
    pub priorities: f64,
    pub location: f64,
    pub urgency: f64,
    pub strain_bonus: f64,
    pub composite: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub clinic: ClinicRecord,
    /// Composite after jitter, before rounding and clamping.
    pub score: f64,
    /// Display percentage, always within [60, 99].
    pub match_percentage: u8,
    /// Never empty; deduplicated, at most six entries.
    pub match_reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug)]
pub struct MatcherConfig {
    pub result_limit: usize,
    pub jitter: JitterSource,
    pub jitter_points: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            jitter: JitterSource::from_entropy(),
            jitter_points: MAX_JITTER_POINTS,
        }
    }
}

impl MatcherConfig {
    pub fn deterministic() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            jitter: JitterSource::disabled(),
            jitter_points: 0.0,
        }
    }
}

/// Ranks the clinic list it was built with against one user's answers.
///
/// Pure over its inputs apart from the configured jitter source; safe to
/// call repeatedly and concurrently behind a shared reference.
pub struct ClinicMatcher {
    clinics: Vec<ClinicRecord>,
    config: MatcherConfig,
}

impl ClinicMatcher {
    pub fn new(clinics: Vec<ClinicRecord>) -> Self {
        Self::with_config(clinics, MatcherConfig::default())
    }

    pub fn with_config(clinics: Vec<ClinicRecord>, config: MatcherConfig) -> Self {
        Self {
            clinics: dedupe_by_id(clinics),
            config,
        }
    }

    pub fn clinic_count(&self) -> usize {
        self.clinics.len()
    }

    /// Score every clinic and return the best fits, highest score first.
    ///
    /// Returns `min(result_limit, clinic_count)` entries; an empty clinic
    /// list yields an empty vec. `advanced` detail can only raise scores.
    pub fn matches(
        &self,
        responses: &ResponseSet,
        advanced: Option<&ResponseSet>,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = self
            .clinics
            .iter()
            .map(|clinic| {
                let breakdown = scorer::score_clinic(clinic, responses, advanced);
                let score = breakdown.composite + self.config.jitter.next(self.config.jitter_points);
                MatchResult {
                    clinic: clinic.clone(),
                    match_percentage: clamp_percentage(score),
                    match_reasons: reasons::build_reasons(&breakdown, responses.condition()),
                    score,
                    breakdown,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(self.config.result_limit);
        results
    }
}

/// Round and clamp a composite into the display range. The 60 floor keeps
/// every shown match feeling relevant; the 99 ceiling keeps any match
/// short of a perfect score.
pub fn clamp_percentage(score: f64) -> u8 {
    (score.round() as i64).clamp(MIN_MATCH_PERCENTAGE as i64, MAX_MATCH_PERCENTAGE as i64) as u8
}

fn dedupe_by_id(clinics: Vec<ClinicRecord>) -> Vec<ClinicRecord> {
    let mut seen = BTreeSet::new();
    clinics
        .into_iter()
        .filter(|clinic| seen.insert(clinic.id.clone()))
        .collect()
}
