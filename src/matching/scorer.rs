//! The five weighted sub-scorers and the composite they feed.
//!
//! Every scorer returns 0-100 and has a neutral default for missing
//! answers or missing clinic fields; nothing in this module can fail.

use crate::directory::ClinicRecord;
use crate::matching::normalize::{
    band_range, desired_wait_days, effective_monthly_cost, linear_overshoot_penalty,
    parse_wait_days, DEFAULT_CONSULTATION_PRICE, DEFAULT_WAIT_DAYS,
};
use crate::matching::ScoreBreakdown;
use crate::questionnaire::{BudgetBand, Condition, Priority, Region, ResponseSet};

pub const CONDITION_WEIGHT: f64 = 0.40;
pub const BUDGET_WEIGHT: f64 = 0.25;
pub const PRIORITIES_WEIGHT: f64 = 0.20;
pub const LOCATION_WEIGHT: f64 = 0.10;
pub const URGENCY_WEIGHT: f64 = 0.05;

/// Maximum weighted priority sum: three ranks at 3x/2x/1x, 100 each.
const MAX_WEIGHTED_PRIORITY_SUM: f64 = 600.0;

pub fn score_clinic(
    clinic: &ClinicRecord,
    responses: &ResponseSet,
    advanced: Option<&ResponseSet>,
) -> ScoreBreakdown {
    let advanced_supplied = advanced.map(|a| !a.is_empty()).unwrap_or(false);

    let condition = condition_score(clinic, responses, advanced_supplied);
    let budget = budget_score(clinic, responses);
    let priorities = priorities_score(clinic, responses);
    let location = location_score(clinic, responses);
    let urgency = urgency_score(clinic, responses);
    let strain_bonus = strain_bonus(responses.condition(), advanced_supplied);

    let composite = condition * CONDITION_WEIGHT
        + budget * BUDGET_WEIGHT
        + priorities * PRIORITIES_WEIGHT
        + location * LOCATION_WEIGHT
        + urgency * URGENCY_WEIGHT
        + strain_bonus;

    ScoreBreakdown {
        condition,
        budget,
        priorities,
        location,
        urgency,
        strain_bonus,
        composite,
    }
}

/// 90 when any specialty tag contains a synonym of the user's condition,
/// else the neutral 60: a clinic that doesn't list a tag isn't proven to
/// lack the expertise. The +10 rewards supplied detail, not clinic fit,
/// and applies to every clinic equally.
pub fn condition_score(
    clinic: &ClinicRecord,
    responses: &ResponseSet,
    advanced_supplied: bool,
) -> f64 {
    let base: f64 = match responses.condition() {
        Some(condition) => {
            let synonyms = condition_synonyms(condition);
            let matched = clinic.services.specialties.iter().any(|tag| {
                let tag = tag.to_lowercase();
                synonyms.iter().any(|synonym| tag.contains(synonym))
            });
            if matched {
                90.0
            } else {
                60.0
            }
        }
        None => 60.0,
    };
    if advanced_supplied {
        (base + 10.0).min(100.0)
    } else {
        base
    }
}

fn condition_synonyms(condition: Condition) -> &'static [&'static str] {
    match condition {
        Condition::ChronicPain => &["chronic pain", "pain management", "fibromyalgia"],
        Condition::Anxiety => &["anxiety", "mental health", "stress"],
        Condition::Insomnia => &["insomnia", "sleep"],
        Condition::Ptsd => &["ptsd", "trauma", "mental health"],
        Condition::Epilepsy => &["epilepsy", "seizure", "neurology"],
        Condition::MultipleSclerosis => &["multiple sclerosis", "spasticity", "neurology"],
        Condition::Migraine => &["migraine", "headache", "neurology"],
        Condition::Other => &["general", "holistic"],
    }
}

/// Additive confidence bonus unlocked by the detail questionnaire, keyed
/// by condition. Never negative, never above 20.
pub fn strain_bonus(condition: Option<Condition>, advanced_supplied: bool) -> f64 {
    if !advanced_supplied {
        return 0.0;
    }
    match condition {
        Some(Condition::ChronicPain) => 15.0,
        Some(Condition::Anxiety) => 12.0,
        Some(Condition::Insomnia) => 12.0,
        Some(Condition::Ptsd) => 10.0,
        Some(Condition::MultipleSclerosis) => 10.0,
        Some(Condition::Epilepsy) => 8.0,
        Some(Condition::Migraine) => 8.0,
        Some(Condition::Other) | None => 5.0,
    }
}

/// 100 inside the band (boundaries inclusive), flat 85 when cheaper than
/// requested, linear penalty floored at 30 when over.
pub fn budget_score(clinic: &ClinicRecord, responses: &ResponseSet) -> f64 {
    let band = responses.budget().unwrap_or(BudgetBand::NotSure);
    let monthly = effective_monthly_cost(&clinic.pricing);
    let (min, max) = band_range(band);

    if monthly < min {
        return 85.0;
    }
    match max {
        Some(max) if monthly > max => linear_overshoot_penalty(monthly - max, max),
        _ => 100.0,
    }
}

/// Ranked priorities weighted 3x/2x/1x and normalised against the maximum
/// weighted sum. An empty or missing list scores the neutral 60.
pub fn priorities_score(clinic: &ClinicRecord, responses: &ResponseSet) -> f64 {
    let ranked = responses.priorities();
    if ranked.is_empty() {
        return 60.0;
    }
    let mut weighted = 0.0;
    for (index, priority) in ranked.iter().take(3).enumerate() {
        let rank_weight = (3 - index) as f64;
        weighted += priority_score(clinic, *priority) * rank_weight;
    }
    weighted / MAX_WEIGHTED_PRIORITY_SUM * 100.0
}

fn priority_score(clinic: &ClinicRecord, priority: Priority) -> f64 {
    match priority {
        Priority::Specialization => {
            if clinic.services.specialties.len() > 2 {
                100.0
            } else if !clinic.services.specialties.is_empty() {
                75.0
            } else {
                60.0
            }
        }
        Priority::Cost => {
            let price = clinic
                .pricing
                .initial_consultation
                .unwrap_or(DEFAULT_CONSULTATION_PRICE);
            if price < 75.0 {
                100.0
            } else if price < 120.0 {
                80.0
            } else {
                55.0
            }
        }
        Priority::Speed => {
            let days = clinic
                .experience
                .next_available
                .as_deref()
                .map(parse_wait_days)
                .unwrap_or(DEFAULT_WAIT_DAYS);
            if days <= 7 {
                100.0
            } else if days <= 14 {
                75.0
            } else {
                50.0
            }
        }
        Priority::Support => {
            if clinic.services.follow_up_support == Some(true) {
                100.0
            } else {
                60.0
            }
        }
        Priority::Variety => {
            if clinic.services.consultation_modes.len() >= 2 {
                95.0
            } else {
                70.0
            }
        }
        Priority::Discretion => {
            if clinic.supports_video() {
                100.0
            } else {
                65.0
            }
        }
        Priority::Location => {
            if clinic.supports_in_person() {
                90.0
            } else {
                65.0
            }
        }
    }
}

/// Virtual preference checks video support (100/70); otherwise the user's
/// region is matched against the clinic's city by substring. No city text
/// is not proof of mismatch, hence the neutral 60.
pub fn location_score(clinic: &ClinicRecord, responses: &ResponseSet) -> f64 {
    match responses.region() {
        Some(Region::Virtual) => {
            if clinic.supports_video() {
                100.0
            } else {
                70.0
            }
        }
        Some(region) => {
            let Some(city) = clinic.city.as_deref() else {
                return 60.0;
            };
            let city = city.to_lowercase();
            if region_hints(region).iter().any(|hint| city.contains(hint)) {
                100.0
            } else {
                60.0
            }
        }
        None => 60.0,
    }
}

fn region_hints(region: Region) -> &'static [&'static str] {
    match region {
        Region::London => &["london"],
        Region::SouthEast => &["brighton", "reading", "oxford", "kent", "surrey"],
        Region::SouthWest => &["bristol", "bath", "exeter", "plymouth"],
        Region::Midlands => &["birmingham", "nottingham", "leicester", "coventry"],
        Region::NorthWest => &["manchester", "liverpool", "preston"],
        Region::NorthEast => &["leeds", "newcastle", "sheffield", "york"],
        Region::Scotland => &["glasgow", "edinburgh", "aberdeen", "dundee"],
        Region::Wales => &["cardiff", "swansea", "newport"],
        Region::NorthernIreland => &["belfast", "derry"],
        Region::Virtual => &[],
    }
}

/// 100 when the clinic's parsed wait fits the desired window, else the
/// same linear-overshoot penalty the budget scorer uses.
pub fn urgency_score(clinic: &ClinicRecord, responses: &ResponseSet) -> f64 {
    let Some(urgency) = responses.urgency() else {
        return 70.0;
    };
    let desired = desired_wait_days(urgency) as f64;
    let actual = clinic
        .experience
        .next_available
        .as_deref()
        .map(parse_wait_days)
        .unwrap_or(DEFAULT_WAIT_DAYS) as f64;
    if actual <= desired {
        100.0
    } else {
        linear_overshoot_penalty(actual - desired, desired)
    }
}

#[cfg(test)]
mod tests {
    use crate::questionnaire::catalog;
    use crate::questionnaire::Answer;

    use super::*;

    fn pain_clinic() -> ClinicRecord {
        ClinicRecord::new("c1", "Test Clinic")
            .with_city("London")
            .with_pricing(100.0, 50.0, 1200.0)
            .with_specialties(["Chronic Pain Management"])
            .with_consultation_modes(["Video"])
            .with_next_available("5 days")
    }

    fn pain_responses() -> ResponseSet {
        let mut responses = ResponseSet::new();
        responses.insert(catalog::CONDITION, Answer::token("chronic-pain"));
        responses.insert(catalog::BUDGET, Answer::token("150-250"));
        responses.insert(catalog::LOCATION, Answer::token("london"));
        responses.insert(catalog::URGENCY, Answer::token("two-weeks"));
        responses
    }

    #[test]
    fn specialty_synonym_match_scores_ninety() {
        assert_eq!(condition_score(&pain_clinic(), &pain_responses(), false), 90.0);
    }

    #[test]
    fn missing_specialties_fall_to_the_neutral_sixty() {
        let clinic = ClinicRecord::new("c2", "Bare Clinic");
        assert_eq!(condition_score(&clinic, &pain_responses(), false), 60.0);
    }

    #[test]
    fn detail_bonus_is_capped_at_one_hundred_and_clinic_independent() {
        let listed = condition_score(&pain_clinic(), &pain_responses(), true);
        assert_eq!(listed, 100.0);
        let unlisted = condition_score(&ClinicRecord::new("c2", "Bare"), &pain_responses(), true);
        assert_eq!(unlisted, 70.0);
    }

    #[test]
    fn budget_in_band_scores_one_hundred() {
        // 100/6 + 1200/12 = 116.67, inside under-150.
        let mut responses = ResponseSet::new();
        responses.insert(catalog::BUDGET, Answer::token("under-150"));
        assert_eq!(budget_score(&pain_clinic(), &responses), 100.0);
    }

    #[test]
    fn budget_band_boundaries_are_inclusive() {
        // 300/6 + 1200/12 = exactly 150, the 150-250 minimum.
        let clinic = ClinicRecord::new("c3", "Boundary").with_pricing(300.0, 0.0, 1200.0);
        let mut responses = ResponseSet::new();
        responses.insert(catalog::BUDGET, Answer::token("150-250"));
        assert_eq!(budget_score(&clinic, &responses), 100.0);

        // 300/6 + 2400/12 = exactly 250, the 150-250 maximum.
        let clinic = ClinicRecord::new("c4", "Boundary").with_pricing(300.0, 0.0, 2400.0);
        assert_eq!(budget_score(&clinic, &responses), 100.0);
    }

    #[test]
    fn cheaper_than_requested_scores_the_flat_eighty_five() {
        let mut responses = ResponseSet::new();
        responses.insert(catalog::BUDGET, Answer::token("250-350"));
        // 116.67 effective monthly, well under the 250 minimum.
        assert_eq!(budget_score(&pain_clinic(), &responses), 85.0);
    }

    #[test]
    fn over_budget_decays_and_floors_at_thirty() {
        let mut responses = ResponseSet::new();
        responses.insert(catalog::BUDGET, Answer::token("under-150"));
        // 300/6 + 2400/12 = 250, 100 over the 150 cap: 100 - (100/150)*50 = 66.67.
        let clinic = ClinicRecord::new("c5", "Over").with_pricing(300.0, 0.0, 2400.0);
        let score = budget_score(&clinic, &responses);
        assert!((score - (100.0 - 100.0 / 150.0 * 50.0)).abs() < 1e-9);
        assert!(score < 100.0);

        let extreme = ClinicRecord::new("c6", "Way Over").with_pricing(3000.0, 0.0, 24_000.0);
        assert_eq!(budget_score(&extreme, &responses), 30.0);
    }

    #[test]
    fn unbounded_and_neutral_bands_always_fit() {
        let pricey = ClinicRecord::new("c7", "Pricey").with_pricing(600.0, 0.0, 9_000.0);
        let mut responses = ResponseSet::new();
        responses.insert(catalog::BUDGET, Answer::token("500-plus"));
        assert_eq!(budget_score(&pricey, &responses), 100.0);
        responses.insert(catalog::BUDGET, Answer::token("not-sure"));
        assert_eq!(budget_score(&pricey, &responses), 100.0);
    }

    #[test]
    fn priorities_weight_rank_order() {
        let clinic = pain_clinic();
        let mut first = ResponseSet::new();
        first.insert(catalog::PRIORITIES, Answer::ranked(["cost", "support"]));
        let mut swapped = ResponseSet::new();
        swapped.insert(catalog::PRIORITIES, Answer::ranked(["support", "cost"]));
        // cost scores 80 (price 100), support scores 60 (no flag): order matters.
        let first_score = priorities_score(&clinic, &first);
        let swapped_score = priorities_score(&clinic, &swapped);
        assert!((first_score - (80.0 * 3.0 + 60.0 * 2.0) / 600.0 * 100.0).abs() < 1e-9);
        assert!(first_score > swapped_score);
    }

    #[test]
    fn missing_priorities_score_the_neutral_sixty() {
        assert_eq!(priorities_score(&pain_clinic(), &ResponseSet::new()), 60.0);
    }

    #[test]
    fn virtual_preference_checks_video_support() {
        let mut responses = ResponseSet::new();
        responses.insert(catalog::LOCATION, Answer::token("virtual"));
        assert_eq!(location_score(&pain_clinic(), &responses), 100.0);
        let no_video = ClinicRecord::new("c8", "Office Only")
            .with_consultation_modes(["In-Person"]);
        assert_eq!(location_score(&no_video, &responses), 70.0);
    }

    #[test]
    fn region_match_uses_city_substrings() {
        assert_eq!(location_score(&pain_clinic(), &pain_responses()), 100.0);
        let mut responses = pain_responses();
        responses.insert(catalog::LOCATION, Answer::token("scotland"));
        assert_eq!(location_score(&pain_clinic(), &responses), 60.0);
        // Absent city text is not proof of mismatch.
        let nowhere = ClinicRecord::new("c9", "No City");
        assert_eq!(location_score(&nowhere, &responses), 60.0);
    }

    #[test]
    fn urgency_within_window_scores_one_hundred() {
        assert_eq!(urgency_score(&pain_clinic(), &pain_responses()), 100.0);
    }

    #[test]
    fn urgency_overshoot_uses_the_shared_penalty() {
        let slow = ClinicRecord::new("c10", "Slow").with_next_available("4 weeks");
        let mut responses = ResponseSet::new();
        responses.insert(catalog::URGENCY, Answer::token("two-weeks"));
        // 28 days against a 14-day window: 100 - (14/14)*50 = 50.
        assert!((urgency_score(&slow, &responses) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn composite_combines_the_documented_weights() {
        let breakdown = score_clinic(&pain_clinic(), &pain_responses(), None);
        assert_eq!(breakdown.condition, 90.0);
        assert_eq!(breakdown.budget, 100.0);
        assert_eq!(breakdown.location, 100.0);
        assert_eq!(breakdown.urgency, 100.0);
        assert_eq!(breakdown.strain_bonus, 0.0);
        let expected = 90.0 * CONDITION_WEIGHT
            + 100.0 * BUDGET_WEIGHT
            + breakdown.priorities * PRIORITIES_WEIGHT
            + 100.0 * LOCATION_WEIGHT
            + 100.0 * URGENCY_WEIGHT;
        assert!((breakdown.composite - expected).abs() < 1e-9);
    }

    #[test]
    fn advanced_detail_never_lowers_the_composite() {
        let advanced = {
            let mut detail = ResponseSet::new();
            detail.insert(catalog::CONDITION_DETAIL, Answer::token("flare-ups at night"));
            detail
        };
        for clinic in crate::directory::provider::default_clinics() {
            let without = score_clinic(&clinic, &pain_responses(), None);
            let with = score_clinic(&clinic, &pain_responses(), Some(&advanced));
            assert!(with.composite >= without.composite);
        }
    }

    #[test]
    fn empty_advanced_set_grants_no_bonus() {
        let empty = ResponseSet::new();
        let without = score_clinic(&pain_clinic(), &pain_responses(), None);
        let with = score_clinic(&pain_clinic(), &pain_responses(), Some(&empty));
        assert_eq!(without.composite, with.composite);
    }
}
