use once_cell::sync::Lazy;
use regex::Regex;

use crate::directory::ClinicPricing;
use crate::questionnaire::{BudgetBand, Urgency};

/// Assumed wait when a clinic's availability string cannot be parsed.
pub const DEFAULT_WAIT_DAYS: u32 = 14;
/// Assumed first-consultation fee when a clinic publishes no price.
pub const DEFAULT_CONSULTATION_PRICE: f64 = 150.0;
/// Assumed yearly medication spend when a clinic publishes no estimate.
pub const DEFAULT_ANNUAL_COST: f64 = 1_800.0;

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("wait-time regex"));

/// Parse a published wait-time string ("3 days", "2 weeks") into days.
///
/// Only the leading number is read; "week" anywhere in the string applies
/// a x7 multiplier. Any other phrasing falls back to [`DEFAULT_WAIT_DAYS`]
/// rather than attempting smarter parsing.
pub fn parse_wait_days(raw: &str) -> u32 {
    let Some(found) = LEADING_NUMBER.find(raw) else {
        return DEFAULT_WAIT_DAYS;
    };
    let Ok(count) = found.as_str().parse::<u32>() else {
        return DEFAULT_WAIT_DAYS;
    };
    if raw.to_lowercase().contains("week") {
        count.saturating_mul(7)
    } else {
        count
    }
}

/// Effective monthly cost: consultation fee amortised over six months plus
/// one twelfth of the yearly medication estimate.
pub fn effective_monthly_cost(pricing: &ClinicPricing) -> f64 {
    let consultation = pricing
        .initial_consultation
        .unwrap_or(DEFAULT_CONSULTATION_PRICE);
    let annual = pricing.estimated_annual_cost.unwrap_or(DEFAULT_ANNUAL_COST);
    consultation / 6.0 + annual / 12.0
}

/// Monthly GBP range for a budget band; `None` max means unbounded.
pub fn band_range(band: BudgetBand) -> (f64, Option<f64>) {
    match band {
        BudgetBand::Under150 => (0.0, Some(150.0)),
        BudgetBand::From150To250 => (150.0, Some(250.0)),
        BudgetBand::From250To350 => (250.0, Some(350.0)),
        BudgetBand::From350To500 => (350.0, Some(500.0)),
        BudgetBand::Above500 => (500.0, None),
        BudgetBand::NotSure => (0.0, None),
    }
}

/// Longest acceptable wait in days for each urgency selection.
pub fn desired_wait_days(urgency: Urgency) -> u32 {
    match urgency {
        Urgency::ThisWeek => 7,
        Urgency::TwoWeeks => 14,
        Urgency::WithinMonth => 30,
        Urgency::Researching => 60,
    }
}

/// Linear penalty for exceeding a limit, losing 50 points across one full
/// multiple of the limit and never dropping below the 30-point floor.
pub fn linear_overshoot_penalty(over: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 30.0;
    }
    (100.0 - (over / limit) * 50.0).max(30.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_and_week_phrasings() {
        assert_eq!(parse_wait_days("3 days"), 3);
        assert_eq!(parse_wait_days("1 day"), 1);
        assert_eq!(parse_wait_days("2 weeks"), 14);
        assert_eq!(parse_wait_days("1 week"), 7);
        assert_eq!(parse_wait_days("10"), 10);
    }

    #[test]
    fn unparseable_strings_default_to_two_weeks() {
        assert_eq!(parse_wait_days("call for availability"), DEFAULT_WAIT_DAYS);
        assert_eq!(parse_wait_days(""), DEFAULT_WAIT_DAYS);
        assert_eq!(parse_wait_days("next month"), DEFAULT_WAIT_DAYS);
    }

    #[test]
    fn monthly_cost_combines_consultation_and_annual_spend() {
        let pricing = ClinicPricing {
            initial_consultation: Some(100.0),
            follow_up: None,
            estimated_annual_cost: Some(1200.0),
        };
        let monthly = effective_monthly_cost(&pricing);
        assert!((monthly - (100.0 / 6.0 + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn missing_pricing_uses_documented_defaults() {
        let monthly = effective_monthly_cost(&ClinicPricing::default());
        let expected = DEFAULT_CONSULTATION_PRICE / 6.0 + DEFAULT_ANNUAL_COST / 12.0;
        assert!((monthly - expected).abs() < 1e-9);
    }

    #[test]
    fn overshoot_penalty_decays_linearly_to_the_floor() {
        assert!((linear_overshoot_penalty(0.0, 200.0) - 100.0).abs() < 1e-9);
        assert!((linear_overshoot_penalty(100.0, 200.0) - 75.0).abs() < 1e-9);
        assert!((linear_overshoot_penalty(400.0, 200.0) - 30.0).abs() < 1e-9);
        assert!((linear_overshoot_penalty(10_000.0, 200.0) - 30.0).abs() < 1e-9);
    }
}
