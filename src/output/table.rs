use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::directory::ClinicRecord;
use crate::matching::MatchResult;
use crate::questionnaire::catalog::QuestionSpec;

pub fn render_matches_table(results: &[MatchResult]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Clinic", "Match", "City", "Why"]);

    for (idx, result) in results.iter().enumerate() {
        let match_cell = if result.match_percentage >= 85 {
            Cell::new(format!("{}%", result.match_percentage)).fg(Color::Green)
        } else {
            Cell::new(format!("{}%", result.match_percentage))
        };
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(result.clinic.name.clone()),
            match_cell,
            Cell::new(result.clinic.city.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(result.match_reasons.join("; ")),
        ]));
    }
    table.to_string()
}

pub fn render_breakdown_table(results: &[MatchResult]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Clinic",
        "Condition",
        "Budget",
        "Priorities",
        "Location",
        "Urgency",
        "Bonus",
        "Composite",
    ]);
    for result in results {
        let b = &result.breakdown;
        table.add_row(vec![
            result.clinic.name.clone(),
            format!("{:.0}", b.condition),
            format!("{:.0}", b.budget),
            format!("{:.1}", b.priorities),
            format!("{:.0}", b.location),
            format!("{:.0}", b.urgency),
            format!("{:.0}", b.strain_bonus),
            format!("{:.1}", b.composite),
        ]);
    }
    table.to_string()
}

pub fn render_clinics_table(clinics: &[ClinicRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Clinic",
        "City",
        "Consultation",
        "Est. Annual",
        "Specialties",
        "Rating",
        "Next Available",
    ]);
    for clinic in clinics {
        table.add_row(vec![
            clinic.name.clone(),
            clinic.city.clone().unwrap_or_else(|| "-".to_string()),
            clinic
                .pricing
                .initial_consultation
                .map(|v| format!("£{v:.0}"))
                .unwrap_or_else(|| "-".to_string()),
            clinic
                .pricing
                .estimated_annual_cost
                .map(|v| format!("£{v:.0}"))
                .unwrap_or_else(|| "-".to_string()),
            clinic.services.specialties.join(", "),
            clinic
                .experience
                .rating
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string()),
            clinic
                .experience
                .next_available
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_questions_table(questions: &[QuestionSpec]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Kind", "Prompt", "Options"]);
    for question in questions {
        table.add_row(vec![
            question.id.to_string(),
            format!("{:?}", question.kind),
            question.prompt.to_string(),
            question.options.join(", "),
        ]);
    }
    table.to_string()
}
