use anyhow::Result;

use crate::directory::ClinicRecord;
use crate::matching::MatchResult;

pub fn matches_to_csv(results: &[MatchResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "clinic_id",
        "clinic_name",
        "match_percentage",
        "composite",
        "reasons",
    ])?;
    for (idx, result) in results.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            result.clinic.id.clone(),
            result.clinic.name.clone(),
            result.match_percentage.to_string(),
            format!("{:.2}", result.breakdown.composite),
            result.match_reasons.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn clinics_to_csv(clinics: &[ClinicRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "name",
        "city",
        "initial_consultation",
        "estimated_annual_cost",
        "specialties",
        "rating",
        "next_available",
    ])?;
    for clinic in clinics {
        writer.write_record([
            clinic.id.clone(),
            clinic.name.clone(),
            clinic.city.clone().unwrap_or_default(),
            clinic
                .pricing
                .initial_consultation
                .map(|v| format!("{v:.2}"))
                .unwrap_or_default(),
            clinic
                .pricing
                .estimated_annual_cost
                .map(|v| format!("{v:.2}"))
                .unwrap_or_default(),
            clinic.services.specialties.join("; "),
            clinic
                .experience
                .rating
                .map(|v| format!("{v:.1}"))
                .unwrap_or_default(),
            clinic.experience.next_available.clone().unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
