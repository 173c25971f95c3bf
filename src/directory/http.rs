use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::directory::ClinicRecord;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 12;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("clinic-matcher/0.1")
        .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

pub fn default_client() -> &'static Client {
    &HTTP_CLIENT
}

pub fn client_with_timeout(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent("clinic-matcher/0.1")
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .context("failed to build HTTP client")
}

pub async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed GET request: {url}"))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("failed reading response body: {url}"))?;
    if !status.is_success() {
        let preview: String = body.chars().take(180).collect();
        return Err(anyhow!("GET {url} returned {status}: {preview}"));
    }
    serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))
}

/// Extract clinic records from whatever shape the hosted database returns.
///
/// Hosted tables rename columns without notice, so every field is probed
/// through a list of candidate key spellings. Entries without a usable id
/// and name are skipped; duplicate ids keep the first occurrence.
pub fn parse_clinic_records(value: &Value, max_items: usize) -> Vec<ClinicRecord> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    for array in candidate_object_arrays(value) {
        for entry in array {
            let Some(object) = entry.as_object() else {
                continue;
            };
            let Some(record) = parse_clinic_object(object) else {
                continue;
            };
            if !seen.insert(record.id.clone()) {
                continue;
            }
            out.push(record);
            if out.len() >= max_items {
                return out;
            }
        }
    }

    out
}

fn parse_clinic_object(object: &Map<String, Value>) -> Option<ClinicRecord> {
    let id = string_from_paths(object, &["id", "clinic_id", "slug", "record_id"])?;
    let name = string_from_paths(object, &["name", "clinic_name", "display_name", "title"])?;

    let mut record = ClinicRecord::new(id, name);
    record.city = string_from_paths(object, &["city", "location", "region", "overview.city"]);
    record.website = string_from_paths(object, &["website", "url", "overview.website"]);

    record.pricing.initial_consultation = number_from_paths(
        object,
        &[
            "initial_consultation",
            "consultation_price",
            "pricing.initial_consultation",
            "prices.initial",
        ],
    );
    record.pricing.follow_up = number_from_paths(
        object,
        &["follow_up", "follow_up_price", "pricing.follow_up", "prices.follow_up"],
    );
    record.pricing.estimated_annual_cost = number_from_paths(
        object,
        &[
            "estimated_annual_cost",
            "annual_cost",
            "pricing.estimated_annual_cost",
            "prices.annual",
        ],
    );

    record.services.specialties = string_list_from_paths(
        object,
        &["specialties", "specialisms", "conditions", "services.specialties"],
    );
    record.services.consultation_modes = string_list_from_paths(
        object,
        &[
            "consultation_modes",
            "consultation_types",
            "modes",
            "services.consultation_modes",
        ],
    );
    record.services.follow_up_support = bool_from_paths(
        object,
        &["follow_up_support", "aftercare", "services.follow_up_support"],
    );

    record.experience.rating =
        number_from_paths(object, &["rating", "overall_rating", "experience.rating"]);
    record.experience.review_count =
        number_from_paths(object, &["review_count", "reviews", "experience.review_count"])
            .map(|v| v.max(0.0) as u32);
    record.experience.recommendation_rate = number_from_paths(
        object,
        &[
            "recommendation_rate",
            "recommend_rate",
            "experience.recommendation_rate",
        ],
    );
    record.experience.next_available = string_from_paths(
        object,
        &[
            "next_available",
            "next_appointment",
            "wait_time",
            "experience.next_available",
        ],
    );

    Some(record)
}

fn candidate_object_arrays(value: &Value) -> Vec<&Vec<Value>> {
    let mut arrays = Vec::new();
    if let Some(arr) = value.as_array() {
        if looks_like_object_array(arr) {
            arrays.push(arr);
        }
    }
    if let Some(object) = value.as_object() {
        for key in ["clinics", "data", "result", "items", "list", "records"] {
            if let Some(v) = object_get_case_insensitive(object, key) {
                if let Some(arr) = v.as_array() {
                    if looks_like_object_array(arr) {
                        arrays.push(arr);
                    }
                } else if let Some(nested) = v.as_object() {
                    for nested_key in ["clinics", "items", "list", "records"] {
                        if let Some(inner) = object_get_case_insensitive(nested, nested_key) {
                            if let Some(arr) = inner.as_array() {
                                if looks_like_object_array(arr) {
                                    arrays.push(arr);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    arrays
}

fn looks_like_object_array(arr: &[Value]) -> bool {
    arr.iter().take(5).any(Value::is_object)
}

fn string_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<String> {
    for path in paths {
        let Some(value) = object_path_value(object, path) else {
            continue;
        };
        match value {
            Value::String(s) => {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            }
            Value::Number(n) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn number_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<f64> {
    for path in paths {
        let Some(value) = object_path_value(object, path) else {
            continue;
        };
        if let Some(number) = to_f64(value) {
            return Some(number);
        }
    }
    None
}

fn bool_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<bool> {
    for path in paths {
        let Some(value) = object_path_value(object, path) else {
            continue;
        };
        match value {
            Value::Bool(b) => return Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "y" => return Some(true),
                "no" | "false" | "n" => return Some(false),
                _ => {}
            },
            _ => {}
        }
    }
    None
}

fn string_list_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Vec<String> {
    for path in paths {
        let Some(value) = object_path_value(object, path) else {
            continue;
        };
        match value {
            Value::Array(items) => {
                let parsed = items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>();
                if !parsed.is_empty() {
                    return parsed;
                }
            }
            // Hosted tables sometimes flatten lists to comma-joined text.
            Value::String(s) => {
                let parsed = s
                    .split(',')
                    .map(|piece| piece.trim().to_string())
                    .filter(|piece| !piece.is_empty())
                    .collect::<Vec<_>>();
                if !parsed.is_empty() {
                    return parsed;
                }
            }
            _ => {}
        }
    }
    Vec::new()
}

fn object_path_value<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = object_get_case_insensitive(object, first)?;
    for segment in segments {
        let nested = current.as_object()?;
        current = object_get_case_insensitive(nested, segment)?;
    }
    Some(current)
}

fn object_get_case_insensitive<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let sanitized = s
                .trim()
                .replace(',', "")
                .replace('£', "")
                .replace('%', "")
                .replace('_', "");
            sanitized.parse::<f64>().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_clinic_records;

    #[test]
    fn parses_clinics_from_nested_shape() {
        let payload = json!({
            "data": {
                "clinics": [
                    {
                        "clinic_id": "mamedica",
                        "clinic_name": "Mamedica",
                        "city": "London",
                        "consultation_price": "£150",
                        "annual_cost": 1800,
                        "specialties": ["Chronic Pain", "Anxiety"],
                        "consultation_types": "Video, In-Person",
                        "aftercare": "yes",
                        "wait_time": "5 days"
                    },
                    {
                        "clinic_id": "mamedica",
                        "clinic_name": "Mamedica duplicate"
                    },
                    {
                        "notes": "row without id or name"
                    }
                ]
            }
        });

        let parsed = parse_clinic_records(&payload, 10);
        assert_eq!(parsed.len(), 1);
        let clinic = &parsed[0];
        assert_eq!(clinic.name, "Mamedica");
        assert_eq!(clinic.pricing.initial_consultation, Some(150.0));
        assert_eq!(clinic.services.specialties.len(), 2);
        assert_eq!(clinic.services.consultation_modes.len(), 2);
        assert_eq!(clinic.services.follow_up_support, Some(true));
        assert_eq!(clinic.experience.next_available.as_deref(), Some("5 days"));
    }

    #[test]
    fn respects_max_items() {
        let payload = json!([
            {"id": "a", "name": "A"},
            {"id": "b", "name": "B"},
            {"id": "c", "name": "C"}
        ]);
        assert_eq!(parse_clinic_records(&payload, 2).len(), 2);
    }
}
