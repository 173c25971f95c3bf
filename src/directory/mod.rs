pub mod cache;
pub mod http;
pub mod provider;

use serde::{Deserialize, Serialize};

pub use cache::TtlCache;
pub use provider::{CachedDirectory, ClinicProvider, RemoteDirectory, StaticDirectory};

/// Read-only snapshot of one clinic's public profile.
///
/// Every field outside the identity pair may be absent; scorers substitute
/// documented defaults instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub pricing: ClinicPricing,
    #[serde(default)]
    pub services: ClinicServices,
    #[serde(default)]
    pub experience: PatientExperience,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClinicPricing {
    /// First consultation fee in GBP.
    #[serde(default)]
    pub initial_consultation: Option<f64>,
    /// Follow-up appointment fee in GBP.
    #[serde(default)]
    pub follow_up: Option<f64>,
    /// Estimated yearly medication spend in GBP.
    #[serde(default)]
    pub estimated_annual_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClinicServices {
    /// Free-text specialty tags as published by the clinic.
    #[serde(default)]
    pub specialties: Vec<String>,
    /// Supported consultation modes, e.g. "video", "in-person".
    #[serde(default)]
    pub consultation_modes: Vec<String>,
    #[serde(default)]
    pub follow_up_support: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientExperience {
    /// Overall rating on a 0-5 scale.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    /// Share of reviewers who would recommend the clinic, 0-100.
    #[serde(default)]
    pub recommendation_rate: Option<f64>,
    /// Human wait-time string as published, e.g. "3 days" or "2 weeks".
    #[serde(default)]
    pub next_available: Option<String>,
}

impl ClinicRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: None,
            website: None,
            pricing: ClinicPricing::default(),
            services: ClinicServices::default(),
            experience: PatientExperience::default(),
        }
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn with_website(mut self, url: &str) -> Self {
        self.website = Some(url.to_string());
        self
    }

    pub fn with_pricing(mut self, initial: f64, follow_up: f64, annual: f64) -> Self {
        self.pricing = ClinicPricing {
            initial_consultation: Some(initial),
            follow_up: Some(follow_up),
            estimated_annual_cost: Some(annual),
        };
        self
    }

    pub fn with_specialties<I, S>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services.specialties = specialties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_consultation_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services.consultation_modes = modes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_follow_up_support(mut self, supported: bool) -> Self {
        self.services.follow_up_support = Some(supported);
        self
    }

    pub fn with_experience(mut self, rating: f64, reviews: u32, recommendation: f64) -> Self {
        self.experience.rating = Some(rating);
        self.experience.review_count = Some(reviews);
        self.experience.recommendation_rate = Some(recommendation);
        self
    }

    pub fn with_next_available(mut self, wait: &str) -> Self {
        self.experience.next_available = Some(wait.to_string());
        self
    }

    pub fn supports_video(&self) -> bool {
        self.supports_mode("video") || self.supports_mode("online")
    }

    pub fn supports_in_person(&self) -> bool {
        self.supports_mode("in-person") || self.supports_mode("in person")
    }

    fn supports_mode(&self, needle: &str) -> bool {
        self.services
            .consultation_modes
            .iter()
            .any(|mode| mode.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_sections() {
        let clinic = ClinicRecord::new("c1", "Example Clinic")
            .with_city("London")
            .with_pricing(100.0, 50.0, 1200.0)
            .with_specialties(["Chronic Pain Management"])
            .with_consultation_modes(["Video", "In-Person"])
            .with_next_available("5 days");
        assert_eq!(clinic.pricing.initial_consultation, Some(100.0));
        assert!(clinic.supports_video());
        assert!(clinic.supports_in_person());
    }

    #[test]
    fn partial_records_deserialize_with_defaults() {
        let clinic: ClinicRecord =
            serde_json::from_str(r#"{"id": "c9", "name": "Bare Clinic"}"#).expect("clinic json");
        assert!(clinic.city.is_none());
        assert!(clinic.services.specialties.is_empty());
        assert!(!clinic.supports_video());
    }
}
