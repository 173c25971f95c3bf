use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::directory::cache::TtlCache;
use crate::directory::http::{client_with_timeout, default_client, fetch_json, parse_clinic_records};
use crate::directory::ClinicRecord;

const MAX_REMOTE_CLINICS: usize = 100;

#[async_trait]
pub trait ClinicProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_clinics(&self) -> Result<Vec<ClinicRecord>>;
}

/// Clinic directory backed by the hosted database's JSON endpoint.
pub struct RemoteDirectory {
    source_url: String,
    client: Client,
}

impl RemoteDirectory {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            client: default_client().clone(),
        }
    }

    pub fn with_timeout(source_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            source_url: source_url.into(),
            client: client_with_timeout(timeout_secs)?,
        })
    }
}

#[async_trait]
impl ClinicProvider for RemoteDirectory {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch_clinics(&self) -> Result<Vec<ClinicRecord>> {
        let payload = fetch_json(&self.client, &self.source_url).await?;
        let clinics = parse_clinic_records(&payload, MAX_REMOTE_CLINICS);
        debug!("remote directory returned {} clinics", clinics.len());
        Ok(clinics)
    }
}

/// Built-in snapshot of the UK clinic directory. Serves as the fallback
/// when the remote source is unreachable and as fixture data for demos.
pub struct StaticDirectory;

#[async_trait]
impl ClinicProvider for StaticDirectory {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_clinics(&self) -> Result<Vec<ClinicRecord>> {
        Ok(default_clinics())
    }
}

pub fn default_clinics() -> Vec<ClinicRecord> {
    vec![
        ClinicRecord::new("mamedica", "Mamedica")
            .with_city("London")
            .with_website("https://mamedica.co.uk")
            .with_pricing(150.0, 75.0, 1680.0)
            .with_specialties(["Chronic Pain Management", "Anxiety", "Insomnia"])
            .with_consultation_modes(["Video"])
            .with_follow_up_support(true)
            .with_experience(4.7, 412, 93.0)
            .with_next_available("3 days"),
        ClinicRecord::new("releaf", "Releaf")
            .with_city("London")
            .with_website("https://releaf.co.uk")
            .with_pricing(99.0, 49.0, 2400.0)
            .with_specialties(["Chronic Pain", "Mental Health", "Sleep Disorders", "Migraine"])
            .with_consultation_modes(["Video"])
            .with_follow_up_support(true)
            .with_experience(4.8, 356, 95.0)
            .with_next_available("2 days"),
        ClinicRecord::new("alternaleaf", "Alternaleaf")
            .with_city("Manchester")
            .with_website("https://alternaleaf.co.uk")
            .with_pricing(79.0, 39.0, 1920.0)
            .with_specialties(["Anxiety", "PTSD", "Chronic Pain"])
            .with_consultation_modes(["Video"])
            .with_follow_up_support(true)
            .with_experience(4.6, 288, 91.0)
            .with_next_available("1 week"),
        ClinicRecord::new("cb1-medical", "CB1 Medical")
            .with_city("Leicester")
            .with_website("https://cb1medical.co.uk")
            .with_pricing(50.0, 25.0, 1440.0)
            .with_specialties(["Pain Management", "Neurology"])
            .with_consultation_modes(["Video", "In-Person"])
            .with_follow_up_support(true)
            .with_experience(4.5, 203, 89.0)
            .with_next_available("5 days"),
        ClinicRecord::new("integro", "Integro Clinics")
            .with_city("Birmingham")
            .with_website("https://integroclinics.com")
            .with_pricing(190.0, 95.0, 2160.0)
            .with_specialties(["Epilepsy", "Multiple Sclerosis", "Chronic Pain", "Palliative Care"])
            .with_consultation_modes(["Video", "In-Person"])
            .with_follow_up_support(true)
            .with_experience(4.4, 151, 88.0)
            .with_next_available("2 weeks"),
        ClinicRecord::new("lyphe", "Lyphe Clinic")
            .with_city("Edinburgh")
            .with_website("https://lyphe.com")
            .with_pricing(140.0, 70.0, 1800.0)
            .with_specialties(["Chronic Pain", "Fibromyalgia", "Insomnia"])
            .with_consultation_modes(["Video"])
            .with_follow_up_support(false)
            .with_experience(4.2, 174, 84.0)
            .with_next_available("10 days"),
    ]
}

/// Read-through wrapper: fresh cache hit, else live fetch, else stale
/// cache, else the static snapshot when enabled. Never errors — an empty
/// list is the worst case the matcher ever sees.
pub struct CachedDirectory {
    provider: Arc<dyn ClinicProvider>,
    cache: TtlCache<Vec<ClinicRecord>>,
    static_fallback: bool,
}

impl CachedDirectory {
    pub fn new(provider: Arc<dyn ClinicProvider>, ttl: Duration, static_fallback: bool) -> Self {
        Self {
            provider,
            cache: TtlCache::new(ttl),
            static_fallback,
        }
    }

    pub async fn clinics(&self) -> Vec<ClinicRecord> {
        if let Some(cached) = self.cache.get() {
            return cached;
        }

        match self.provider.fetch_clinics().await {
            Ok(clinics) if !clinics.is_empty() => {
                self.cache.set(clinics.clone());
                return clinics;
            }
            Ok(_) => {
                warn!(provider = self.provider.name(), "directory returned no clinics");
            }
            Err(error) => {
                warn!(provider = self.provider.name(), "directory fetch failed: {error:#}");
            }
        }

        if let Some(stale) = self.cache.get_stale() {
            debug!("serving stale clinic directory");
            return stale;
        }
        if self.static_fallback {
            debug!("serving built-in clinic directory");
            return default_clinics();
        }
        Vec::new()
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl ClinicProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_clinics(&self) -> Result<Vec<ClinicRecord>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn failed_fetch_falls_back_to_static_directory() {
        let directory = CachedDirectory::new(
            Arc::new(FailingProvider),
            Duration::from_secs(60),
            true,
        );
        let clinics = tokio_test::block_on(directory.clinics());
        assert_eq!(clinics, default_clinics());
    }

    #[test]
    fn failed_fetch_without_fallback_degrades_to_empty() {
        let directory = CachedDirectory::new(
            Arc::new(FailingProvider),
            Duration::from_secs(60),
            false,
        );
        let clinics = tokio_test::block_on(directory.clinics());
        assert!(clinics.is_empty());
    }

    #[test]
    fn stale_cache_is_preferred_over_static_fallback() {
        let directory = CachedDirectory::new(Arc::new(FailingProvider), Duration::ZERO, true);
        let snapshot = vec![ClinicRecord::new("cached", "Cached Clinic")];
        directory.cache.set(snapshot.clone());
        let clinics = tokio_test::block_on(directory.clinics());
        assert_eq!(clinics, snapshot);
    }

    #[test]
    fn successful_fetch_is_cached() {
        struct CountingProvider(std::sync::atomic::AtomicUsize);

        #[async_trait]
        impl ClinicProvider for CountingProvider {
            fn name(&self) -> &str {
                "counting"
            }

            async fn fetch_clinics(&self) -> Result<Vec<ClinicRecord>> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(vec![ClinicRecord::new("c1", "Clinic One")])
            }
        }

        let provider = Arc::new(CountingProvider(std::sync::atomic::AtomicUsize::new(0)));
        let directory =
            CachedDirectory::new(provider.clone(), Duration::from_secs(60), false);
        tokio_test::block_on(directory.clinics());
        tokio_test::block_on(directory.clinics());
        assert_eq!(provider.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
