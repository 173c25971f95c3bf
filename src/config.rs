use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matching::{JitterSource, MatcherConfig, DEFAULT_RESULT_LIMIT, MAX_JITTER_POINTS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matcher: MatcherSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherSettings {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_true")]
    pub jitter_enabled: bool,
    #[serde(default = "default_jitter_points")]
    pub jitter_points: f64,
    /// Fix the jitter sequence for reproducible rankings.
    #[serde(default)]
    pub jitter_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_true")]
    pub static_fallback: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_url: Option<String>,
    pub result_limit: Option<usize>,
    /// Disable jitter entirely, e.g. for scripted comparisons.
    pub deterministic: bool,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/clinic-matcher/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(source_url) = overrides.source_url {
            self.directory.source_url = source_url;
        }
        if let Some(result_limit) = overrides.result_limit {
            self.matcher.result_limit = result_limit.max(1);
        }
        if overrides.deterministic {
            self.matcher.jitter_enabled = false;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    /// Build the matcher runtime settings this config describes.
    pub fn matcher_config(&self) -> MatcherConfig {
        let jitter = if !self.matcher.jitter_enabled {
            JitterSource::disabled()
        } else if let Some(seed) = self.matcher.jitter_seed {
            JitterSource::seeded(seed)
        } else {
            JitterSource::from_entropy()
        };
        MatcherConfig {
            result_limit: self.matcher.result_limit.max(1),
            jitter,
            jitter_points: self.matcher.jitter_points.clamp(0.0, MAX_JITTER_POINTS),
        }
    }

    pub fn default_template() -> String {
        let template = r#"[matcher]
result_limit = 3
jitter_enabled = true
jitter_points = 5.0
# jitter_seed = 1234

[directory]
source_url = "https://api.ukclinicindex.co.uk/v1/clinics"
request_timeout_secs = 12
cache_ttl_secs = 900
static_fallback = true
"#;
        template.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matcher: MatcherSettings::default(),
            directory: DirectorySettings::default(),
        }
    }
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            jitter_enabled: true,
            jitter_points: default_jitter_points(),
            jitter_seed: None,
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            request_timeout_secs: default_request_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            static_fallback: true,
        }
    }
}

fn default_result_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}

fn default_jitter_points() -> f64 {
    MAX_JITTER_POINTS
}

fn default_source_url() -> String {
    "https://api.ukclinicindex.co.uk/v1/clinics".to_string()
}

fn default_request_timeout() -> u64 {
    12
}

fn default_cache_ttl() -> u64 {
    900
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_back_into_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template toml");
        assert_eq!(parsed.matcher.result_limit, 3);
        assert!(parsed.matcher.jitter_enabled);
        assert_eq!(parsed.directory.cache_ttl_secs, 900);
    }

    #[test]
    fn overrides_layer_on_top_of_file_values() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            source_url: Some("https://example.org/clinics".to_string()),
            result_limit: Some(0),
            deterministic: true,
        });
        assert_eq!(config.directory.source_url, "https://example.org/clinics");
        assert_eq!(config.matcher.result_limit, 1);
        assert!(!config.matcher.jitter_enabled);
    }

    #[test]
    fn partial_toml_fills_missing_sections_with_defaults() {
        let parsed: Config =
            toml::from_str("[matcher]\nresult_limit = 5\n").expect("partial toml");
        assert_eq!(parsed.matcher.result_limit, 5);
        assert!(parsed.matcher.jitter_enabled);
        assert_eq!(parsed.directory.request_timeout_secs, 12);
    }
}
