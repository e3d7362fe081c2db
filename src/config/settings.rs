//! Run settings
//!
//! Optional YAML file tuning deadlines, pool size and which probes run.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::ConfigError;

/// Per-probe deadline used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error text a global endpoint is expected to return for a named-graph query
pub const DEFAULT_NAMED_GRAPH_SENTINEL: &str = "NANANA";

/// Configuration for a single probe
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Whether this probe is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Deadline for this probe, overriding the global one
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: None,
        }
    }
}

/// Top-level run settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Default per-probe deadline
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Worker pool size (defaults to one worker per probe)
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Expected error text for named-graph queries on a global endpoint
    #[serde(default = "default_sentinel")]
    pub named_graph_sentinel: String,

    /// Probe configurations (probe_name -> config)
    #[serde(default)]
    pub probes: HashMap<String, ProbeConfig>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_sentinel() -> String {
    DEFAULT_NAMED_GRAPH_SENTINEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_concurrency: None,
            named_graph_sentinel: default_sentinel(),
            probes: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
        }
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::Invalid(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if let Some((name, _)) = self
            .probes
            .iter()
            .find(|(_, probe)| probe.timeout.is_some_and(|t| t.is_zero()))
        {
            return Err(ConfigError::Invalid(format!(
                "timeout for probe {name} must be greater than zero"
            )));
        }
        Ok(())
    }

    /// Get configuration for a specific probe
    pub fn probe_config(&self, name: &str) -> Option<&ProbeConfig> {
        self.probes.get(name)
    }

    /// Check if a probe is enabled (probes not listed are enabled)
    pub fn is_probe_enabled(&self, name: &str) -> bool {
        self.probe_config(name).map(|p| p.enabled).unwrap_or(true)
    }

    /// Deadline-overrides for probes that set their own timeout
    pub fn probe_timeouts(&self) -> HashMap<String, Duration> {
        self.probes
            .iter()
            .filter_map(|(name, probe)| probe.timeout.map(|t| (name.clone(), t)))
            .collect()
    }
}
