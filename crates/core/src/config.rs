//! Debounce configuration
//!
//! A debounced function is configured by exactly two knobs: the quiet window
//! that must elapse before it settles, and the edge on which it fires.
//!
//! ```toml
//! wait_ms = 250
//! edge = "leading"
//! ```

use crate::error::{Result, SettleError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Wait window used when none (or zero) is given
pub const DEFAULT_WAIT: Duration = Duration::from_millis(200);

/// Which edge of a burst invokes the wrapped function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Fire on the first call of a burst, suppress the rest
    Leading,
    /// Fire once, after the burst has been quiet for the wait window
    #[default]
    Trailing,
}

impl Edge {
    /// Map the classic `immediate` flag to an edge
    pub fn from_immediate(immediate: bool) -> Self {
        if immediate {
            Edge::Leading
        } else {
            Edge::Trailing
        }
    }

    pub fn is_leading(self) -> bool {
        matches!(self, Edge::Leading)
    }
}

/// Debounce configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet window (default: 200ms, zero means default)
    ///
    /// Written as `wait_ms` in TOML; fractional milliseconds are accepted.
    #[serde(rename = "wait_ms", with = "millis", default = "default_wait")]
    pub wait: Duration,

    /// Invocation edge (default: trailing)
    #[serde(default)]
    pub edge: Edge,
}

impl DebounceConfig {
    /// Build a config from an optional wait and the `immediate` flag
    pub fn new(wait: Option<Duration>, immediate: bool) -> Self {
        Self {
            wait: wait.unwrap_or(DEFAULT_WAIT),
            edge: Edge::from_immediate(immediate),
        }
    }

    /// Effective wait window
    ///
    /// Zero is treated as "unset" and resolves to [`DEFAULT_WAIT`]. Any
    /// nonzero window, however short, is kept exactly.
    pub fn wait(&self) -> Duration {
        if self.wait.is_zero() {
            DEFAULT_WAIT
        } else {
            self.wait
        }
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SettleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), wait = ?config.wait, edge = ?config.edge, "Loaded debounce config");
        Ok(config)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            wait: default_wait(),
            edge: Edge::Trailing,
        }
    }
}

fn default_wait() -> Duration {
    DEFAULT_WAIT
}

/// `Duration` as milliseconds: an integer when whole, a float otherwise
mod millis {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Whole(u64),
        Fractional(f64),
    }

    pub fn serialize<S: Serializer>(wait: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if wait.subsec_nanos() % 1_000_000 == 0 {
            let ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
            serializer.serialize_u64(ms)
        } else {
            serializer.serialize_f64(wait.as_nanos() as f64 / 1_000_000.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Millis::deserialize(deserializer)? {
            Millis::Whole(ms) => Ok(Duration::from_millis(ms)),
            Millis::Fractional(ms) if ms.is_finite() && ms >= 0.0 && ms * 1e6 < u64::MAX as f64 => {
                Ok(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
            }
            Millis::Fractional(ms) => Err(D::Error::custom(format!("invalid wait_ms: {ms}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DebounceConfig::default();
        assert_eq!(config.wait(), Duration::from_millis(200));
        assert_eq!(config.edge, Edge::Trailing);
        assert_eq!(DebounceConfig::new(None, false), config);
    }

    #[test]
    fn test_zero_wait_falls_back_to_default() {
        let config = DebounceConfig::new(Some(Duration::ZERO), false);
        assert_eq!(config.wait, Duration::ZERO);
        assert_eq!(config.wait(), DEFAULT_WAIT);
    }

    #[test]
    fn test_sub_millisecond_wait_is_kept() {
        let config = DebounceConfig::new(Some(Duration::from_micros(500)), false);
        assert_eq!(config.wait(), Duration::from_micros(500));

        let config = DebounceConfig::new(Some(Duration::from_micros(1900)), false);
        assert_eq!(config.wait(), Duration::from_micros(1900));
    }

    #[test]
    fn test_parse_fractional_millis() -> anyhow::Result<()> {
        let config = DebounceConfig::from_toml_str("wait_ms = 0.5")?;
        assert_eq!(config.wait(), Duration::from_micros(500));

        let text = toml::to_string(&config)?;
        assert_eq!(DebounceConfig::from_toml_str(&text)?, config);
        Ok(())
    }

    #[test]
    fn test_parse_negative_millis_rejected() {
        let err = DebounceConfig::from_toml_str("wait_ms = -1.5").unwrap_err();
        assert!(matches!(err, SettleError::Config(_)));
    }

    #[test]
    fn test_immediate_selects_leading_edge() {
        assert_eq!(Edge::from_immediate(true), Edge::Leading);
        assert_eq!(Edge::from_immediate(false), Edge::Trailing);
        assert!(DebounceConfig::new(Some(Duration::from_millis(50)), true).edge.is_leading());
    }

    #[test]
    fn test_parse_toml() -> anyhow::Result<()> {
        let config = DebounceConfig::from_toml_str("wait_ms = 75\nedge = \"leading\"\n")?;
        assert_eq!(config.wait(), Duration::from_millis(75));
        assert_eq!(config.edge, Edge::Leading);
        Ok(())
    }

    #[test]
    fn test_parse_toml_missing_fields_use_defaults() -> anyhow::Result<()> {
        let config = DebounceConfig::from_toml_str("")?;
        assert_eq!(config, DebounceConfig::default());

        let config = DebounceConfig::from_toml_str("edge = \"leading\"")?;
        assert_eq!(config.wait(), DEFAULT_WAIT);
        Ok(())
    }

    #[test]
    fn test_parse_toml_rejects_unknown_edge() {
        let err = DebounceConfig::from_toml_str("edge = \"middle\"").unwrap_err();
        assert!(matches!(err, SettleError::Config(_)));
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("debounce.toml");
        std::fs::write(&path, "wait_ms = 500\n")?;

        let config = DebounceConfig::load(&path)?;
        assert_eq!(config.wait(), Duration::from_millis(500));
        assert_eq!(config.edge, Edge::Trailing);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = DebounceConfig::load(&path).unwrap_err();
        assert!(matches!(err, SettleError::Io { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_roundtrip_through_toml() -> anyhow::Result<()> {
        let config = DebounceConfig::new(Some(Duration::from_millis(120)), true);
        let text = toml::to_string(&config)?;
        assert!(text.contains("edge = \"leading\""));
        assert_eq!(DebounceConfig::from_toml_str(&text)?, config);
        Ok(())
    }
}
