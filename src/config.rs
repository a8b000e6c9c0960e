use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::benchmark::BenchmarkTable;
use crate::error::Result;
use crate::factors::FactorTable;
use crate::potential::PotentialTable;

fn default_advisory_timeout_ms() -> u64 {
    15_000
}

/// Versioned lookup tables, loaded once and shared read-only by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub version: String,
    #[serde(default)]
    pub factors: FactorTable,
    #[serde(default)]
    pub benchmarks: BenchmarkTable,
    #[serde(default)]
    pub potentials: PotentialTable,
    /// Upper bound on one advisory call; the core never waits on it.
    #[serde(default = "default_advisory_timeout_ms")]
    pub advisory_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            version: "1".to_string(),
            factors: FactorTable::default(),
            benchmarks: BenchmarkTable::default(),
            potentials: PotentialTable::default(),
            advisory_timeout_ms: default_advisory_timeout_ms(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates; sections absent from the document keep defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            version = %cfg.version,
            factors_version = %cfg.factors.version,
            "loaded engine config"
        );
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.factors.validate()?;
        self.benchmarks.validate()?;
        self.potentials.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FootprintError;

    #[test]
    fn partial_document_keeps_default_tables() {
        let cfg = EngineConfig::from_json_str(r#"{"version": "test-7"}"#).unwrap();
        assert_eq!(cfg.version, "test-7");
        assert_eq!(cfg.benchmarks, BenchmarkTable::default());
        assert_eq!(cfg.advisory_timeout_ms, 15_000);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let cfg = EngineConfig::default();
        let raw = serde_json::to_string(&cfg).unwrap();
        assert_eq!(EngineConfig::from_json_str(&raw).unwrap(), cfg);
    }

    #[test]
    fn invalid_tables_are_config_errors() {
        let mut cfg = EngineConfig::default();
        cfg.benchmarks.default_average = 0.0;
        let raw = serde_json::to_string(&cfg).unwrap();
        let err = EngineConfig::from_json_str(&raw).unwrap_err();
        assert!(matches!(err, FootprintError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/footprint.json")).unwrap_err();
        assert!(matches!(err, FootprintError::ConfigIo(_)));
    }
}
