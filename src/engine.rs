use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{self, rounded_percent, FootprintSummary};
use crate::benchmark::{BenchmarkComparison, Benchmarks};
use crate::calculators;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::potential::ReductionPotential;
use crate::profile::LifestyleProfile;
use crate::scenario::{self, ChangeSet, ScenarioOutcome};
use crate::types::{Category, CategoryEmissions, CategoryResult, FootprintResult};

/// Footprint, derived rates and benchmarks from one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub footprint: FootprintResult,
    pub summary: FootprintSummary,
    pub benchmarks: Benchmarks,
}

/// Baseline versus an edited profile, recomputing only the affected categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recalculation {
    pub original: f64,
    pub modified: f64,
    pub reduction: f64,
    pub reduction_percent: f64,
    pub footprint: FootprintResult,
}

/// Deterministic calculation core. Holds only read-only tables; construct one
/// and pass it to callers.
#[derive(Debug, Clone)]
pub struct EmissionEngine {
    config: EngineConfig,
}

impl EmissionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(EmissionEngine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one category calculator over its slice of the profile.
    pub fn calculate_category(&self, category: Category, profile: &LifestyleProfile) -> CategoryResult {
        let region = profile.region();
        let factors = &self.config.factors;
        match category {
            Category::Transportation => calculators::transportation(&profile.transportation, region, factors),
            Category::HomeEnergy => calculators::home_energy(&profile.home_energy, region, factors),
            Category::Food => calculators::food(&profile.diet, region, factors),
            Category::Water => calculators::water(&profile.water, region, factors),
            Category::Shopping => calculators::shopping(&profile.shopping, region, factors),
        }
    }

    /// Validates the profile, runs all five calculators and joins them.
    /// Any validation or numeric failure aborts the whole calculation.
    #[tracing::instrument(skip_all, fields(country = %profile.region()))]
    pub fn calculate(&self, profile: &LifestyleProfile, calculated_at: DateTime<Utc>) -> Result<FootprintResult> {
        profile.validate()?;

        let mut emissions = CategoryEmissions::default();
        for category in Category::ALL {
            let result = self.calculate_category(category, profile);
            debug!(%category, total = result.total, "category calculated");
            *emissions.get_mut(category) = result;
        }

        let footprint = aggregate::aggregate(emissions, calculated_at)?;
        info!(total = footprint.total_emissions, "footprint calculated");
        Ok(footprint)
    }

    pub fn calculate_now(&self, profile: &LifestyleProfile) -> Result<FootprintResult> {
        self.calculate(profile, Utc::now())
    }

    pub fn benchmarks(&self, country: &str, footprint: &FootprintResult) -> Benchmarks {
        self.config
            .benchmarks
            .benchmarks(country, footprint.total_emissions)
    }

    pub fn compare(&self, country: &str, footprint: &FootprintResult) -> BenchmarkComparison {
        self.config
            .benchmarks
            .compare(country, footprint.total_emissions)
    }

    pub fn assess(&self, profile: &LifestyleProfile, calculated_at: DateTime<Utc>) -> Result<Assessment> {
        let footprint = self.calculate(profile, calculated_at)?;
        let summary = aggregate::summarize(&footprint);
        let benchmarks = self.benchmarks(profile.region(), &footprint);
        Ok(Assessment {
            footprint,
            summary,
            benchmarks,
        })
    }

    pub fn simulate(&self, baseline: &FootprintResult, country: &str, changes: &ChangeSet) -> ScenarioOutcome {
        scenario::simulate(baseline, changes, &self.config.benchmarks, country)
    }

    pub fn reduction_potential(&self, footprint: &FootprintResult) -> Vec<ReductionPotential> {
        self.config.potentials.estimate(footprint)
    }

    /// Recomputes `affected` categories from the edited profile; the rest are
    /// carried over from `baseline` unchanged.
    pub fn recalculate(
        &self,
        baseline: &FootprintResult,
        edited: &LifestyleProfile,
        affected: &[Category],
        calculated_at: DateTime<Utc>,
    ) -> Result<Recalculation> {
        edited.validate()?;

        let mut emissions = baseline.emissions.clone();
        for &category in affected {
            *emissions.get_mut(category) = self.calculate_category(category, edited);
        }
        let footprint = aggregate::aggregate(emissions, calculated_at)?;

        let original = baseline.total_emissions;
        let modified = footprint.total_emissions;
        let reduction = original - modified;
        info!(original, modified, reduction, "recalculation complete");

        Ok(Recalculation {
            original,
            modified,
            reduction,
            reduction_percent: rounded_percent(reduction, original),
            footprint,
        })
    }
}
