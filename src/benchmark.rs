use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};

/// Display ranking of an absolute yearly footprint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactCategory {
    #[serde(rename = "Climate Hero")]
    ClimateHero,
    #[serde(rename = "Low Impact")]
    LowImpact,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "High Impact")]
    HighImpact,
    #[serde(rename = "Very High Impact")]
    VeryHighImpact,
}

impl ImpactCategory {
    pub fn label(self) -> &'static str {
        match self {
            ImpactCategory::ClimateHero => "Climate Hero",
            ImpactCategory::LowImpact => "Low Impact",
            ImpactCategory::Average => "Average",
            ImpactCategory::HighImpact => "High Impact",
            ImpactCategory::VeryHighImpact => "Very High Impact",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ImpactCategory::ClimateHero => "Outstanding! You are well below the global target.",
            ImpactCategory::LowImpact => "Great job! You have a low carbon footprint.",
            ImpactCategory::Average => "You are around average. There is room for improvement.",
            ImpactCategory::HighImpact => {
                "Your footprint is above average. Consider our recommendations."
            }
            ImpactCategory::VeryHighImpact => {
                "Your footprint is significantly high. Urgent action recommended."
            }
        }
    }
}

impl fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Emissions at or below `max_ratio * average` rank at `percentile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileTier {
    pub max_ratio: f64,
    pub percentile: u8,
}

/// Emissions strictly below `below` get `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactThreshold {
    pub below: f64,
    pub category: ImpactCategory,
}

/// Reference averages for one footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmarks {
    pub local_average: f64,
    pub national_average: f64,
    pub global_target: f64,
    pub percentile: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub category: ImpactCategory,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub user_footprint: f64,
    pub comparisons: Benchmarks,
    pub ranking: Ranking,
}

/// Ranking semantics, kept as a seam so alternative tables can be swapped in.
pub trait FootprintRanking {
    /// Five-tier step function against a regional average.
    fn percentile(&self, emissions: f64, average: f64) -> u8;
    /// Threshold ladder on the absolute total.
    fn classify(&self, emissions: f64) -> ImpactCategory;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkTable {
    /// Lowercase country -> kg CO2e / year.
    pub averages: BTreeMap<String, f64>,
    pub default_average: f64,
    pub global_target: f64,
    /// Ascending by `max_ratio`.
    pub percentile_tiers: Vec<PercentileTier>,
    /// Percentile above the last tier.
    pub floor_percentile: u8,
    /// Ascending by `below`.
    pub impact_ladder: Vec<ImpactThreshold>,
    /// Category at or above the last threshold.
    pub top_category: ImpactCategory,
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        let averages = [
            ("usa", 16000.0),
            ("uk", 8500.0),
            ("germany", 9600.0),
            ("france", 6800.0),
            ("china", 7500.0),
            ("india", 1900.0),
            ("japan", 9500.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let tier = |max_ratio, percentile| PercentileTier {
            max_ratio,
            percentile,
        };
        let step = |below, category| ImpactThreshold { below, category };

        BenchmarkTable {
            averages,
            default_average: 4800.0,
            global_target: 2000.0,
            percentile_tiers: vec![tier(0.5, 90), tier(0.75, 70), tier(1.0, 50), tier(1.25, 30)],
            floor_percentile: 10,
            impact_ladder: vec![
                step(2000.0, ImpactCategory::ClimateHero),
                step(4000.0, ImpactCategory::LowImpact),
                step(8000.0, ImpactCategory::Average),
                step(12000.0, ImpactCategory::HighImpact),
            ],
            top_category: ImpactCategory::VeryHighImpact,
        }
    }
}

impl FootprintRanking for BenchmarkTable {
    fn percentile(&self, emissions: f64, average: f64) -> u8 {
        self.percentile_tiers
            .iter()
            .find(|t| emissions <= average * t.max_ratio)
            .map(|t| t.percentile)
            .unwrap_or(self.floor_percentile)
    }

    fn classify(&self, emissions: f64) -> ImpactCategory {
        self.impact_ladder
            .iter()
            .find(|s| emissions < s.below)
            .map(|s| s.category)
            .unwrap_or(self.top_category)
    }
}

impl BenchmarkTable {
    /// Case-insensitive; unknown countries use `default_average`.
    pub fn local_average(&self, country: &str) -> f64 {
        self.averages
            .get(&country.trim().to_lowercase())
            .copied()
            .unwrap_or(self.default_average)
    }

    /// No separate national table exists; national tracks local.
    pub fn national_average(&self, country: &str) -> f64 {
        self.local_average(country)
    }

    pub fn benchmarks(&self, country: &str, emissions: f64) -> Benchmarks {
        let local_average = self.local_average(country);
        Benchmarks {
            local_average,
            national_average: self.national_average(country),
            global_target: self.global_target,
            percentile: self.percentile(emissions, local_average),
        }
    }

    pub fn ranking(&self, emissions: f64) -> Ranking {
        let category = self.classify(emissions);
        Ranking {
            category,
            message: category.message().to_string(),
        }
    }

    pub fn compare(&self, country: &str, emissions: f64) -> BenchmarkComparison {
        BenchmarkComparison {
            user_footprint: emissions,
            comparisons: self.benchmarks(country, emissions),
            ranking: self.ranking(emissions),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(FootprintError::Config(format!("{name} must be a positive number")))
            }
        };
        positive("defaultAverage", self.default_average)?;
        positive("globalTarget", self.global_target)?;
        for (country, avg) in &self.averages {
            positive(&format!("averages.{country}"), *avg)?;
        }
        if self
            .percentile_tiers
            .windows(2)
            .any(|w| w[0].max_ratio >= w[1].max_ratio)
        {
            return Err(FootprintError::Config(
                "percentileTiers must be strictly ascending by maxRatio".to_string(),
            ));
        }
        if self.impact_ladder.windows(2).any(|w| w[0].below >= w[1].below) {
            return Err(FootprintError::Config(
                "impactLadder must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_boundaries_are_inclusive() {
        let t = BenchmarkTable::default();
        assert_eq!(t.percentile(2400.0, 4800.0), 90);
        assert_eq!(t.percentile(2401.0, 4800.0), 70);
        assert_eq!(t.percentile(3600.0, 4800.0), 70);
        assert_eq!(t.percentile(4800.0, 4800.0), 50);
        assert_eq!(t.percentile(6000.0, 4800.0), 30);
        assert_eq!(t.percentile(6000.5, 4800.0), 10);
        assert_eq!(t.percentile(0.0, 4800.0), 90);
    }

    #[test]
    fn impact_ladder_upper_bound_is_exclusive() {
        let t = BenchmarkTable::default();
        assert_eq!(t.classify(1999.99), ImpactCategory::ClimateHero);
        assert_eq!(t.classify(2000.0), ImpactCategory::LowImpact);
        assert_eq!(t.classify(7999.0), ImpactCategory::Average);
        assert_eq!(t.classify(11999.0), ImpactCategory::HighImpact);
        assert_eq!(t.classify(12000.0), ImpactCategory::VeryHighImpact);
    }

    #[test]
    fn averages_are_case_insensitive_with_default() {
        let t = BenchmarkTable::default();
        assert_eq!(t.local_average("USA"), 16000.0);
        assert_eq!(t.local_average(" India "), 1900.0);
        assert_eq!(t.local_average("Narnia"), 4800.0);
        let b = t.benchmarks("uk", 4250.0);
        assert_eq!(b.national_average, 8500.0);
        assert_eq!(b.global_target, 2000.0);
        assert_eq!(b.percentile, 90);
    }

    #[test]
    fn ranking_serializes_with_display_label() {
        let t = BenchmarkTable::default();
        let json = serde_json::to_value(t.ranking(500.0)).unwrap();
        assert_eq!(json["category"], "Climate Hero");
    }

    #[test]
    fn validate_rejects_unordered_tiers() {
        let mut t = BenchmarkTable::default();
        t.percentile_tiers.swap(0, 1);
        assert!(t.validate().is_err());
        assert!(BenchmarkTable::default().validate().is_ok());
    }
}
