//! What-if simulation over a computed footprint. Never mutates the baseline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::{rounded_percent, safe_ratio};
use crate::benchmark::{BenchmarkTable, FootprintRanking, ImpactCategory};
use crate::types::{Category, FootprintResult};

/// A reduction applied to one category: absolute kg CO2e, or a percentage of
/// the category's current total.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reduction {
    Absolute(f64),
    Percentage { percentage: f64 },
}

impl Reduction {
    /// Amount to subtract from `current`. Negative or non-finite requests
    /// reduce nothing.
    pub fn amount(&self, current: f64) -> f64 {
        let raw = match *self {
            Reduction::Absolute(kg) => kg,
            Reduction::Percentage { percentage } => current * (percentage / 100.0),
        };
        if raw.is_finite() && raw > 0.0 {
            raw
        } else {
            0.0
        }
    }
}

/// Per-category changes keyed by category name on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Reduction>",
    into = "BTreeMap<String, Reduction>"
)]
pub struct ChangeSet {
    changes: BTreeMap<Category, Reduction>,
    ignored: Vec<String>,
}

impl From<BTreeMap<String, Reduction>> for ChangeSet {
    fn from(raw: BTreeMap<String, Reduction>) -> Self {
        ChangeSet::from_named(raw)
    }
}

impl From<ChangeSet> for BTreeMap<String, Reduction> {
    fn from(set: ChangeSet) -> Self {
        set.changes
            .into_iter()
            .map(|(c, r)| (c.as_str().to_string(), r))
            .collect()
    }
}

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet::default()
    }

    pub fn with(mut self, category: Category, reduction: Reduction) -> Self {
        self.changes.insert(category, reduction);
        self
    }

    /// Builds a change set from names; unrecognised names are kept aside and
    /// have no effect.
    pub fn from_named<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Reduction)>,
        S: AsRef<str>,
    {
        let mut set = ChangeSet::default();
        for (name, reduction) in entries {
            match Category::from_name(name.as_ref()) {
                Some(category) => {
                    set.changes.insert(category, reduction);
                }
                None => {
                    warn!(category = name.as_ref(), "ignoring change for unknown category");
                    set.ignored.push(name.as_ref().to_string());
                }
            }
        }
        set
    }

    /// Same percentage on every category.
    pub fn uniform(percentage: f64) -> Self {
        Category::ALL
            .into_iter()
            .fold(ChangeSet::new(), |set, c| set.with(c, Reduction::Percentage { percentage }))
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Reduction)> + '_ {
        self.changes.iter().map(|(c, r)| (*c, r))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChange {
    pub category: Category,
    pub original: f64,
    pub simulated: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub original: f64,
    pub simulated: f64,
    pub reduction: f64,
    pub reduction_percent: f64,
    pub changes: ChangeSet,
    pub new_category: ImpactCategory,
    pub new_percentile: u8,
    pub breakdown: Vec<CategoryChange>,
}

/// Applies `changes` to a copy of `baseline`.
///
/// Each affected category becomes `max(0, total - amount)`; its breakdown is
/// scaled by the same ratio. The grand total is re-summed over all categories.
pub fn apply_changes(baseline: &FootprintResult, changes: &ChangeSet) -> FootprintResult {
    let mut emissions = baseline.emissions.clone();
    for (category, reduction) in changes.iter() {
        let result = emissions.get_mut(category);
        let old = result.total;
        let new = (old - reduction.amount(old)).max(0.0);
        let scale = safe_ratio(new, old);
        for value in result.breakdown.values_mut() {
            *value *= scale;
        }
        result.total = new;
        debug!(%category, old, new, "scenario change applied");
    }
    FootprintResult::from_emissions(emissions, baseline.calculated_at)
}

pub fn simulate(
    baseline: &FootprintResult,
    changes: &ChangeSet,
    table: &BenchmarkTable,
    country: &str,
) -> ScenarioOutcome {
    let simulated = apply_changes(baseline, changes);

    let original = baseline.total_emissions;
    let reduction = original - simulated.total_emissions;

    let breakdown = baseline
        .emissions
        .iter()
        .map(|(category, r)| {
            let after = simulated.category_total(category);
            CategoryChange {
                category,
                original: r.total,
                simulated: after,
                change: r.total - after,
            }
        })
        .collect();

    ScenarioOutcome {
        original,
        simulated: simulated.total_emissions,
        reduction,
        reduction_percent: rounded_percent(reduction, original),
        changes: changes.clone(),
        new_category: table.classify(simulated.total_emissions),
        new_percentile: table.percentile(simulated.total_emissions, table.local_average(country)),
        breakdown,
    }
}

/// Canned uniform-reduction scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPreset {
    pub name: String,
    pub description: String,
    pub timeframe: String,
    pub percentage: f64,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetScenario {
    pub name: String,
    pub description: String,
    pub timeframe: String,
    pub new_total: f64,
    pub reduction: f64,
    pub reduction_percent: f64,
    pub actions: Vec<String>,
}

pub fn preset_scenarios() -> Vec<ScenarioPreset> {
    vec![
        ScenarioPreset {
            name: "Quick Wins".to_string(),
            description: "Easy changes you can make today".to_string(),
            timeframe: "0-3 months".to_string(),
            percentage: 10.0,
            actions: vec![
                "Switch to LED bulbs".to_string(),
                "Reduce meat consumption by 1 day per week".to_string(),
            ],
        },
        ScenarioPreset {
            name: "Moderate Impact".to_string(),
            description: "Achievable changes over 6 months".to_string(),
            timeframe: "3-6 months".to_string(),
            percentage: 25.0,
            actions: vec![
                "Install smart thermostat".to_string(),
                "Carpool 2 days per week".to_string(),
            ],
        },
    ]
}

pub fn apply_preset(baseline: &FootprintResult, preset: &ScenarioPreset) -> PresetScenario {
    let simulated = apply_changes(baseline, &ChangeSet::uniform(preset.percentage));
    let reduction = baseline.total_emissions - simulated.total_emissions;
    PresetScenario {
        name: preset.name.clone(),
        description: preset.description.clone(),
        timeframe: preset.timeframe.clone(),
        new_total: simulated.total_emissions,
        reduction,
        reduction_percent: rounded_percent(reduction, baseline.total_emissions),
        actions: preset.actions.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryEmissions, CategoryResult};
    use chrono::{TimeZone, Utc};

    fn baseline() -> FootprintResult {
        let mut e = CategoryEmissions::default();
        e.transportation = CategoryResult::new(1000.0)
            .with_part("commute", 800.0)
            .with_part("additionalTravel", 200.0);
        e.home_energy = CategoryResult::new(600.0);
        e.food = CategoryResult::new(2000.0);
        e.water = CategoryResult::new(60.0);
        e.shopping = CategoryResult::new(340.0);
        FootprintResult::from_emissions(e, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn empty_change_set_is_noop() {
        let b = baseline();
        let out = simulate(&b, &ChangeSet::new(), &BenchmarkTable::default(), "global");
        assert_eq!(out.reduction, 0.0);
        assert_eq!(out.simulated, out.original);
        assert_eq!(out.reduction_percent, 0.0);
    }

    #[test]
    fn oversized_reduction_clamps_category_at_zero() {
        let b = baseline();
        let changes = ChangeSet::new().with(Category::Water, Reduction::Absolute(5000.0));
        let out = simulate(&b, &changes, &BenchmarkTable::default(), "global");
        let water = out.breakdown.iter().find(|c| c.category == Category::Water).unwrap();
        assert_eq!(water.simulated, 0.0);
        assert_eq!(out.reduction, 60.0);
    }

    #[test]
    fn percentage_reduction_scales_breakdown() {
        let b = baseline();
        let changes = ChangeSet::new().with(
            Category::Transportation,
            Reduction::Percentage { percentage: 50.0 },
        );
        let after = apply_changes(&b, &changes);
        assert_eq!(after.emissions.transportation.total, 500.0);
        assert_eq!(after.emissions.transportation.breakdown["commute"], 400.0);
        assert_eq!(after.total_emissions, 3500.0);
        // Baseline untouched.
        assert_eq!(b.total_emissions, 4000.0);
    }

    #[test]
    fn negative_reduction_is_ignored() {
        let b = baseline();
        let changes = ChangeSet::new().with(Category::Food, Reduction::Absolute(-300.0));
        let out = simulate(&b, &changes, &BenchmarkTable::default(), "global");
        assert_eq!(out.reduction, 0.0);
    }

    #[test]
    fn wire_format_accepts_numbers_and_percentages() {
        let raw = r#"{"transportation": 200, "homeEnergy": {"percentage": 50}, "pets": 10}"#;
        let changes: ChangeSet = serde_json::from_str(raw).unwrap();
        assert_eq!(changes.ignored(), &["pets".to_string()]);
        let out = simulate(&baseline(), &changes, &BenchmarkTable::default(), "global");
        assert_eq!(out.simulated, 4000.0 - 200.0 - 300.0);
        assert_eq!(out.reduction_percent, 13.0);
        assert_eq!(out.new_category, ImpactCategory::LowImpact);
        // 3500 <= 0.75 * 4800
        assert_eq!(out.new_percentile, 70);
    }

    #[test]
    fn reduction_percent_rounds_half_up() {
        let b = baseline();
        let changes = ChangeSet::new().with(Category::Food, Reduction::Absolute(500.0));
        let out = simulate(&b, &changes, &BenchmarkTable::default(), "global");
        assert_eq!(out.reduction, 500.0);
        assert_eq!(out.reduction_percent, 13.0);

        let changes = ChangeSet::new().with(Category::Food, Reduction::Absolute(490.0));
        let out = simulate(&b, &changes, &BenchmarkTable::default(), "global");
        assert_eq!(out.reduction_percent, 12.0);
    }

    #[test]
    fn presets_apply_uniform_reductions() {
        let b = baseline();
        let presets = preset_scenarios();
        let quick = apply_preset(&b, &presets[0]);
        assert!((quick.new_total - 3600.0).abs() < 1e-9);
        assert_eq!(quick.reduction_percent, 10.0);
        let moderate = apply_preset(&b, &presets[1]);
        assert!((moderate.new_total - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_baseline_has_zero_reduction_percent() {
        let b = FootprintResult::from_emissions(
            CategoryEmissions::default(),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        );
        let changes = ChangeSet::uniform(50.0);
        let out = simulate(&b, &changes, &BenchmarkTable::default(), "global");
        assert_eq!(out.reduction_percent, 0.0);
        assert_eq!(out.simulated, 0.0);
    }
}
