//! Dashboard data: insights, goal progress and chart datasets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::{rounded_percent, summarize, FootprintSummary};
use crate::benchmark::Benchmarks;
use crate::error::FootprintError;
use crate::history::FootprintHistory;
use crate::potential::{PotentialTable, ReductionPotential};
use crate::scenario::{apply_preset, preset_scenarios, PresetScenario};
use crate::types::{Category, FootprintResult};

const TREND_WINDOW: usize = 12;
const PALETTE: [&str; 6] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    HighestCategory,
    BelowTarget,
    AboveTarget,
    PerPerson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

pub fn insights(footprint: &FootprintResult, global_target: f64, household_size: u32) -> Vec<Insight> {
    let total = footprint.total_emissions;
    let mut out = Vec::with_capacity(3);

    let (highest, value) = footprint.highest_category();
    out.push(Insight {
        kind: InsightKind::HighestCategory,
        title: format!("{} is your largest contributor", highest.label()),
        description: format!(
            "Accounting for {}% of your footprint",
            rounded_percent(value, total)
        ),
        value,
        category: Some(highest),
    });

    if total < global_target {
        let gap = global_target - total;
        out.push(Insight {
            kind: InsightKind::BelowTarget,
            title: "You're below the global target!".to_string(),
            description: format!(
                "Your footprint is {}% below the 2-ton target",
                rounded_percent(gap, global_target)
            ),
            value: gap,
            category: None,
        });
    } else {
        let excess = total - global_target;
        out.push(Insight {
            kind: InsightKind::AboveTarget,
            title: "Room for improvement".to_string(),
            description: format!(
                "You're {}% above the global target",
                rounded_percent(excess, global_target)
            ),
            value: excess,
            category: None,
        });
    }

    let per_person = total / f64::from(household_size.max(1));
    out.push(Insight {
        kind: InsightKind::PerPerson,
        title: "Per person footprint".to_string(),
        description: format!("{} kg CO2e per person in your household", per_person.round()),
        value: per_person,
        category: None,
    });

    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current: f64,
    pub target: f64,
    /// Percent, capped at 100. A zero footprint counts as fully achieved.
    pub progress: f64,
    pub remaining: f64,
    pub achieved: bool,
}

pub fn goal_progress(footprint: &FootprintResult, target: f64) -> GoalProgress {
    let current = footprint.total_emissions;
    let progress = if current == 0.0 {
        100.0
    } else {
        (target / current * 100.0).min(100.0)
    };
    GoalProgress {
        current,
        target,
        progress,
        remaining: (current - target).max(0.0),
        achieved: current <= target,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Colors {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Colors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chart {
    Data(ChartData),
    Unavailable { message: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Bar,
    Waterfall,
    Comparison,
    Trends,
    Scenarios,
}

impl FromStr for ChartKind {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pie" => Ok(ChartKind::Pie),
            "bar" => Ok(ChartKind::Bar),
            "waterfall" => Ok(ChartKind::Waterfall),
            "comparison" => Ok(ChartKind::Comparison),
            "trends" => Ok(ChartKind::Trends),
            "scenarios" => Ok(ChartKind::Scenarios),
            other => Err(FootprintError::invalid("chartType", format!("unknown chart type {other:?}"))),
        }
    }
}

fn palette(n: usize) -> Colors {
    Colors::Many(PALETTE.iter().cycle().take(n).map(|c| c.to_string()).collect())
}

fn category_labels(footprint: &FootprintResult) -> Vec<String> {
    footprint.emissions.iter().map(|(c, _)| c.label().to_string()).collect()
}

fn category_totals(footprint: &FootprintResult) -> Vec<f64> {
    footprint.emissions.iter().map(|(_, r)| r.total).collect()
}

pub fn pie_chart(footprint: &FootprintResult) -> ChartData {
    let data = category_totals(footprint);
    ChartData {
        labels: category_labels(footprint),
        datasets: vec![Dataset {
            label: None,
            background_color: Some(palette(data.len())),
            data,
            border_color: None,
            border_width: Some(2),
        }],
    }
}

pub fn bar_chart(footprint: &FootprintResult) -> ChartData {
    ChartData {
        labels: category_labels(footprint),
        datasets: vec![Dataset {
            label: Some("Emissions (kg CO2e)".to_string()),
            data: category_totals(footprint),
            background_color: Some(Colors::Single("#36A2EB".to_string())),
            border_color: Some("#1E88E5".to_string()),
            border_width: Some(1),
        }],
    }
}

/// Running total per category, then the grand total.
pub fn waterfall_chart(footprint: &FootprintResult) -> ChartData {
    let mut labels = category_labels(footprint);
    labels.push("Total".to_string());

    let mut running = 0.0;
    let mut data: Vec<f64> = category_totals(footprint)
        .into_iter()
        .map(|v| {
            running += v;
            running
        })
        .collect();
    data.push(footprint.total_emissions);

    ChartData {
        labels,
        datasets: vec![Dataset {
            label: Some("Cumulative Emissions".to_string()),
            data,
            background_color: Some(Colors::Single("#4BC0C0".to_string())),
            border_color: None,
            border_width: None,
        }],
    }
}

pub fn comparison_chart(footprint: &FootprintResult, benchmarks: &Benchmarks) -> ChartData {
    ChartData {
        labels: ["Your Footprint", "Local Average", "National Average", "Global Target"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        datasets: vec![Dataset {
            label: Some("Emissions (kg CO2e)".to_string()),
            data: vec![
                footprint.total_emissions,
                benchmarks.local_average,
                benchmarks.national_average,
                benchmarks.global_target,
            ],
            background_color: Some(palette(4)),
            border_color: None,
            border_width: Some(1),
        }],
    }
}

/// Last twelve calculations, oldest first. Needs at least two.
pub fn trends_chart(history: &FootprintHistory) -> Chart {
    let window = history.recent(TREND_WINDOW);
    if window.len() < 2 {
        return Chart::Unavailable {
            message: "Not enough data for trends".to_string(),
        };
    }
    Chart::Data(ChartData {
        labels: window
            .iter()
            .map(|r| r.result.calculated_at.format("%Y-%m-%d").to_string())
            .collect(),
        datasets: vec![Dataset {
            label: Some("Total Emissions (kg CO2e)".to_string()),
            data: window.iter().map(|r| r.result.total_emissions).collect(),
            background_color: Some(Colors::Single("rgba(54, 162, 235, 0.1)".to_string())),
            border_color: Some("#36A2EB".to_string()),
            border_width: None,
        }],
    })
}

pub fn scenarios_chart(footprint: &FootprintResult, scenarios: &[PresetScenario]) -> Chart {
    if scenarios.is_empty() {
        return Chart::Unavailable {
            message: "No scenarios available".to_string(),
        };
    }
    let mut labels = vec!["Current".to_string()];
    labels.extend(scenarios.iter().map(|s| s.name.clone()));
    let mut data = vec![footprint.total_emissions];
    data.extend(scenarios.iter().map(|s| s.new_total));

    Chart::Data(ChartData {
        datasets: vec![Dataset {
            label: Some("Emissions (kg CO2e)".to_string()),
            background_color: Some(palette(data.len())),
            data,
            border_color: None,
            border_width: Some(1),
        }],
        labels,
    })
}

pub fn preset_outcomes(footprint: &FootprintResult) -> Vec<PresetScenario> {
    preset_scenarios()
        .iter()
        .map(|p| apply_preset(footprint, p))
        .collect()
}

pub fn chart(
    kind: ChartKind,
    footprint: &FootprintResult,
    benchmarks: &Benchmarks,
    history: &FootprintHistory,
) -> Chart {
    match kind {
        ChartKind::Pie => Chart::Data(pie_chart(footprint)),
        ChartKind::Bar => Chart::Data(bar_chart(footprint)),
        ChartKind::Waterfall => Chart::Data(waterfall_chart(footprint)),
        ChartKind::Comparison => Chart::Data(comparison_chart(footprint, benchmarks)),
        ChartKind::Trends => trends_chart(history),
        ChartKind::Scenarios => scenarios_chart(footprint, &preset_outcomes(footprint)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: FootprintSummary,
    pub comparisons: Benchmarks,
    pub insights: Vec<Insight>,
    pub goals: GoalProgress,
    pub reduction_potential: Vec<ReductionPotential>,
    pub scenarios: Vec<PresetScenario>,
    pub trends: Chart,
}

pub fn build(
    footprint: &FootprintResult,
    benchmarks: &Benchmarks,
    household_size: u32,
    potentials: &PotentialTable,
    history: &FootprintHistory,
) -> Dashboard {
    Dashboard {
        summary: summarize(footprint),
        comparisons: benchmarks.clone(),
        insights: insights(footprint, benchmarks.global_target, household_size),
        goals: goal_progress(footprint, benchmarks.global_target),
        reduction_potential: potentials.estimate(footprint),
        scenarios: preset_outcomes(footprint),
        trends: trends_chart(history),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryEmissions, CategoryResult};
    use chrono::{TimeZone, Utc};

    fn footprint(food: f64, water: f64) -> FootprintResult {
        let mut e = CategoryEmissions::default();
        e.food = CategoryResult::new(food);
        e.water = CategoryResult::new(water);
        FootprintResult::from_emissions(e, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
    }

    fn benchmarks() -> Benchmarks {
        Benchmarks {
            local_average: 4800.0,
            national_average: 4800.0,
            global_target: 2000.0,
            percentile: 50,
        }
    }

    #[test]
    fn insights_name_highest_category_and_target_gap() {
        let f = footprint(2400.0, 600.0);
        let list = insights(&f, 2000.0, 2);
        assert_eq!(list[0].category, Some(Category::Food));
        assert_eq!(list[0].description, "Accounting for 80% of your footprint");
        assert_eq!(list[1].kind, InsightKind::AboveTarget);
        assert_eq!(list[1].value, 1000.0);
        assert_eq!(list[2].value, 1500.0);
    }

    #[test]
    fn goal_progress_handles_zero_footprint() {
        let g = goal_progress(&footprint(0.0, 0.0), 2000.0);
        assert_eq!(g.progress, 100.0);
        assert!(g.achieved);
        assert_eq!(g.remaining, 0.0);

        let g = goal_progress(&footprint(3000.0, 1000.0), 2000.0);
        assert_eq!(g.progress, 50.0);
        assert_eq!(g.remaining, 2000.0);
        assert!(!g.achieved);
    }

    #[test]
    fn waterfall_ends_with_total() {
        let f = footprint(300.0, 50.0);
        let chart = waterfall_chart(&f);
        assert_eq!(chart.labels.last().unwrap(), "Total");
        assert_eq!(chart.datasets[0].data, vec![0.0, 0.0, 300.0, 350.0, 350.0, 350.0]);
    }

    #[test]
    fn trends_need_two_records() {
        let mut h = FootprintHistory::new();
        h.record(footprint(1.0, 0.0), benchmarks());
        assert!(matches!(trends_chart(&h), Chart::Unavailable { .. }));

        let mut later = footprint(2.0, 0.0);
        later.calculated_at = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        h.record(later, benchmarks());
        match trends_chart(&h) {
            Chart::Data(d) => {
                assert_eq!(d.labels, vec!["2025-06-01", "2025-07-01"]);
                assert_eq!(d.datasets[0].data, vec![1.0, 2.0]);
            }
            Chart::Unavailable { .. } => panic!("expected trend data"),
        }
    }

    #[test]
    fn chart_kind_parses_case_insensitively() {
        assert_eq!("Pie".parse::<ChartKind>().unwrap(), ChartKind::Pie);
        assert!("radar".parse::<ChartKind>().is_err());
    }

    #[test]
    fn scenarios_chart_lists_presets() {
        let f = footprint(1000.0, 0.0);
        match chart(ChartKind::Scenarios, &f, &benchmarks(), &FootprintHistory::new()) {
            Chart::Data(d) => {
                assert_eq!(d.labels, vec!["Current", "Quick Wins", "Moderate Impact"]);
                assert_eq!(d.datasets[0].data[0], 1000.0);
            }
            Chart::Unavailable { .. } => panic!("expected scenario data"),
        }
    }
}
