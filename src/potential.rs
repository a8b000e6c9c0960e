use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};
use crate::types::{Category, FootprintResult};

/// Maximum theoretical reduction for one category and the levers behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialRule {
    pub fraction: f64,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReductionPotential {
    pub category: String,
    pub current: f64,
    pub max_reduction: f64,
    /// Percent, rounded.
    pub potential: u32,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialTable {
    pub transportation: PotentialRule,
    pub home_energy: PotentialRule,
    pub food: PotentialRule,
    pub water: PotentialRule,
    pub shopping: PotentialRule,
    /// Used for category names outside the known five.
    pub fallback: PotentialRule,
}

fn rule(fraction: f64, actions: &[&str]) -> PotentialRule {
    PotentialRule {
        fraction,
        actions: actions.iter().map(|a| a.to_string()).collect(),
    }
}

impl Default for PotentialTable {
    fn default() -> Self {
        PotentialTable {
            transportation: rule(
                0.8,
                &["Switch to electric vehicle", "Use public transport", "Work from home"],
            ),
            home_energy: rule(
                0.7,
                &["Switch to renewable energy", "Improve insulation", "Energy-efficient appliances"],
            ),
            food: rule(0.6, &["Plant-based diet", "Reduce food waste", "Local sourcing"]),
            water: rule(
                0.5,
                &["Shorter showers", "Water-efficient fixtures", "Reduce hot water use"],
            ),
            shopping: rule(
                0.7,
                &["Buy less", "Choose durable goods", "Repair instead of replace"],
            ),
            fallback: rule(0.3, &["General reduction measures"]),
        }
    }
}

impl PotentialTable {
    pub fn rule(&self, category: Category) -> &PotentialRule {
        match category {
            Category::Transportation => &self.transportation,
            Category::HomeEnergy => &self.home_energy,
            Category::Food => &self.food,
            Category::Water => &self.water,
            Category::Shopping => &self.shopping,
        }
    }

    /// Potential for a category given by name; unknown names use the fallback rule.
    pub fn estimate_named(&self, name: &str, current: f64) -> ReductionPotential {
        let rule = Category::from_name(name)
            .map(|c| self.rule(c))
            .unwrap_or(&self.fallback);
        ReductionPotential {
            category: name.to_string(),
            current,
            max_reduction: current * rule.fraction,
            potential: (rule.fraction * 100.0).round() as u32,
            actions: rule.actions.clone(),
        }
    }

    /// One entry per category, in category order.
    pub fn estimate(&self, footprint: &FootprintResult) -> Vec<ReductionPotential> {
        footprint
            .emissions
            .iter()
            .map(|(c, r)| self.estimate_named(c.as_str(), r.total))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let rules = Category::ALL
            .into_iter()
            .map(|c| (c.as_str(), self.rule(c)))
            .chain(std::iter::once(("fallback", &self.fallback)));
        for (name, rule) in rules {
            if !(0.0..=1.0).contains(&rule.fraction) {
                return Err(FootprintError::Config(format!(
                    "potential fraction for {name} must be between 0.0 and 1.0"
                )));
            }
        }
        Ok(())
    }
}
