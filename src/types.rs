use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five emission categories of a household footprint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Transportation,
    HomeEnergy,
    Food,
    Water,
    Shopping,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Transportation,
        Category::HomeEnergy,
        Category::Food,
        Category::Water,
        Category::Shopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::HomeEnergy => "homeEnergy",
            Category::Food => "food",
            Category::Water => "water",
            Category::Shopping => "shopping",
        }
    }

    /// Human-readable name for charts and insights.
    pub fn label(self) -> &'static str {
        match self {
            Category::Transportation => "Transportation",
            Category::HomeEnergy => "Home Energy",
            Category::Food => "Food",
            Category::Water => "Water",
            Category::Shopping => "Shopping",
        }
    }

    /// Case-insensitive name lookup; accepts `homeEnergy` and `home_energy`.
    pub fn from_name(name: &str) -> Option<Category> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == folded)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total and attributed sub-breakdown for one category, kg CO2e / year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub total: f64,
    pub breakdown: BTreeMap<String, f64>,
}

impl CategoryResult {
    pub fn new(total: f64) -> Self {
        CategoryResult {
            total,
            breakdown: BTreeMap::new(),
        }
    }

    pub fn with_part(mut self, name: &str, value: f64) -> Self {
        self.breakdown.insert(name.to_string(), value);
        self
    }

    /// Adds a part computed as a fixed share of the total.
    pub fn with_share(self, name: &str, fraction: f64) -> Self {
        let value = self.total * fraction;
        self.with_part(name, value)
    }
}

/// Per-category results, one field per [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEmissions {
    pub transportation: CategoryResult,
    pub home_energy: CategoryResult,
    pub food: CategoryResult,
    pub water: CategoryResult,
    pub shopping: CategoryResult,
}

impl CategoryEmissions {
    pub fn get(&self, category: Category) -> &CategoryResult {
        match category {
            Category::Transportation => &self.transportation,
            Category::HomeEnergy => &self.home_energy,
            Category::Food => &self.food,
            Category::Water => &self.water,
            Category::Shopping => &self.shopping,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryResult {
        match category {
            Category::Transportation => &mut self.transportation,
            Category::HomeEnergy => &mut self.home_energy,
            Category::Food => &mut self.food,
            Category::Water => &mut self.water,
            Category::Shopping => &mut self.shopping,
        }
    }

    /// Iterates in the fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryResult)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Sum of category totals, always in [`Category::ALL`] order.
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, r)| r.total).sum()
    }
}

/// A computed household footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintResult {
    pub total_emissions: f64,
    pub emissions: CategoryEmissions,
    pub calculated_at: DateTime<Utc>,
}

impl FootprintResult {
    /// Builds a result whose total is derived from the categories.
    pub fn from_emissions(emissions: CategoryEmissions, calculated_at: DateTime<Utc>) -> Self {
        FootprintResult {
            total_emissions: emissions.sum(),
            emissions,
            calculated_at,
        }
    }

    pub fn category_total(&self, category: Category) -> f64 {
        self.emissions.get(category).total
    }

    /// Category with the largest total; ties keep the earlier category.
    pub fn highest_category(&self) -> (Category, f64) {
        self.emissions
            .iter()
            .fold((Category::Transportation, f64::MIN), |best, (c, r)| {
                if r.total > best.1 {
                    (c, r.total)
                } else {
                    best
                }
            })
    }
}
