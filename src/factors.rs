//! Emission factor table and unit conversion constants.
//!
//! Factors are addressed by (category, subcategory, activity, region). A lookup
//! never fails: missing keys fall back to the subcategory default and then to
//! zero. Grid electricity is scaled by a per-country mix multiplier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};

/// Activity units understood by [`FactorTable::emissions`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Km,
    Miles,
    Liter,
    Gallon,
    Kg,
    Pound,
    Kwh,
    Item,
    Meal,
}

impl Unit {
    /// Multiplier converting this unit into its base unit (km, liter, kg).
    pub fn to_base(self) -> f64 {
        match self {
            Unit::Miles => 1.60934,
            Unit::Gallon => 3.78541,
            Unit::Pound => 0.453592,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub category: String,
    pub subcategory: String,
    pub activity: String,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// kg CO2e per unit.
    pub value: f64,
}

/// Fallback for activities missing under a (category, subcategory) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryDefault {
    pub category: String,
    pub subcategory: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorTable {
    pub version: String,
    pub factors: Vec<EmissionFactor>,
    #[serde(default)]
    pub defaults: Vec<SubcategoryDefault>,
    /// Lowercase country -> multiplier on the grid electricity factor.
    #[serde(default)]
    pub grid_multipliers: BTreeMap<String, f64>,
}

pub const GRID_CATEGORY: &str = "energy";
pub const GRID_SUBCATEGORY: &str = "electricity";
pub const GRID_ACTIVITY: &str = "grid";

fn factor(category: &str, subcategory: &str, activity: &str, unit: Unit, value: f64) -> EmissionFactor {
    EmissionFactor {
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        activity: activity.to_string(),
        unit,
        region: None,
        value,
    }
}

fn fallback(category: &str, subcategory: &str, value: f64) -> SubcategoryDefault {
    SubcategoryDefault {
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        value,
    }
}

impl Default for FactorTable {
    fn default() -> Self {
        let factors = vec![
            factor("transportation", "car", "petrol", Unit::Km, 0.192),
            factor("transportation", "car", "diesel", Unit::Km, 0.171),
            factor("transportation", "car", "hybrid", Unit::Km, 0.108),
            factor("transportation", "car", "electric", Unit::Km, 0.053),
            factor("transportation", "car", "unknown", Unit::Km, 0.180),
            factor("transportation", "publicTransport", "average", Unit::Km, 0.050),
            factor("transportation", "publicTransport", "bus", Unit::Km, 0.089),
            factor("transportation", "publicTransport", "train", Unit::Km, 0.041),
            factor("transportation", "publicTransport", "metro", Unit::Km, 0.033),
            factor("transportation", "active", "bicycle", Unit::Km, 0.0),
            factor("transportation", "active", "walking", Unit::Km, 0.0),
            factor(GRID_CATEGORY, GRID_SUBCATEGORY, GRID_ACTIVITY, Unit::Kwh, 0.309),
            factor(GRID_CATEGORY, GRID_SUBCATEGORY, "renewable", Unit::Kwh, 0.013),
            factor("energy", "heating", "naturalGas", Unit::Kwh, 0.185),
            factor("food", "meal", "meat", Unit::Meal, 7.5),
            factor("food", "meal", "vegetarian", Unit::Meal, 1.5),
            factor("food", "meal", "vegan", Unit::Meal, 0.9),
            factor("water", "supply", "liter", Unit::Liter, 0.001),
            factor("shopping", "clothing", "averageItem", Unit::Item, 15.0),
            factor("shopping", "electronics", "averageDevice", Unit::Item, 200.0),
        ];

        let defaults = vec![
            fallback("transportation", "car", 0.180),
            fallback("transportation", "publicTransport", 0.050),
            fallback("food", "meal", 7.5),
        ];

        let grid_multipliers = [
            ("norway", 0.05),
            ("france", 0.19),
            ("germany", 1.45),
            ("india", 2.32),
            ("china", 2.10),
            ("usa", 1.0),
            ("uk", 0.74),
            ("japan", 1.54),
            ("brazil", 0.24),
            ("australia", 2.06),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        FactorTable {
            version: "2024.1".to_string(),
            factors,
            defaults,
            grid_multipliers,
        }
    }
}

fn region_matches(entry: &Option<String>, region: &str) -> bool {
    match entry {
        Some(r) => r.eq_ignore_ascii_case(region),
        None => false,
    }
}

impl FactorTable {
    /// Resolves a factor, never failing.
    ///
    /// Order: region-specific entry, region-less entry (grid electricity then
    /// scaled by the country multiplier), subcategory default, zero.
    pub fn lookup(&self, category: &str, subcategory: &str, activity: &str, region: &str) -> f64 {
        let matching: Vec<&EmissionFactor> = self
            .factors
            .iter()
            .filter(|f| f.category == category && f.subcategory == subcategory && f.activity == activity)
            .collect();
        if let Some(f) = matching.iter().find(|f| region_matches(&f.region, region)) {
            return f.value;
        }
        if let Some(f) = matching.iter().find(|f| f.region.is_none()) {
            // Only grid electricity follows the country mix. Renewable and
            // other electricity activities keep their flat value everywhere.
            if category == GRID_CATEGORY && subcategory == GRID_SUBCATEGORY && activity == GRID_ACTIVITY {
                return f.value * self.grid_multiplier(region);
            }
            return f.value;
        }

        self.defaults
            .iter()
            .find(|d| d.category == category && d.subcategory == subcategory)
            .map(|d| d.value)
            .unwrap_or(0.0)
    }

    /// Country grid-mix multiplier; unknown countries use 1.0.
    pub fn grid_multiplier(&self, region: &str) -> f64 {
        self.grid_multipliers
            .get(&region.trim().to_lowercase())
            .copied()
            .unwrap_or(1.0)
    }

    /// `amount` in `unit`, converted to the base unit, times the resolved factor.
    pub fn emissions(
        &self,
        amount: f64,
        unit: Unit,
        category: &str,
        subcategory: &str,
        activity: &str,
        region: &str,
    ) -> f64 {
        amount * unit.to_base() * self.lookup(category, subcategory, activity, region)
    }

    pub fn validate(&self) -> Result<()> {
        for f in &self.factors {
            if !f.value.is_finite() || f.value < 0.0 {
                return Err(FootprintError::Config(format!(
                    "factor {}/{}/{} must be a non-negative number",
                    f.category, f.subcategory, f.activity
                )));
            }
        }
        for d in &self.defaults {
            if !d.value.is_finite() || d.value < 0.0 {
                return Err(FootprintError::Config(format!(
                    "default {}/{} must be a non-negative number",
                    d.category, d.subcategory
                )));
            }
        }
        for (region, m) in &self.grid_multipliers {
            if !m.is_finite() || *m < 0.0 {
                return Err(FootprintError::Config(format!(
                    "grid multiplier for {region} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}
