use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculators::DAYS_PER_YEAR;
use crate::error::{FootprintError, Result};
use crate::types::{Category, CategoryEmissions, CategoryResult, FootprintResult};

/// `numerator / denominator`, with 0/0 and x/0 defined as 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `part` as a whole-number percentage of `whole`; 0 when `whole` is 0.
pub fn rounded_percent(part: f64, whole: f64) -> f64 {
    (safe_ratio(part, whole) * 100.0).round()
}

/// One category's slice of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: Category,
    pub value: f64,
    pub percentage: f64,
}

/// Totals and rates derived from a footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintSummary {
    pub total_emissions: f64,
    pub daily_average: f64,
    pub monthly_average: f64,
    pub yearly_total: f64,
    pub categories: Vec<CategoryShare>,
}

fn check_value(category: Category, what: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FootprintError::Computation {
            category,
            detail: format!("{what} is not finite ({value})"),
        });
    }
    if value < 0.0 {
        return Err(FootprintError::Computation {
            category,
            detail: format!("{what} is negative ({value})"),
        });
    }
    Ok(())
}

/// Numeric invariant check for one category result.
pub fn check_category(category: Category, result: &CategoryResult) -> Result<()> {
    check_value(category, "total", result.total)?;
    for (name, value) in &result.breakdown {
        check_value(category, &format!("breakdown.{name}"), *value)?;
    }
    Ok(())
}

/// Joins the five category results into a footprint. Fails if any category
/// carries a negative or non-finite value.
pub fn aggregate(emissions: CategoryEmissions, calculated_at: DateTime<Utc>) -> Result<FootprintResult> {
    for (category, result) in emissions.iter() {
        check_category(category, result)?;
    }
    Ok(FootprintResult::from_emissions(emissions, calculated_at))
}

pub fn summarize(footprint: &FootprintResult) -> FootprintSummary {
    let total = footprint.total_emissions;
    let categories = footprint
        .emissions
        .iter()
        .map(|(category, r)| CategoryShare {
            category,
            value: r.total,
            percentage: safe_ratio(r.total, total) * 100.0,
        })
        .collect();

    FootprintSummary {
        total_emissions: total,
        daily_average: total / DAYS_PER_YEAR,
        monthly_average: total / 12.0,
        yearly_total: total,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn total_is_sum_of_categories() {
        let mut e = CategoryEmissions::default();
        e.transportation = CategoryResult::new(1000.0);
        e.food = CategoryResult::new(250.5);
        e.shopping = CategoryResult::new(0.25);
        let f = aggregate(e, at()).unwrap();
        assert_eq!(f.total_emissions, 1000.0 + 0.0 + 250.5 + 0.0 + 0.25);

        let s = summarize(&f);
        assert!((s.daily_average - f.total_emissions / 365.0).abs() < 1e-12);
        assert!((s.monthly_average - f.total_emissions / 12.0).abs() < 1e-12);
        let pct: f64 = s.categories.iter().map(|c| c.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_has_zero_shares() {
        let f = aggregate(CategoryEmissions::default(), at()).unwrap();
        let s = summarize(&f);
        assert_eq!(s.daily_average, 0.0);
        assert!(s.categories.iter().all(|c| c.percentage == 0.0));
    }

    #[test]
    fn nan_and_negative_are_computation_errors() {
        let mut e = CategoryEmissions::default();
        e.water = CategoryResult::new(f64::NAN);
        let err = aggregate(e, at()).unwrap_err();
        assert!(matches!(
            err,
            FootprintError::Computation {
                category: Category::Water,
                ..
            }
        ));

        let mut e = CategoryEmissions::default();
        e.food = CategoryResult::new(10.0).with_part("waste", -1.0);
        assert!(aggregate(e, at()).is_err());
    }
}
