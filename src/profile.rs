//! Typed lifestyle profile, the only input the calculators accept.

use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    PublicTransport,
    Bike,
    Walking,
    WorkFromHome,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl VehicleType {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Petrol => "petrol",
            VehicleType::Diesel => "diesel",
            VehicleType::Electric => "electric",
            VehicleType::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeType {
    Apartment,
    House,
    Shared,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingType {
    Led,
    Cfl,
    Traditional,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Vegetarian,
    NonVegetarian,
    Vegan,
    Pescatarian,
}

impl DietType {
    /// Activity key used in the factor table.
    pub fn activity(self) -> &'static str {
        match self {
            DietType::Vegetarian => "vegetarian",
            DietType::NonVegetarian => "meat",
            DietType::Vegan => "vegan",
            DietType::Pescatarian => "pescatarian",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodWaste {
    Minimal,
    #[default]
    Moderate,
    Significant,
}

impl FoodWaste {
    pub fn multiplier(self) -> f64 {
        match self {
            FoodWaste::Minimal => 1.05,
            FoodWaste::Moderate => 1.15,
            FoodWaste::Significant => 1.3,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClothingFrequency {
    Monthly,
    Quarterly,
    Biannually,
    Annually,
}

impl ClothingFrequency {
    /// Items bought per year, three per shopping trip.
    pub fn items_per_year(self) -> f64 {
        match self {
            ClothingFrequency::Monthly => 36.0,
            ClothingFrequency::Quarterly => 12.0,
            ClothingFrequency::Biannually => 6.0,
            ClothingFrequency::Annually => 3.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElectronicsUpgrade {
    #[serde(rename = "yearly")]
    Yearly,
    #[default]
    #[serde(rename = "every_2_years")]
    EveryTwoYears,
    #[serde(rename = "every_3_years")]
    EveryThreeYears,
    #[serde(rename = "longer")]
    Longer,
}

impl ElectronicsUpgrade {
    pub fn devices_per_year(self) -> f64 {
        match self {
            ElectronicsUpgrade::Yearly => 1.0,
            ElectronicsUpgrade::EveryTwoYears => 0.5,
            ElectronicsUpgrade::EveryThreeYears => 1.0 / 3.0,
            ElectronicsUpgrade::Longer => 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationInput {
    pub primary_mode: TransportMode,
    /// One-way distance.
    pub daily_commute_distance: f64,
    /// Commute days per week, 0..=7.
    pub commute_frequency: f64,
    #[serde(default)]
    pub additional_weekly_travel: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAppliances {
    #[serde(default)]
    pub ac_heating: f64,
    #[serde(default)]
    pub television: f64,
    #[serde(default)]
    pub computer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeEnergyInput {
    pub home_type: HomeType,
    #[serde(default)]
    pub daily_appliances: DailyAppliances,
    pub lighting_type: LightingType,
    pub lighting_hours: f64,
    #[serde(default)]
    pub renewable_energy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietInput {
    pub diet_type: DietType,
    #[serde(default)]
    pub food_waste: FoodWaste,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterInput {
    /// Minutes per shower.
    pub shower_duration: f64,
    /// Showers per day.
    #[serde(default = "one")]
    pub shower_frequency: f64,
    /// Baths per week.
    #[serde(default)]
    pub bath_frequency: f64,
    #[serde(default)]
    pub water_saving_fixtures: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingInput {
    pub clothing_frequency: ClothingFrequency,
    #[serde(default)]
    pub electronics_upgrade: ElectronicsUpgrade,
}

/// A validated questionnaire submission for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleProfile {
    pub location: Location,
    pub household_size: u32,
    pub transportation: TransportationInput,
    pub home_energy: HomeEnergyInput,
    #[serde(rename = "foodDiet")]
    pub diet: DietInput,
    #[serde(rename = "waterUsage")]
    pub water: WaterInput,
    pub shopping: ShoppingInput,
}

fn check_quantity(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FootprintError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(FootprintError::invalid(field, "must not be negative"));
    }
    Ok(())
}

impl LifestyleProfile {
    /// Range checks on numeric fields. Enumerated fields are closed by type.
    pub fn validate(&self) -> Result<()> {
        if self.location.country.trim().is_empty() {
            return Err(FootprintError::invalid("location.country", "must not be empty"));
        }
        if self.household_size < 1 {
            return Err(FootprintError::invalid("householdSize", "must be at least 1"));
        }

        let t = &self.transportation;
        check_quantity("transportation.dailyCommuteDistance", t.daily_commute_distance)?;
        check_quantity("transportation.commuteFrequency", t.commute_frequency)?;
        if t.commute_frequency > 7.0 {
            return Err(FootprintError::invalid(
                "transportation.commuteFrequency",
                "must be between 0 and 7 days per week",
            ));
        }
        check_quantity("transportation.additionalWeeklyTravel", t.additional_weekly_travel)?;

        let h = &self.home_energy;
        check_quantity("homeEnergy.dailyAppliances.acHeating", h.daily_appliances.ac_heating)?;
        check_quantity("homeEnergy.dailyAppliances.television", h.daily_appliances.television)?;
        check_quantity("homeEnergy.dailyAppliances.computer", h.daily_appliances.computer)?;
        check_quantity("homeEnergy.lightingHours", h.lighting_hours)?;

        let w = &self.water;
        check_quantity("waterUsage.showerDuration", w.shower_duration)?;
        check_quantity("waterUsage.showerFrequency", w.shower_frequency)?;
        check_quantity("waterUsage.bathFrequency", w.bath_frequency)?;

        Ok(())
    }

    /// Country key used for factor and benchmark lookups.
    pub fn region(&self) -> &str {
        self.location.country.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn electronics_upgrade_uses_source_spelling() {
        let v: ElectronicsUpgrade = serde_json::from_str("\"every_2_years\"").unwrap();
        assert_eq!(v, ElectronicsUpgrade::EveryTwoYears);
        assert_eq!(
            serde_json::to_string(&ElectronicsUpgrade::EveryThreeYears).unwrap(),
            "\"every_3_years\""
        );
    }

    #[test]
    fn water_defaults_apply_when_absent() {
        let w: WaterInput = serde_json::from_str(r#"{"showerDuration": 8}"#).unwrap();
        assert_eq!(w.shower_frequency, 1.0);
        assert_eq!(w.bath_frequency, 0.0);
        assert!(!w.water_saving_fixtures);
    }

    #[test]
    fn shopping_frequencies_map_to_counts() {
        assert_eq!(ClothingFrequency::Monthly.items_per_year(), 36.0);
        assert_eq!(ClothingFrequency::Quarterly.items_per_year(), 12.0);
        assert_eq!(ElectronicsUpgrade::Longer.devices_per_year(), 0.2);
        assert!((ElectronicsUpgrade::EveryThreeYears.devices_per_year() - 0.3333).abs() < 1e-3);
    }
}
