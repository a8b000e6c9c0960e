//! Boundary checks for raw questionnaire payloads. Nothing untyped gets past
//! `InputGuard` into the calculators.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FootprintError, Result};
use crate::profile::{
    DailyAppliances, DietInput, HomeEnergyInput, LifestyleProfile, Location, ShoppingInput,
    TransportationInput, WaterInput,
};

// Leaves are kept as raw JSON so a wrongly typed answer is reported against
// its own field instead of failing the whole document.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub country: Option<Value>,
    pub city: Option<Value>,
    pub region: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransportation {
    pub primary_mode: Option<Value>,
    pub daily_commute_distance: Option<Value>,
    pub commute_frequency: Option<Value>,
    pub additional_weekly_travel: Option<Value>,
    pub vehicle_type: Option<Value>,
    pub distance_unit: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAppliances {
    pub ac_heating: Option<Value>,
    pub television: Option<Value>,
    pub computer: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHomeEnergy {
    pub home_type: Option<Value>,
    pub daily_appliances: Option<RawAppliances>,
    pub lighting_type: Option<Value>,
    pub lighting_hours: Option<Value>,
    pub renewable_energy: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiet {
    pub diet_type: Option<Value>,
    pub food_waste: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWater {
    pub shower_duration: Option<Value>,
    pub shower_frequency: Option<Value>,
    pub bath_frequency: Option<Value>,
    pub water_saving_fixtures: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShopping {
    pub clothing_frequency: Option<Value>,
    pub electronics_upgrade: Option<Value>,
}

/// Questionnaire as it arrives from a form: every field may be missing or
/// carry any JSON type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSubmission {
    pub location: Option<RawLocation>,
    pub household_size: Option<Value>,
    pub transportation: Option<RawTransportation>,
    pub home_energy: Option<RawHomeEnergy>,
    pub food_diet: Option<RawDiet>,
    pub water_usage: Option<RawWater>,
    pub shopping: Option<RawShopping>,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| FootprintError::invalid(field, "is required"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn mistyped(field: &str, expected: &str, got: &Value) -> FootprintError {
    FootprintError::invalid(field, format!("expected {expected}, got {}", type_name(got)))
}

/// `null` counts as absent.
fn number(field: &str, raw: &Option<Value>) -> Result<Option<f64>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| FootprintError::invalid(field, "is not representable as a number")),
        Some(other) => Err(mistyped(field, "a number", other)),
    }
}

fn whole_number(field: &str, raw: &Option<Value>) -> Result<Option<u32>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| FootprintError::invalid(field, format!("must be a positive whole number, got {n}"))),
        Some(other) => Err(mistyped(field, "a whole number", other)),
    }
}

fn flag(field: &str, raw: &Option<Value>) -> Result<Option<bool>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mistyped(field, "a boolean", other)),
    }
}

fn text<'a>(field: &str, raw: &'a Option<Value>) -> Result<Option<&'a str>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(mistyped(field, "a string", other)),
    }
}

/// Parses free text into a closed enumeration using its wire names.
/// Accepts `Non-Vegetarian`, `non vegetarian` and `non_vegetarian` alike.
fn choice<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T> {
    let normalized: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();
    serde_json::from_value(Value::String(normalized))
        .map_err(|_| FootprintError::invalid(field, format!("unknown value {raw:?}")))
}

fn required_choice<T: DeserializeOwned>(field: &str, raw: &Option<Value>) -> Result<T> {
    choice(field, required(field, text(field, raw)?)?)
}

fn optional_choice<T: DeserializeOwned>(field: &str, raw: &Option<Value>) -> Result<Option<T>> {
    text(field, raw)?.map(|r| choice(field, r)).transpose()
}

pub struct InputGuard;

impl InputGuard {
    /// Builds a typed profile, then applies the profile's own range checks.
    pub fn validate_submission(raw: &QuestionnaireSubmission) -> Result<LifestyleProfile> {
        let location = required("location", raw.location.as_ref())?;
        let country = required("location.country", text("location.country", &location.country)?)?;
        let city = text("location.city", &location.city)?;
        let region = text("location.region", &location.region)?;
        let household_size = required("householdSize", whole_number("householdSize", &raw.household_size)?)?;

        let t = required("transportation", raw.transportation.as_ref())?;
        let transportation = TransportationInput {
            primary_mode: required_choice("transportation.primaryMode", &t.primary_mode)?,
            daily_commute_distance: number("transportation.dailyCommuteDistance", &t.daily_commute_distance)?
                .unwrap_or(0.0),
            commute_frequency: number("transportation.commuteFrequency", &t.commute_frequency)?.unwrap_or(0.0),
            additional_weekly_travel: number("transportation.additionalWeeklyTravel", &t.additional_weekly_travel)?
                .unwrap_or(0.0),
            vehicle_type: optional_choice("transportation.vehicleType", &t.vehicle_type)?,
            distance_unit: optional_choice("transportation.distanceUnit", &t.distance_unit)?.unwrap_or_default(),
        };

        let h = required("homeEnergy", raw.home_energy.as_ref())?;
        let appliances = h.daily_appliances.clone().unwrap_or_default();
        let home_energy = HomeEnergyInput {
            home_type: required_choice("homeEnergy.homeType", &h.home_type)?,
            daily_appliances: DailyAppliances {
                ac_heating: number("homeEnergy.dailyAppliances.acHeating", &appliances.ac_heating)?.unwrap_or(0.0),
                television: number("homeEnergy.dailyAppliances.television", &appliances.television)?.unwrap_or(0.0),
                computer: number("homeEnergy.dailyAppliances.computer", &appliances.computer)?.unwrap_or(0.0),
            },
            lighting_type: required_choice("homeEnergy.lightingType", &h.lighting_type)?,
            lighting_hours: required(
                "homeEnergy.lightingHours",
                number("homeEnergy.lightingHours", &h.lighting_hours)?,
            )?,
            renewable_energy: flag("homeEnergy.renewableEnergy", &h.renewable_energy)?.unwrap_or(false),
        };

        let d = required("foodDiet", raw.food_diet.as_ref())?;
        let diet = DietInput {
            diet_type: required_choice("foodDiet.dietType", &d.diet_type)?,
            food_waste: optional_choice("foodDiet.foodWaste", &d.food_waste)?.unwrap_or_default(),
        };

        let w = required("waterUsage", raw.water_usage.as_ref())?;
        let water = WaterInput {
            shower_duration: required(
                "waterUsage.showerDuration",
                number("waterUsage.showerDuration", &w.shower_duration)?,
            )?,
            shower_frequency: number("waterUsage.showerFrequency", &w.shower_frequency)?.unwrap_or(1.0),
            bath_frequency: number("waterUsage.bathFrequency", &w.bath_frequency)?.unwrap_or(0.0),
            water_saving_fixtures: flag("waterUsage.waterSavingFixtures", &w.water_saving_fixtures)?
                .unwrap_or(false),
        };

        let s = required("shopping", raw.shopping.as_ref())?;
        let shopping = ShoppingInput {
            clothing_frequency: required_choice("shopping.clothingFrequency", &s.clothing_frequency)?,
            electronics_upgrade: optional_choice("shopping.electronicsUpgrade", &s.electronics_upgrade)?
                .unwrap_or_default(),
        };

        let profile = LifestyleProfile {
            location: Location {
                country: country.to_string(),
                city: city.map(str::to_string),
                region: region.map(str::to_string),
            },
            household_size,
            transportation,
            home_energy,
            diet,
            water,
            shopping,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Parses and validates a questionnaire document. A body that is not a
    /// questionnaire object at all is reported against `body`.
    pub fn validate_json(raw: &str) -> Result<LifestyleProfile> {
        let submission: QuestionnaireSubmission =
            serde_json::from_str(raw).map_err(|e| FootprintError::invalid("body", e.to_string()))?;
        Self::validate_submission(&submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DietType, ElectronicsUpgrade, FoodWaste, TransportMode};

    fn complete() -> serde_json::Value {
        serde_json::json!({
            "location": {"country": "Germany"},
            "householdSize": 2,
            "transportation": {"primaryMode": "public_transport", "dailyCommuteDistance": 12, "commuteFrequency": 5},
            "homeEnergy": {"homeType": "apartment", "lightingType": "led", "lightingHours": 4},
            "foodDiet": {"dietType": "Non-Vegetarian"},
            "waterUsage": {"showerDuration": 8},
            "shopping": {"clothingFrequency": "quarterly"}
        })
    }

    fn rejected_field(raw: &serde_json::Value) -> String {
        let err = InputGuard::validate_json(&raw.to_string()).unwrap_err();
        assert!(err.is_client_error(), "{err:?} should be client-correctable");
        match err {
            FootprintError::InvalidInput { field, .. } => field,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn complete_submission_fills_defaults() {
        let p = InputGuard::validate_json(&complete().to_string()).unwrap();
        assert_eq!(p.transportation.primary_mode, TransportMode::PublicTransport);
        assert_eq!(p.diet.diet_type, DietType::NonVegetarian);
        assert_eq!(p.diet.food_waste, FoodWaste::Moderate);
        assert_eq!(p.shopping.electronics_upgrade, ElectronicsUpgrade::EveryTwoYears);
        assert_eq!(p.water.shower_frequency, 1.0);
        assert_eq!(p.home_energy.daily_appliances, DailyAppliances::default());
    }

    #[test]
    fn null_optional_fields_take_defaults() {
        let mut raw = complete();
        raw["transportation"]["vehicleType"] = serde_json::Value::Null;
        raw["waterUsage"]["showerFrequency"] = serde_json::Value::Null;
        let p = InputGuard::validate_json(&raw.to_string()).unwrap();
        assert_eq!(p.transportation.vehicle_type, None);
        assert_eq!(p.water.shower_frequency, 1.0);
    }

    #[test]
    fn missing_required_field_is_named() {
        let mut raw = complete();
        raw["transportation"].as_object_mut().unwrap().remove("primaryMode");
        assert_eq!(rejected_field(&raw), "transportation.primaryMode");

        let mut raw = complete();
        raw["waterUsage"].as_object_mut().unwrap().remove("showerDuration");
        assert_eq!(rejected_field(&raw), "waterUsage.showerDuration");
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let mut raw = complete();
        raw["homeEnergy"]["lightingType"] = serde_json::json!("candles");
        assert_eq!(rejected_field(&raw), "homeEnergy.lightingType");
    }

    #[test]
    fn negative_household_size_is_client_error() {
        let mut raw = complete();
        raw["householdSize"] = serde_json::json!(-1);
        assert_eq!(rejected_field(&raw), "householdSize");

        raw["householdSize"] = serde_json::json!(2.5);
        assert_eq!(rejected_field(&raw), "householdSize");
    }

    #[test]
    fn wrongly_typed_fields_are_named() {
        let mut raw = complete();
        raw["transportation"]["dailyCommuteDistance"] = serde_json::json!("ten");
        assert_eq!(rejected_field(&raw), "transportation.dailyCommuteDistance");

        let mut raw = complete();
        raw["homeEnergy"]["renewableEnergy"] = serde_json::json!("yes");
        assert_eq!(rejected_field(&raw), "homeEnergy.renewableEnergy");

        let mut raw = complete();
        raw["foodDiet"]["dietType"] = serde_json::json!(3);
        assert_eq!(rejected_field(&raw), "foodDiet.dietType");
    }

    #[test]
    fn malformed_body_is_client_error() {
        let err = InputGuard::validate_json("{\"householdSize\": ").unwrap_err();
        assert!(err.is_client_error());

        let mut raw = complete();
        raw["transportation"] = serde_json::json!(5);
        assert_eq!(rejected_field(&raw), "body");
    }

    #[test]
    fn range_checks_still_apply() {
        let mut raw = complete();
        raw["transportation"]["commuteFrequency"] = serde_json::json!(9);
        assert_eq!(rejected_field(&raw), "transportation.commuteFrequency");

        let mut raw = complete();
        raw["householdSize"] = serde_json::json!(0);
        assert_eq!(rejected_field(&raw), "householdSize");
    }
}
