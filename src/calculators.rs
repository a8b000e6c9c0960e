use crate::factors::{FactorTable, Unit, GRID_ACTIVITY, GRID_CATEGORY, GRID_SUBCATEGORY};
use crate::profile::{
    DietInput, DistanceUnit, HomeEnergyInput, ShoppingInput, TransportMode, TransportationInput,
    WaterInput,
};
use crate::types::CategoryResult;

pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const MEALS_PER_YEAR: f64 = DAYS_PER_YEAR * 3.0;

/// kWh per hour of appliance use.
const AC_HEATING_KWH_PER_HOUR: f64 = 2.0;
const TELEVISION_KWH_PER_HOUR: f64 = 0.15;
const COMPUTER_KWH_PER_HOUR: f64 = 0.3;
const LIGHTING_KWH_PER_HOUR: f64 = 0.06;

const SHOWER_LITERS_PER_MINUTE: f64 = 12.0;
const BATH_LITERS: f64 = 150.0;
/// Per-person daily use outside showers and baths.
const BASELINE_LITERS_PER_DAY: f64 = 50.0;
const WATER_SAVING_DISCOUNT: f64 = 0.7;

const PACKAGING_SURCHARGE: f64 = 0.1;

/// Yearly km travelled: round-trip commute plus additional weekly travel.
pub fn yearly_km(input: &TransportationInput) -> (f64, f64) {
    let unit = match input.distance_unit {
        DistanceUnit::Km => Unit::Km,
        DistanceUnit::Miles => Unit::Miles,
    };
    let commute = input.daily_commute_distance * 2.0 * input.commute_frequency * WEEKS_PER_YEAR;
    let additional = input.additional_weekly_travel * WEEKS_PER_YEAR;
    (commute * unit.to_base(), additional * unit.to_base())
}

/// kg CO2e per km for the primary mode.
pub fn transport_factor(input: &TransportationInput, factors: &FactorTable, region: &str) -> f64 {
    match input.primary_mode {
        TransportMode::Bike => factors.lookup("transportation", "active", "bicycle", region),
        TransportMode::Walking => factors.lookup("transportation", "active", "walking", region),
        TransportMode::PublicTransport => {
            factors.lookup("transportation", "publicTransport", "average", region)
        }
        TransportMode::Car | TransportMode::WorkFromHome => {
            let activity = input.vehicle_type.map(|v| v.as_str()).unwrap_or("unknown");
            factors.lookup("transportation", "car", activity, region)
        }
    }
}

/// Transportation: `(commuteKm + additionalKm) * factor`.
pub fn transportation(input: &TransportationInput, region: &str, factors: &FactorTable) -> CategoryResult {
    let (commute_km, additional_km) = yearly_km(input);
    let factor = transport_factor(input, factors, region);
    let commute = commute_km * factor;
    let additional = additional_km * factor;

    CategoryResult::new(commute + additional)
        .with_part("commute", commute)
        .with_part("additionalTravel", additional)
}

/// Daily kWh as a weighted sum of appliance and lighting hours.
pub fn daily_kwh(input: &HomeEnergyInput) -> f64 {
    let a = &input.daily_appliances;
    a.ac_heating * AC_HEATING_KWH_PER_HOUR
        + a.television * TELEVISION_KWH_PER_HOUR
        + a.computer * COMPUTER_KWH_PER_HOUR
        + input.lighting_hours * LIGHTING_KWH_PER_HOUR
}

/// Home energy: `dailyKWh * 365 * factor`, factor renewable or regional grid.
/// Breakdown is a fixed 60/30/10 presentation split.
pub fn home_energy(input: &HomeEnergyInput, region: &str, factors: &FactorTable) -> CategoryResult {
    let yearly_kwh = daily_kwh(input) * DAYS_PER_YEAR;
    let activity = if input.renewable_energy {
        "renewable"
    } else {
        GRID_ACTIVITY
    };
    let total = factors.emissions(yearly_kwh, Unit::Kwh, GRID_CATEGORY, GRID_SUBCATEGORY, activity, region);

    CategoryResult::new(total)
        .with_share("electricity", 0.6)
        .with_share("heating", 0.3)
        .with_share("appliances", 0.1)
}

/// Food: `1095 meals * per-meal factor * waste multiplier`.
pub fn food(input: &DietInput, region: &str, factors: &FactorTable) -> CategoryResult {
    let per_meal = factors.lookup("food", "meal", input.diet_type.activity(), region);
    let total = MEALS_PER_YEAR * per_meal * input.food_waste.multiplier();

    CategoryResult::new(total)
        .with_share("meat", 0.4)
        .with_share("dairy", 0.2)
        .with_share("other", 0.3)
        .with_share("waste", 0.1)
}

/// Liters per day from showers, baths and the fixed baseline.
pub fn daily_liters(input: &WaterInput) -> f64 {
    input.shower_duration * SHOWER_LITERS_PER_MINUTE * input.shower_frequency
        + input.bath_frequency * BATH_LITERS / 7.0
        + BASELINE_LITERS_PER_DAY
}

/// Water: `dailyLiters * 365 * factor`, discounted with water-saving fixtures.
pub fn water(input: &WaterInput, region: &str, factors: &FactorTable) -> CategoryResult {
    let yearly_liters = daily_liters(input) * DAYS_PER_YEAR;
    let mut total = factors.emissions(yearly_liters, Unit::Liter, "water", "supply", "liter", region);
    if input.water_saving_fixtures {
        total *= WATER_SAVING_DISCOUNT;
    }

    CategoryResult::new(total)
        .with_share("usage", 0.6)
        .with_share("heating", 0.4)
}

/// Shopping: clothing and electronics items per year, plus a 10% packaging
/// surcharge on their sum.
pub fn shopping(input: &ShoppingInput, region: &str, factors: &FactorTable) -> CategoryResult {
    let clothing = factors.emissions(
        input.clothing_frequency.items_per_year(),
        Unit::Item,
        "shopping",
        "clothing",
        "averageItem",
        region,
    );
    let electronics = factors.emissions(
        input.electronics_upgrade.devices_per_year(),
        Unit::Item,
        "shopping",
        "electronics",
        "averageDevice",
        region,
    );
    let packaging = (clothing + electronics) * PACKAGING_SURCHARGE;

    CategoryResult::new(clothing + electronics + packaging)
        .with_part("clothing", clothing)
        .with_part("electronics", electronics)
        .with_part("packaging", packaging)
}
