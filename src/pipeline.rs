//! Orchestration around the deterministic core: engine, benchmarks, then an
//! optional advisory call bounded by a timeout.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::advisor::{Advisor, AdvisoryBrief};
use crate::engine::{Assessment, EmissionEngine};
use crate::error::{AdvisorError, Result};
use crate::guards::{InputGuard, QuestionnaireSubmission};
use crate::potential::ReductionPotential;
use crate::profile::LifestyleProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintReport {
    pub assessment: Assessment,
    pub reduction_potential: Vec<ReductionPotential>,
    /// Present only when the advisor answered in time with a non-empty value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Value>,
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

pub struct FootprintPipeline<A: Advisor> {
    engine: EmissionEngine,
    advisor: A,
}

impl<A: Advisor> FootprintPipeline<A> {
    pub fn new(engine: EmissionEngine, advisor: A) -> Self {
        FootprintPipeline { engine, advisor }
    }

    pub fn engine(&self) -> &EmissionEngine {
        &self.engine
    }

    /// Engine errors abort the run. Advisory failures never do.
    pub async fn run(&self, profile: &LifestyleProfile, calculated_at: DateTime<Utc>) -> Result<FootprintReport> {
        let assessment = self.engine.assess(profile, calculated_at)?;
        let reduction_potential = self.engine.reduction_potential(&assessment.footprint);

        let brief = AdvisoryBrief {
            footprint: assessment.footprint.clone(),
            profile: profile.clone(),
            benchmarks: assessment.benchmarks.clone(),
        };
        let advisory = match self.consult(&brief).await {
            Ok(value) if !is_empty(&value) => Some(value),
            Ok(_) => {
                debug!(advisor = self.advisor.name(), "advisor returned nothing");
                None
            }
            Err(err) => {
                warn!(advisor = self.advisor.name(), error = %err, "advisory dropped");
                None
            }
        };

        Ok(FootprintReport {
            assessment,
            reduction_potential,
            advisory,
        })
    }

    pub async fn run_submission(
        &self,
        submission: &QuestionnaireSubmission,
        calculated_at: DateTime<Utc>,
    ) -> Result<FootprintReport> {
        let profile = InputGuard::validate_submission(submission)?;
        self.run(&profile, calculated_at).await
    }

    async fn consult(&self, brief: &AdvisoryBrief) -> std::result::Result<Value, AdvisorError> {
        let limit = self.engine.config().advisory_timeout_ms;
        tokio::time::timeout(Duration::from_millis(limit), self.advisor.advise(brief))
            .await
            .map_err(|_| AdvisorError::Timeout(limit))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::NoopAdvisor;
    use crate::config::EngineConfig;
    use crate::profile::*;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct Scripted(std::result::Result<Value, &'static str>);

    #[async_trait]
    impl Advisor for Scripted {
        async fn advise(&self, _brief: &AdvisoryBrief) -> std::result::Result<Value, AdvisorError> {
            self.0
                .clone()
                .map_err(|e| AdvisorError::Unavailable(e.to_string()))
        }
    }

    struct Sleepy;

    #[async_trait]
    impl Advisor for Sleepy {
        async fn advise(&self, _brief: &AdvisoryBrief) -> std::result::Result<Value, AdvisorError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(serde_json::json!({"tips": ["too late"]}))
        }
    }

    fn profile() -> LifestyleProfile {
        LifestyleProfile {
            location: Location {
                country: "France".into(),
                city: None,
                region: None,
            },
            household_size: 1,
            transportation: TransportationInput {
                primary_mode: TransportMode::Bike,
                daily_commute_distance: 5.0,
                commute_frequency: 5.0,
                additional_weekly_travel: 0.0,
                vehicle_type: None,
                distance_unit: DistanceUnit::Km,
            },
            home_energy: HomeEnergyInput {
                home_type: HomeType::Apartment,
                daily_appliances: DailyAppliances::default(),
                lighting_type: LightingType::Led,
                lighting_hours: 3.0,
                renewable_energy: true,
            },
            diet: DietInput {
                diet_type: DietType::Vegan,
                food_waste: FoodWaste::Minimal,
            },
            water: WaterInput {
                shower_duration: 5.0,
                shower_frequency: 1.0,
                bath_frequency: 0.0,
                water_saving_fixtures: true,
            },
            shopping: ShoppingInput {
                clothing_frequency: ClothingFrequency::Annually,
                electronics_upgrade: ElectronicsUpgrade::Longer,
            },
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
    }

    fn engine() -> EmissionEngine {
        EmissionEngine::new(EngineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn advisory_value_is_attached() {
        let pipeline = FootprintPipeline::new(engine(), Scripted(Ok(serde_json::json!({"tips": ["cycle"]}))));
        let report = pipeline.run(&profile(), at()).await.unwrap();
        assert_eq!(report.advisory.unwrap()["tips"][0], "cycle");
        assert_eq!(report.reduction_potential.len(), 5);
    }

    #[tokio::test]
    async fn failing_advisor_does_not_fail_the_run() {
        let pipeline = FootprintPipeline::new(engine(), Scripted(Err("503")));
        let report = pipeline.run(&profile(), at()).await.unwrap();
        assert!(report.advisory.is_none());
        assert!(report.assessment.footprint.total_emissions > 0.0);
    }

    #[tokio::test]
    async fn empty_advice_is_dropped() {
        let pipeline = FootprintPipeline::new(engine(), Scripted(Ok(serde_json::json!({}))));
        assert!(pipeline.run(&profile(), at()).await.unwrap().advisory.is_none());

        let pipeline = FootprintPipeline::new(engine(), NoopAdvisor);
        assert!(pipeline.run(&profile(), at()).await.unwrap().advisory.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_advisor_times_out() {
        let pipeline = FootprintPipeline::new(engine(), Sleepy);
        let report = pipeline.run(&profile(), at()).await.unwrap();
        assert!(report.advisory.is_none());
    }

    #[tokio::test]
    async fn advisory_does_not_change_the_footprint() {
        let with = FootprintPipeline::new(engine(), Scripted(Ok(serde_json::json!(["x"]))))
            .run(&profile(), at())
            .await
            .unwrap();
        let without = FootprintPipeline::new(engine(), NoopAdvisor)
            .run(&profile(), at())
            .await
            .unwrap();
        assert_eq!(with.assessment, without.assessment);
    }

    #[tokio::test]
    async fn invalid_profile_fails_before_advisor() {
        let mut p = profile();
        p.household_size = 0;
        let pipeline = FootprintPipeline::new(engine(), NoopAdvisor);
        let err = pipeline.run(&p, at()).await.unwrap_err();
        assert!(err.is_client_error());
    }
}
