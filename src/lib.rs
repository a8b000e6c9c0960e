#![forbid(unsafe_code)]
//! Household carbon-footprint engine: per-category calculators over versioned
//! emission-factor tables, regional benchmarking, what-if scenarios and
//! dashboard datasets.

pub mod advisor;
pub mod aggregate;
pub mod benchmark;
pub mod calculators;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod factors;
pub mod guards;
pub mod history;
pub mod pipeline;
pub mod potential;
pub mod profile;
pub mod scenario;
pub mod types;

pub use advisor::{Advisor, AdvisoryBrief, NoopAdvisor};
pub use aggregate::{rounded_percent, safe_ratio, summarize, FootprintSummary};
pub use benchmark::{
    BenchmarkComparison, BenchmarkTable, Benchmarks, FootprintRanking, ImpactCategory,
};
pub use config::EngineConfig;
pub use dashboard::{Chart, ChartData, ChartKind, Dashboard, GoalProgress, Insight};
pub use engine::{Assessment, EmissionEngine, Recalculation};
pub use error::{AdvisorError, FootprintError, Result};
pub use factors::{EmissionFactor, FactorTable, Unit};
pub use guards::{InputGuard, QuestionnaireSubmission};
pub use history::{FootprintHistory, FootprintRecord};
pub use pipeline::{FootprintPipeline, FootprintReport};
pub use potential::{PotentialTable, ReductionPotential};
pub use profile::LifestyleProfile;
pub use scenario::{ChangeSet, Reduction, ScenarioOutcome};
pub use types::{Category, CategoryEmissions, CategoryResult, FootprintResult};
