use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::benchmark::Benchmarks;
use crate::error::AdvisorError;
use crate::profile::LifestyleProfile;
use crate::types::FootprintResult;

/// Everything an advisory collaborator is allowed to see. Its answer is never
/// fed back into the calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryBrief {
    pub footprint: FootprintResult,
    pub profile: LifestyleProfile,
    pub benchmarks: Benchmarks,
}

/// Seam for an external recommendation service.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, brief: &AdvisoryBrief) -> Result<Value, AdvisorError>;

    fn name(&self) -> &str {
        "advisor"
    }
}

/// Advisor used when no service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAdvisor;

#[async_trait]
impl Advisor for NoopAdvisor {
    async fn advise(&self, _brief: &AdvisoryBrief) -> Result<Value, AdvisorError> {
        Ok(Value::Null)
    }

    fn name(&self) -> &str {
        "noop"
    }
}
