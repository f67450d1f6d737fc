use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationReason {
    ModelNotFound,
    ModelDeactivated,
    ModelIneligible,
    CapabilityDisallowed,
    CapabilityNoLongerSupported,
    BudgetExceeded,
}

impl DeviationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviationReason::ModelNotFound => "model_not_found",
            DeviationReason::ModelDeactivated => "model_deactivated",
            DeviationReason::ModelIneligible => "model_ineligible",
            DeviationReason::CapabilityDisallowed => "capability_disallowed",
            DeviationReason::CapabilityNoLongerSupported => "capability_no_longer_supported",
            DeviationReason::BudgetExceeded => "budget_exceeded",
        }
    }
}

/// Current state of the originally selected model, as seen at replay time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationDetails {
    pub model_found: bool,
    pub is_active: Option<bool>,
    pub is_eligible: Option<bool>,
    pub supports_capability: Option<bool>,
    pub disallows_capability: Option<bool>,
    pub current_cost_per_1k: Option<f64>,
    pub current_avg_latency_ms: Option<i32>,
    pub recorded_max_cost_per_call: Option<f64>,
    pub recorded_max_latency_ms: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExactReplay {
    pub replay_possible: bool,
    pub replay_deviation: bool,
    pub original_model_id: String,
    pub replay_model_id: String,
    pub capability_key: String,
    pub routing_score: f64,
    pub envelope_hash: Option<String>,
    pub original_created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviatedReplay {
    pub replay_possible: bool,
    pub replay_deviation: bool,
    pub deviation_reason: DeviationReason,
    pub deviation_details: DeviationDetails,
    pub original_model_id: String,
    pub capability_key: String,
    pub envelope_hash: Option<String>,
    pub original_created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplayResult {
    Exact(ExactReplay),
    Deviation(DeviatedReplay),
}

impl ReplayResult {
    pub fn is_deviation(&self) -> bool {
        matches!(self, ReplayResult::Deviation(_))
    }

    pub fn original_model_id(&self) -> &str {
        match self {
            ReplayResult::Exact(r) => &r.original_model_id,
            ReplayResult::Deviation(r) => &r.original_model_id,
        }
    }
}

/// Audit row for a detected deviation. Kept apart from the original decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayDeviationRecord {
    pub deviation_id: Uuid,
    pub interaction_id: String,
    pub original_model_id: String,
    pub deviation_reason: DeviationReason,
    pub deviation_details: DeviationDetails,
    pub detected_at: chrono::DateTime<chrono::Utc>,
}
