use crate::domain::catalog::Channel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub model_id: String,
    pub routing_score: f64,
}

/// Write-once audit row for a single routed interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecisionRecord {
    pub interaction_id: String,
    pub capability_key: String,
    pub persona_id: String,
    pub selected_model_id: String,
    pub routing_score: f64,
    pub routing_reason: String,
    pub max_cost_per_call: Option<f64>,
    pub max_latency_ms: Option<i32>,
    pub channel: Channel,
    pub envelope_hash: Option<String>,
    pub alternatives: Vec<Alternative>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    AlreadyPresent,
}
