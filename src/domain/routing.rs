use crate::domain::routing_decision::Alternative;
use serde::{Deserialize, Serialize};

/// Absent string fields deserialize as empty so validation reports them as
/// `INVALID_INPUT`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectModelRequest {
    #[serde(default)]
    pub capability_key: String,
    #[serde(default)]
    pub persona_id: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub envelope_hash: Option<String>,
    #[serde(default)]
    pub interaction_id: Option<String>,
}

/// Internal selection result. Carries the model slug for logging and is not
/// `Serialize`; callers receive [`SelectionResponse`].
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub model_id: String,
    pub model_slug: String,
    pub routing_score: f64,
    pub cost_estimate: f64,
    pub latency_class: String,
    pub alternatives: Vec<Alternative>,
    pub routing_reason: String,
    pub decision_recorded: bool,
}

impl ModelSelection {
    pub fn redacted(&self) -> SelectionResponse {
        SelectionResponse {
            model_id: self.model_id.clone(),
            routing_score: self.routing_score,
            cost_estimate: self.cost_estimate,
            latency_class: self.latency_class.clone(),
            alternatives: self.alternatives.clone(),
            decision_recorded: self.decision_recorded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub model_id: String,
    pub routing_score: f64,
    pub cost_estimate: f64,
    pub latency_class: String,
    pub alternatives: Vec<Alternative>,
    pub decision_recorded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    NoEligibleModel,
    RouterError,
    ReplayFailed,
    ReplayError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoEligibleReason {
    NoSupportingModels,
    ExcludedByBudget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoEligibleDiagnostics {
    pub reason: NoEligibleReason,
    pub models_checked: usize,
    pub models_excluded_by_budget: usize,
    pub excluded_by_cost: usize,
    pub excluded_by_latency: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouterFailure {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<NoEligibleDiagnostics>,
}

impl RouterFailure {
    pub fn new(code: ErrorCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn invalid_input(message: &str) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn no_eligible(message: &str, diagnostics: NoEligibleDiagnostics) -> Self {
        Self {
            code: ErrorCode::NoEligibleModel,
            message: message.to_string(),
            details: Some(diagnostics),
        }
    }

    pub fn into_envelope(self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorPayload {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<NoEligibleDiagnostics>,
}
