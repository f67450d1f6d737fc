use crate::domain::catalog::{ModelRecord, PersonaPolicy};
use crate::domain::replay::{
    DeviatedReplay, DeviationDetails, DeviationReason, ExactReplay, ReplayDeviationRecord, ReplayResult,
};
use crate::domain::routing::{ErrorCode, RouterFailure};
use crate::domain::routing_decision::{AppendOutcome, RoutingDecisionRecord};
use crate::repo::catalog_repo::ModelCatalog;
use crate::repo::replay_deviations_repo::DeviationLog;
use crate::repo::routing_decisions_repo::DecisionReader;
use crate::router::budget::{fits_cost, fits_latency};
use crate::service::model_router::required_field;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReplayResolver {
    pub decisions: Arc<dyn DecisionReader>,
    pub catalog: Arc<dyn ModelCatalog>,
    pub deviation_log: Arc<dyn DeviationLog>,
}

impl ReplayResolver {
    pub async fn resolve_model_for_replay(&self, interaction_id: &str) -> Result<ReplayResult, RouterFailure> {
        let interaction_id = required_field(interaction_id, "interaction_id")?;

        let original = self
            .decisions
            .find_by_interaction_id(&interaction_id)
            .await
            .map_err(replay_error)?
            .ok_or_else(|| {
                RouterFailure::new(ErrorCode::ReplayFailed, "no routing decision recorded for interaction")
            })?;

        let current = self
            .catalog
            .find_model(&original.selected_model_id)
            .await
            .map_err(replay_error)?;

        match check_still_valid(&original, current.as_ref()) {
            Ok(()) => Ok(ReplayResult::Exact(ExactReplay {
                replay_possible: true,
                replay_deviation: false,
                original_model_id: original.selected_model_id.clone(),
                replay_model_id: original.selected_model_id.clone(),
                capability_key: original.capability_key,
                routing_score: original.routing_score,
                envelope_hash: original.envelope_hash,
                original_created_at: original.created_at,
            })),
            Err((reason, details)) => {
                tracing::warn!(
                    "replay deviation interaction_id={} model={} slug={} reason={}",
                    original.interaction_id,
                    original.selected_model_id,
                    current.as_ref().map(|m| m.slug.as_str()).unwrap_or("unknown"),
                    reason.as_str()
                );
                self.record_deviation(&original, reason, &details).await;

                Ok(ReplayResult::Deviation(DeviatedReplay {
                    replay_possible: false,
                    replay_deviation: true,
                    deviation_reason: reason,
                    deviation_details: details,
                    original_model_id: original.selected_model_id,
                    capability_key: original.capability_key,
                    envelope_hash: original.envelope_hash,
                    original_created_at: original.created_at,
                }))
            }
        }
    }

    async fn record_deviation(
        &self,
        original: &RoutingDecisionRecord,
        reason: DeviationReason,
        details: &DeviationDetails,
    ) {
        let record = ReplayDeviationRecord {
            deviation_id: Uuid::new_v4(),
            interaction_id: original.interaction_id.clone(),
            original_model_id: original.selected_model_id.clone(),
            deviation_reason: reason,
            deviation_details: details.clone(),
            detected_at: chrono::Utc::now(),
        };
        match self.deviation_log.record(&record).await {
            Ok(AppendOutcome::Inserted) => {}
            Ok(AppendOutcome::AlreadyPresent) => {
                tracing::debug!(
                    "deviation unchanged since last replay interaction_id={} reason={}",
                    original.interaction_id,
                    reason.as_str()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "failed to record replay deviation interaction_id={}: {:#}",
                    original.interaction_id,
                    e
                );
            }
        }
    }
}

/// Reports the first failing check: existence, active flag, eligibility flag,
/// disallow list, support list, then the ceilings recorded with the decision.
pub fn check_still_valid(
    original: &RoutingDecisionRecord,
    current: Option<&ModelRecord>,
) -> Result<(), (DeviationReason, DeviationDetails)> {
    let capability = original.capability_key.as_str();
    let recorded = PersonaPolicy {
        max_cost_per_call: original.max_cost_per_call,
        max_latency_ms: original.max_latency_ms,
    };

    let model = match current {
        Some(model) => model,
        None => {
            return Err((
                DeviationReason::ModelNotFound,
                DeviationDetails {
                    model_found: false,
                    is_active: None,
                    is_eligible: None,
                    supports_capability: None,
                    disallows_capability: None,
                    current_cost_per_1k: None,
                    current_avg_latency_ms: None,
                    recorded_max_cost_per_call: recorded.max_cost_per_call,
                    recorded_max_latency_ms: recorded.max_latency_ms,
                },
            ))
        }
    };

    let details = DeviationDetails {
        model_found: true,
        is_active: Some(model.is_active),
        is_eligible: Some(model.is_eligible),
        supports_capability: Some(model.supports(capability)),
        disallows_capability: Some(model.disallows(capability)),
        current_cost_per_1k: Some(model.cost_per_1k),
        current_avg_latency_ms: Some(model.avg_latency_ms),
        recorded_max_cost_per_call: recorded.max_cost_per_call,
        recorded_max_latency_ms: recorded.max_latency_ms,
    };

    let reason = if !model.is_active {
        Some(DeviationReason::ModelDeactivated)
    } else if !model.is_eligible {
        Some(DeviationReason::ModelIneligible)
    } else if model.disallows(capability) {
        Some(DeviationReason::CapabilityDisallowed)
    } else if !model.supports(capability) {
        Some(DeviationReason::CapabilityNoLongerSupported)
    } else if !fits_cost(model, &recorded) || !fits_latency(model, &recorded) {
        Some(DeviationReason::BudgetExceeded)
    } else {
        None
    };

    match reason {
        Some(reason) => Err((reason, details)),
        None => Ok(()),
    }
}

fn replay_error(e: anyhow::Error) -> RouterFailure {
    tracing::error!("replay lookup failed: {:#}", e);
    RouterFailure::new(ErrorCode::ReplayError, "replay resolution failed")
}
