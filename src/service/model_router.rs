use crate::domain::catalog::{latency_class_for, Channel, PersonaPolicy};
use crate::domain::routing::{
    ErrorCode, ModelSelection, NoEligibleDiagnostics, NoEligibleReason, RouterFailure, SelectModelRequest,
};
use crate::domain::routing_decision::{Alternative, AppendOutcome, RoutingDecisionRecord};
use crate::repo::catalog_repo::ModelCatalog;
use crate::repo::persona_policy_repo::PersonaPolicySource;
use crate::repo::routing_decisions_repo::DecisionLog;
use crate::router::budget::enforce_budget;
use crate::router::eligibility::filter_eligible;
use crate::scoring::engine::rank_models;
use crate::scoring::types::ScoredCandidate;
use std::sync::Arc;

pub const MAX_ALTERNATIVES: usize = 3;
pub const MAX_IDENTIFIER_LEN: usize = 256;

#[derive(Clone)]
pub struct ModelRouter {
    pub catalog: Arc<dyn ModelCatalog>,
    pub policies: Arc<dyn PersonaPolicySource>,
    pub decision_log: Arc<dyn DecisionLog>,
}

struct ValidatedRequest {
    capability_key: String,
    persona_id: String,
    channel: Channel,
    envelope_hash: Option<String>,
    interaction_id: Option<String>,
}

impl ModelRouter {
    pub async fn select_model(&self, req: SelectModelRequest) -> Result<ModelSelection, RouterFailure> {
        let req = validate_request(req)?;

        let listed = self
            .catalog
            .models_for_capability(&req.capability_key)
            .await
            .map_err(router_error)?;
        let eligible = filter_eligible(&listed, &req.capability_key);
        if eligible.is_empty() {
            tracing::info!(
                "no eligible model capability={} persona={} listed={}",
                req.capability_key,
                req.persona_id,
                listed.len()
            );
            return Err(RouterFailure::no_eligible(
                "no active, eligible model supports this capability",
                NoEligibleDiagnostics {
                    reason: NoEligibleReason::NoSupportingModels,
                    models_checked: 0,
                    models_excluded_by_budget: 0,
                    excluded_by_cost: 0,
                    excluded_by_latency: 0,
                },
            ));
        }

        let policy = self
            .policies
            .find_policy(&req.persona_id)
            .await
            .map_err(router_error)?
            .unwrap_or_else(PersonaPolicy::unconstrained);

        let budget = enforce_budget(eligible, &policy);
        if budget.within_budget.is_empty() {
            tracing::info!(
                "budget excluded all models capability={} persona={} checked={}",
                req.capability_key,
                req.persona_id,
                budget.models_checked
            );
            return Err(RouterFailure::no_eligible(
                "eligible models exist but none fit the persona budget",
                NoEligibleDiagnostics {
                    reason: NoEligibleReason::ExcludedByBudget,
                    models_checked: budget.models_checked,
                    models_excluded_by_budget: budget.excluded(),
                    excluded_by_cost: budget.excluded_by_cost,
                    excluded_by_latency: budget.excluded_by_latency,
                },
            ));
        }

        let ranked = rank_models(&budget.within_budget);
        for candidate in &ranked {
            tracing::debug!(
                "candidate model={} breakdown={:?}",
                candidate.model.model_id,
                candidate.breakdown
            );
        }
        let selected = ranked.first().cloned().ok_or_else(|| {
            RouterFailure::new(ErrorCode::RouterError, "failed to rank model candidates")
        })?;

        let alternatives: Vec<Alternative> = ranked
            .iter()
            .skip(1)
            .take(MAX_ALTERNATIVES)
            .map(|c| Alternative {
                model_id: c.model.model_id.clone(),
                routing_score: c.score,
            })
            .collect();
        let routing_reason = routing_reason(&selected, &ranked);

        let latency_class = match self.catalog.find_capability(&req.capability_key).await {
            Ok(Some(capability)) if !capability.latency_class.is_empty() => capability.latency_class,
            Ok(_) => latency_class_for(selected.model.avg_latency_ms).to_string(),
            Err(e) => return Err(router_error(e)),
        };

        let decision_recorded = match &req.interaction_id {
            Some(interaction_id) => {
                let record = RoutingDecisionRecord {
                    interaction_id: interaction_id.clone(),
                    capability_key: req.capability_key.clone(),
                    persona_id: req.persona_id.clone(),
                    selected_model_id: selected.model.model_id.clone(),
                    routing_score: selected.score,
                    routing_reason: routing_reason.clone(),
                    max_cost_per_call: policy.max_cost_per_call,
                    max_latency_ms: policy.max_latency_ms,
                    channel: req.channel,
                    envelope_hash: req.envelope_hash.clone(),
                    alternatives: alternatives.clone(),
                    created_at: chrono::Utc::now(),
                };
                self.record_decision(&record).await
            }
            None => false,
        };

        tracing::info!(
            "routed capability={} persona={} channel={} model={} slug={} score={:.2} candidates={}",
            req.capability_key,
            req.persona_id,
            req.channel,
            selected.model.model_id,
            selected.model.slug,
            selected.score,
            ranked.len()
        );

        Ok(ModelSelection {
            model_id: selected.model.model_id.clone(),
            model_slug: selected.model.slug.clone(),
            routing_score: selected.score,
            cost_estimate: selected.model.cost_per_1k,
            latency_class,
            alternatives,
            routing_reason,
            decision_recorded,
        })
    }

    /// Audit writes never fail the routing call; a failure here leaves a gap
    /// in the decision log that is only visible in the logs.
    async fn record_decision(&self, record: &RoutingDecisionRecord) -> bool {
        match self.decision_log.append_if_absent(record).await {
            Ok(AppendOutcome::Inserted) => true,
            Ok(AppendOutcome::AlreadyPresent) => {
                tracing::debug!(
                    "decision already recorded interaction_id={}, keeping the first write",
                    record.interaction_id
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    "failed to record routing decision interaction_id={} model={}: {:#}",
                    record.interaction_id,
                    record.selected_model_id,
                    e
                );
                false
            }
        }
    }
}

fn validate_request(req: SelectModelRequest) -> Result<ValidatedRequest, RouterFailure> {
    let capability_key = required_field(&req.capability_key, "capability_key")?;
    let persona_id = required_field(&req.persona_id, "persona_id")?;
    if req.channel.trim().is_empty() {
        return Err(RouterFailure::invalid_input("channel is required"));
    }
    let channel = req
        .channel
        .parse::<Channel>()
        .map_err(|e| RouterFailure::invalid_input(&e))?;

    let interaction_id = match req.interaction_id.as_deref() {
        None => None,
        Some(id) => Some(required_field(id, "interaction_id")?),
    };

    Ok(ValidatedRequest {
        capability_key,
        persona_id,
        channel,
        envelope_hash: req.envelope_hash.filter(|h| !h.trim().is_empty()),
        interaction_id,
    })
}

pub fn required_field(value: &str, name: &str) -> Result<String, RouterFailure> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RouterFailure::invalid_input(&format!("{} is required", name)));
    }
    if trimmed.len() > MAX_IDENTIFIER_LEN {
        return Err(RouterFailure::invalid_input(&format!(
            "{} must be at most {} bytes",
            name, MAX_IDENTIFIER_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn routing_reason(selected: &ScoredCandidate, ranked: &[ScoredCandidate]) -> String {
    format!(
        "top_score={:.2}, stability={:.2}, cost_per_1k={}, latency_ms={}, candidates={}, runner_up={}",
        selected.score,
        selected.model.stability_score,
        selected.model.cost_per_1k,
        selected.model.avg_latency_ms,
        ranked.len(),
        ranked
            .get(1)
            .map(|r| r.model.model_id.clone())
            .unwrap_or_else(|| "none".to_string())
    )
}

fn router_error(e: anyhow::Error) -> RouterFailure {
    tracing::error!("model catalog query failed: {:#}", e);
    RouterFailure::new(ErrorCode::RouterError, "model catalog unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(capability: &str, persona: &str, channel: &str) -> SelectModelRequest {
        SelectModelRequest {
            capability_key: capability.to_string(),
            persona_id: persona.to_string(),
            channel: channel.to_string(),
            envelope_hash: None,
            interaction_id: None,
        }
    }

    #[test]
    fn rejects_blank_required_fields() {
        for req in [
            request("", "p1", "web"),
            request("chat-basic", "  ", "web"),
            request("chat-basic", "p1", ""),
        ] {
            let err = validate_request(req).err().map(|e| e.code);
            assert_eq!(err, Some(ErrorCode::InvalidInput));
        }
    }

    #[test]
    fn rejects_unknown_channel() {
        let err = validate_request(request("chat-basic", "p1", "pigeon")).err();
        assert_eq!(err.map(|e| e.code), Some(ErrorCode::InvalidInput));
    }

    #[test]
    fn blank_interaction_id_is_invalid_not_ignored() {
        let mut req = request("chat-basic", "p1", "web");
        req.interaction_id = Some(" ".to_string());
        assert!(validate_request(req).is_err());
    }

    #[test]
    fn trims_identifiers() {
        let ok = validate_request(request(" chat-basic ", " p1 ", "WEB")).ok();
        let ok = ok.map(|v| (v.capability_key, v.persona_id, v.channel));
        assert_eq!(ok, Some(("chat-basic".to_string(), "p1".to_string(), Channel::Web)));
    }
}
