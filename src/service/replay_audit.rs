use crate::domain::replay::ReplayResult;
use crate::repo::routing_decisions_repo::DecisionReader;
use crate::service::replay_resolver::ReplayResolver;
use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct AuditSummary {
    pub checked: usize,
    pub exact: usize,
    pub deviations: usize,
    pub failed: usize,
    pub by_reason: BTreeMap<String, usize>,
}

/// Replays the `limit` most recent decisions against the current catalog.
/// Deviations are persisted by the resolver itself.
pub async fn audit_recent(
    decisions: &dyn DecisionReader,
    resolver: &ReplayResolver,
    limit: i64,
) -> Result<AuditSummary> {
    let recent = decisions.list_recent(limit).await?;
    let mut summary = AuditSummary::default();

    for decision in recent {
        summary.checked += 1;
        match resolver.resolve_model_for_replay(&decision.interaction_id).await {
            Ok(ReplayResult::Exact(_)) => summary.exact += 1,
            Ok(ReplayResult::Deviation(d)) => {
                summary.deviations += 1;
                *summary
                    .by_reason
                    .entry(d.deviation_reason.as_str().to_string())
                    .or_insert(0) += 1;
            }
            Err(failure) => {
                summary.failed += 1;
                tracing::warn!(
                    "replay audit could not resolve interaction_id={}: {}",
                    decision.interaction_id,
                    failure.message
                );
            }
        }
    }

    Ok(summary)
}
