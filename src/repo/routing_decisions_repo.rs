use crate::domain::catalog::Channel;
use crate::domain::routing_decision::{Alternative, AppendOutcome, RoutingDecisionRecord};
use anyhow::{anyhow, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Write-once decision log. There is intentionally no update or delete.
#[async_trait::async_trait]
pub trait DecisionLog: Send + Sync {
    async fn append_if_absent(&self, record: &RoutingDecisionRecord) -> Result<AppendOutcome>;
}

#[async_trait::async_trait]
pub trait DecisionReader: Send + Sync {
    async fn find_by_interaction_id(&self, interaction_id: &str) -> Result<Option<RoutingDecisionRecord>>;

    /// Newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<RoutingDecisionRecord>>;
}

#[derive(Clone)]
pub struct RoutingDecisionsRepo {
    pub pool: PgPool,
}

const DECISION_COLUMNS: &str = r#"
    interaction_id, capability_key, persona_id, selected_model_id, routing_score, routing_reason,
    max_cost_per_call, max_latency_ms, channel, envelope_hash, alternatives, created_at
"#;

fn decision_from_row(r: &PgRow) -> Result<RoutingDecisionRecord> {
    let channel: String = r.get("channel");
    let alternatives: serde_json::Value = r.get("alternatives");
    Ok(RoutingDecisionRecord {
        interaction_id: r.get("interaction_id"),
        capability_key: r.get("capability_key"),
        persona_id: r.get("persona_id"),
        selected_model_id: r.get("selected_model_id"),
        routing_score: r.get("routing_score"),
        routing_reason: r.get("routing_reason"),
        max_cost_per_call: r.get("max_cost_per_call"),
        max_latency_ms: r.get("max_latency_ms"),
        channel: channel.parse::<Channel>().map_err(|e| anyhow!(e))?,
        envelope_hash: r.get("envelope_hash"),
        alternatives: serde_json::from_value::<Vec<Alternative>>(alternatives)?,
        created_at: r.get("created_at"),
    })
}

#[async_trait::async_trait]
impl DecisionLog for RoutingDecisionsRepo {
    async fn append_if_absent(&self, record: &RoutingDecisionRecord) -> Result<AppendOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO routing_decisions (
                interaction_id,
                capability_key,
                persona_id,
                selected_model_id,
                routing_score,
                routing_reason,
                max_cost_per_call,
                max_latency_ms,
                channel,
                envelope_hash,
                alternatives,
                created_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
            ON CONFLICT (interaction_id) DO NOTHING
            "#,
        )
        .bind(&record.interaction_id)
        .bind(&record.capability_key)
        .bind(&record.persona_id)
        .bind(&record.selected_model_id)
        .bind(record.routing_score)
        .bind(&record.routing_reason)
        .bind(record.max_cost_per_call)
        .bind(record.max_latency_ms)
        .bind(record.channel.as_str())
        .bind(&record.envelope_hash)
        .bind(serde_json::to_value(&record.alternatives)?)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(AppendOutcome::AlreadyPresent)
        } else {
            Ok(AppendOutcome::Inserted)
        }
    }
}

#[async_trait::async_trait]
impl DecisionReader for RoutingDecisionsRepo {
    async fn find_by_interaction_id(&self, interaction_id: &str) -> Result<Option<RoutingDecisionRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM routing_decisions WHERE interaction_id=$1",
            DECISION_COLUMNS
        ))
        .bind(interaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decision_from_row).transpose()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RoutingDecisionRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM routing_decisions ORDER BY created_at DESC, interaction_id ASC LIMIT $1",
            DECISION_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decision_from_row).collect()
    }
}
