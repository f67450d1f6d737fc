use crate::domain::replay::ReplayDeviationRecord;
use crate::domain::routing_decision::AppendOutcome;
use anyhow::Result;
use sqlx::PgPool;

#[async_trait::async_trait]
pub trait DeviationLog: Send + Sync {
    /// Appends unless the latest row for the interaction already carries the
    /// same reason.
    async fn record(&self, deviation: &ReplayDeviationRecord) -> Result<AppendOutcome>;
}

#[derive(Clone)]
pub struct ReplayDeviationsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl DeviationLog for ReplayDeviationsRepo {
    async fn record(&self, deviation: &ReplayDeviationRecord) -> Result<AppendOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO routing_replay_deviations (
                deviation_id,
                interaction_id,
                original_model_id,
                deviation_reason,
                deviation_details,
                detected_at
            )
            SELECT $1::uuid, $2::text, $3::text, $4::text, $5::jsonb, $6::timestamptz
            WHERE COALESCE(
                (
                    SELECT deviation_reason
                    FROM routing_replay_deviations
                    WHERE interaction_id = $2
                    ORDER BY detected_at DESC
                    LIMIT 1
                ),
                ''
            ) <> $4
            "#,
        )
        .bind(deviation.deviation_id)
        .bind(&deviation.interaction_id)
        .bind(&deviation.original_model_id)
        .bind(deviation.deviation_reason.as_str())
        .bind(serde_json::to_value(&deviation.deviation_details)?)
        .bind(deviation.detected_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(AppendOutcome::AlreadyPresent)
        } else {
            Ok(AppendOutcome::Inserted)
        }
    }
}
