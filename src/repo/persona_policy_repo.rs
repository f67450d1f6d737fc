use crate::domain::catalog::PersonaPolicy;
use anyhow::Result;
use sqlx::{PgPool, Row};

#[async_trait::async_trait]
pub trait PersonaPolicySource: Send + Sync {
    async fn find_policy(&self, persona_id: &str) -> Result<Option<PersonaPolicy>>;
}

#[derive(Clone)]
pub struct PersonaPolicyRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl PersonaPolicySource for PersonaPolicyRepo {
    async fn find_policy(&self, persona_id: &str) -> Result<Option<PersonaPolicy>> {
        let row = sqlx::query(
            "SELECT max_cost_per_call, max_latency_ms FROM persona_policies WHERE persona_id=$1",
        )
        .bind(persona_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| PersonaPolicy {
            max_cost_per_call: r.get("max_cost_per_call"),
            max_latency_ms: r.get("max_latency_ms"),
        }))
    }
}
