use crate::domain::catalog::{Capability, ModelRecord};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Read-only view of the externally managed model catalog.
#[async_trait::async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Every model that lists the key as supported or disallowed, whatever its
    /// flags. Eligibility is decided by the caller.
    async fn models_for_capability(&self, capability_key: &str) -> Result<Vec<ModelRecord>>;

    async fn find_model(&self, model_id: &str) -> Result<Option<ModelRecord>>;

    async fn find_capability(&self, capability_key: &str) -> Result<Option<Capability>>;
}

#[derive(Clone)]
pub struct CatalogRepo {
    pub pool: PgPool,
}

const MODEL_COLUMNS: &str = "model_id, slug, stability_score, avg_latency_ms, cost_per_1k, supported_capabilities, disallowed_capabilities, is_eligible, is_active";

fn model_from_row(r: &PgRow) -> ModelRecord {
    ModelRecord {
        model_id: r.get("model_id"),
        slug: r.get("slug"),
        stability_score: r.get("stability_score"),
        avg_latency_ms: r.get("avg_latency_ms"),
        cost_per_1k: r.get("cost_per_1k"),
        supported_capabilities: r.get("supported_capabilities"),
        disallowed_capabilities: r.get("disallowed_capabilities"),
        is_eligible: r.get("is_eligible"),
        is_active: r.get("is_active"),
    }
}

#[async_trait::async_trait]
impl ModelCatalog for CatalogRepo {
    async fn models_for_capability(&self, capability_key: &str) -> Result<Vec<ModelRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM models WHERE $1 = ANY(supported_capabilities) OR $1 = ANY(disallowed_capabilities) ORDER BY model_id ASC",
            MODEL_COLUMNS
        ))
        .bind(capability_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(model_from_row).collect())
    }

    async fn find_model(&self, model_id: &str) -> Result<Option<ModelRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM models WHERE model_id=$1", MODEL_COLUMNS))
            .bind(model_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(model_from_row))
    }

    async fn find_capability(&self, capability_key: &str) -> Result<Option<Capability>> {
        let row = sqlx::query(
            "SELECT capability_key, latency_class, risk_class, replay_tolerance, required_modalities FROM capabilities WHERE capability_key=$1",
        )
        .bind(capability_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Capability {
            capability_key: r.get("capability_key"),
            latency_class: r.get("latency_class"),
            risk_class: r.get("risk_class"),
            replay_tolerance: r.get("replay_tolerance"),
            required_modalities: r.get("required_modalities"),
        }))
    }
}
