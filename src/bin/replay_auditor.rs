use anyhow::Result;
use capability_router::config::AppConfig;
use capability_router::repo::catalog_repo::CatalogRepo;
use capability_router::repo::replay_deviations_repo::ReplayDeviationsRepo;
use capability_router::repo::routing_decisions_repo::RoutingDecisionsRepo;
use capability_router::service::replay_audit::audit_recent;
use capability_router::service::replay_resolver::ReplayResolver;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let pool = PgPoolOptions::new().max_connections(5).connect(&cfg.database_url).await?;
    let decisions = Arc::new(RoutingDecisionsRepo { pool: pool.clone() });
    let resolver = ReplayResolver {
        decisions: decisions.clone(),
        catalog: Arc::new(CatalogRepo { pool: pool.clone() }),
        deviation_log: Arc::new(ReplayDeviationsRepo { pool }),
    };

    loop {
        match audit_recent(decisions.as_ref(), &resolver, cfg.replay_audit_batch_size).await {
            Ok(summary) => tracing::info!(
                "replay audit checked={} exact={} deviations={} failed={} by_reason={:?}",
                summary.checked,
                summary.exact,
                summary.deviations,
                summary.failed,
                summary.by_reason
            ),
            Err(e) => tracing::error!("replay audit sweep failed: {:#}", e),
        }

        tokio::time::sleep(std::time::Duration::from_secs(cfg.replay_audit_interval_secs)).await;
    }
}
