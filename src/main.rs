use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use capability_router::config::AppConfig;
use capability_router::http::middleware::rate_limit::{enforce, RateLimitState};
use capability_router::repo::catalog_repo::CatalogRepo;
use capability_router::repo::persona_policy_repo::PersonaPolicyRepo;
use capability_router::repo::replay_deviations_repo::ReplayDeviationsRepo;
use capability_router::repo::routing_decisions_repo::RoutingDecisionsRepo;
use capability_router::service::model_router::ModelRouter;
use capability_router::service::replay_resolver::ReplayResolver;
use capability_router::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let catalog = Arc::new(CatalogRepo { pool: pool.clone() });
    let decisions = Arc::new(RoutingDecisionsRepo { pool: pool.clone() });

    let model_router = ModelRouter {
        catalog: catalog.clone(),
        policies: Arc::new(PersonaPolicyRepo { pool: pool.clone() }),
        decision_log: decisions.clone(),
    };
    let replay_resolver = ReplayResolver {
        decisions: decisions.clone(),
        catalog,
        deviation_log: Arc::new(ReplayDeviationsRepo { pool: pool.clone() }),
    };

    let state = AppState {
        pool,
        model_router,
        replay_resolver,
        decision_reader: decisions,
        redis_client: redis::Client::open(cfg.redis_url.clone())?,
    };

    let app = Router::new()
        .route("/health", get(capability_router::http::handlers::routing::health))
        .route(
            "/routing/select",
            post(capability_router::http::handlers::routing::select_model),
        )
        .route(
            "/routing/replay/:interaction_id",
            get(capability_router::http::handlers::routing::resolve_replay),
        )
        .route(
            "/routing/decisions/:interaction_id",
            get(capability_router::http::handlers::routing_decisions::get_routing_decision),
        )
        .route("/ops/readiness", get(capability_router::http::handlers::ops::readiness))
        .route("/ops/liveness", get(capability_router::http::handlers::ops::liveness))
        .layer(from_fn_with_state(
            RateLimitState {
                redis_client: redis::Client::open(cfg.redis_url.clone())?,
                max_per_minute: cfg.rate_limit_per_minute,
            },
            enforce,
        ))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
