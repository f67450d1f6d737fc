pub mod config;
pub mod domain {
    pub mod catalog;
    pub mod replay;
    pub mod routing;
    pub mod routing_decision;
}
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod routing;
        pub mod routing_decisions;
    }
    pub mod middleware {
        pub mod rate_limit;
    }
}
pub mod repo {
    pub mod catalog_repo;
    pub mod memory;
    pub mod persona_policy_repo;
    pub mod replay_deviations_repo;
    pub mod routing_decisions_repo;
}
pub mod router {
    pub mod budget;
    pub mod eligibility;
}
pub mod scoring {
    pub mod engine;
    pub mod types;
}
pub mod service {
    pub mod model_router;
    pub mod replay_audit;
    pub mod replay_resolver;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub model_router: service::model_router::ModelRouter,
    pub replay_resolver: service::replay_resolver::ReplayResolver,
    pub decision_reader: Arc<dyn repo::routing_decisions_repo::DecisionReader>,
    pub redis_client: redis::Client,
}
