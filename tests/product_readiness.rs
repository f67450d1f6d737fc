#[test]
fn config_defaults_are_usable() {
    let cfg = capability_router::config::AppConfig::from_env();
    assert!(!cfg.database_url.is_empty());
    assert!(cfg.rate_limit_per_minute > 0);
    assert!(cfg.replay_audit_batch_size > 0);
}

#[test]
fn routing_endpoints_exist_in_readme() {
    let readme = std::fs::read_to_string("README.md").unwrap_or_default();
    assert!(readme.contains("/routing/select"));
    assert!(readme.contains("/routing/replay/:interaction_id"));
    assert!(readme.contains("/ops/readiness"));
}

#[test]
fn migrations_keep_decisions_append_only() {
    let sql = std::fs::read_to_string("migrations/0002_routing_decisions.sql").unwrap_or_default();
    assert!(sql.contains("interaction_id TEXT PRIMARY KEY"));
    assert!(sql.contains("BEFORE UPDATE OR DELETE"));
}
