use capability_router::domain::catalog::{ModelRecord, PersonaPolicy};
use capability_router::router::budget::enforce_budget;
use capability_router::router::eligibility::filter_eligible;
use capability_router::scoring::engine::rank_models;

#[test]
fn identical_models_fall_back_to_model_id() {
    let b = model("model-b", 90.0, 0.010, 300);
    let a = model("model-a", 90.0, 0.010, 300);

    let ranked = rank_models(&[b, a]);
    assert_eq!(ranked[0].score, ranked[1].score);
    assert_eq!(ranked[0].score, 88.4);
    assert_eq!(ranked[0].model.model_id, "model-a");
}

#[test]
fn higher_score_beats_lower_model_id() {
    let weak = model("aaa", 60.0, 0.03, 2000);
    let strong = model("zzz", 95.0, 0.005, 250);

    let ranked = rank_models(&[weak, strong]);
    assert_eq!(ranked.first().map(|c| c.model.model_id.as_str()), Some("zzz"));
}

#[test]
fn ranking_is_repeatable() {
    let models = vec![
        model("m1", 88.0, 0.012, 700),
        model("m2", 91.0, 0.020, 450),
        model("m3", 88.0, 0.012, 700),
        model("m4", 70.0, 0.001, 150),
    ];
    let first: Vec<(String, f64)> = rank_models(&models)
        .into_iter()
        .map(|c| (c.model.model_id, c.score))
        .collect();

    for _ in 0..50 {
        let again: Vec<(String, f64)> = rank_models(&models)
            .into_iter()
            .map(|c| (c.model.model_id, c.score))
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn tightening_cost_ceiling_never_grows_candidates() {
    let models = vec![
        model("c1", 80.0, 0.001, 200),
        model("c2", 80.0, 0.010, 200),
        model("c3", 80.0, 0.020, 200),
        model("c4", 80.0, 0.050, 200),
    ];
    let eligible = filter_eligible(&models, "chat-basic");

    let mut previous = usize::MAX;
    for ceiling in [1.0, 0.05, 0.02, 0.01, 0.005, 0.0] {
        let policy = PersonaPolicy {
            max_cost_per_call: Some(ceiling),
            max_latency_ms: None,
        };
        let kept = enforce_budget(eligible.clone(), &policy).within_budget.len();
        assert!(kept <= previous, "ceiling {} kept {} > {}", ceiling, kept, previous);
        previous = kept;
    }
    assert_eq!(previous, 0);
}

fn model(id: &str, stability: f64, cost: f64, latency: i32) -> ModelRecord {
    ModelRecord {
        model_id: id.to_string(),
        slug: format!("{} display name", id),
        stability_score: stability,
        avg_latency_ms: latency,
        cost_per_1k: cost,
        supported_capabilities: vec!["chat-basic".to_string()],
        disallowed_capabilities: vec![],
        is_eligible: true,
        is_active: true,
    }
}
