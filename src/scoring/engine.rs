use crate::domain::catalog::ModelRecord;
use crate::scoring::types::{
    ScoreBreakdown, ScoredCandidate, COST_PENALTY_PER_UNIT, COST_WEIGHT, LATENCY_PENALTY_DIVISOR,
    LATENCY_WEIGHT, STABILITY_WEIGHT,
};
use std::cmp::Ordering;

pub fn cost_component(cost_per_1k: f64) -> f64 {
    (100.0 - cost_per_1k * COST_PENALTY_PER_UNIT).max(0.0)
}

pub fn latency_component(avg_latency_ms: i32) -> f64 {
    (100.0 - avg_latency_ms as f64 / LATENCY_PENALTY_DIVISOR).max(0.0)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn clamp_score(v: f64) -> f64 {
    if v < 0.0 {
        0.0
    } else if v > 100.0 {
        100.0
    } else {
        v
    }
}

pub fn score_model(model: &ModelRecord) -> ScoredCandidate {
    let stability = clamp_score(model.stability_score);
    let cost = cost_component(model.cost_per_1k);
    let latency = latency_component(model.avg_latency_ms);

    let raw = stability * STABILITY_WEIGHT + cost * COST_WEIGHT + latency * LATENCY_WEIGHT;
    let final_score = round2(clamp_score(raw));

    ScoredCandidate {
        model: model.clone(),
        score: final_score,
        breakdown: ScoreBreakdown {
            stability_component: stability,
            cost_component: cost,
            latency_component: latency,
            final_score,
        },
    }
}

/// Total order: score desc, stability desc, cost asc, latency asc, model id asc.
pub fn compare_candidates(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.model.stability_score.total_cmp(&a.model.stability_score))
        .then_with(|| a.model.cost_per_1k.total_cmp(&b.model.cost_per_1k))
        .then_with(|| a.model.avg_latency_ms.cmp(&b.model.avg_latency_ms))
        .then_with(|| a.model.model_id.cmp(&b.model.model_id))
}

pub fn rank_models(models: &[ModelRecord]) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = models.iter().map(score_model).collect();
    ranked.sort_by(compare_candidates);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, stability: f64, cost: f64, latency: i32) -> ModelRecord {
        ModelRecord {
            model_id: id.to_string(),
            slug: format!("{}-slug", id),
            stability_score: stability,
            avg_latency_ms: latency,
            cost_per_1k: cost,
            supported_capabilities: vec!["chat-basic".to_string()],
            disallowed_capabilities: vec![],
            is_eligible: true,
            is_active: true,
        }
    }

    #[test]
    fn components_floor_at_zero() {
        assert_eq!(cost_component(0.06), 0.0);
        assert_eq!(latency_component(12_000), 0.0);
        assert_eq!(cost_component(0.0), 100.0);
    }

    #[test]
    fn score_matches_fixed_formula() {
        let scored = score_model(&model("a", 90.0, 0.010, 300));
        assert_eq!(scored.breakdown.cost_component, 80.0);
        assert_eq!(scored.breakdown.latency_component, 97.0);
        assert_eq!(scored.score, 88.4);
    }

    #[test]
    fn score_is_rounded_to_two_places() {
        let scored = score_model(&model("a", 77.777, 0.0123, 1234));
        assert_eq!(scored.score, round2(scored.score));
    }

    #[test]
    fn tie_breaks_walk_the_chain() {
        // same score, higher stability wins
        let a = score_model(&model("a", 80.0, 0.01, 300));
        let mut b = a.clone();
        b.model.model_id = "b".to_string();
        b.model.stability_score = 81.0;
        assert_eq!(compare_candidates(&b, &a), Ordering::Less);

        // same score and stability, cheaper wins
        let mut c = a.clone();
        c.model.model_id = "c".to_string();
        c.model.cost_per_1k = 0.005;
        assert_eq!(compare_candidates(&c, &a), Ordering::Less);

        // only latency differs
        let mut d = a.clone();
        d.model.model_id = "d".to_string();
        d.model.avg_latency_ms = 200;
        assert_eq!(compare_candidates(&d, &a), Ordering::Less);
    }

    #[test]
    fn ranking_ignores_input_order() {
        let models = vec![
            model("z", 70.0, 0.02, 900),
            model("m", 95.0, 0.03, 400),
            model("a", 70.0, 0.02, 900),
        ];
        let mut reversed = models.clone();
        reversed.reverse();

        let ids = |v: Vec<ScoredCandidate>| v.into_iter().map(|c| c.model.model_id).collect::<Vec<_>>();
        assert_eq!(ids(rank_models(&models)), ids(rank_models(&reversed)));
        assert_eq!(ids(rank_models(&models)), vec!["m", "a", "z"]);
    }
}
