use crate::domain::catalog::ModelRecord;

pub const STABILITY_WEIGHT: f64 = 0.5;
pub const COST_WEIGHT: f64 = 0.3;
pub const LATENCY_WEIGHT: f64 = 0.2;
/// 100 points lost per $0.05/1k.
pub const COST_PENALTY_PER_UNIT: f64 = 2000.0;
/// 100 points lost per 10,000 ms.
pub const LATENCY_PENALTY_DIVISOR: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreBreakdown {
    pub stability_component: f64,
    pub cost_component: f64,
    pub latency_component: f64,
    pub final_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub model: ModelRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}
