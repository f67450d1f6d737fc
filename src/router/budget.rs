use crate::domain::catalog::{ModelRecord, PersonaPolicy};

#[derive(Debug, Clone)]
pub struct BudgetOutcome {
    pub within_budget: Vec<ModelRecord>,
    pub models_checked: usize,
    pub excluded_by_cost: usize,
    pub excluded_by_latency: usize,
}

impl BudgetOutcome {
    pub fn excluded(&self) -> usize {
        self.models_checked - self.within_budget.len()
    }
}

pub fn fits_cost(model: &ModelRecord, policy: &PersonaPolicy) -> bool {
    policy
        .max_cost_per_call
        .map_or(true, |ceiling| model.cost_per_1k <= ceiling)
}

pub fn fits_latency(model: &ModelRecord, policy: &PersonaPolicy) -> bool {
    policy
        .max_latency_ms
        .map_or(true, |ceiling| model.avg_latency_ms <= ceiling)
}

/// A model failing both ceilings counts toward `excluded_by_cost` only.
pub fn enforce_budget(eligible: Vec<ModelRecord>, policy: &PersonaPolicy) -> BudgetOutcome {
    let models_checked = eligible.len();
    let mut excluded_by_cost = 0;
    let mut excluded_by_latency = 0;
    let mut within_budget = Vec::with_capacity(models_checked);

    for model in eligible {
        if !fits_cost(&model, policy) {
            excluded_by_cost += 1;
        } else if !fits_latency(&model, policy) {
            excluded_by_latency += 1;
        } else {
            within_budget.push(model);
        }
    }

    BudgetOutcome {
        within_budget,
        models_checked,
        excluded_by_cost,
        excluded_by_latency,
    }
}
