use crate::domain::catalog::ModelRecord;

pub fn is_eligible_for(model: &ModelRecord, capability_key: &str) -> bool {
    model.is_active
        && model.is_eligible
        && model.supports(capability_key)
        && !model.disallows(capability_key)
}

pub fn filter_eligible(models: &[ModelRecord], capability_key: &str) -> Vec<ModelRecord> {
    models
        .iter()
        .filter(|m| is_eligible_for(m, capability_key))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, active: bool, eligible: bool, disallowed: &[&str]) -> ModelRecord {
        ModelRecord {
            model_id: id.to_string(),
            slug: id.to_string(),
            stability_score: 90.0,
            avg_latency_ms: 300,
            cost_per_1k: 0.01,
            supported_capabilities: vec!["summarize-short".to_string()],
            disallowed_capabilities: disallowed.iter().map(|s| s.to_string()).collect(),
            is_eligible: eligible,
            is_active: active,
        }
    }

    #[test]
    fn keeps_only_active_eligible_supporting_models() {
        let models = vec![
            model("ok", true, true, &[]),
            model("inactive", false, true, &[]),
            model("killed", true, false, &[]),
            model("blocked", true, true, &["summarize-short"]),
        ];
        let out = filter_eligible(&models, "summarize-short");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].model_id, "ok");
    }

    #[test]
    fn unsupported_capability_yields_nothing() {
        let models = vec![model("ok", true, true, &[])];
        assert!(filter_eligible(&models, "vision-rare").is_empty());
    }
}
