//! In-process implementations of the repository traits, for tests and local
//! runs without Postgres.

use crate::domain::catalog::{Capability, ModelRecord, PersonaPolicy};
use crate::domain::replay::ReplayDeviationRecord;
use crate::domain::routing_decision::{AppendOutcome, RoutingDecisionRecord};
use crate::repo::catalog_repo::ModelCatalog;
use crate::repo::persona_policy_repo::PersonaPolicySource;
use crate::repo::replay_deviations_repo::DeviationLog;
use crate::repo::routing_decisions_repo::{DecisionLog, DecisionReader};
use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError, RwLock};

/// Catalog and persona policies. The mutators stand in for the external
/// management plane.
#[derive(Default)]
pub struct InMemoryCatalog {
    models: RwLock<BTreeMap<String, ModelRecord>>,
    capabilities: RwLock<HashMap<String, Capability>>,
    policies: RwLock<HashMap<String, PersonaPolicy>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(models: Vec<ModelRecord>) -> Self {
        let catalog = Self::new();
        for model in models {
            catalog.upsert_model(model);
        }
        catalog
    }

    pub fn upsert_model(&self, model: ModelRecord) {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        models.insert(model.model_id.clone(), model);
    }

    pub fn remove_model(&self, model_id: &str) {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        models.remove(model_id);
    }

    /// Applies `change` to an existing model. Returns false when the id is unknown.
    pub fn update_model(&self, model_id: &str, change: impl FnOnce(&mut ModelRecord)) -> bool {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        match models.get_mut(model_id) {
            Some(model) => {
                change(model);
                true
            }
            None => false,
        }
    }

    pub fn upsert_capability(&self, capability: Capability) {
        let mut capabilities = self.capabilities.write().unwrap_or_else(PoisonError::into_inner);
        capabilities.insert(capability.capability_key.clone(), capability);
    }

    pub fn set_policy(&self, persona_id: &str, policy: PersonaPolicy) {
        let mut policies = self.policies.write().unwrap_or_else(PoisonError::into_inner);
        policies.insert(persona_id.to_string(), policy);
    }
}

#[async_trait::async_trait]
impl ModelCatalog for InMemoryCatalog {
    async fn models_for_capability(&self, capability_key: &str) -> Result<Vec<ModelRecord>> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        Ok(models
            .values()
            .filter(|m| m.supports(capability_key) || m.disallows(capability_key))
            .cloned()
            .collect())
    }

    async fn find_model(&self, model_id: &str) -> Result<Option<ModelRecord>> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        Ok(models.get(model_id).cloned())
    }

    async fn find_capability(&self, capability_key: &str) -> Result<Option<Capability>> {
        let capabilities = self.capabilities.read().unwrap_or_else(PoisonError::into_inner);
        Ok(capabilities.get(capability_key).cloned())
    }
}

#[async_trait::async_trait]
impl PersonaPolicySource for InMemoryCatalog {
    async fn find_policy(&self, persona_id: &str) -> Result<Option<PersonaPolicy>> {
        let policies = self.policies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(policies.get(persona_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryDecisionLog {
    records: Mutex<HashMap<String, RoutingDecisionRecord>>,
}

impl InMemoryDecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl DecisionLog for InMemoryDecisionLog {
    async fn append_if_absent(&self, record: &RoutingDecisionRecord) -> Result<AppendOutcome> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&record.interaction_id) {
            return Ok(AppendOutcome::AlreadyPresent);
        }
        records.insert(record.interaction_id.clone(), record.clone());
        Ok(AppendOutcome::Inserted)
    }
}

#[async_trait::async_trait]
impl DecisionReader for InMemoryDecisionLog {
    async fn find_by_interaction_id(&self, interaction_id: &str) -> Result<Option<RoutingDecisionRecord>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(interaction_id).cloned())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RoutingDecisionRecord>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<RoutingDecisionRecord> = records.values().cloned().collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.interaction_id.cmp(&b.interaction_id))
        });
        out.truncate(limit.max(0) as usize);
        Ok(out)
    }
}

#[derive(Default)]
pub struct InMemoryDeviationLog {
    entries: Mutex<Vec<ReplayDeviationRecord>>,
}

impl InMemoryDeviationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ReplayDeviationRecord> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait::async_trait]
impl DeviationLog for InMemoryDeviationLog {
    async fn record(&self, deviation: &ReplayDeviationRecord) -> Result<AppendOutcome> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let latest = entries
            .iter()
            .rev()
            .find(|e| e.interaction_id == deviation.interaction_id);
        if latest.is_some_and(|e| e.deviation_reason == deviation.deviation_reason) {
            return Ok(AppendOutcome::AlreadyPresent);
        }
        entries.push(deviation.clone());
        Ok(AppendOutcome::Inserted)
    }
}
