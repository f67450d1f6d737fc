use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A routable model backend as the management plane currently describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRecord {
    pub model_id: String,
    /// Human-readable name. Only ever written to logs.
    pub slug: String,
    pub stability_score: f64,
    pub avg_latency_ms: i32,
    pub cost_per_1k: f64,
    pub supported_capabilities: Vec<String>,
    pub disallowed_capabilities: Vec<String>,
    pub is_eligible: bool,
    pub is_active: bool,
}

impl ModelRecord {
    pub fn supports(&self, capability_key: &str) -> bool {
        self.supported_capabilities.iter().any(|c| c == capability_key)
    }

    pub fn disallows(&self, capability_key: &str) -> bool {
        self.disallowed_capabilities.iter().any(|c| c == capability_key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    pub capability_key: String,
    pub latency_class: String,
    pub risk_class: String,
    pub replay_tolerance: String,
    pub required_modalities: Vec<String>,
}

/// Per-persona ceilings. `None` leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaPolicy {
    pub max_cost_per_call: Option<f64>,
    pub max_latency_ms: Option<i32>,
}

impl PersonaPolicy {
    pub fn unconstrained() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Web,
    Api,
    Email,
    Chat,
    Voice,
    Batch,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Web => "web",
            Channel::Api => "api",
            Channel::Email => "email",
            Channel::Chat => "chat",
            Channel::Voice => "voice",
            Channel::Batch => "batch",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" => Ok(Channel::Web),
            "api" => Ok(Channel::Api),
            "email" => Ok(Channel::Email),
            "chat" => Ok(Channel::Chat),
            "voice" => Ok(Channel::Voice),
            "batch" => Ok(Channel::Batch),
            other => Err(format!("unknown channel '{}'", other)),
        }
    }
}

/// Fallback when the capability row carries no latency class.
pub fn latency_class_for(avg_latency_ms: i32) -> &'static str {
    if avg_latency_ms < 1000 {
        "fast"
    } else if avg_latency_ms < 5000 {
        "standard"
    } else {
        "slow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parse_is_case_insensitive() {
        assert_eq!("EMAIL".parse::<Channel>(), Ok(Channel::Email));
        assert_eq!(" api ".parse::<Channel>(), Ok(Channel::Api));
        assert!("fax".parse::<Channel>().is_err());
    }

    #[test]
    fn latency_class_buckets() {
        assert_eq!(latency_class_for(300), "fast");
        assert_eq!(latency_class_for(1000), "standard");
        assert_eq!(latency_class_for(5000), "slow");
    }

    #[test]
    fn disallow_is_independent_of_support() {
        let model = ModelRecord {
            model_id: "m".to_string(),
            slug: "m".to_string(),
            stability_score: 50.0,
            avg_latency_ms: 100,
            cost_per_1k: 0.01,
            supported_capabilities: vec!["a".to_string()],
            disallowed_capabilities: vec!["a".to_string()],
            is_eligible: true,
            is_active: true,
        };
        assert!(model.supports("a"));
        assert!(model.disallows("a"));
        assert!(!model.supports("b"));
    }
}
