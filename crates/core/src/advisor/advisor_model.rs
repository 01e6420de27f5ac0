use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const RISK_REGISTER_MAX_TOKENS: u32 = 3000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// No generator is configured (for example, a missing API key).
    #[error("Text generation is not configured")]
    Unavailable,

    #[error("Text generation failed: {0}")]
    Provider(String),

    #[error("Text generation returned no content")]
    Empty,
}

/// Produces free text for a system and user prompt pair.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError>;
}

/// A fully built request for the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// The client profile quoted in portfolio prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPolicy {
    pub risk_profile: String,
    pub investment_horizon: String,
    pub tax_jurisdiction: String,
    pub consider_capital_gains_deferral: bool,
}

impl Default for InvestmentPolicy {
    fn default() -> Self {
        Self {
            risk_profile: "aggressive".to_string(),
            investment_horizon: "mixed".to_string(),
            tax_jurisdiction: "Canada".to_string(),
            consider_capital_gains_deferral: true,
        }
    }
}
