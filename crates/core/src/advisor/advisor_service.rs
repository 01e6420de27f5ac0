use log::{debug, error, warn};
use std::sync::Arc;

use super::advisor_model::{GenerationError, InvestmentPolicy, Prompt, TextGenerator};
use super::advisor_prompts::{
    mitigation_prompt, portfolio_analysis_prompt, rebalancing_prompt, risk_assessment_prompt,
    risk_register_prompt, scenario_analysis_prompt,
};
use crate::portfolio::allocation::TargetAllocation;
use crate::portfolio::holdings::PortfolioSnapshot;
use crate::portfolio::scenarios::Scenario;
use crate::risks::Risk;

/// Turns analytics into advisory text. Every operation yields `None` when
/// the generator is unavailable or fails.
pub struct AdvisorService {
    generator: Arc<dyn TextGenerator>,
    policy: InvestmentPolicy,
}

impl AdvisorService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            policy: InvestmentPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InvestmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &InvestmentPolicy {
        &self.policy
    }

    async fn run(&self, operation: &str, prompt: Prompt) -> Option<String> {
        debug!(
            "Advisor {}: {} prompt chars, max {} tokens",
            operation,
            prompt.system.len() + prompt.user.len(),
            prompt.max_tokens
        );
        match self
            .generator
            .generate(&prompt.system, &prompt.user, prompt.max_tokens)
            .await
        {
            Ok(text) if text.trim().is_empty() => {
                warn!("Advisor {}: {}", operation, GenerationError::Empty);
                None
            }
            Ok(text) => Some(text),
            Err(GenerationError::Unavailable) => {
                warn!("Advisor {} skipped: generator not configured", operation);
                None
            }
            Err(e) => {
                error!("Advisor {} failed: {}", operation, e);
                None
            }
        }
    }

    pub async fn portfolio_analysis(&self, snapshot: &PortfolioSnapshot) -> Option<String> {
        self.run(
            "portfolio analysis",
            portfolio_analysis_prompt(snapshot, &self.policy),
        )
        .await
    }

    pub async fn rebalancing_recommendations(
        &self,
        snapshot: &PortfolioSnapshot,
        targets: &TargetAllocation,
    ) -> Option<String> {
        self.run("rebalancing", rebalancing_prompt(snapshot, targets))
            .await
    }

    pub async fn risk_assessment(&self, snapshot: &PortfolioSnapshot) -> Option<String> {
        self.run("risk assessment", risk_assessment_prompt(snapshot))
            .await
    }

    pub async fn scenario_analysis(
        &self,
        snapshot: &PortfolioSnapshot,
        scenario: &Scenario,
    ) -> Option<String> {
        self.run("scenario analysis", scenario_analysis_prompt(snapshot, scenario))
            .await
    }

    pub async fn risk_register_analysis(
        &self,
        risks: &[Risk],
        snapshot: &PortfolioSnapshot,
    ) -> Option<String> {
        self.run("risk register", risk_register_prompt(risks, snapshot))
            .await
    }

    pub async fn mitigation_suggestions(&self, risk: &Risk) -> Option<String> {
        self.run("mitigation", mitigation_prompt(risk)).await
    }
}
