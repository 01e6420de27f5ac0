//! Pure prompt builders. Nothing here touches the generator.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::advisor_model::{InvestmentPolicy, Prompt, DEFAULT_MAX_TOKENS, RISK_REGISTER_MAX_TOKENS};
use crate::portfolio::allocation::TargetAllocation;
use crate::portfolio::holdings::PortfolioSnapshot;
use crate::portfolio::scenarios::Scenario;
use crate::risks::Risk;

const TOP_HOLDINGS: usize = 10;
const MITIGATION_EXCERPT_CHARS: usize = 100;

const PORTFOLIO_ANALYSIS_SYSTEM: &str = "\
You are an expert investment advisor for a Canadian single family office.
You provide thoughtful, actionable advice considering:
- The client's aggressive risk profile
- Mixed investment horizon (cash flow needs + generational wealth)
- Canadian tax implications and capital gains deferral strategies
- Portfolio concentration and liquidity concerns

Provide clear, structured analysis with specific recommendations.
Use Canadian dollar figures. Be direct and professional.";

const REBALANCING_SYSTEM: &str = "\
You are an investment advisor specializing in portfolio rebalancing for high-net-worth Canadian clients.
Consider transaction costs, tax implications, and market timing when making recommendations.
Be specific about which positions to adjust and by how much.";

const RISK_ASSESSMENT_SYSTEM: &str = "\
You are a risk management expert for investment portfolios.
Identify and quantify risks clearly. Provide specific mitigation strategies.
Consider concentration risk, liquidity risk, market risk, and currency risk.";

const SCENARIO_SYSTEM: &str = "\
You are a portfolio stress testing expert.
Provide realistic estimates of portfolio impact under various scenarios.
Be specific about which holdings would be most affected and why.";

const RISK_REGISTER_SYSTEM: &str = "\
You are a risk management expert for a Canadian single family office.
You analyze risk registers and provide actionable insights on:
- Overall risk posture and trends
- Gaps in risk identification
- Prioritization of risks requiring immediate attention
- Correlation between risks that could compound
- Comparison to typical family office risk profiles
Be specific, structured, and professional. Use markdown formatting.";

const MITIGATION_SYSTEM: &str = "\
You are a risk mitigation specialist for high-net-worth families and family offices.
Provide specific, actionable mitigation strategies that are practical to implement.
Consider insurance, legal structures, operational controls, and contingency planning.
Use markdown formatting.";

/// Formats `value` with `dp` decimals and comma thousands separators.
pub fn format_amount(value: Decimal, dp: u32) -> String {
    let fixed = format!("{:.*}", dp as usize, value.round_dp(dp));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn one_dp(value: Decimal) -> String {
    format!("{:.1}", value.round_dp(1))
}

fn signed_pct(pct: Decimal) -> String {
    if pct >= Decimal::ZERO {
        format!("+{}%", one_dp(pct))
    } else {
        format!("{}%", one_dp(pct))
    }
}

/// The portfolio block shared by every portfolio-level prompt: totals,
/// class and entity breakdowns, then the ten largest holdings.
pub fn format_portfolio(snapshot: &PortfolioSnapshot) -> String {
    let summary = &snapshot.summary;
    let ccy = &summary.reporting_currency;
    let mut lines = vec![
        format!("Total Portfolio Value: {} {}", ccy, format_amount(summary.total_value, 2)),
        format!("Total Cost Basis: {} {}", ccy, format_amount(summary.total_cost, 2)),
        format!(
            "Total Gain/Loss: {} {} ({}%)",
            ccy,
            format_amount(summary.total_gain, 2),
            one_dp(summary.total_gain_pct)
        ),
        format!("Number of Positions: {}", summary.holding_count),
        String::new(),
        "Allocation by Asset Class:".to_string(),
    ];

    let mut classes: Vec<_> = snapshot.by_asset_class.iter().collect();
    classes.sort_by(|a, b| b.1.value.cmp(&a.1.value));
    for (class, totals) in classes {
        lines.push(format!(
            "  - {}: {} {} ({}%)",
            class,
            ccy,
            format_amount(totals.value, 0),
            one_dp(totals.weight)
        ));
    }

    lines.push(String::new());
    lines.push("Allocation by Entity:".to_string());
    for totals in snapshot.by_entity.values() {
        lines.push(format!(
            "  - {}: {} {} ({}%)",
            totals.label,
            ccy,
            format_amount(totals.value, 0),
            one_dp(totals.weight)
        ));
    }

    lines.push(String::new());
    lines.push("Top 10 Holdings:".to_string());
    let mut holdings: Vec<_> = snapshot.holdings.iter().collect();
    holdings.sort_by(|a, b| b.value.cmp(&a.value));
    for h in holdings.into_iter().take(TOP_HOLDINGS) {
        lines.push(format!(
            "  - {} ({}): {} {} ({}%) [{}]",
            h.name,
            h.asset_class,
            ccy,
            format_amount(h.value, 0),
            one_dp(h.weight),
            signed_pct(h.gain_pct)
        ));
    }

    lines.join("\n")
}

/// Counts by category, then every risk from the highest score down.
pub fn format_risks(risks: &[Risk]) -> String {
    let mut lines = vec![format!("Total Risks: {}", risks.len()), String::new()];

    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    for risk in risks {
        *by_category.entry(risk.category.to_string()).or_default() += 1;
    }
    lines.push("By Category:".to_string());
    for (category, count) in &by_category {
        lines.push(format!("  - {}: {}", category, count));
    }

    lines.push(String::new());
    lines.push("Risk Details (sorted by score, highest first):".to_string());
    let mut sorted: Vec<&Risk> = risks.iter().collect();
    sorted.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    for risk in sorted {
        lines.push(format!(
            "  - [{}] {} (L:{} x I:{}) [{}] [{}]",
            risk.risk_score, risk.title, risk.likelihood, risk.impact, risk.status, risk.category
        ));
        if let Some(plan) = risk.mitigation_plan.as_deref().filter(|p| !p.is_empty()) {
            let excerpt: String = plan.chars().take(MITIGATION_EXCERPT_CHARS).collect();
            lines.push(format!("    Mitigation: {}", excerpt));
        }
    }

    lines.join("\n")
}

pub fn portfolio_analysis_prompt(snapshot: &PortfolioSnapshot, policy: &InvestmentPolicy) -> Prompt {
    let user = format!(
        "Analyze this investment portfolio and provide recommendations:

{portfolio}

Investment Policy:
- Risk Profile: {risk_profile}
- Investment Horizon: {horizon}
- Tax Jurisdiction: {jurisdiction}
- Consider Capital Gains Deferral: {deferral}

Please provide:
1. Portfolio Health Assessment (2-3 sentences)
2. Key Strengths (bullet points)
3. Areas of Concern (bullet points)
4. Top 3 Actionable Recommendations
5. Tax Optimization Opportunities
",
        portfolio = format_portfolio(snapshot),
        risk_profile = policy.risk_profile,
        horizon = policy.investment_horizon,
        jurisdiction = policy.tax_jurisdiction,
        deferral = policy.consider_capital_gains_deferral,
    );
    Prompt {
        system: PORTFOLIO_ANALYSIS_SYSTEM.to_string(),
        user,
        max_tokens: DEFAULT_MAX_TOKENS,
    }
}

pub fn rebalancing_prompt(snapshot: &PortfolioSnapshot, targets: &TargetAllocation) -> Prompt {
    let target_lines: Vec<String> = targets
        .0
        .iter()
        .map(|(class, pct)| format!("  - {}: {}%", class, pct.normalize()))
        .collect();
    let user = format!(
        "The client needs rebalancing recommendations.

Current Portfolio:
{}

Target Allocation:
{}

Please provide:
1. Priority rebalancing actions (most urgent first)
2. Specific positions to trim or add
3. Tax-efficient execution strategy
4. Timeline recommendation (immediate vs. gradual)
",
        format_portfolio(snapshot),
        target_lines.join("\n"),
    );
    Prompt {
        system: REBALANCING_SYSTEM.to_string(),
        user,
        max_tokens: DEFAULT_MAX_TOKENS,
    }
}

pub fn risk_assessment_prompt(snapshot: &PortfolioSnapshot) -> Prompt {
    let concentration = &snapshot.risk.concentration;
    let liquidity = &snapshot.risk.liquidity;
    let concentrated: Vec<String> = concentration
        .concentrated_holdings
        .iter()
        .map(|h| format!("{} ({}%)", h.name, one_dp(h.weight)))
        .collect();
    let concentrated = if concentrated.is_empty() {
        "none".to_string()
    } else {
        concentrated.join(", ")
    };

    let user = format!(
        "Assess the risks in this portfolio:

{}

Concentration Analysis:
- HHI Index: {}
- Concentrated Positions: {}

Liquidity Analysis:
- Liquid Percentage: {}%
- Illiquid Percentage: {}%

Please provide:
1. Overall Risk Rating (Low/Medium/High/Very High)
2. Key Risk Factors (ranked by severity)
3. Specific Mitigation Strategies
4. Stress Test Scenarios to Consider
",
        format_portfolio(snapshot),
        concentration.hhi.round_dp(0),
        concentrated,
        one_dp(liquidity.liquid_pct),
        one_dp(liquidity.illiquid_pct),
    );
    Prompt {
        system: RISK_ASSESSMENT_SYSTEM.to_string(),
        user,
        max_tokens: DEFAULT_MAX_TOKENS,
    }
}

pub fn scenario_analysis_prompt(snapshot: &PortfolioSnapshot, scenario: &Scenario) -> Prompt {
    let user = format!(
        "Analyze this portfolio under the following scenario:

Scenario: {}

Current Portfolio:
{}

Please provide:
1. Estimated Portfolio Impact (percentage and dollar terms)
2. Most Vulnerable Holdings (top 3-5)
3. Holdings That May Benefit
4. Recommended Defensive Actions
5. Recovery Timeline Estimate
",
        scenario.description,
        format_portfolio(snapshot),
    );
    Prompt {
        system: SCENARIO_SYSTEM.to_string(),
        user,
        max_tokens: DEFAULT_MAX_TOKENS,
    }
}

pub fn risk_register_prompt(risks: &[Risk], snapshot: &PortfolioSnapshot) -> Prompt {
    let user = format!(
        "Analyze this risk register for a family office:

{}

Portfolio Context:
{}

Please provide:
1. Overall Risk Posture Assessment (2-3 sentences)
2. Top 3 Priority Risks Requiring Immediate Attention
3. Gaps in Risk Coverage (what risks are missing?)
4. Risk Correlations (which risks could compound each other?)
5. Recommendations for Risk Reduction
6. Suggested Review Schedule Adjustments
",
        format_risks(risks),
        format_portfolio(snapshot),
    );
    Prompt {
        system: RISK_REGISTER_SYSTEM.to_string(),
        user,
        max_tokens: RISK_REGISTER_MAX_TOKENS,
    }
}

pub fn mitigation_prompt(risk: &Risk) -> Prompt {
    let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| "None".to_string());
    let user = format!(
        "Suggest mitigation strategies for this risk:

Risk: {}
Category: {}
Description: {}
Likelihood: {} (0=Not at all, 5=Almost certain)
Impact: {} (0=No impact, 5=Extreme)
Risk Score: {}
Current Status: {}
Current Mitigation Plan: {}
Current Mitigation Actions: {}

Please provide:
1. Recommended Mitigation Strategies (3-5 specific actions)
2. Preventive Controls (to reduce likelihood)
3. Detective Controls (to identify early)
4. Response Plan (if the risk materializes)
5. Estimated Residual Risk After Mitigation
6. Suggested Review Frequency
",
        risk.title,
        risk.category,
        risk.description.clone().unwrap_or_else(|| "No description".to_string()),
        risk.likelihood,
        risk.impact,
        risk.risk_score,
        risk.status,
        or_none(&risk.mitigation_plan),
        or_none(&risk.mitigation_actions),
    );
    Prompt {
        system: MITIGATION_SYSTEM.to_string(),
        user,
        max_tokens: DEFAULT_MAX_TOKENS,
    }
}
