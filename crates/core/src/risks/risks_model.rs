//! Risk register models.

use chrono::{Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Upper bound of the likelihood and impact scales.
pub const MAX_SCALE: i32 = 5;
/// Scores at or above this are critical.
pub const CRITICAL_SCORE: i32 = 15;
/// Scores at or above this (and below critical) are moderate.
pub const MODERATE_SCORE: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Financial,
    Operational,
    Legal,
    Reputational,
    Strategic,
    Compliance,
    Personnel,
    Cybersecurity,
    Market,
    Other,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 10] = [
        RiskCategory::Financial,
        RiskCategory::Operational,
        RiskCategory::Legal,
        RiskCategory::Reputational,
        RiskCategory::Strategic,
        RiskCategory::Compliance,
        RiskCategory::Personnel,
        RiskCategory::Cybersecurity,
        RiskCategory::Market,
        RiskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Financial => "Financial",
            RiskCategory::Operational => "Operational",
            RiskCategory::Legal => "Legal",
            RiskCategory::Reputational => "Reputational",
            RiskCategory::Strategic => "Strategic",
            RiskCategory::Compliance => "Compliance",
            RiskCategory::Personnel => "Personnel",
            RiskCategory::Cybersecurity => "Cybersecurity",
            RiskCategory::Market => "Market",
            RiskCategory::Other => "Other",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        RiskCategory::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(key))
            .copied()
            .ok_or_else(|| ValidationError::InvalidInput(format!("Unknown risk category '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    Identified,
    Assessed,
    Mitigating,
    Accepted,
    Closed,
    Monitoring,
}

impl RiskStatus {
    pub const ALL: [RiskStatus; 6] = [
        RiskStatus::Identified,
        RiskStatus::Assessed,
        RiskStatus::Mitigating,
        RiskStatus::Accepted,
        RiskStatus::Closed,
        RiskStatus::Monitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Identified => "Identified",
            RiskStatus::Assessed => "Assessed",
            RiskStatus::Mitigating => "Mitigating",
            RiskStatus::Accepted => "Accepted",
            RiskStatus::Closed => "Closed",
            RiskStatus::Monitoring => "Monitoring",
        }
    }

    /// Everything except `Closed` counts towards the active register.
    pub fn is_active(&self) -> bool {
        *self != RiskStatus::Closed
    }

    /// `Identified -> Assessed -> Mitigating -> {Accepted | Closed}`.
    /// `Monitoring` is reachable from any open status and `Closed` from any
    /// status. Staying put is always allowed.
    pub fn can_transition_to(&self, to: RiskStatus) -> bool {
        use RiskStatus::*;
        if *self == to || to == Closed {
            return true;
        }
        match (self, to) {
            (Closed, _) => false,
            (_, Monitoring) => true,
            (Identified, Assessed) | (Assessed, Mitigating) | (Mitigating, Accepted) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        RiskStatus::ALL
            .iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(key))
            .copied()
            .ok_or_else(|| ValidationError::InvalidInput(format!("Unknown risk status '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewFrequency {
    Monthly,
    Quarterly,
    #[serde(rename = "Semi-annually")]
    SemiAnnually,
    Annually,
}

impl ReviewFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewFrequency::Monthly => "Monthly",
            ReviewFrequency::Quarterly => "Quarterly",
            ReviewFrequency::SemiAnnually => "Semi-annually",
            ReviewFrequency::Annually => "Annually",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            ReviewFrequency::Monthly => 1,
            ReviewFrequency::Quarterly => 3,
            ReviewFrequency::SemiAnnually => 6,
            ReviewFrequency::Annually => 12,
        }
    }

    /// The review date one period after `date`. Month ends clamp, so
    /// Jan 31 + 1 month is the last day of February.
    pub fn next_review_from(&self, date: NaiveDate) -> NaiveDate {
        date.checked_add_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for ReviewFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "").as_str() {
            "monthly" => Ok(ReviewFrequency::Monthly),
            "quarterly" => Ok(ReviewFrequency::Quarterly),
            "semiannually" | "semiannual" => Ok(ReviewFrequency::SemiAnnually),
            "annually" | "annual" | "yearly" => Ok(ReviewFrequency::Annually),
            _ => Err(ValidationError::InvalidInput(format!(
                "Unknown review frequency '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    Critical,
}

impl Severity {
    pub fn from_score(score: i32) -> Severity {
        if score >= CRITICAL_SCORE {
            Severity::Critical
        } else if score >= MODERATE_SCORE {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A register entry. `risk_score` is always `likelihood * impact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: RiskCategory,
    pub entity_id: Option<String>,
    pub position_id: Option<String>,
    pub owner: Option<String>,
    pub likelihood: i32,
    pub impact: i32,
    pub risk_score: i32,
    pub status: RiskStatus,
    pub mitigation_plan: Option<String>,
    pub mitigation_actions: Option<String>,
    pub review_frequency: Option<ReviewFrequency>,
    pub next_review_date: Option<NaiveDate>,
    pub last_reviewed: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Risk {
    pub fn severity(&self) -> Severity {
        Severity::from_score(self.risk_score)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// The caller-editable fields of a risk. `id: None` creates a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: RiskCategory,
    pub entity_id: Option<String>,
    pub position_id: Option<String>,
    pub owner: Option<String>,
    pub likelihood: i32,
    pub impact: i32,
    pub status: RiskStatus,
    pub mitigation_plan: Option<String>,
    pub mitigation_actions: Option<String>,
    pub review_frequency: Option<ReviewFrequency>,
    pub next_review_date: Option<NaiveDate>,
}

fn check_scale(field: &str, value: i32) -> Result<(), ValidationError> {
    if !(0..=MAX_SCALE).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: Decimal::from(value),
            min: Decimal::ZERO,
            max: Decimal::from(MAX_SCALE),
        });
    }
    Ok(())
}

impl RiskInput {
    /// Rejects an empty title or a likelihood/impact outside `[0, 5]`.
    /// Out-of-range values are never clamped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }
        check_scale("likelihood", self.likelihood)?;
        check_scale("impact", self.impact)
    }
}

/// A validated risk ready for insert, score included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRisk {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: RiskCategory,
    pub entity_id: Option<String>,
    pub position_id: Option<String>,
    pub owner: Option<String>,
    pub likelihood: i32,
    pub impact: i32,
    pub risk_score: i32,
    pub status: RiskStatus,
    pub mitigation_plan: Option<String>,
    pub mitigation_actions: Option<String>,
    pub review_frequency: Option<ReviewFrequency>,
    pub next_review_date: Option<NaiveDate>,
}

/// Which statuses a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Everything except `Closed`.
    #[default]
    Active,
    All,
    Only(RiskStatus),
}

/// Independent predicates, intersected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFilter {
    pub entity_id: Option<String>,
    pub category: Option<RiskCategory>,
    #[serde(default)]
    pub status: StatusFilter,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total: usize,
    pub active: usize,
    pub critical: usize,
    pub moderate: usize,
    pub low: usize,
    pub overdue: usize,
    /// Mean score of active risks, one decimal place.
    pub avg_score: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub count: usize,
    pub avg_score: Decimal,
    pub max_score: i32,
}

/// Active risks with a review date, bucketed against today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub overdue: Vec<Risk>,
    pub due_in_30: Vec<Risk>,
    pub due_in_90: Vec<Risk>,
    pub unscheduled: Vec<Risk>,
}

/// One edited field, for the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    pub from: String,
    pub to: String,
}
