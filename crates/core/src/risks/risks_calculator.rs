use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::risks_model::{
    CategoryStats, FieldChange, Risk, RiskCategory, RiskFilter, RiskSummary, ReviewSchedule,
    Severity, StatusFilter, MAX_SCALE,
};

/// Side of the likelihood x impact matrix.
pub const MATRIX_SIZE: usize = MAX_SCALE as usize;

pub fn risk_score(likelihood: i32, impact: i32) -> i32 {
    likelihood * impact
}

impl RiskFilter {
    pub fn matches(&self, risk: &Risk) -> bool {
        let status_ok = match self.status {
            StatusFilter::Active => risk.is_active(),
            StatusFilter::All => true,
            StatusFilter::Only(status) => risk.status == status,
        };
        status_ok
            && self
                .entity_id
                .as_ref()
                .map_or(true, |id| risk.entity_id.as_ref() == Some(id))
            && self.category.map_or(true, |c| risk.category == c)
            && self.severity.map_or(true, |s| risk.severity() == s)
    }
}

/// Risks passing every predicate of `filter`, highest score first.
pub fn filter_risks(risks: &[Risk], filter: &RiskFilter) -> Vec<Risk> {
    let mut matched: Vec<Risk> = risks.iter().filter(|r| filter.matches(r)).cloned().collect();
    matched.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    matched
}

fn mean_score<'a>(scores: impl Iterator<Item = &'a Risk>) -> Decimal {
    let (count, sum) = scores.fold((0i64, 0i64), |(n, s), r| (n + 1, s + i64::from(r.risk_score)));
    if count == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(sum) / Decimal::from(count)).round_dp(1)
}

fn is_overdue(risk: &Risk, today: NaiveDate) -> bool {
    risk.next_review_date.is_some_and(|d| d < today)
}

/// Severity counts and the average score cover active risks only.
pub fn risk_summary(risks: &[Risk], today: NaiveDate) -> RiskSummary {
    let active: Vec<&Risk> = risks.iter().filter(|r| r.is_active()).collect();
    let count = |severity: Severity| active.iter().filter(|r| r.severity() == severity).count();
    RiskSummary {
        total: risks.len(),
        active: active.len(),
        critical: count(Severity::Critical),
        moderate: count(Severity::Moderate),
        low: count(Severity::Low),
        overdue: active.iter().filter(|r| is_overdue(r, today)).count(),
        avg_score: mean_score(active.iter().copied()),
    }
}

/// Per-category count and scores over active risks.
pub fn category_distribution(risks: &[Risk]) -> BTreeMap<RiskCategory, CategoryStats> {
    let mut grouped: BTreeMap<RiskCategory, Vec<&Risk>> = BTreeMap::new();
    for risk in risks.iter().filter(|r| r.is_active()) {
        grouped.entry(risk.category).or_default().push(risk);
    }
    grouped
        .into_iter()
        .map(|(category, members)| {
            let stats = CategoryStats {
                count: members.len(),
                avg_score: mean_score(members.iter().copied()),
                max_score: members.iter().map(|r| r.risk_score).max().unwrap_or(0),
            };
            (category, stats)
        })
        .collect()
}

/// Counts of active risks at `[likelihood - 1][impact - 1]`. Risks with a
/// zero on either scale have no cell.
pub fn risk_matrix(risks: &[Risk]) -> [[usize; MATRIX_SIZE]; MATRIX_SIZE] {
    let mut matrix = [[0usize; MATRIX_SIZE]; MATRIX_SIZE];
    for risk in risks.iter().filter(|r| r.is_active()) {
        if risk.likelihood >= 1 && risk.impact >= 1 {
            let l = (risk.likelihood - 1) as usize;
            let i = (risk.impact - 1) as usize;
            if l < MATRIX_SIZE && i < MATRIX_SIZE {
                matrix[l][i] += 1;
            }
        }
    }
    matrix
}

/// Buckets active risks by next review date. Each bucket is sorted by date.
pub fn review_schedule(risks: &[Risk], today: NaiveDate) -> ReviewSchedule {
    let in_30 = today + Duration::days(30);
    let in_90 = today + Duration::days(90);
    let mut schedule = ReviewSchedule::default();

    let mut active: Vec<&Risk> = risks.iter().filter(|r| r.is_active()).collect();
    active.sort_by_key(|r| r.next_review_date);
    for risk in active {
        match risk.next_review_date {
            None => schedule.unscheduled.push(risk.clone()),
            Some(d) if d < today => schedule.overdue.push(risk.clone()),
            Some(d) if d <= in_30 => schedule.due_in_30.push(risk.clone()),
            Some(d) if d <= in_90 => schedule.due_in_90.push(risk.clone()),
            Some(_) => {}
        }
    }
    schedule
}

fn show<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// Fields that differ between two versions of a risk, in a fixed order.
pub fn changed_fields(before: &Risk, after: &Risk) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut push = |field: &str, from: String, to: String| {
        if from != to {
            changes.push(FieldChange {
                field: field.to_string(),
                from,
                to,
            });
        }
    };
    push("title", before.title.clone(), after.title.clone());
    push("description", show(&before.description), show(&after.description));
    push("category", before.category.to_string(), after.category.to_string());
    push("entity", show(&before.entity_id), show(&after.entity_id));
    push("position", show(&before.position_id), show(&after.position_id));
    push("owner", show(&before.owner), show(&after.owner));
    push("likelihood", before.likelihood.to_string(), after.likelihood.to_string());
    push("impact", before.impact.to_string(), after.impact.to_string());
    push("score", before.risk_score.to_string(), after.risk_score.to_string());
    push("status", before.status.to_string(), after.status.to_string());
    push("mitigation plan", show(&before.mitigation_plan), show(&after.mitigation_plan));
    push(
        "mitigation actions",
        show(&before.mitigation_actions),
        show(&after.mitigation_actions),
    );
    push(
        "review frequency",
        show(&before.review_frequency),
        show(&after.review_frequency),
    );
    push(
        "next review",
        show(&before.next_review_date),
        show(&after.next_review_date),
    );
    changes
}
