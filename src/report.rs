use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ActionItem, Category, DecisionCard, EnrichedSignal, RiskLevel, ScenarioSummary};
use crate::risk;
use crate::narrative;

const TOP_CATEGORY_COUNT: usize = 2;

/// Stamp printed under a decision card so the review can be traced later.
#[derive(Debug, Clone, Serialize)]
pub struct AuditStamp {
    pub event_id: Uuid,
    pub recorded_at: DateTime<Utc>,
}

impl AuditStamp {
    pub fn now() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
        }
    }
}

/// Highest severity first, NaN scores last; equal scores keep their input order.
pub fn by_severity_desc(rows: &[EnrichedSignal]) -> Vec<EnrichedSignal> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let (left, right) = (a.signal.severity_score, b.signal.severity_score);
        left.is_nan()
            .cmp(&right.is_nan())
            .then_with(|| right.total_cmp(&left))
    });
    sorted
}

pub fn critical_alerts(rows: &[EnrichedSignal]) -> Vec<&EnrichedSignal> {
    rows.iter()
        .filter(|row| row.risk_level == RiskLevel::Critical)
        .collect()
}

pub fn anomalies(rows: &[EnrichedSignal]) -> Vec<&EnrichedSignal> {
    rows.iter().filter(|row| row.anomaly_flag).collect()
}

pub fn top_alerts(rows: &[EnrichedSignal], limit: usize) -> Vec<EnrichedSignal> {
    by_severity_desc(rows).into_iter().take(limit).collect()
}

pub fn summarize(rows: &[EnrichedSignal]) -> ScenarioSummary {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for row in by_severity_desc(rows) {
        match counts.iter_mut().find(|(category, _)| *category == row.signal.category) {
            Some(entry) => entry.1 += 1,
            None => counts.push((row.signal.category, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_CATEGORY_COUNT);

    ScenarioSummary {
        total: rows.len(),
        critical_count: critical_alerts(rows).len(),
        high_count: rows
            .iter()
            .filter(|row| row.risk_level == RiskLevel::High)
            .count(),
        anomaly_count: anomalies(rows).len(),
        top_categories: counts,
    }
}

pub fn executive_summary(summary: &ScenarioSummary) -> String {
    format!(
        "This scenario contains {} risk signals with {} critical and {} high-severity alerts. \
         {} anomalies were detected requiring immediate attention. \
         Recommended response: prioritize critical alerts, assign owner teams, and initiate escalation protocols.",
        summary.total, summary.critical_count, summary.high_count, summary.anomaly_count
    )
}

pub fn primary_categories(summary: &ScenarioSummary) -> String {
    summary
        .top_categories
        .iter()
        .map(|(category, count)| format!("{} ({})", category.label(), count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let mut cut: String = text.chars().take(width).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

pub fn action_queue(rows: &[EnrichedSignal], limit: usize, width: usize) -> Vec<ActionItem> {
    top_alerts(rows, limit)
        .iter()
        .map(|row| {
            let intervention =
                narrative::recommend(&row.signal.category, row.risk_level, row.anomaly_flag);
            ActionItem {
                action: truncate(&intervention, width),
                owner: risk::owner_team(&row.signal.category),
                sla: risk::sla(row.risk_level),
                status: "Pending",
            }
        })
        .collect()
}

pub fn render_decision_card(index: usize, card: &DecisionCard, audit: &AuditStamp) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "### Decision Card: Row {index}");
    let _ = writeln!(output);
    let _ = writeln!(output, "**Risk Level: {}**", card.risk_level);
    let _ = writeln!(output);
    let _ = writeln!(output, "- **Category:** {}", card.category.label());
    let _ = writeln!(output, "- **Severity Score:** {:.2}", card.severity_score);
    let _ = writeln!(
        output,
        "- **Anomaly Detected:** {}",
        if card.anomaly_flag { "Yes" } else { "No" }
    );
    let _ = writeln!(output, "- **Estimated Enterprise Impact:** {}", card.impact);
    let _ = writeln!(output, "- **Recommended Owner:** {}", card.owner_team);
    let _ = writeln!(output, "- **SLA:** {}", card.sla);
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", card.explanation);
    let _ = writeln!(output);
    let _ = writeln!(output, "**Recommended Intervention:** {}", card.intervention);
    let _ = writeln!(output);
    let _ = writeln!(output, "**Confidence Score:** {:.2}", card.confidence_score);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "_Audit Log: Event {} recorded at {}_",
        audit.event_id,
        audit.recorded_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "#### Model Transparency");
    let _ = writeln!(output, "- **Inputs evaluated:** category, severity_score, description");
    let _ = writeln!(
        output,
        "- **Risk tiering:** Deterministic thresholds (Low < 0.35, Medium < 0.6, High < 0.8, Critical >= 0.8)"
    );
    let _ = writeln!(
        output,
        "- **Anomaly detection:** Category-specific thresholds and score >= 0.9"
    );
    let _ = writeln!(
        output,
        "- **Confidence:** Heuristic calibration based on severity and anomaly"
    );
    let _ = writeln!(output, "- **Human-in-the-loop:** Required for final decision");

    output
}

fn alert_line(row: &EnrichedSignal) -> String {
    format!(
        "{} | {} | severity {:.2} | {} | confidence {:.2} | {}",
        row.signal.timestamp,
        row.signal.category.label(),
        row.signal.severity_score,
        row.risk_level,
        row.confidence_score,
        row.signal.description
    )
}

pub fn build_report(
    source_label: &str,
    rows: &[EnrichedSignal],
    top_limit: usize,
    action_width: usize,
) -> String {
    let summary = summarize(rows);
    let sorted = by_severity_desc(rows);

    let mut output = String::new();

    let _ = writeln!(output, "# Risk Signal Report");
    let _ = writeln!(output, "Generated for {source_label}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Scenario Summary");

    if rows.is_empty() {
        let _ = writeln!(output, "No signals recorded for this source.");
        return output;
    }

    let _ = writeln!(output, "**Executive Summary:** {}", executive_summary(&summary));
    let _ = writeln!(output);
    let _ = writeln!(output, "**Primary Categories:** {}", primary_categories(&summary));

    let _ = writeln!(output);
    let critical = critical_alerts(&sorted);
    let _ = writeln!(output, "## Critical Alerts ({})", critical.len());
    if critical.is_empty() {
        let _ = writeln!(output, "No critical alerts.");
    } else {
        for row in critical {
            let _ = writeln!(output, "- {}", alert_line(row));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Alerts (Immediate Action Required)");
    for row in top_alerts(rows, top_limit) {
        let _ = writeln!(
            output,
            "- **{}**: Severity {:.2} | Risk {} | Confidence {:.2} | Anomaly {} | Impact {} | Owner {} | SLA {}",
            row.signal.category.label(),
            row.signal.severity_score,
            row.risk_level,
            row.confidence_score,
            if row.anomaly_flag { "Yes" } else { "No" },
            risk::impact(row.risk_level),
            risk::owner_team(&row.signal.category),
            risk::sla(row.risk_level)
        );
        let _ = writeln!(output, "  {}", row.signal.description);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommended Actions Queue");
    let _ = writeln!(output, "| Action | Owner | SLA | Status |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for item in action_queue(rows, top_limit, action_width) {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} |",
            item.action.replace('|', "\\|"),
            item.owner,
            item.sla,
            item.status
        );
    }

    let _ = writeln!(output);
    let flagged = anomalies(&sorted);
    let _ = writeln!(output, "## Anomalies Detected: {}", flagged.len());
    if flagged.is_empty() {
        let _ = writeln!(output, "No anomalies detected.");
    } else {
        for row in flagged {
            let _ = writeln!(output, "- {}", alert_line(row));
        }
    }

    output
}
