use crate::models::{Category, DecisionCard, EnrichedSignal, RiskLevel};
use crate::redact::redact;
use crate::risk;

const ANOMALY_CLAUSE: &str = " Anomaly detected: behavior deviates significantly from baseline.";
const ADVISORY: &str = "*Recommendation is advisory and requires human review.*";
const STANDARD_PROCEDURE: &str =
    "Apply standard operating procedures for this risk category and level.";
const ESCALATION: &str = " **[ANOMALY DETECTED]** Escalate to senior analyst for pattern review and root cause investigation.";

fn category_context(category: &Category) -> &'static str {
    match category {
        Category::MentalHealth => "psychological wellness and support service demand",
        Category::ServiceLoad => "infrastructure capacity and service availability",
        Category::Fraud => "financial integrity and transaction security",
        Category::Misinformation => "information accuracy and content authenticity",
        Category::Other(_) => "operational risk monitoring",
    }
}

fn risk_statement(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Within normal operating parameters. Routine monitoring applies.",
        RiskLevel::Medium => "Elevated risk requiring monitoring.",
        RiskLevel::High => "Escalation threshold exceeded. Material operational risk.",
        RiskLevel::Critical => "Immediate action required. Potential systemic impact.",
    }
}

/// Markdown paragraph explaining why a signal landed in its tier. The
/// description is redacted before it is quoted.
pub fn explain(
    category: &Category,
    severity_score: f64,
    anomaly_flag: bool,
    description: &str,
) -> String {
    let level = risk::classify(severity_score);
    let anomaly_text = if anomaly_flag { ANOMALY_CLAUSE } else { "" };

    format!(
        "**Analysis:** This signal relates to {}. {} Severity score: {:.2}. Signal context: \"{}\".{}\n\n{}",
        category_context(category),
        risk_statement(level),
        severity_score,
        redact(description),
        anomaly_text,
        ADVISORY
    )
}

fn intervention(category: &Category, level: RiskLevel) -> Option<&'static str> {
    use RiskLevel::*;

    let text = match (category, level) {
        (Category::MentalHealth, Critical) => "Activate crisis response protocol. Deploy additional counseling resources. Notify wellness leadership team. Initiate 24-hour monitoring cycle.",
        (Category::MentalHealth, High) => "Increase counseling availability. Send proactive outreach to at-risk groups. Schedule wellness check-ins within 48 hours.",
        (Category::MentalHealth, Medium) => "Monitor wellness indicators. Prepare resource scaling plan. Review support service capacity.",
        (Category::MentalHealth, Low) => "Continue routine monitoring. Log for trend analysis.",
        (Category::ServiceLoad, Critical) => "Initiate capacity expansion protocol. Activate disaster recovery standby. Alert infrastructure on-call team. Consider load shedding non-critical services.",
        (Category::ServiceLoad, High) => "Scale horizontal resources. Enable request queuing. Prepare failover activation.",
        (Category::ServiceLoad, Medium) => "Monitor resource utilization trends. Pre-stage additional capacity. Review auto-scaling thresholds.",
        (Category::ServiceLoad, Low) => "Log metrics for capacity planning. No immediate action required.",
        (Category::Fraud, Critical) => "Freeze affected accounts immediately. Escalate to fraud investigation unit. Preserve forensic evidence chain. Notify compliance officer.",
        (Category::Fraud, High) => "Flag transactions for manual review. Increase authentication requirements. Alert risk management team.",
        (Category::Fraud, Medium) => "Apply enhanced monitoring rules. Queue for next-cycle investigation. Update detection thresholds.",
        (Category::Fraud, Low) => "Log for pattern analysis. No immediate intervention required.",
        (Category::Misinformation, Critical) => "Issue immediate correction through official channels. Escalate to communications team. Implement content takedown if on owned platforms.",
        (Category::Misinformation, High) => "Prepare counter-narrative. Flag content for review. Alert communications stakeholders.",
        (Category::Misinformation, Medium) => "Monitor spread velocity. Prepare fact-check response. Log for trend analysis.",
        (Category::Misinformation, Low) => "Archive for reference. Continue baseline monitoring.",
        (Category::Other(_), _) => return None,
    };
    Some(text)
}

pub fn recommend(category: &Category, risk_level: RiskLevel, anomaly_flag: bool) -> String {
    let mut text = intervention(category, risk_level)
        .unwrap_or(STANDARD_PROCEDURE)
        .to_string();
    if anomaly_flag {
        text.push_str(ESCALATION);
    }
    text
}

/// Everything a reviewer needs to act on one enriched row.
pub fn decision_card(row: &EnrichedSignal) -> DecisionCard {
    let signal = &row.signal;

    DecisionCard {
        risk_level: row.risk_level,
        category: signal.category.clone(),
        severity_score: signal.severity_score,
        anomaly_flag: row.anomaly_flag,
        impact: risk::impact(row.risk_level),
        owner_team: risk::owner_team(&signal.category),
        sla: risk::sla(row.risk_level),
        explanation: explain(
            &signal.category,
            signal.severity_score,
            row.anomaly_flag,
            &signal.description,
        ),
        intervention: recommend(&signal.category, row.risk_level, row.anomaly_flag),
        confidence_score: row.confidence_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Signal;
    use chrono::NaiveDate;

    #[test]
    fn explanation_quotes_redacted_description() {
        let text = explain(
            &Category::MentalHealth,
            0.5,
            false,
            "Student emailed help@uni.edu from 555-123-4567",
        );
        assert!(text.starts_with(
            "**Analysis:** This signal relates to psychological wellness and support service demand."
        ));
        assert!(text.contains("Elevated risk requiring monitoring."));
        assert!(text.contains("Severity score: 0.50."));
        assert!(text.contains("[REDACTED_EMAIL]"));
        assert!(text.contains("[REDACTED_PHONE]"));
        assert!(!text.contains("help@uni.edu"));
        assert!(!text.contains("Anomaly detected"));
        assert!(text.ends_with("\n\n*Recommendation is advisory and requires human review.*"));
    }

    #[test]
    fn explanation_appends_anomaly_clause() {
        let text = explain(&Category::parse("weather"), 0.93, true, "Storm cell");
        assert!(text.contains("operational risk monitoring"));
        assert!(text.contains("Immediate action required."));
        assert!(text.contains(
            "\"Storm cell\". Anomaly detected: behavior deviates significantly from baseline.\n\n"
        ));
    }

    #[test]
    fn recommendation_table_covers_known_pairs() {
        let text = recommend(&Category::Fraud, RiskLevel::Low, false);
        assert_eq!(text, "Log for pattern analysis. No immediate intervention required.");

        let text = recommend(&Category::ServiceLoad, RiskLevel::High, false);
        assert!(text.starts_with("Scale horizontal resources."));
    }

    #[test]
    fn every_known_pair_has_its_own_intervention() {
        let table = [
            (Category::MentalHealth, RiskLevel::Critical, "Activate crisis response protocol."),
            (Category::MentalHealth, RiskLevel::High, "Increase counseling availability."),
            (Category::MentalHealth, RiskLevel::Medium, "Monitor wellness indicators."),
            (Category::MentalHealth, RiskLevel::Low, "Continue routine monitoring."),
            (Category::ServiceLoad, RiskLevel::Critical, "Initiate capacity expansion protocol."),
            (Category::ServiceLoad, RiskLevel::High, "Scale horizontal resources."),
            (Category::ServiceLoad, RiskLevel::Medium, "Monitor resource utilization trends."),
            (Category::ServiceLoad, RiskLevel::Low, "Log metrics for capacity planning."),
            (Category::Fraud, RiskLevel::Critical, "Freeze affected accounts immediately."),
            (Category::Fraud, RiskLevel::High, "Flag transactions for manual review."),
            (Category::Fraud, RiskLevel::Medium, "Apply enhanced monitoring rules."),
            (Category::Fraud, RiskLevel::Low, "Log for pattern analysis."),
            (Category::Misinformation, RiskLevel::Critical, "Issue immediate correction through official channels."),
            (Category::Misinformation, RiskLevel::High, "Prepare counter-narrative."),
            (Category::Misinformation, RiskLevel::Medium, "Monitor spread velocity."),
            (Category::Misinformation, RiskLevel::Low, "Archive for reference."),
        ];

        for (category, level, leading) in &table {
            let text = recommend(category, *level, false);
            assert!(
                text.starts_with(leading),
                "{} / {level}: {text}",
                category.as_str()
            );
            assert!(!text.contains("**[ANOMALY DETECTED]**"));
            assert!(intervention(category, *level).is_some());
        }
    }

    #[test]
    fn unknown_category_gets_standard_procedure_and_escalation() {
        let text = recommend(&Category::parse("weather"), RiskLevel::Critical, true);
        assert!(text.starts_with(STANDARD_PROCEDURE));
        assert!(text.ends_with("root cause investigation."));
        assert!(text.contains("**[ANOMALY DETECTED]**"));
    }

    #[test]
    fn card_composes_enrichment() {
        let signal = Signal {
            timestamp: NaiveDate::from_ymd_opt(2026, 2, 3)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
            category: Category::ServiceLoad,
            severity_score: 0.88,
            description: "ICU bed availability below safety threshold".to_string(),
        };
        let card = decision_card(&risk::enrich(&signal));
        assert_eq!(card.risk_level, RiskLevel::Critical);
        assert!(card.anomaly_flag);
        assert_eq!(card.owner_team, "IT Ops");
        assert_eq!(card.sla, "1 hour");
        assert_eq!(card.confidence_score, 0.91);
        assert!(card.intervention.contains("ANOMALY DETECTED"));
    }
}
