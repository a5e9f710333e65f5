use crate::models::{Category, EnrichedSignal, Impact, RiskLevel, Signal};

const GLOBAL_ANOMALY_THRESHOLD: f64 = 0.9;
const DEFAULT_ANOMALY_THRESHOLD: f64 = 0.80;

pub fn classify(severity_score: f64) -> RiskLevel {
    if severity_score < 0.35 {
        RiskLevel::Low
    } else if severity_score < 0.6 {
        RiskLevel::Medium
    } else if severity_score < 0.8 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

pub fn anomaly_threshold(category: &Category) -> f64 {
    match category {
        Category::MentalHealth => 0.80,
        Category::ServiceLoad => 0.85,
        Category::Fraud => 0.75,
        Category::Misinformation => 0.78,
        Category::Other(_) => DEFAULT_ANOMALY_THRESHOLD,
    }
}

pub fn is_anomaly(severity_score: f64, category: &Category) -> bool {
    if severity_score >= GLOBAL_ANOMALY_THRESHOLD {
        return true;
    }
    severity_score >= anomaly_threshold(category)
}

/// Heuristic confidence in [0.55, 0.95], clamped before rounding to 2 places.
pub fn confidence(severity_score: f64, anomaly_flag: bool) -> f64 {
    let mut base = 0.55 + severity_score * 0.35;
    if anomaly_flag {
        base += 0.05;
    }
    // `max` and `min` discard a NaN operand, so a NaN score lands on the floor.
    round2(base.max(0.55).min(0.95))
}

/// Rounds to 2 places from the exact binary value, ties to even.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

pub fn impact(risk_level: RiskLevel) -> Impact {
    match risk_level {
        RiskLevel::Low => Impact::Minor,
        RiskLevel::Medium => Impact::Moderate,
        RiskLevel::High => Impact::Significant,
        RiskLevel::Critical => Impact::Severe,
    }
}

pub fn owner_team(category: &Category) -> &'static str {
    match category {
        Category::MentalHealth => "Student Services",
        Category::ServiceLoad => "IT Ops",
        Category::Fraud => "Security",
        Category::Misinformation => "Comms",
        Category::Other(_) => "Operations",
    }
}

pub fn sla(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::Critical => "1 hour",
        RiskLevel::High => "24 hours",
        RiskLevel::Medium => "72 hours",
        RiskLevel::Low => "1 week",
    }
}

pub fn enrich(signal: &Signal) -> EnrichedSignal {
    let risk_level = classify(signal.severity_score);
    let anomaly_flag = is_anomaly(signal.severity_score, &signal.category);
    let confidence_score = confidence(signal.severity_score, anomaly_flag);

    EnrichedSignal {
        signal: signal.clone(),
        risk_level,
        anomaly_flag,
        confidence_score,
    }
}

pub fn enrich_all(signals: &[Signal]) -> Vec<EnrichedSignal> {
    let enriched: Vec<EnrichedSignal> = signals.iter().map(enrich).collect();
    tracing::debug!(
        rows = enriched.len(),
        anomalies = enriched.iter().filter(|row| row.anomaly_flag).count(),
        "enriched signals"
    );
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_signal(category: &str, severity_score: f64) -> Signal {
        Signal {
            timestamp: NaiveDate::from_ymd_opt(2026, 2, 1)
                .and_then(|d| d.and_hms_opt(6, 0, 0))
                .unwrap(),
            category: Category::parse(category),
            severity_score,
            description: "Queue depth growing on processing pipeline".to_string(),
        }
    }

    #[test]
    fn levels_follow_expected_tiers() {
        assert_eq!(classify(0.0), RiskLevel::Low);
        assert_eq!(classify(0.34), RiskLevel::Low);
        assert_eq!(classify(0.35), RiskLevel::Medium);
        assert_eq!(classify(0.59), RiskLevel::Medium);
        assert_eq!(classify(0.6), RiskLevel::High);
        assert_eq!(classify(0.79), RiskLevel::High);
        assert_eq!(classify(0.8), RiskLevel::Critical);
        assert_eq!(classify(1.0), RiskLevel::Critical);
    }

    #[test]
    fn out_of_range_scores_still_classify() {
        assert_eq!(classify(-3.0), RiskLevel::Low);
        assert_eq!(classify(7.5), RiskLevel::Critical);
    }

    #[test]
    fn global_threshold_overrides_category() {
        assert!(is_anomaly(0.9, &Category::ServiceLoad));
        assert!(is_anomaly(0.9, &Category::parse("anything")));
    }

    #[test]
    fn category_thresholds_apply_below_global() {
        assert!(is_anomaly(0.79, &Category::Fraud));
        assert!(!is_anomaly(0.79, &Category::ServiceLoad));
        assert!(is_anomaly(0.78, &Category::Misinformation));
        assert!(!is_anomaly(0.79, &Category::parse("weather")));
        assert!(is_anomaly(0.80, &Category::parse("weather")));
    }

    #[test]
    fn confidence_is_clamped_and_rounded() {
        assert_eq!(confidence(0.0, false), 0.55);
        assert_eq!(confidence(1.0, false), 0.9);
        assert_eq!(confidence(1.0, true), 0.95);
        assert_eq!(confidence(0.0, true), 0.6);
        assert_eq!(confidence(-2.0, false), 0.55);
        assert_eq!(confidence(0.4, false), 0.69);
    }

    #[test]
    fn rounding_uses_the_stored_value_not_the_scaled_one() {
        // 0.55 + 0.35 * 0.9 is stored just below 0.865 but scales to exactly 86.5.
        assert_eq!(confidence(0.9, false), 0.86);
        assert_eq!(confidence(0.3, false), 0.66);
        assert_eq!(round2(0.8765), 0.88);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn nan_scores_stay_total() {
        assert_eq!(classify(f64::NAN), RiskLevel::Critical);
        assert!(!is_anomaly(f64::NAN, &Category::Fraud));
        assert!(!is_anomaly(f64::NAN, &Category::parse("weather")));
        assert_eq!(confidence(f64::NAN, false), 0.55);
        assert_eq!(confidence(f64::NAN, true), 0.55);

        let row = enrich(&sample_signal("fraud", f64::NAN));
        assert_eq!(row.risk_level, RiskLevel::Critical);
        assert!(!row.anomaly_flag);
        assert_eq!(row.confidence_score, 0.55);
    }

    #[test]
    fn lookups_cover_every_level() {
        assert_eq!(impact(RiskLevel::Critical), Impact::Severe);
        assert_eq!(impact(RiskLevel::Low), Impact::Minor);
        assert_eq!(sla(RiskLevel::Critical), "1 hour");
        assert_eq!(sla(RiskLevel::High), "24 hours");
        assert_eq!(sla(RiskLevel::Medium), "72 hours");
        assert_eq!(sla(RiskLevel::Low), "1 week");
        assert_eq!(owner_team(&Category::Fraud), "Security");
        assert_eq!(owner_team(&Category::parse("weather")), "Operations");
    }

    #[test]
    fn enrichment_is_idempotent() {
        let signals = vec![
            sample_signal("fraud", 0.79),
            sample_signal("service_load", 0.42),
            sample_signal("unlisted", 1.0),
        ];
        let first = enrich_all(&signals);
        let base: Vec<Signal> = first.iter().map(|row| row.signal.clone()).collect();
        let second = enrich_all(&base);
        assert_eq!(first, second);
        assert!(first[0].anomaly_flag);
        assert_eq!(first[1].risk_level, RiskLevel::Medium);
        assert_eq!(first[2].confidence_score, 0.95);
    }
}
