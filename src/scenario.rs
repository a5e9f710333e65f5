use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{Category, Signal};
use crate::risk::round2;

const WINDOW_HOURS: i64 = 168;
const FALLBACK_DESCRIPTION: &str = "Signal detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    General,
    UniversityExamStress,
    HealthcareCapacity,
    FinancialFraud,
}

struct Profile {
    weights: &'static [(Category, f64)],
    severity_range: (f64, f64),
    descriptions: &'static [(Category, &'static [&'static str])],
}

static GENERAL: Profile = Profile {
    weights: &[
        (Category::MentalHealth, 0.25),
        (Category::ServiceLoad, 0.25),
        (Category::Fraud, 0.25),
        (Category::Misinformation, 0.25),
    ],
    severity_range: (0.15, 0.95),
    descriptions: &[
        (
            Category::MentalHealth,
            &[
                "Elevated stress indicators in student population",
                "Increased counseling service demand detected",
                "Wellness survey results show rising anxiety levels",
                "After-hours crisis line volume above threshold",
            ],
        ),
        (
            Category::ServiceLoad,
            &[
                "Server response time exceeding SLA targets",
                "Queue depth growing on processing pipeline",
                "Authentication service under heavy load",
                "Database connection pool nearing capacity",
            ],
        ),
        (
            Category::Fraud,
            &[
                "Anomalous transaction pattern detected",
                "Duplicate identity markers in new registrations",
                "Unusual access pattern from unrecognized network",
                "Rapid sequential approvals flagged by rules engine",
            ],
        ),
        (
            Category::Misinformation,
            &[
                "Coordinated inauthentic posting activity detected",
                "Misleading health advisory circulating internally",
                "Fabricated policy document shared on forum",
                "Deepfake content detected in submitted materials",
            ],
        ),
    ],
};

static UNIVERSITY_EXAM_STRESS: Profile = Profile {
    weights: &[
        (Category::MentalHealth, 0.55),
        (Category::ServiceLoad, 0.30),
        (Category::Misinformation, 0.15),
    ],
    severity_range: (0.30, 0.97),
    descriptions: &[
        (
            Category::MentalHealth,
            &[
                "Spike in exam anxiety reported across multiple faculties",
                "Crisis counseling requests exceed available capacity",
                "Peer support network reporting burnout among volunteers",
                "Sleep deprivation indicators elevated in residence surveys",
                "Academic performance anxiety flagged in wellness screening",
            ],
        ),
        (
            Category::ServiceLoad,
            &[
                "Online exam platform nearing concurrent user limit",
                "Library reservation system overloaded during finals",
                "Student portal response times degraded under load",
            ],
        ),
        (
            Category::Misinformation,
            &[
                "False exam schedule circulating on student groups",
                "Misleading academic policy change rumor spreading online",
            ],
        ),
    ],
};

static HEALTHCARE_CAPACITY: Profile = Profile {
    weights: &[
        (Category::ServiceLoad, 0.50),
        (Category::MentalHealth, 0.30),
        (Category::Fraud, 0.20),
    ],
    severity_range: (0.35, 0.98),
    descriptions: &[
        (
            Category::ServiceLoad,
            &[
                "Emergency department intake at critical capacity",
                "ICU bed availability below safety threshold",
                "Patient scheduling backlog exceeding 72 hours",
                "Lab processing queue depth at historic high",
                "Ambulance diversion protocol triggered by overcrowding",
            ],
        ),
        (
            Category::MentalHealth,
            &[
                "Healthcare worker burnout indicators at critical level",
                "Staff absenteeism correlated with workload surge",
                "Compassion fatigue screening flags rising among nurses",
            ],
        ),
        (
            Category::Fraud,
            &[
                "Suspicious billing pattern detected in claims processing",
                "Duplicate patient records created under different identifiers",
            ],
        ),
    ],
};

static FINANCIAL_FRAUD: Profile = Profile {
    weights: &[
        (Category::Fraud, 0.55),
        (Category::ServiceLoad, 0.25),
        (Category::Misinformation, 0.20),
    ],
    severity_range: (0.40, 0.99),
    descriptions: &[
        (
            Category::Fraud,
            &[
                "Synthetic identity cluster detected in new account applications",
                "Rapid micro-transaction pattern consistent with card testing",
                "Cross-border wire transfers to flagged jurisdictions",
                "Account takeover attempt using credential stuffing",
                "Insider trading pattern detected in equity transactions",
            ],
        ),
        (
            Category::ServiceLoad,
            &[
                "Transaction processing engine under abnormal load",
                "Fraud detection pipeline latency exceeding SLA",
                "Real-time scoring service nearing throughput limit",
            ],
        ),
        (
            Category::Misinformation,
            &[
                "Phishing campaign targeting customers with fake notices",
                "Fabricated regulatory announcement causing market concern",
            ],
        ),
    ],
};

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::General,
        Scenario::UniversityExamStress,
        Scenario::HealthcareCapacity,
        Scenario::FinancialFraud,
    ];

    /// Resolves a scenario name; anything unrecognised becomes `General`.
    pub fn from_name(name: &str) -> Self {
        match Scenario::ALL.iter().find(|s| s.as_str() == name) {
            Some(scenario) => *scenario,
            None => {
                tracing::warn!(%name, "unknown scenario, falling back to general");
                Scenario::General
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::General => "general",
            Scenario::UniversityExamStress => "university_exam_stress",
            Scenario::HealthcareCapacity => "healthcare_capacity",
            Scenario::FinancialFraud => "financial_fraud",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::General => "General",
            Scenario::UniversityExamStress => "University Exam Stress",
            Scenario::HealthcareCapacity => "Healthcare Capacity",
            Scenario::FinancialFraud => "Financial Fraud",
        }
    }

    fn profile(&self) -> &'static Profile {
        match self {
            Scenario::General => &GENERAL,
            Scenario::UniversityExamStress => &UNIVERSITY_EXAM_STRESS,
            Scenario::HealthcareCapacity => &HEALTHCARE_CAPACITY,
            Scenario::FinancialFraud => &FINANCIAL_FRAUD,
        }
    }
}

impl Profile {
    fn pick_category(&self, rng: &mut StdRng) -> &'static Category {
        let weights: &'static [(Category, f64)] = self.weights;
        let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
        let mut pick = rng.gen::<f64>() * total;

        for (category, weight) in weights {
            if pick < *weight {
                return category;
            }
            pick -= *weight;
        }

        // Rounding can leave `pick` a hair above the last bucket.
        &weights[weights.len() - 1].0
    }

    fn describe(&self, category: &Category, rng: &mut StdRng) -> &'static str {
        self.descriptions
            .iter()
            .find(|(pool_category, _)| pool_category == category)
            .and_then(|(_, pool)| pool.choose(rng).copied())
            .unwrap_or(FALLBACK_DESCRIPTION)
    }
}

/// Synthesises `count` signals for a scenario. The same seed, count and
/// scenario always produce the same rows, sorted by timestamp.
pub fn generate(
    count: usize,
    scenario: Scenario,
    seed: u64,
    base_time: NaiveDateTime,
) -> Vec<Signal> {
    let profile = scenario.profile();
    let (severity_min, severity_max) = profile.severity_range;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut signals = Vec::new();

    for _ in 0..count {
        let category = profile.pick_category(&mut rng);
        let severity_score = round2(rng.gen_range(severity_min..severity_max));
        let offset_hours = rng.gen_range(0..WINDOW_HOURS);
        let description = profile.describe(category, &mut rng);

        signals.push(Signal {
            timestamp: base_time + Duration::hours(offset_hours),
            category: category.clone(),
            severity_score,
            description: description.to_string(),
        });
    }

    signals.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    tracing::info!(
        scenario = scenario.as_str(),
        seed,
        rows = signals.len(),
        "generated simulated signals"
    );
    signals
}
