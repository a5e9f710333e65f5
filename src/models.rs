use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Signal category. Names outside the known set are kept verbatim in `Other`
/// and get default handling in every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    MentalHealth,
    ServiceLoad,
    Fraud,
    Misinformation,
    Other(String),
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "mental_health" => Category::MentalHealth,
            "service_load" => Category::ServiceLoad,
            "fraud" => Category::Fraud,
            "misinformation" => Category::Misinformation,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::MentalHealth => "mental_health",
            Category::ServiceLoad => "service_load",
            Category::Fraud => "fraud",
            Category::Misinformation => "misinformation",
            Category::Other(raw) => raw,
        }
    }

    /// Human label: underscores become spaces and each word is capitalised.
    pub fn label(&self) -> String {
        self.as_str()
            .replace('_', " ")
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::parse(&raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated enterprise impact of a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Minor,
    Moderate,
    Significant,
    Severe,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "Minor",
            Impact::Moderate => "Moderate",
            Impact::Significant => "Significant",
            Impact::Severe => "Severe",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: NaiveDateTime,
    pub category: Category,
    pub severity_score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSignal {
    #[serde(flatten)]
    pub signal: Signal,
    pub risk_level: RiskLevel,
    pub anomaly_flag: bool,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionCard {
    pub risk_level: RiskLevel,
    pub category: Category,
    pub severity_score: f64,
    pub anomaly_flag: bool,
    pub impact: Impact,
    pub owner_team: &'static str,
    pub sla: &'static str,
    pub explanation: String,
    pub intervention: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub total: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub anomaly_count: usize,
    pub top_categories: Vec<(Category, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub action: String,
    pub owner: &'static str,
    pub sla: &'static str,
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_round_trips_verbatim() {
        let category = Category::parse("supply_chain");
        assert_eq!(category, Category::Other("supply_chain".to_string()));
        assert_eq!(category.as_str(), "supply_chain");
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(Category::MentalHealth.label(), "Mental Health");
        assert_eq!(Category::Fraud.label(), "Fraud");
        assert_eq!(Category::parse("SUPPLY_chain").label(), "Supply Chain");
    }

    #[test]
    fn risk_levels_order_by_severity() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }
}
