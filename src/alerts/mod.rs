/// Synthetic disaster alerts for the dashboard view.
///
/// Alerts are generated in bulk once per session ([`generator`]) and then
/// re-sampled and grouped by severity ([`categorize`]) each time the user
/// asks for a fresh batch.
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod categorize;
pub mod generator;

pub use categorize::{ChartBar, SeverityBuckets, SeverityChart, categorize};
pub use generator::{DEFAULT_POOL_SIZE, DEFAULT_SAMPLE_SIZE, generate_messages, sample_messages};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// All severities in display order.
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    /// Lowercase wire name used inside generated message text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalized label used for chart axes and headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Chart bar color.
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "green",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Disaster type
// ---------------------------------------------------------------------------

/// The three disaster categories known to the dashboard and the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisasterType {
    Wildfire,
    Earthquake,
    Flood,
}

impl DisasterType {
    pub const ALL: [DisasterType; 3] = [
        DisasterType::Wildfire,
        DisasterType::Earthquake,
        DisasterType::Flood,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Wildfire => "Wildfire",
            Self::Earthquake => "Earthquake",
            Self::Flood => "Flood",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for DisasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Alert record
// ---------------------------------------------------------------------------

/// One synthetic alert. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub message: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: DisasterType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn severity_colors_match_chart_palette() {
        assert_eq!(Severity::High.color(), "red");
        assert_eq!(Severity::Medium.color(), "orange");
        assert_eq!(Severity::Low.color(), "green");
    }

    #[test]
    fn disaster_type_from_label_is_case_sensitive() {
        assert_eq!(DisasterType::from_label("Flood"), Some(DisasterType::Flood));
        assert_eq!(DisasterType::from_label("flood"), None);
        assert_eq!(DisasterType::from_label("Tornado"), None);
    }

    #[test]
    fn alert_record_uses_type_field_name() {
        let record = AlertRecord {
            message: "m".to_string(),
            severity: Severity::Medium,
            kind: DisasterType::Earthquake,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"Earthquake\""));
        assert!(json.contains("\"severity\":\"medium\""));
    }
}
