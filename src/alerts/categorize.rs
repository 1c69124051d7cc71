//! Severity bucketing and the dashboard bar-chart model.

use serde::Serialize;

use super::{AlertRecord, Severity};

/// Alerts partitioned by severity. Input order is preserved within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeverityBuckets {
    pub high: Vec<AlertRecord>,
    pub medium: Vec<AlertRecord>,
    pub low: Vec<AlertRecord>,
}

/// One bar of the severity distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
}

/// Severity distribution chart: always three bars, High, Medium, Low.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityChart {
    pub title: &'static str,
    pub bars: Vec<ChartBar>,
}

/// Split `records` into high, medium and low buckets.
///
/// Every record lands in exactly one bucket; empty input yields three empty
/// buckets.
pub fn categorize(records: &[AlertRecord]) -> SeverityBuckets {
    let mut buckets = SeverityBuckets::default();
    for record in records {
        buckets.bucket_mut(record.severity).push(record.clone());
    }
    buckets
}

impl SeverityBuckets {
    pub fn bucket(&self, severity: Severity) -> &[AlertRecord] {
        match severity {
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<AlertRecord> {
        match severity {
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }

    /// `(high, medium, low)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.high.len(), self.medium.len(), self.low.len())
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn chart(&self) -> SeverityChart {
        SeverityChart {
            title: "Severity Distribution",
            bars: Severity::ALL
                .into_iter()
                .map(|s| ChartBar {
                    label: s.label(),
                    count: self.bucket(s).len(),
                    color: s.color(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::DisasterType;

    fn record(n: usize, severity: Severity) -> AlertRecord {
        AlertRecord {
            message: format!("Message {n}"),
            severity,
            kind: DisasterType::Flood,
        }
    }

    #[test]
    fn empty_input_yields_empty_buckets() {
        let buckets = categorize(&[]);
        assert_eq!(buckets.counts(), (0, 0, 0));
        assert_eq!(buckets, SeverityBuckets::default());
    }

    #[test]
    fn partition_preserves_relative_order() {
        let input = vec![
            record(1, Severity::Low),
            record(2, Severity::High),
            record(3, Severity::Low),
            record(4, Severity::Medium),
            record(5, Severity::High),
        ];
        let buckets = categorize(&input);

        let msgs = |v: &[AlertRecord]| v.iter().map(|r| r.message.clone()).collect::<Vec<_>>();
        assert_eq!(msgs(&buckets.high), ["Message 2", "Message 5"]);
        assert_eq!(msgs(&buckets.medium), ["Message 4"]);
        assert_eq!(msgs(&buckets.low), ["Message 1", "Message 3"]);
        assert_eq!(buckets.total(), input.len());
    }

    #[test]
    fn chart_has_fixed_order_and_colors() {
        let buckets = categorize(&[record(1, Severity::Medium)]);
        let chart = buckets.chart();
        let labels: Vec<_> = chart.bars.iter().map(|b| b.label).collect();
        let colors: Vec<_> = chart.bars.iter().map(|b| b.color).collect();
        assert_eq!(labels, ["High", "Medium", "Low"]);
        assert_eq!(colors, ["red", "orange", "green"]);
        assert_eq!(chart.bars[1].count, 1);
    }
}
