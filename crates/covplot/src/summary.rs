//! Coverage summarisation
//!
//! Turns a loaded [`CoverageDataset`] into an ordered [`CoverageSummary`]
//! that the chart renderer draws as-is.

use crate::dataset::CoverageDataset;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// How rows that share a file name are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Every row is its own bar
    #[default]
    None,
    /// Rows with the same file name collapse to their mean percentage
    MeanByFile,
}

/// Sort direction by coverage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Highest coverage first
    #[default]
    Descending,
    /// Lowest coverage first
    Ascending,
}

impl SortOrder {
    /// Compare two percentages in this order
    #[must_use]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Descending => b.total_cmp(&a),
            Self::Ascending => a.total_cmp(&b),
        }
    }
}

/// Options for [`summarize`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Row folding
    pub aggregate: Aggregation,
    /// Sort direction
    pub order: SortOrder,
}

impl SummaryOptions {
    /// Create default options (no aggregation, descending)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set aggregation
    #[must_use]
    pub const fn with_aggregate(mut self, aggregate: Aggregation) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Set sort order
    #[must_use]
    pub const fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// File label
    pub file_name: String,
    /// Line coverage, 0-100
    pub coverage_percentage: f64,
    /// Input rows folded into this entry
    pub samples: usize,
}

/// Ordered, percentage-bearing rows ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Sort direction of `entries`
    pub order: SortOrder,
    /// Entries in sort order
    pub entries: Vec<SummaryEntry>,
}

impl CoverageSummary {
    /// Build a summary, sorting `entries` stably in `order`
    #[must_use]
    pub fn new(order: SortOrder, mut entries: Vec<SummaryEntry>) -> Self {
        entries.sort_by(|a, b| order.compare(a.coverage_percentage, b.coverage_percentage));
        Self { order, entries }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to draw
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from highest to lowest coverage, whatever the sort order
    pub fn best_first(&self) -> Box<dyn Iterator<Item = &SummaryEntry> + '_> {
        match self.order {
            SortOrder::Descending => Box::new(self.entries.iter()),
            SortOrder::Ascending => Box::new(self.entries.iter().rev()),
        }
    }

    /// Unweighted mean of the entry percentages
    #[must_use]
    pub fn mean_coverage(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: f64 = self.entries.iter().map(|e| e.coverage_percentage).sum();
        Some(total / self.entries.len() as f64)
    }

    /// Highest-coverage entry
    #[must_use]
    pub fn best(&self) -> Option<&SummaryEntry> {
        self.best_first().next()
    }

    /// Lowest-coverage entry
    #[must_use]
    pub fn worst(&self) -> Option<&SummaryEntry> {
        self.best_first().last()
    }
}

/// Order (and optionally fold) a dataset's rows by coverage
#[must_use]
pub fn summarize(dataset: &CoverageDataset, options: &SummaryOptions) -> CoverageSummary {
    let entries = match options.aggregate {
        Aggregation::None => dataset
            .rows()
            .iter()
            .map(|row| SummaryEntry {
                file_name: row.file_name.clone(),
                coverage_percentage: row.coverage_percentage,
                samples: 1,
            })
            .collect(),
        Aggregation::MeanByFile => mean_by_file(dataset),
    };
    CoverageSummary::new(options.order, entries)
}

/// Fold rows by file name, keeping first-appearance order
fn mean_by_file(dataset: &CoverageDataset) -> Vec<SummaryEntry> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(String, f64, usize)> = Vec::new();

    for row in dataset.rows() {
        if let Some(&slot) = slots.get(row.file_name.as_str()) {
            sums[slot].1 += row.coverage_percentage;
            sums[slot].2 += 1;
        } else {
            slots.insert(&row.file_name, sums.len());
            sums.push((row.file_name.clone(), row.coverage_percentage, 1));
        }
    }

    sums.into_iter()
        .map(|(file_name, total, samples)| SummaryEntry {
            file_name,
            coverage_percentage: total / samples as f64,
            samples,
        })
        .collect()
}
