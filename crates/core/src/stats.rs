//! Aggregate breakdowns behind the dashboard's analytics tab.

use serde::Serialize;

use crate::defect::{Defect, DefectStatus, Severity};

/// One bucket of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// Machine value (`"high"`, `"in-progress"`, ...).
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
    /// Share of the total in percent, `0.0` for an empty list.
    pub percent: f64,
}

/// Severity and status breakdowns over a list of defects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefectStats {
    pub total: usize,
    pub by_severity: Vec<Bucket>,
    pub by_status: Vec<Bucket>,
}

fn bucket(key: &'static str, label: &'static str, count: usize, total: usize) -> Bucket {
    let percent = if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    };
    Bucket {
        key,
        label,
        count,
        percent,
    }
}

/// Count defects per severity and per status.
///
/// Every level and stage is present (zero-filled) in its natural order.
pub fn compute(defects: &[Defect]) -> DefectStats {
    let total = defects.len();

    let mut severity_counts = [0usize; Severity::ALL.len()];
    let mut status_counts = [0usize; DefectStatus::ALL.len()];
    for d in defects {
        severity_counts[d.severity as usize] += 1;
        status_counts[d.status as usize] += 1;
    }

    let by_severity = Severity::ALL
        .iter()
        .zip(severity_counts)
        .map(|(s, n)| bucket(s.as_str(), s.label(), n, total))
        .collect();
    let by_status = DefectStatus::ALL
        .iter()
        .zip(status_counts)
        .map(|(s, n)| bucket(s.as_str(), s.label(), n, total))
        .collect();

    DefectStats {
        total,
        by_severity,
        by_status,
    }
}
