//! Severity/status filter over defect lists.

use serde::Serialize;

use crate::defect::{Defect, DefectStatus, Severity};
use crate::error::CoreError;

/// Query value meaning "no constraint".
pub const ALL: &str = "all";

/// Optional equality constraints on severity and status.
///
/// A `None` field is the identity filter for that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefectFilter {
    pub severity: Option<Severity>,
    pub status: Option<DefectStatus>,
}

/// "Showing `filtered` of `total`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub filtered: usize,
}

impl DefectFilter {
    /// Build a filter from raw query values, treating absent and `"all"` alike.
    pub fn from_query(severity: Option<&str>, status: Option<&str>) -> Result<Self, CoreError> {
        let severity = match severity {
            None | Some(ALL) => None,
            Some(s) => Some(Severity::from_str_db(s)?),
        };
        let status = match status {
            None | Some(ALL) => None,
            Some(s) => Some(DefectStatus::from_str_db(s)?),
        };
        Ok(Self { severity, status })
    }

    pub fn is_empty(&self) -> bool {
        self.severity.is_none() && self.status.is_none()
    }

    /// Whether `defect` satisfies every present constraint.
    pub fn matches(&self, defect: &Defect) -> bool {
        self.severity.map_or(true, |s| defect.severity == s)
            && self.status.map_or(true, |s| defect.status == s)
    }

    /// Keep the matching records, preserving input order.
    pub fn apply<'a, I>(&self, defects: I) -> Vec<Defect>
    where
        I: IntoIterator<Item = &'a Defect>,
    {
        defects
            .into_iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect()
    }

    /// Filter an owned list and report how many records survived.
    pub fn apply_owned(&self, defects: Vec<Defect>) -> (Vec<Defect>, FilterSummary) {
        let total = defects.len();
        let kept: Vec<Defect> = defects.into_iter().filter(|d| self.matches(d)).collect();
        let summary = FilterSummary {
            total,
            filtered: kept.len(),
        };
        (kept, summary)
    }
}
