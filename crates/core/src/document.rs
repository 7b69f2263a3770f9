//! Document (paperwork) categories, workflow stages, priorities and
//! validators.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Kind of paperwork attached to a repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    WorkOrder,
    InspectionReport,
    RepairEstimate,
    Permit,
    Invoice,
    CompletionReport,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        Self::WorkOrder,
        Self::InspectionReport,
        Self::RepairEstimate,
        Self::Permit,
        Self::Invoice,
        Self::CompletionReport,
    ];

    /// Parse a document type string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid document type '{s}'. Must be one of: work_order, \
                     inspection_report, repair_estimate, permit, invoice, completion_report"
                ))
            })
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkOrder => "work_order",
            Self::InspectionReport => "inspection_report",
            Self::RepairEstimate => "repair_estimate",
            Self::Permit => "permit",
            Self::Invoice => "invoice",
            Self::CompletionReport => "completion_report",
        }
    }
}

/// Workflow stage of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    InProcess,
    Done,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [Self::Pending, Self::InProcess, Self::Done];

    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_process" => Ok(Self::InProcess),
            "done" => Ok(Self::Done),
            _ => Err(CoreError::Validation(format!(
                "Invalid document status '{s}'. Must be one of: pending, in_process, done"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProcess => "in_process",
            Self::Done => "done",
        }
    }
}

/// Urgency of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Parse a priority string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(CoreError::Validation(format!(
                "Invalid priority '{s}'. Must be one of: low, medium, high, urgent"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Maximum length for a document title (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Validate a document title: non-blank and bounded.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Document title must not be empty".to_string(),
        ));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Document title exceeds maximum length of {MAX_TITLE_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate the assignee name.
pub fn validate_assignee(assigned_to: &str) -> Result<(), CoreError> {
    if assigned_to.trim().is_empty() {
        return Err(CoreError::Validation(
            "Document assignee must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A document is overdue once its due date has passed and it is not done.
pub fn is_overdue(status: DocumentStatus, due_date: Date, today: Date) -> bool {
    status != DocumentStatus::Done && due_date < today
}
