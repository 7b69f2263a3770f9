//! Defect document model and DTOs.

use pulse_core::document::{self, DocumentStatus};
use pulse_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::nullable;

/// A row from the `defect_documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub title: String,
    pub doc_type: String,
    pub status: String,
    pub priority: String,
    pub due_date: Date,
    pub assigned_to: String,
    pub defect_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    /// Whether the document is past due and still open on `today`.
    pub fn is_overdue(&self, today: Date) -> bool {
        DocumentStatus::from_str_db(&self.status)
            .map(|status| document::is_overdue(status, self.due_date, today))
            .unwrap_or(false)
    }
}

/// DTO for creating a document.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocument {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub doc_type: String,
    /// Defaults to `pending`.
    pub status: Option<String>,
    /// Defaults to `medium`.
    pub priority: Option<String>,
    pub due_date: Date,
    #[validate(length(min = 1, max = 200))]
    pub assigned_to: String,
    pub defect_id: Option<DbId>,
}

/// DTO for updating a document. All fields are optional; `"defect_id": null`
/// unlinks the document from its defect.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDocument {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub doc_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Date>,
    #[validate(length(min = 1, max = 200))]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub defect_id: Option<Option<DbId>>,
}

/// Query parameters for listing documents.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub doc_type: Option<String>,
    pub defect_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
