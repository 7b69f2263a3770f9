//! Repository for the `defect_documents` table.

use pulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, DocumentListParams, UpdateDocument};

/// Column list for `defect_documents` queries.
const COLUMNS: &str = "\
    id, title, doc_type, status, priority, due_date, assigned_to, defect_id, \
    created_at, updated_at";

/// Provides CRUD operations for defect documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Create a new document, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO defect_documents \
                (title, doc_type, status, priority, due_date, assigned_to, defect_id) \
             VALUES ($1, $2, COALESCE($3, 'pending'), COALESCE($4, 'medium'), $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.title.trim())
            .bind(&input.doc_type)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.assigned_to.trim())
            .bind(input.defect_id)
            .fetch_one(pool)
            .await
    }

    /// Find a document by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM defect_documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List documents with optional status, priority, type and defect filters.
    ///
    /// Results are ordered by due date (soonest first).
    pub async fn list_filtered(
        pool: &PgPool,
        params: &DocumentListParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if params.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if params.priority.is_some() {
            conditions.push(format!("priority = ${param_idx}"));
            param_idx += 1;
        }
        if params.doc_type.is_some() {
            conditions.push(format!("doc_type = ${param_idx}"));
            param_idx += 1;
        }
        if params.defect_id.is_some() {
            conditions.push(format!("defect_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM defect_documents {where_clause} \
             ORDER BY due_date ASC, id ASC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Document>(&query);

        if let Some(ref s) = params.status {
            q = q.bind(s);
        }
        if let Some(ref p) = params.priority {
            q = q.bind(p);
        }
        if let Some(ref t) = params.doc_type {
            q = q.bind(t);
        }
        if let Some(defect_id) = params.defect_id {
            q = q.bind(defect_id);
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }

    /// All documents linked to one defect, soonest due first.
    pub async fn list_for_defect(
        pool: &PgPool,
        defect_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defect_documents \
             WHERE defect_id = $1 \
             ORDER BY due_date ASC, id ASC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(defect_id)
            .fetch_all(pool)
            .await
    }

    /// Update a document by ID. `None` fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE defect_documents SET \
                title = COALESCE($2, title), \
                doc_type = COALESCE($3, doc_type), \
                status = COALESCE($4, status), \
                priority = COALESCE($5, priority), \
                due_date = COALESCE($6, due_date), \
                assigned_to = COALESCE($7, assigned_to), \
                defect_id = CASE WHEN $8 THEN $9 ELSE defect_id END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.doc_type)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.assigned_to.as_deref().map(str::trim))
            .bind(input.defect_id.is_some())
            .bind(input.defect_id.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a document by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM defect_documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
