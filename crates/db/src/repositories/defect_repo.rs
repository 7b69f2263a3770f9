//! Repository for the `defects` table.

use pulse_core::lifecycle::Transition;
use pulse_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::defect::{CreateDefect, DefectRow, UpdateDefect};

/// Column list for `defects` queries.
const COLUMNS: &str = "\
    id, road_id, address, latitude, longitude, severity, status, \
    detection_accuracy, report_date, scheduled_repair_date, completion_date, \
    image_urls, description, reported_by, sensor_data, created_at, updated_at";

/// Provides CRUD and lifecycle operations for defects.
pub struct DefectRepo;

impl DefectRepo {
    /// Insert a new defect in the `reported` stage, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateDefect) -> Result<DefectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO defects \
                (road_id, address, latitude, longitude, severity, detection_accuracy, \
                 report_date, image_urls, description, reported_by, sensor_data) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()), $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DefectRow>(&query)
            .bind(&input.road_id)
            .bind(&input.address)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.severity)
            .bind(input.detection_accuracy)
            .bind(input.report_date)
            .bind(&input.images)
            .bind(&input.description)
            .bind(input.reported_by)
            .bind(input.sensor_summary.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a defect by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DefectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM defects WHERE id = $1");
        sqlx::query_as::<_, DefectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load every defect, most recently reported first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DefectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM defects ORDER BY report_date DESC, id DESC");
        sqlx::query_as::<_, DefectRow>(&query).fetch_all(pool).await
    }

    /// Patch descriptive fields. `None` leaves a column unchanged and
    /// `Some(None)` clears a nullable one.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDefect,
    ) -> Result<Option<DefectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE defects SET \
                road_id = CASE WHEN $2 THEN $3 ELSE road_id END, \
                address = CASE WHEN $4 THEN $5 ELSE address END, \
                severity = COALESCE($6, severity), \
                image_urls = COALESCE($7, image_urls), \
                description = CASE WHEN $8 THEN $9 ELSE description END, \
                sensor_data = CASE WHEN $10 THEN $11 ELSE sensor_data END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DefectRow>(&query)
            .bind(id)
            .bind(input.road_id.is_some())
            .bind(input.road_id.as_ref().and_then(Option::as_deref))
            .bind(input.address.is_some())
            .bind(input.address.as_ref().and_then(Option::as_deref))
            .bind(&input.severity)
            .bind(&input.images)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(Option::as_deref))
            .bind(input.sensor_summary.is_some())
            .bind(input.sensor_summary.as_ref().and_then(Option::as_ref).map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Apply a lifecycle transition if the stored status still equals
    /// `transition.from`.
    ///
    /// Returns `None` when the row is missing or another writer moved it
    /// first; callers distinguish the two with [`DefectRepo::find_by_id`].
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        transition: &Transition,
    ) -> Result<Option<DefectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE defects SET \
                status = $3, \
                scheduled_repair_date = COALESCE($4, scheduled_repair_date), \
                completion_date = COALESCE($5, completion_date) \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DefectRow>(&query)
            .bind(id)
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .bind(transition.scheduled_repair_date)
            .bind(transition.completion_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a defect by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM defects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
