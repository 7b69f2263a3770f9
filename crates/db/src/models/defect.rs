//! Defect row model, DTOs and conversion to the domain record.

use pulse_core::defect::{road_address, Defect, DefectStatus, Location, SensorSummary, Severity};
use pulse_core::error::CoreError;
use pulse_core::types::{DbId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

use crate::models::nullable;

/// A row from the `defects` table.
///
/// Severity and status are stored as text; [`DefectRow::into_domain`] parses
/// them into the closed enums served by the API.
#[derive(Debug, Clone, FromRow)]
pub struct DefectRow {
    pub id: DbId,
    pub road_id: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: String,
    pub status: String,
    pub detection_accuracy: f64,
    pub report_date: Timestamp,
    pub scheduled_repair_date: Option<Timestamp>,
    pub completion_date: Option<Timestamp>,
    pub image_urls: Vec<String>,
    pub description: Option<String>,
    pub reported_by: Option<DbId>,
    pub sensor_data: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DefectRow {
    /// Convert the stored row into the typed domain record.
    ///
    /// Sensor blocks are parsed one at a time: a malformed block is logged
    /// and dropped while the others are kept.
    pub fn into_domain(self) -> Result<Defect, CoreError> {
        let id = self.id;
        let severity = Severity::from_str_db(&self.severity)
            .map_err(|e| CoreError::Internal(format!("defect {id}: {e}")))?;
        let status = DefectStatus::from_str_db(&self.status)
            .map_err(|e| CoreError::Internal(format!("defect {id}: {e}")))?;

        let sensor_summary = self.sensor_data.and_then(|raw| parse_sensor_summary(id, raw));

        let address = self
            .address
            .or_else(|| self.road_id.as_deref().map(road_address));

        Ok(Defect {
            id,
            location: Location {
                lat: self.latitude,
                lng: self.longitude,
                address,
            },
            road_id: self.road_id,
            severity,
            status,
            detection_accuracy: self.detection_accuracy,
            report_date: self.report_date,
            scheduled_repair_date: self.scheduled_repair_date,
            completion_date: self.completion_date,
            images: self.image_urls,
            description: self.description,
            reported_by: self.reported_by,
            sensor_summary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_sensor_summary(id: DbId, raw: Value) -> Option<SensorSummary> {
    let mut blocks = match raw {
        Value::Object(blocks) => blocks,
        Value::Null => return None,
        _ => {
            tracing::warn!(defect_id = id, "Ignoring sensor data that is not an object");
            return None;
        }
    };

    let point_cloud = blocks
        .remove("point_cloud")
        .or_else(|| blocks.remove("pointCloud"));
    let summary = SensorSummary {
        point_cloud: sensor_block(id, "point_cloud", point_cloud),
        surface: sensor_block(id, "surface", blocks.remove("surface")),
        classification: sensor_block(id, "classification", blocks.remove("classification")),
    };

    (summary != SensorSummary::default()).then_some(summary)
}

fn sensor_block<T: DeserializeOwned>(id: DbId, block: &str, raw: Option<Value>) -> Option<T> {
    match raw? {
        Value::Null => None,
        value => serde_json::from_value(value)
            .map_err(|e| {
                tracing::warn!(
                    defect_id = id,
                    block,
                    error = %e,
                    "Ignoring malformed sensor block",
                );
            })
            .ok(),
    }
}

/// DTO for reporting a new defect. New defects always start as `reported`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDefect {
    pub road_id: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub severity: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub detection_accuracy: f64,
    /// Defaults to the insert time.
    pub report_date: Option<Timestamp>,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub images: Vec<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub reported_by: Option<DbId>,
    pub sensor_summary: Option<SensorSummary>,
}

/// DTO for patching the descriptive fields of a defect.
///
/// Nullable fields use `Option<Option<T>>`: an absent key leaves the column
/// alone and an explicit `null` clears it.
///
/// Status and its dates are not patchable here; they only move through the
/// lifecycle endpoints.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDefect {
    #[serde(default, deserialize_with = "nullable")]
    pub road_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    pub severity: Option<String>,
    #[validate(length(max = 16))]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 2000))]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub sensor_summary: Option<Option<SensorSummary>>,
}

/// Query parameters for listing defects. `"all"` means no constraint.
#[derive(Debug, Default, Deserialize)]
pub struct DefectListParams {
    pub severity: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for `POST /defects/{id}/advance`.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceDefect {
    /// When present, the advance only happens if the stored status matches.
    pub expected_status: Option<String>,
}

/// Body for `PUT /defects/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateDefectStatus {
    pub status: String,
}
