//! Defect (pothole) records: severity and status enums and the typed record
//! the API serves.
//!
//! Numeric bounds on incoming fields are declared on the create/update DTOs in
//! the database crate; the checks here cover what those cannot express.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Physical urgency of a defect, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Every severity, in ascending order.
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Parse a severity string from the database or a query parameter.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::Validation(format!(
                "Invalid severity '{s}'. Must be one of: low, medium, high, critical"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Position of a defect in the repair lifecycle.
///
/// The chain is linear: `reported -> inspected -> scheduled -> in-progress ->
/// completed`. See [`crate::lifecycle`] for the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefectStatus {
    Reported,
    Inspected,
    Scheduled,
    InProgress,
    Completed,
}

impl DefectStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [DefectStatus; 5] = [
        Self::Reported,
        Self::Inspected,
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
    ];

    /// Parse a status string from the database or a query parameter.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "reported" => Ok(Self::Reported),
            "inspected" => Ok(Self::Inspected),
            "scheduled" => Ok(Self::Scheduled),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::Validation(format!(
                "Invalid defect status '{s}'. Must be one of: \
                 reported, inspected, scheduled, in-progress, completed"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::Inspected => "inspected",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reported => "Reported",
            Self::Inspected => "Inspected",
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Geographic position of a defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Point-cloud capture statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    #[serde(deserialize_with = "count")]
    pub points: u64,
    /// Points per square metre.
    #[serde(deserialize_with = "number")]
    pub density: f64,
    /// Fraction in `[0, 1]`.
    #[serde(deserialize_with = "number")]
    pub accuracy: f64,
}

/// Measured surface geometry. Depth and width in centimetres, area in m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMetrics {
    #[serde(deserialize_with = "number")]
    pub depth: f64,
    #[serde(deserialize_with = "number")]
    pub width: f64,
    #[serde(deserialize_with = "number")]
    pub area: f64,
}

/// Output of the classification model that flagged the defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Percentage in `[0, 100]`.
    #[serde(deserialize_with = "number")]
    pub confidence: f64,
    pub model: String,
    #[serde(alias = "scanDate")]
    pub scan_date: String,
}

/// Sensor summary attached to a defect by the scanning vehicle.
///
/// Every block is optional. Camel-case keys written by the capture pipeline
/// are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSummary {
    #[serde(default, alias = "pointCloud", skip_serializing_if = "Option::is_none")]
    pub point_cloud: Option<PointCloud>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

/// Numeric sensor fields arrive either as JSON numbers or as numeric strings,
/// depending on which capture firmware wrote them.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Deserialize a finite `f64` from a number or a numeric string.
fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{s}'")))?,
    };
    if !value.is_finite() {
        return Err(de::Error::custom("sensor values must be finite"));
    }
    Ok(value)
}

/// Deserialize a point count. Integral floats such as `15000.0` are accepted.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u64)
}

/// A reported pothole as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    pub id: DbId,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_id: Option<String>,
    pub severity: Severity,
    pub status: DefectStatus,
    /// Detection confidence as a fraction in `[0, 1]`.
    pub detection_accuracy: f64,
    pub report_date: Timestamp,
    pub scheduled_repair_date: Option<Timestamp>,
    pub completion_date: Option<Timestamp>,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub reported_by: Option<DbId>,
    pub sensor_summary: Option<SensorSummary>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Address shown for defects that only carry a road identifier.
pub fn road_address(road_id: &str) -> String {
    format!("Road ID: {road_id}")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum number of image references per defect.
pub const MAX_IMAGES: usize = 16;

/// Validate the image reference list.
pub fn validate_images(images: &[String]) -> Result<(), CoreError> {
    if images.len() > MAX_IMAGES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_IMAGES} images may be attached (got {})",
            images.len()
        )));
    }
    if images.iter().any(|url| url.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Image references must not be empty".to_string(),
        ));
    }
    Ok(())
}
