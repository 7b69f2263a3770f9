//! Staff roles.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Maintenance,
    Inspector,
    Reporter,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        Self::Admin,
        Self::Maintenance,
        Self::Inspector,
        Self::Reporter,
    ];

    /// Parse a role string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "admin" => Ok(Self::Admin),
            "maintenance" => Ok(Self::Maintenance),
            "inspector" => Ok(Self::Inspector),
            "reporter" => Ok(Self::Reporter),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: admin, maintenance, inspector, reporter"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Maintenance => "maintenance",
            Self::Inspector => "inspector",
            Self::Reporter => "reporter",
        }
    }
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    Ok(())
}
