//! Domain layer for the pothole tracking service.
//!
//! Pure types and rules shared by the database and API crates: defect,
//! document and user records, the severity/status filter, the repair
//! lifecycle, and dashboard statistics. Nothing in here performs I/O.

pub mod defect;
pub mod document;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod search;
pub mod stats;
pub mod types;
pub mod user;
