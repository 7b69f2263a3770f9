//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod defect_repo;
pub mod document_repo;
pub mod user_repo;

pub use defect_repo::DefectRepo;
pub use document_repo::DocumentRepo;
pub use user_repo::UserRepo;
