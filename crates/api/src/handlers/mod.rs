pub mod analytics;
pub mod defects;
pub mod documents;
pub mod users;
