//! HTTP handlers for resource CRUD and organisation listings.

pub mod organisation;
pub mod resource;
