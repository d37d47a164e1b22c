//! Data transfer objects exchanged with API clients.

pub mod activity;
pub mod admin;
pub mod ai;
pub mod analytics;
pub mod api;
pub mod course;
pub mod document;
pub mod forum;
pub mod import;
pub mod response;
pub mod user;
