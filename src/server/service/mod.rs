//! Service layer for business logic and orchestration.
//!
//! Services sit between the controller (API) layer and the data (repository) layer. They
//! own access rules, validation, transactions and calls to external services (the AI
//! chat completion API and object storage), working with domain models rather than DTOs
//! or entity models.

pub mod access;
pub mod activity;
pub mod admin;
pub mod ai;
pub mod ai_qa;
pub mod analytics;
pub mod auth;
pub mod course;
pub mod document;
pub mod forum;
pub mod import;
pub mod response;
pub mod storage;
