//! HTTP request handlers.
//!
//! Each handler authenticates the caller through `AuthGuard`, delegates to a service and
//! converts the returned domain models into DTOs. Every handler is annotated with
//! `utoipa::path` and grouped by a per-module tag in the OpenAPI document.

pub mod activity;
pub mod admin;
pub mod ai_qa;
pub mod analytics;
pub mod auth;
pub mod course;
pub mod document;
pub mod extract;
pub mod form;
pub mod forum;
pub mod response;

#[cfg(test)]
mod test;
