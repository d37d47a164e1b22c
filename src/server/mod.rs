//! Smart classroom backend.
//!
//! Serves the JSON API used by the teacher, student and admin dashboards: courses and
//! enrollment, classroom activities and responses, analytics, course documents, the
//! course forum, and the AI assisted features built on a chat completion API.
//!
//! # Layers
//!
//! - `controller/` - Axum handlers. Each one runs `AuthGuard`, calls one service method
//!   and maps the result to a DTO from `crate::model`.
//! - `service/` - Access rules and business logic per feature, plus the object storage
//!   and AI clients behind the `ObjectStorage` and `ChatCompletion` traits.
//! - `data/` - SeaORM repositories generic over `ConnectionTrait` so they run inside
//!   transactions as well as on the pool.
//! - `model/` - Domain models and the parameter types passed to repositories.
//! - `error/` - `AppError` and the domain errors it wraps, rendered as `{"error": ...}`.
//! - `middleware/` - Session wrapper and role guard.
//! - `util/` - Email, filename, password, text and spreadsheet helpers.
//!
//! `config`, `state`, `startup` and `router` wire these together in `main`.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
