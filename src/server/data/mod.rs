//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models to maintain separation between the data layer and business logic layer.
//! Every repository is generic over `ConnectionTrait` so the same queries run either on the
//! pool or inside a transaction.

pub mod activity;
pub mod analytics;
pub mod course;
pub mod document;
pub mod enrollment;
pub mod forum_post;
pub mod forum_read;
pub mod forum_reply;
pub mod response;
pub mod user;

#[cfg(test)]
mod test;
