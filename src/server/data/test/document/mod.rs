use crate::server::{
    data::document::DocumentRepository,
    model::document::{CreateDocumentParams, UpdateDocumentParams},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_by_course;
