use crate::server::{
    data::{analytics::AnalyticsRepository, response::ResponseRepository},
    model::response::CreateResponseParams,
};
use sea_orm::DbErr;
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod set_feedback;
