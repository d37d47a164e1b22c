use crate::server::{
    data::activity::ActivityRepository,
    model::activity::{ActivityFilter, CreateActivityParams, UpdateActivityParams},
};
use chrono::{Duration, Utc};
use entity::activity::{ActivityStatus, ActivityType};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod list;
