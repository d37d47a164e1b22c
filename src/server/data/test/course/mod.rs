use crate::server::{
    data::course::CourseRepository,
    model::course::{CreateCourseParams, UpdateCourseParams},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_enrolled;
mod with_details;
