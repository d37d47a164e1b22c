use crate::server::data::enrollment::EnrollmentRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod enroll;
