use crate::server::{
    data::{
        forum_post::ForumPostRepository, forum_read::ForumReadRepository,
        forum_reply::ForumReplyRepository,
    },
    model::forum::{CreateReplyParams, UpdatePostParams},
};
use chrono::{Duration, Utc};
use entity::user::Role;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod post;
mod read;
mod reply;
