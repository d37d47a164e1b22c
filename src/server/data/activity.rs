//! Activity data repository.
//!
//! Provides `ActivityRepository` for activity CRUD, filtered listings, dashboard
//! counters and bulk loading of course names, creator names and response counts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::activity::ActivityStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::server::{
    data::course::tally,
    model::activity::{Activity, ActivityFilter, CreateActivityParams, UpdateActivityParams},
};

/// Repository providing database operations for activities.
pub struct ActivityRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ActivityRepository<'a, C> {
    /// Creates a new ActivityRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection or transaction
    ///
    /// # Returns
    /// - `ActivityRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new activity in draft status.
    ///
    /// # Arguments
    /// - `params` - Activity fields
    ///
    /// # Returns
    /// - `Ok(Activity)` - The created activity without derived fields
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreateActivityParams) -> Result<Activity, DbErr> {
        let now = Utc::now();

        let entity = entity::activity::ActiveModel {
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            activity_type: ActiveValue::Set(params.activity_type),
            course_id: ActiveValue::Set(params.course_id),
            creator_id: ActiveValue::Set(params.creator_id),
            config: ActiveValue::Set(params.config),
            is_ai_generated: ActiveValue::Set(params.is_ai_generated),
            ai_prompt: ActiveValue::Set(None),
            ai_refined: ActiveValue::Set(false),
            status: ActiveValue::Set(ActivityStatus::Draft),
            start_time: ActiveValue::Set(None),
            end_time: ActiveValue::Set(None),
            duration_minutes: ActiveValue::Set(params.duration_minutes),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Activity::from_entity(entity))
    }

    /// Finds an activity by ID.
    ///
    /// # Returns
    /// - `Ok(Some(Activity))` - Activity found, derived fields not loaded
    /// - `Ok(None)` - No activity with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Activity>, DbErr> {
        let entity = entity::prelude::Activity::find_by_id(id)
            .one(self.db)
            .await?;

        Ok(entity.map(Activity::from_entity))
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Returns
    /// - `Ok(Some(Activity))` - Updated activity
    /// - `Ok(None)` - No activity with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(&self, params: UpdateActivityParams) -> Result<Option<Activity>, DbErr> {
        let Some(entity) = entity::prelude::Activity::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();

        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(config) = params.config {
            active.config = ActiveValue::Set(Some(config));
        }
        if let Some(duration_minutes) = params.duration_minutes {
            active.duration_minutes = ActiveValue::Set(duration_minutes);
        }
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status);
        }
        if let Some(start_time) = params.start_time {
            active.start_time = ActiveValue::Set(Some(start_time));
        }
        if let Some(end_time) = params.end_time {
            active.end_time = ActiveValue::Set(Some(end_time));
        }
        if let Some(ai_prompt) = params.ai_prompt {
            active.ai_prompt = ActiveValue::Set(Some(ai_prompt));
        }
        if let Some(ai_refined) = params.ai_refined {
            active.ai_refined = ActiveValue::Set(ai_refined);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Activity::from_entity(entity)))
    }

    /// Deletes an activity; its responses and analytics snapshots cascade.
    ///
    /// # Returns
    /// - `Ok(true)` - Activity deleted
    /// - `Ok(false)` - No activity with that ID
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Activity::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Lists activities matching every set filter, newest first.
    ///
    /// # Arguments
    /// - `filter` - Course scope, creator, type and status filters
    /// - `limit` - Maximum number of rows, `None` for all
    ///
    /// # Returns
    /// - `Ok(Vec<Activity>)` - Matching activities
    /// - `Err(DbErr)` - Database error during query
    pub async fn list(
        &self,
        filter: ActivityFilter,
        limit: Option<u64>,
    ) -> Result<Vec<Activity>, DbErr> {
        if matches!(&filter.course_ids, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }

        let mut query = filtered(filter)
            .order_by_desc(entity::activity::Column::CreatedAt)
            .order_by_desc(entity::activity::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let entities = query.all(self.db).await?;

        Ok(entities.into_iter().map(Activity::from_entity).collect())
    }

    /// Counts activities matching every set filter.
    pub async fn count(&self, filter: ActivityFilter) -> Result<u64, DbErr> {
        if matches!(&filter.course_ids, Some(ids) if ids.is_empty()) {
            return Ok(0);
        }

        filtered(filter).count(self.db).await
    }

    /// Counts activities created at or after `since`.
    pub async fn count_created_since(&self, since: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::Activity::find()
            .filter(entity::activity::Column::CreatedAt.gte(since))
            .count(self.db)
            .await
    }

    /// Counts activities flagged as AI generated.
    pub async fn count_ai_generated(&self) -> Result<u64, DbErr> {
        entity::prelude::Activity::find()
            .filter(entity::activity::Column::IsAiGenerated.eq(true))
            .count(self.db)
            .await
    }

    /// Fills course names, creator names and response counts for a batch of activities.
    ///
    /// # Arguments
    /// - `activities` - Activities loaded by any of the other methods
    ///
    /// # Returns
    /// - `Ok(Vec<Activity>)` - Same activities in the same order with derived fields set
    /// - `Err(DbErr)` - Database error during one of the lookups
    pub async fn with_details(
        &self,
        mut activities: Vec<Activity>,
    ) -> Result<Vec<Activity>, DbErr> {
        if activities.is_empty() {
            return Ok(activities);
        }

        let activity_ids: Vec<i32> = activities.iter().map(|a| a.id).collect();
        let course_ids: Vec<i32> = activities.iter().map(|a| a.course_id).collect();
        let creator_ids: Vec<i32> = activities.iter().map(|a| a.creator_id).collect();

        let courses: HashMap<i32, String> = entity::prelude::Course::find()
            .select_only()
            .columns([entity::course::Column::Id, entity::course::Column::CourseName])
            .filter(entity::course::Column::Id.is_in(course_ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        let creators: HashMap<i32, String> = entity::prelude::User::find()
            .select_only()
            .columns([entity::user::Column::Id, entity::user::Column::FullName])
            .filter(entity::user::Column::Id.is_in(creator_ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        let responses: Vec<i32> = entity::prelude::ActivityResponse::find()
            .select_only()
            .column(entity::activity_response::Column::ActivityId)
            .filter(entity::activity_response::Column::ActivityId.is_in(activity_ids))
            .into_tuple()
            .all(self.db)
            .await?;
        let response_counts = tally(responses);

        for activity in activities.iter_mut() {
            activity.course_name = courses.get(&activity.course_id).cloned();
            activity.creator_name = creators.get(&activity.creator_id).cloned();
            activity.response_count = response_counts.get(&activity.id).copied().unwrap_or(0);
        }

        Ok(activities)
    }
}

fn filtered(filter: ActivityFilter) -> Select<entity::activity::Entity> {
    let mut query = entity::prelude::Activity::find();

    if let Some(course_ids) = filter.course_ids {
        query = query.filter(entity::activity::Column::CourseId.is_in(course_ids));
    }
    if let Some(creator_id) = filter.creator_id {
        query = query.filter(entity::activity::Column::CreatorId.eq(creator_id));
    }
    if let Some(course_id) = filter.course_id {
        query = query.filter(entity::activity::Column::CourseId.eq(course_id));
    }
    if let Some(activity_type) = filter.activity_type {
        query = query.filter(entity::activity::Column::ActivityType.eq(activity_type));
    }
    if let Some(status) = filter.status {
        query = query.filter(entity::activity::Column::Status.eq(status));
    }

    query
}
