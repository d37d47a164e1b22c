//! Activity response repository.
//!
//! One response per `(activity_id, student_id)` is enforced by a unique index; the
//! service checks first so the common case reports a friendly error.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::response::{CreateResponseParams, Response};

/// Repository providing database operations for activity responses.
pub struct ResponseRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ResponseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a submission with the current time.
    ///
    /// # Arguments
    /// - `params` - Activity, student and payload
    ///
    /// # Returns
    /// - `Ok(Response)` - The stored response
    /// - `Err(DbErr)` - Database error, including a second submission
    pub async fn create(&self, params: CreateResponseParams) -> Result<Response, DbErr> {
        let entity = entity::activity_response::ActiveModel {
            activity_id: ActiveValue::Set(params.activity_id),
            student_id: ActiveValue::Set(params.student_id),
            response_data: ActiveValue::Set(params.response_data),
            ai_analysis: ActiveValue::Set(None),
            similarity_score: ActiveValue::Set(None),
            score: ActiveValue::Set(None),
            feedback: ActiveValue::Set(None),
            submitted_at: ActiveValue::Set(Utc::now()),
            time_spent_seconds: ActiveValue::Set(params.time_spent_seconds),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Response::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Response>, DbErr> {
        let entity = entity::prelude::ActivityResponse::find_by_id(id)
            .one(self.db)
            .await?;

        Ok(entity.map(Response::from_entity))
    }

    /// The student's response to an activity, if any.
    pub async fn find_by_activity_and_student(
        &self,
        activity_id: i32,
        student_id: i32,
    ) -> Result<Option<Response>, DbErr> {
        let entity = entity::prelude::ActivityResponse::find()
            .filter(entity::activity_response::Column::ActivityId.eq(activity_id))
            .filter(entity::activity_response::Column::StudentId.eq(student_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Response::from_entity))
    }

    /// All responses to an activity in submission order.
    pub async fn get_by_activity(&self, activity_id: i32) -> Result<Vec<Response>, DbErr> {
        let entities = entity::prelude::ActivityResponse::find()
            .filter(entity::activity_response::Column::ActivityId.eq(activity_id))
            .order_by_asc(entity::activity_response::Column::SubmittedAt)
            .order_by_asc(entity::activity_response::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Response::from_entity).collect())
    }

    /// All responses to any of the given activities.
    pub async fn get_by_activities(&self, activity_ids: &[i32]) -> Result<Vec<Response>, DbErr> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::ActivityResponse::find()
            .filter(entity::activity_response::Column::ActivityId.is_in(activity_ids.to_vec()))
            .order_by_asc(entity::activity_response::Column::SubmittedAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Response::from_entity).collect())
    }

    /// A student's most recent responses.
    pub async fn get_recent_by_student(
        &self,
        student_id: i32,
        limit: u64,
    ) -> Result<Vec<Response>, DbErr> {
        let entities = entity::prelude::ActivityResponse::find()
            .filter(entity::activity_response::Column::StudentId.eq(student_id))
            .order_by_desc(entity::activity_response::Column::SubmittedAt)
            .order_by_desc(entity::activity_response::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Response::from_entity).collect())
    }

    /// Stores teacher feedback and an optional score.
    ///
    /// # Returns
    /// - `Ok(Some(Response))` - Updated response
    /// - `Ok(None)` - No response with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn set_feedback(
        &self,
        id: i32,
        feedback: String,
        score: Option<f64>,
    ) -> Result<Option<Response>, DbErr> {
        let Some(entity) = entity::prelude::ActivityResponse::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        active.feedback = ActiveValue::Set(Some(feedback));
        if let Some(score) = score {
            active.score = ActiveValue::Set(Some(score));
        }

        let entity = active.update(self.db).await?;

        Ok(Some(Response::from_entity(entity)))
    }

    /// Counts all responses, or those of one student.
    pub async fn count(&self, student_id: Option<i32>) -> Result<u64, DbErr> {
        let mut query = entity::prelude::ActivityResponse::find();
        if let Some(student_id) = student_id {
            query = query.filter(entity::activity_response::Column::StudentId.eq(student_id));
        }

        query.count(self.db).await
    }

    /// Fills activity titles and student names for a batch of responses.
    pub async fn with_details(&self, mut responses: Vec<Response>) -> Result<Vec<Response>, DbErr> {
        if responses.is_empty() {
            return Ok(responses);
        }

        let activity_ids: Vec<i32> = responses.iter().map(|r| r.activity_id).collect();
        let student_ids: Vec<i32> = responses.iter().map(|r| r.student_id).collect();

        let titles: HashMap<i32, String> = entity::prelude::Activity::find()
            .select_only()
            .columns([entity::activity::Column::Id, entity::activity::Column::Title])
            .filter(entity::activity::Column::Id.is_in(activity_ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        let students: HashMap<i32, (String, String)> = entity::prelude::User::find()
            .select_only()
            .columns([
                entity::user::Column::Id,
                entity::user::Column::FullName,
                entity::user::Column::Username,
            ])
            .filter(entity::user::Column::Id.is_in(student_ids))
            .into_tuple::<(i32, String, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .map(|(id, full_name, username)| (id, (full_name, username)))
            .collect();

        for response in responses.iter_mut() {
            response.activity_title = titles.get(&response.activity_id).cloned();
            if let Some((full_name, username)) = students.get(&response.student_id) {
                response.student_name = Some(full_name.clone());
                response.student_username = Some(username.clone());
            }
        }

        Ok(responses)
    }
}
