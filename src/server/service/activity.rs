//! Classroom activities: authoring, lifecycle and AI assisted generation.

use chrono::{Duration, Utc};
use entity::{
    activity::{ActivityStatus, ActivityType},
    user::Role,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::{
    model::{
        activity::{ActivityTypeDto, CreateActivityDto, UpdateActivityDto},
        ai::GenerateActivityDto,
    },
    server::{
        data::{
            activity::ActivityRepository, document::DocumentRepository,
            enrollment::EnrollmentRepository,
        },
        error::AppError,
        model::{
            activity::{Activity, ActivityFilter, CreateActivityParams, UpdateActivityParams},
            user::User,
        },
        service::{
            access::{
                ensure_activity_creator, ensure_activity_viewer, ensure_course_owner,
                load_activity, load_course,
            },
            ai::{prompt::GenerationRequest, AiOutcome, AiService},
            document::document_text,
            storage::ObjectStorage,
        },
        util::validate::{optional_text, required_text},
    },
};

/// Activity length used when none is given.
pub const DEFAULT_DURATION_MINUTES: i32 = 10;

/// Query string filters for activity listings.
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
    pub course_id: Option<i32>,
    pub activity_type: Option<String>,
    pub status: Option<String>,
}

/// Result of asking the AI to refine an activity.
#[derive(Debug, Clone)]
pub enum Refinement {
    /// The activity was marked refined; `content` is the generated replacement.
    Refined { content: Value, activity: Activity },
    /// The AI call failed; the activity is unchanged.
    Unavailable(Value),
}

pub struct ActivityService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ActivityService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists activities visible to the caller, newest first.
    ///
    /// Teachers see what they created, students the activities of their enrolled courses
    /// and admins everything.
    ///
    /// # Returns
    /// - `Ok(Vec<Activity>)` - Matching activities with derived fields
    /// - `Err(AppError::BadRequest)` - Unknown type or status filter
    pub async fn list(&self, user: &User, query: ActivityQuery) -> Result<Vec<Activity>, AppError> {
        let mut filter = ActivityFilter {
            course_id: query.course_id,
            activity_type: optional_text(query.activity_type)
                .map(|t| t.parse::<ActivityType>())
                .transpose()
                .map_err(AppError::BadRequest)?,
            status: optional_text(query.status)
                .map(|s| s.parse::<ActivityStatus>())
                .transpose()
                .map_err(AppError::BadRequest)?,
            ..Default::default()
        };

        match user.role {
            Role::Teacher => filter.creator_id = Some(user.id),
            Role::Student => {
                let course_ids = EnrollmentRepository::new(self.db)
                    .get_course_ids(user.id)
                    .await?;
                filter.course_ids = Some(course_ids);
            }
            Role::Admin => {}
        }

        let repo = ActivityRepository::new(self.db);
        let activities = repo.list(filter, None).await?;

        Ok(repo.with_details(activities).await?)
    }

    pub async fn get(&self, user: &User, activity_id: i32) -> Result<Activity, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_viewer(self.db, user, &activity).await?;

        self.detailed(activity).await
    }

    /// Creates a draft activity in a course owned by the caller.
    ///
    /// # Returns
    /// - `Ok(Activity)` - Created activity
    /// - `Err(AppError::BadRequest)` - Missing title, type or course, or an unknown type
    /// - `Err(AppError::AuthErr)` - Caller does not own the course
    pub async fn create(
        &self,
        teacher: &User,
        payload: CreateActivityDto,
    ) -> Result<Activity, AppError> {
        let title = required_text(payload.title, "title")?;
        let activity_type = required_text(payload.activity_type, "activity_type")?
            .parse::<ActivityType>()
            .map_err(AppError::BadRequest)?;
        let course_id = payload
            .course_id
            .ok_or_else(|| AppError::bad_request("Missing required field: course_id"))?;

        let course = load_course(self.db, course_id).await?;
        ensure_course_owner(teacher, &course)?;

        let activity = ActivityRepository::new(self.db)
            .create(CreateActivityParams {
                title,
                description: optional_text(payload.description),
                activity_type,
                course_id: course.id,
                creator_id: teacher.id,
                config: payload.config,
                is_ai_generated: payload.is_ai_generated.unwrap_or(false),
                duration_minutes: payload.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            })
            .await?;

        tracing::info!(
            "Teacher {} created {} activity {} in course {}",
            teacher.id,
            activity.activity_type.as_str(),
            activity.id,
            course.id
        );

        self.detailed(activity).await
    }

    pub async fn update(
        &self,
        teacher: &User,
        activity_id: i32,
        payload: UpdateActivityDto,
    ) -> Result<Activity, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let status = optional_text(payload.status)
            .map(|s| s.parse::<ActivityStatus>())
            .transpose()
            .map_err(AppError::BadRequest)?;

        let activity = ActivityRepository::new(self.db)
            .update(UpdateActivityParams {
                id: activity.id,
                title: optional_text(payload.title),
                description: payload.description,
                config: payload.config,
                duration_minutes: payload.duration_minutes,
                status,
                ..Default::default()
            })
            .await?
            .ok_or_else(|| AppError::not_found("Activity not found"))?;

        self.detailed(activity).await
    }

    /// Deletes an activity with its responses.
    pub async fn delete(&self, teacher: &User, activity_id: i32) -> Result<(), AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        ActivityRepository::new(self.db).delete(activity.id).await?;

        tracing::info!("Teacher {} deleted activity {}", teacher.id, activity.id);

        Ok(())
    }

    /// Opens the activity for responses until `duration_minutes` from now.
    pub async fn start(&self, teacher: &User, activity_id: i32) -> Result<Activity, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let now = Utc::now();
        let end_time = now + Duration::minutes(i64::from(activity.duration_minutes));

        let activity = ActivityRepository::new(self.db)
            .update(UpdateActivityParams {
                id: activity.id,
                status: Some(ActivityStatus::Active),
                start_time: Some(now),
                end_time: Some(end_time),
                ..Default::default()
            })
            .await?
            .ok_or_else(|| AppError::not_found("Activity not found"))?;

        self.detailed(activity).await
    }

    /// Closes the activity now.
    pub async fn stop(&self, teacher: &User, activity_id: i32) -> Result<Activity, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let activity = ActivityRepository::new(self.db)
            .update(UpdateActivityParams {
                id: activity.id,
                status: Some(ActivityStatus::Completed),
                end_time: Some(Utc::now()),
                ..Default::default()
            })
            .await?
            .ok_or_else(|| AppError::not_found("Activity not found"))?;

        self.detailed(activity).await
    }

    /// Generates activity content from course material.
    ///
    /// When a course is given, the text of the selected active documents of that course is
    /// appended to the course content.
    ///
    /// # Arguments
    /// - `teacher` - Caller, must own `course_id` when set
    /// - `payload` - Type, content, documents and extra instructions
    /// - `ai` - AI service
    /// - `storage` - Storage holding the documents
    ///
    /// # Returns
    /// - `Ok(AiOutcome)` - Generated content or the unavailable fallback
    /// - `Err(AppError)` - Missing fields, access denied or database failure
    pub async fn generate(
        &self,
        teacher: &User,
        payload: GenerateActivityDto,
        ai: &AiService,
        storage: &dyn ObjectStorage,
    ) -> Result<AiOutcome, AppError> {
        let activity_type = required_text(payload.activity_type, "activity_type")?;
        let mut course_content = required_text(payload.course_content, "course_content")?;

        if let Some(course_id) = payload.course_id {
            let course = load_course(self.db, course_id).await?;
            ensure_course_owner(teacher, &course)?;

            if !payload.document_ids.is_empty() {
                let documents = DocumentRepository::new(self.db)
                    .get_active_by_ids(course.id, &payload.document_ids)
                    .await?;

                let mut extracted = String::new();
                for document in &documents {
                    if let Some(text) = document_text(storage, document).await {
                        extracted.push_str(&format!(
                            "\n\nDocument: {}\n{}",
                            document.display_title(),
                            text
                        ));
                    }
                }

                if !extracted.is_empty() {
                    course_content
                        .push_str("\n\n--- Content extracted from uploaded documents ---\n");
                    course_content.push_str(&extracted);
                }
            }
        }

        let request = GenerationRequest {
            activity_type,
            course_content,
            web_resources: payload.web_resources.unwrap_or_default(),
            additional_prompt: payload.additional_prompt.unwrap_or_default(),
            time_limit: payload.time_limit,
        };

        Ok(ai.generate_activity(&request).await)
    }

    /// Regenerates an activity following the teacher's instructions.
    ///
    /// On success the activity is flagged as refined and the prompt is stored; the
    /// generated content itself is returned for the teacher to apply.
    pub async fn refine(
        &self,
        teacher: &User,
        activity_id: i32,
        refinement_prompt: Option<String>,
        ai: &AiService,
    ) -> Result<Refinement, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let refinement_prompt = required_text(refinement_prompt, "refinement_prompt")?;

        let request = GenerationRequest {
            activity_type: activity.activity_type.as_str().to_string(),
            course_content: refinement_prompt.clone(),
            additional_prompt: format!(
                "Please improve this activity: {} - {}",
                activity.title,
                activity.description.as_deref().unwrap_or_default()
            ),
            ..Default::default()
        };

        let content = match ai.generate_activity(&request).await {
            AiOutcome::Completed(content) => content,
            AiOutcome::Unavailable(fallback) => return Ok(Refinement::Unavailable(fallback)),
        };

        let activity = ActivityRepository::new(self.db)
            .update(UpdateActivityParams {
                id: activity.id,
                ai_refined: Some(true),
                ai_prompt: Some(refinement_prompt),
                ..Default::default()
            })
            .await?
            .ok_or_else(|| AppError::not_found("Activity not found"))?;

        Ok(Refinement::Refined {
            content,
            activity: self.detailed(activity).await?,
        })
    }

    async fn detailed(&self, activity: Activity) -> Result<Activity, AppError> {
        ActivityRepository::new(self.db)
            .with_details(vec![activity])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Activity not found"))
    }
}

/// The supported activity types with display names.
pub fn activity_types() -> Vec<ActivityTypeDto> {
    let entry = |activity_type, name: &str, description: &str, icon: &str| ActivityTypeDto {
        activity_type,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    };

    vec![
        entry(
            ActivityType::Poll,
            "Poll",
            "Ask a question and collect student opinions",
            "📊",
        ),
        entry(
            ActivityType::Quiz,
            "Quiz",
            "Multiple choice questions that test understanding",
            "❓",
        ),
        entry(
            ActivityType::WordCloud,
            "Word Cloud",
            "Collect keywords and build a word cloud",
            "☁️",
        ),
        entry(
            ActivityType::ShortAnswer,
            "Short Answer",
            "Open questions that collect detailed answers",
            "✍️",
        ),
        entry(
            ActivityType::MiniGame,
            "Mini Game",
            "Interactive games that make learning fun",
            "🎮",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::server::{
        data::user::UserRepository,
        service::{ai::test_support::ScriptedChat, storage::test_support::MemoryStorage},
    };
    use test_utils::{builder::TestBuilder, factory};

    async fn user(db: &DatabaseConnection, id: i32) -> User {
        UserRepository::new(db).find_by_id(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn create_defaults_duration_and_rejects_unknown_type() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let teacher = user(db, teacher.id).await;
        let service = ActivityService::new(db);

        let activity = service
            .create(
                &teacher,
                CreateActivityDto {
                    title: Some("Warm up".to_string()),
                    activity_type: Some("poll".to_string()),
                    course_id: Some(course.id),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(activity.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert_eq!(activity.status, ActivityStatus::Draft);
        assert_eq!(activity.course_name.as_deref(), Some(course.course_name.as_str()));

        let bad = service
            .create(
                &teacher,
                CreateActivityDto {
                    title: Some("Broken".to_string()),
                    activity_type: Some("essay".to_string()),
                    course_id: Some(course.id),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad, Err(AppError::BadRequest(_))));

        Ok(())
    }

    #[tokio::test]
    async fn start_sets_window_and_stop_completes() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
        let teacher = user(db, teacher.id).await;
        let service = ActivityService::new(db);

        let started = service.start(&teacher, activity.id).await?;
        assert_eq!(started.status, ActivityStatus::Active);
        let (Some(start), Some(end)) = (started.start_time, started.end_time) else {
            panic!("start should set both times");
        };
        assert_eq!((end - start).num_minutes(), i64::from(started.duration_minutes));

        let stopped = service.stop(&teacher, activity.id).await?;
        assert_eq!(stopped.status, ActivityStatus::Completed);
        assert!(stopped.end_time.unwrap() <= Utc::now());

        Ok(())
    }

    #[tokio::test]
    async fn students_list_only_enrolled_course_activities() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let (other_teacher, other_course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;

        factory::activity::create_activity(db, course.id, teacher.id).await?;
        factory::activity::create_activity(db, other_course.id, other_teacher.id).await?;

        let service = ActivityService::new(db);

        let seen = service
            .list(&user(db, student.id).await, ActivityQuery::default())
            .await?;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].course_id, course.id);

        let bad_filter = service
            .list(
                &user(db, student.id).await,
                ActivityQuery {
                    status: Some("paused".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad_filter, Err(AppError::BadRequest(_))));

        Ok(())
    }

    #[tokio::test]
    async fn generation_includes_selected_document_text() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = &test.db;
        let storage = MemoryStorage::default();

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let document = factory::document::DocumentFactory::new(db, course.id, teacher.id)
            .title("Sorting")
            .build()
            .await?;
        storage
            .objects
            .lock()
            .unwrap()
            .insert(document.file_path.clone(), b"Merge sort splits the list".to_vec());

        let chat = std::sync::Arc::new(ScriptedChat::new(vec![Ok(
            r#"{"title": "Sorting quiz", "questions": []}"#.to_string(),
        )]));
        let ai = AiService::new(chat.clone());

        let outcome = ActivityService::new(db)
            .generate(
                &user(db, teacher.id).await,
                GenerateActivityDto {
                    activity_type: Some("quiz".to_string()),
                    course_content: Some("Algorithms".to_string()),
                    course_id: Some(course.id),
                    document_ids: vec![document.id],
                    ..Default::default()
                },
                &ai,
                &storage,
            )
            .await?;

        assert_eq!(
            outcome,
            AiOutcome::Completed(json!({"title": "Sorting quiz", "questions": []}))
        );
        let prompts = chat.prompts.lock().unwrap();
        assert!(prompts[0].user.contains("Document: Sorting\nMerge sort splits the list"));

        Ok(())
    }

    #[tokio::test]
    async fn refine_marks_activity_only_on_success() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
        let teacher = user(db, teacher.id).await;
        let service = ActivityService::new(db);

        let failed = service
            .refine(&teacher, activity.id, Some("Harder".to_string()), &ScriptedChat::unavailable())
            .await?;
        assert!(matches!(failed, Refinement::Unavailable(_)));
        assert!(!load_activity(db, activity.id).await?.ai_refined);

        let ai = ScriptedChat::service(vec![Ok(r#"{"title": "Harder"}"#.to_string())]);
        let Refinement::Refined { content, activity } = service
            .refine(&teacher, activity.id, Some("Harder".to_string()), &ai)
            .await?
        else {
            panic!("expected a refined activity");
        };

        assert_eq!(content["title"], "Harder");
        assert!(activity.ai_refined);
        assert_eq!(activity.ai_prompt.as_deref(), Some("Harder"));

        Ok(())
    }

    #[test]
    fn catalogue_lists_all_five_types() {
        let types = activity_types();

        assert_eq!(types.len(), 5);
        assert_eq!(types[2].activity_type, ActivityType::WordCloud);
    }
}
