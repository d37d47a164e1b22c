//! Student submissions, teacher feedback and AI assisted review of responses.

use sea_orm::{DatabaseConnection, SqlErr};
use serde_json::json;

use crate::{
    model::{
        ai::{AiFeedbackRequestDto, ResponseGroupDto},
        response::{FeedbackDto, SubmitResponseDto},
    },
    server::{
        data::{
            analytics::AnalyticsRepository, enrollment::EnrollmentRepository,
            response::ResponseRepository,
        },
        error::AppError,
        model::{
            activity::Activity,
            response::{CreateResponseParams, Response},
            user::User,
        },
        service::{
            access::{denied, ensure_activity_creator, load_activity},
            ai::{grouping::GroupInput, AiOutcome, AiService},
        },
        util::validate::{optional_text, required_text},
    },
};
use entity::{activity::ActivityStatus, user::Role};

pub struct ResponseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ResponseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a student's answer to an active activity.
    ///
    /// # Returns
    /// - `Ok(Response)` - Stored response
    /// - `Err(AppError::BadRequest)` - Missing fields, activity not active, or already answered
    /// - `Err(AppError::AuthErr)` - Student is not enrolled in the activity's course
    pub async fn submit(
        &self,
        student: &User,
        payload: SubmitResponseDto,
    ) -> Result<Response, AppError> {
        let (Some(activity_id), Some(response_data)) = (payload.activity_id, payload.response_data)
        else {
            return Err(AppError::bad_request(
                "Missing required fields: activity_id, response_data",
            ));
        };

        let activity = load_activity(self.db, activity_id).await?;
        if activity.status != ActivityStatus::Active {
            return Err(AppError::bad_request("Activity is not active"));
        }

        if !EnrollmentRepository::new(self.db)
            .is_enrolled(activity.course_id, student.id)
            .await?
        {
            return Err(denied(student, format!("not enrolled in course {}", activity.course_id)));
        }

        let repo = ResponseRepository::new(self.db);
        if repo
            .find_by_activity_and_student(activity.id, student.id)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request("Response already submitted"));
        }

        let created = repo
            .create(CreateResponseParams {
                activity_id: activity.id,
                student_id: student.id,
                response_data,
                time_spent_seconds: payload.time_spent_seconds,
            })
            .await;

        let response = match created {
            Ok(response) => response,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::bad_request("Response already submitted"));
            }
            Err(err) => return Err(err.into()),
        };

        self.detailed(response).await
    }

    /// One response, visible to the student who wrote it, the activity's creator and admins.
    pub async fn get(&self, user: &User, response_id: i32) -> Result<Response, AppError> {
        let response = self.load(response_id).await?;

        let allowed = match user.role {
            Role::Student => response.student_id == user.id,
            Role::Teacher => {
                let activity = load_activity(self.db, response.activity_id).await?;
                activity.creator_id == user.id
            }
            Role::Admin => true,
        };
        if !allowed {
            return Err(denied(user, format!("no access to response {}", response.id)));
        }

        self.detailed(response).await
    }

    /// Responses to an activity: all of them for its creator, only their own for a student.
    ///
    /// # Returns
    /// - `Ok(Vec<Response>)` - Responses in submission order
    /// - `Err(AppError::NotFound)` - Student has not answered
    /// - `Err(AppError::AuthErr)` - Any other caller
    pub async fn list_for_activity(
        &self,
        user: &User,
        activity_id: i32,
    ) -> Result<Vec<Response>, AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        let repo = ResponseRepository::new(self.db);

        let responses = match user.role {
            Role::Teacher => {
                ensure_activity_creator(user, &activity)?;
                repo.get_by_activity(activity.id).await?
            }
            Role::Student => {
                let own = repo
                    .find_by_activity_and_student(activity.id, user.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Response not found"))?;
                vec![own]
            }
            Role::Admin => return Err(denied(user, "admins cannot list activity responses")),
        };

        Ok(repo.with_details(responses).await?)
    }

    /// Stores teacher feedback and an optional score on a response.
    pub async fn add_feedback(
        &self,
        teacher: &User,
        response_id: i32,
        payload: FeedbackDto,
    ) -> Result<Response, AppError> {
        let response = self.load(response_id).await?;
        let activity = load_activity(self.db, response.activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let feedback = required_text(payload.feedback, "feedback")?;

        let response = ResponseRepository::new(self.db)
            .set_feedback(response.id, feedback, payload.score)
            .await?
            .ok_or_else(|| AppError::not_found("Response not found"))?;

        self.detailed(response).await
    }

    /// Runs AI analysis over every response to an activity and stores a snapshot of it.
    ///
    /// # Returns
    /// - `Ok(AiOutcome::Completed)` - Analysis, also saved to the activity's history
    /// - `Ok(AiOutcome::Unavailable)` - Fallback object, nothing saved
    /// - `Err(AppError::BadRequest)` - The activity has no responses
    pub async fn analyze(
        &self,
        teacher: &User,
        activity_id: i32,
        ai: &AiService,
    ) -> Result<AiOutcome, AppError> {
        let (activity, responses) = self.creator_responses(teacher, activity_id).await?;

        let answers: Vec<String> = responses
            .iter()
            .map(|r| {
                format!(
                    "{}: {}",
                    r.student_name.as_deref().unwrap_or("Unknown"),
                    r.text_content()
                )
            })
            .collect();

        let outcome = ai
            .analyze_responses(activity.activity_type.as_str(), &answers)
            .await;

        if let AiOutcome::Completed(analysis) = &outcome {
            let scores: Vec<f64> = responses.iter().filter_map(|r| r.score).collect();
            let average_score = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };

            AnalyticsRepository::new(self.db)
                .create(
                    activity.id,
                    json!({
                        "activity_type": activity.activity_type.as_str(),
                        "total_responses": responses.len(),
                        "average_score": average_score,
                    }),
                    Some(analysis.clone()),
                )
                .await?;

            tracing::info!(
                "Stored AI analysis of {} responses for activity {}",
                responses.len(),
                activity.id
            );
        }

        Ok(outcome)
    }

    /// Groups an activity's responses by similarity.
    pub async fn group_similar(
        &self,
        teacher: &User,
        activity_id: i32,
        ai: &AiService,
    ) -> Result<Vec<ResponseGroupDto>, AppError> {
        let (_, responses) = self.creator_responses(teacher, activity_id).await?;

        let inputs: Vec<GroupInput> = responses
            .iter()
            .map(|r| GroupInput {
                response_id: r.id,
                text: r.text_content(),
            })
            .collect();

        Ok(ai.group_responses(&inputs).await)
    }

    /// Drafts feedback for one response with the AI.
    pub async fn ai_feedback(
        &self,
        teacher: &User,
        response_id: i32,
        payload: AiFeedbackRequestDto,
        ai: &AiService,
    ) -> Result<String, AppError> {
        let response = self.load(response_id).await?;
        let activity = load_activity(self.db, response.activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let student_response = required_text(payload.student_response, "student_response")?;
        let correct_answer = optional_text(payload.correct_answer).unwrap_or_default();

        Ok(ai
            .generate_feedback(
                &student_response,
                &correct_answer,
                activity.activity_type.as_str(),
            )
            .await)
    }

    async fn creator_responses(
        &self,
        teacher: &User,
        activity_id: i32,
    ) -> Result<(Activity, Vec<Response>), AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ensure_activity_creator(teacher, &activity)?;

        let repo = ResponseRepository::new(self.db);
        let responses = repo.get_by_activity(activity.id).await?;
        if responses.is_empty() {
            return Err(AppError::bad_request("No responses to analyze"));
        }

        Ok((activity, repo.with_details(responses).await?))
    }

    async fn load(&self, response_id: i32) -> Result<Response, AppError> {
        ResponseRepository::new(self.db)
            .find_by_id(response_id)
            .await?
            .ok_or_else(|| AppError::not_found("Response not found"))
    }

    async fn detailed(&self, response: Response) -> Result<Response, AppError> {
        ResponseRepository::new(self.db)
            .with_details(vec![response])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Response not found"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::server::{data::user::UserRepository, service::ai::test_support::ScriptedChat};
    use test_utils::{builder::TestBuilder, factory};

    async fn user(db: &DatabaseConnection, id: i32) -> User {
        UserRepository::new(db).find_by_id(id).await.unwrap().unwrap()
    }

    fn answer(activity_id: i32, text: &str) -> SubmitResponseDto {
        SubmitResponseDto {
            activity_id: Some(activity_id),
            response_data: Some(json!({ "content": text })),
            time_spent_seconds: Some(30),
        }
    }

    #[tokio::test]
    async fn submit_requires_active_activity_and_is_once_only() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let draft = factory::activity::create_activity(db, course.id, teacher.id).await?;
        let live = factory::activity::ActivityFactory::new(db, course.id, teacher.id)
            .status(ActivityStatus::Active)
            .build()
            .await?;

        let service = ResponseService::new(db);

        let closed = service.submit(&student, answer(draft.id, "early")).await;
        assert!(matches!(
            closed,
            Err(AppError::BadRequest(msg)) if msg == "Activity is not active"
        ));

        let response = service.submit(&student, answer(live.id, "first")).await?;
        assert_eq!(response.activity_title.as_deref(), Some(live.title.as_str()));

        let again = service.submit(&student, answer(live.id, "second")).await;
        assert!(matches!(
            again,
            Err(AppError::BadRequest(msg)) if msg == "Response already submitted"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn student_sees_only_own_response() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
        let alice = factory::helpers::create_enrolled_student(db, course.id).await?;
        let bob = factory::helpers::create_enrolled_student(db, course.id).await?;
        let idle = factory::helpers::create_enrolled_student(db, course.id).await?;
        let alices = factory::response::create_response(db, activity.id, alice.id).await?;
        factory::response::create_response(db, activity.id, bob.id).await?;

        let service = ResponseService::new(db);

        let own = service
            .list_for_activity(&user(db, alice.id).await, activity.id)
            .await?;
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, alices.id);

        let all = service
            .list_for_activity(&user(db, teacher.id).await, activity.id)
            .await?;
        assert_eq!(all.len(), 2);

        let none = service
            .list_for_activity(&user(db, idle.id).await, activity.id)
            .await;
        assert!(matches!(none, Err(AppError::NotFound(_))));

        let foreign = service.get(&user(db, bob.id).await, alices.id).await;
        assert!(foreign.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn successful_analysis_is_stored_as_snapshot() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        factory::response::ResponseFactory::new(db, activity.id, student.id)
            .score(80.0)
            .build()
            .await?;
        let teacher = user(db, teacher.id).await;
        let service = ResponseService::new(db);

        let failed = service
            .analyze(&teacher, activity.id, &ScriptedChat::unavailable())
            .await?;
        assert!(matches!(failed, AiOutcome::Unavailable(_)));
        assert!(AnalyticsRepository::new(db).get_by_activity(activity.id).await?.is_empty());

        let ai = ScriptedChat::service(vec![Ok(r#"{"summary": "Good work"}"#.to_string())]);
        let outcome = service.analyze(&teacher, activity.id, &ai).await?;
        assert_eq!(outcome, AiOutcome::Completed(json!({"summary": "Good work"})));

        let history = AnalyticsRepository::new(db).get_by_activity(activity.id).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].analytics_data["total_responses"], 1);
        assert_eq!(history[0].analytics_data["average_score"], 80.0);

        Ok(())
    }

    #[tokio::test]
    async fn grouping_requires_responses() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
        let teacher = user(db, teacher.id).await;
        let service = ResponseService::new(db);
        let ai = ScriptedChat::unavailable();

        let empty = service.group_similar(&teacher, activity.id, &ai).await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));

        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        factory::response::create_response(db, activity.id, student.id).await?;

        let groups = service.group_similar(&teacher, activity.id, &ai).await?;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].size, 1);

        Ok(())
    }
}
