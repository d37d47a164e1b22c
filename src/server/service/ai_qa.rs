//! Question answering over a course's materials, or over the caller's course list.

use sea_orm::DatabaseConnection;

use crate::{
    model::ai::{CourseAnswerDto, GeneralAnswerDto},
    server::{
        data::{
            activity::ActivityRepository, course::CourseRepository, document::DocumentRepository,
        },
        error::AppError,
        model::{activity::ActivityFilter, course::Course, user::User},
        service::{
            access::{ensure_course_viewer, load_course},
            ai::{
                prompt::{ActivityContext, CourseContext, DocumentContext},
                AiService,
            },
            document::document_text,
            storage::ObjectStorage,
        },
        util::validate::required_text,
    },
};

pub struct AiQaService<'a> {
    db: &'a DatabaseConnection,
    ai: &'a AiService,
}

impl<'a> AiQaService<'a> {
    pub fn new(db: &'a DatabaseConnection, ai: &'a AiService) -> Self {
        Self { db, ai }
    }

    /// Answers a question using the course description, its active documents and its
    /// activities as context.
    ///
    /// # Arguments
    /// - `user` - Owning teacher or enrolled student
    /// - `course_id` - Course the question is about
    /// - `question` - Question text, required
    /// - `storage` - Object storage holding the course documents
    ///
    /// # Returns
    /// - `Ok(CourseAnswerDto)` - Answer, or an apology when the AI service fails
    /// - `Err(AppError::BadRequest)` - Missing question
    /// - `Err(AppError::NotFound)` - Course does not exist
    /// - `Err(AppError::AuthErr)` - Caller cannot view the course
    pub async fn ask_course(
        &self,
        user: &User,
        course_id: i32,
        question: Option<String>,
        storage: &dyn ObjectStorage,
    ) -> Result<CourseAnswerDto, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_viewer(self.db, user, &course, false).await?;
        let question = required_text(question, "question")?;

        let context = self.course_context(&course, storage).await?;
        let answer = self.ai.answer_course_question(&question, &context).await;

        Ok(CourseAnswerDto {
            answer,
            question,
            course_id: course.id,
            course_name: course.course_name,
        })
    }

    /// Answers a general question, listing the caller's own courses as context.
    pub async fn ask_general(
        &self,
        user: &User,
        question: Option<String>,
    ) -> Result<GeneralAnswerDto, AppError> {
        let question = required_text(question, "question")?;

        let repo = CourseRepository::new(self.db);
        let courses = if user.is_teacher() {
            repo.get_by_teacher(user.id).await?
        } else if user.is_student() {
            repo.get_enrolled(user.id).await?
        } else {
            Vec::new()
        };
        let courses: Vec<(String, String)> = courses
            .into_iter()
            .map(|c| (c.course_name, c.course_code))
            .collect();

        let answer = self.ai.answer_general_question(&question, &courses).await;

        Ok(GeneralAnswerDto { answer, question })
    }

    async fn course_context(
        &self,
        course: &Course,
        storage: &dyn ObjectStorage,
    ) -> Result<CourseContext, AppError> {
        let documents = DocumentRepository::new(self.db)
            .get_by_course(course.id, true)
            .await?;

        let mut document_contexts = Vec::with_capacity(documents.len());
        for document in &documents {
            document_contexts.push(DocumentContext {
                title: document.display_title().to_string(),
                description: document.description.clone(),
                content: document_text(storage, document).await,
            });
        }

        let activities = ActivityRepository::new(self.db)
            .list(
                ActivityFilter {
                    course_id: Some(course.id),
                    ..Default::default()
                },
                None,
            )
            .await?
            .into_iter()
            .map(|activity| ActivityContext {
                title: activity.title,
                description: activity.description,
                config: activity.config,
            })
            .collect();

        Ok(CourseContext {
            course_name: course.course_name.clone(),
            course_code: course.course_code.clone(),
            description: course.description.clone(),
            documents: document_contexts,
            activities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        data::user::UserRepository,
        service::{ai::test_support::ScriptedChat, storage::test_support::MemoryStorage},
    };
    use std::sync::Arc;
    use test_utils::{builder::TestBuilder, factory};

    async fn user(db: &DatabaseConnection, id: i32) -> User {
        UserRepository::new(db).find_by_id(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn course_question_includes_document_text() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = &test.db;
        let storage = MemoryStorage::default();

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let document = factory::document::DocumentFactory::new(db, course.id, teacher.id)
            .filename("notes.txt")
            .build()
            .await?;
        storage
            .objects
            .lock()
            .unwrap()
            .insert(document.file_path.clone(), b"Ownership moves values".to_vec());
        factory::activity::create_activity(db, course.id, teacher.id).await?;

        let chat = Arc::new(ScriptedChat::new(vec![Ok("Because of ownership".to_string())]));
        let ai = AiService::new(chat.clone());

        let answer = AiQaService::new(db, &ai)
            .ask_course(
                &user(db, student.id).await,
                course.id,
                Some("Why?".to_string()),
                &storage,
            )
            .await?;

        assert_eq!(answer.answer, "Because of ownership");
        assert_eq!(answer.course_name, course.course_name);
        let prompts = chat.prompts.lock().unwrap();
        assert!(prompts[0].user.contains("Ownership moves values"));

        Ok(())
    }

    #[tokio::test]
    async fn admin_cannot_ask_course_question() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = &test.db;
        let ai = ScriptedChat::unavailable();

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let admin = user(db, factory::user::create_admin(db).await?.id).await;

        let result = AiQaService::new(db, &ai)
            .ask_course(&admin, course.id, Some("Hi".to_string()), &MemoryStorage::default())
            .await;

        assert!(matches!(result, Err(AppError::AuthErr(_))));

        Ok(())
    }

    #[tokio::test]
    async fn general_question_requires_text_and_apologises_on_failure() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = &test.db;
        let ai = ScriptedChat::unavailable();
        let student = user(db, factory::user::create_student(db).await?.id).await;
        let service = AiQaService::new(db, &ai);

        let missing = service.ask_general(&student, Some("  ".to_string())).await;
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        let answer = service.ask_general(&student, Some("Hello".to_string())).await?;
        assert!(answer.answer.starts_with("Sorry"));
        assert_eq!(answer.question, "Hello");

        Ok(())
    }
}
