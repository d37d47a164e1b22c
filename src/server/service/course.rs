//! Course catalogue, enrollment and roster management.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        course::{CreateCourseDto, UpdateCourseDto},
        import::{ImportStudentsDto, ImportStudentsResultDto},
    },
    server::{
        data::{course::CourseRepository, enrollment::EnrollmentRepository, user::UserRepository},
        error::AppError,
        model::{
            course::{Course, CreateCourseParams, UpdateCourseParams},
            user::{CreateUserParams, User},
        },
        service::access::{ensure_course_owner, ensure_course_viewer, load_course},
        util::{
            email::validate_email,
            password::hash_password,
            validate::{optional_text, required_text},
        },
    },
};
use entity::user::Role;

pub struct CourseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CourseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Courses relevant to the caller: taught (teacher), enrolled (student) or all (admin).
    pub async fn list_for_user(&self, user: &User) -> Result<Vec<Course>, AppError> {
        let repo = CourseRepository::new(self.db);

        let courses = match user.role {
            Role::Teacher => repo.get_by_teacher(user.id).await?,
            Role::Student => repo.get_enrolled(user.id).await?,
            Role::Admin => repo.get_all(false).await?,
        };

        Ok(repo.with_details(courses).await?)
    }

    /// Every active course, for students browsing what to join.
    pub async fn list_available(&self) -> Result<Vec<Course>, AppError> {
        let repo = CourseRepository::new(self.db);
        let courses = repo.get_all(true).await?;

        Ok(repo.with_details(courses).await?)
    }

    /// Gets one course with derived fields.
    ///
    /// # Returns
    /// - `Ok(Course)` - Caller owns, attends or administers the course
    /// - `Err(AppError::NotFound)` - No such course
    /// - `Err(AppError::AuthErr)` - Caller has no access
    pub async fn get(&self, user: &User, course_id: i32) -> Result<Course, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_viewer(self.db, user, &course, true).await?;

        self.detailed(course).await
    }

    /// Creates a course taught by the caller.
    ///
    /// # Returns
    /// - `Ok(Course)` - Created course
    /// - `Err(AppError::BadRequest)` - Missing field or duplicate course code
    pub async fn create(
        &self,
        teacher: &User,
        payload: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let course_code = required_text(payload.course_code, "course_code")?;
        let course_name = required_text(payload.course_name, "course_name")?;
        let semester = required_text(payload.semester, "semester")?;
        let academic_year = required_text(payload.academic_year, "academic_year")?;

        let repo = CourseRepository::new(self.db);
        if repo.find_by_code(&course_code).await?.is_some() {
            return Err(AppError::bad_request("Course code already exists"));
        }

        let course = repo
            .create(CreateCourseParams {
                course_code,
                course_name,
                description: optional_text(payload.description),
                teacher_id: teacher.id,
                semester,
                academic_year,
            })
            .await?;

        tracing::info!("Teacher {} created course {}", teacher.id, course.course_code);

        self.detailed(course).await
    }

    /// Updates a course owned by the caller. The course code cannot be changed here.
    pub async fn update(
        &self,
        teacher: &User,
        course_id: i32,
        payload: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_owner(teacher, &course)?;

        let course = CourseRepository::new(self.db)
            .update(UpdateCourseParams {
                id: course.id,
                course_code: None,
                course_name: optional_text(payload.course_name),
                description: payload.description,
                semester: optional_text(payload.semester),
                academic_year: optional_text(payload.academic_year),
                is_active: payload.is_active,
            })
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        self.detailed(course).await
    }

    /// Enrolls the calling student.
    ///
    /// # Returns
    /// - `Ok(())` - Enrolled
    /// - `Err(AppError::BadRequest)` - Course inactive or already enrolled
    pub async fn enroll(&self, student: &User, course_id: i32) -> Result<(), AppError> {
        let course = load_course(self.db, course_id).await?;
        if !course.is_active {
            return Err(AppError::bad_request("Course is not open for enrollment"));
        }

        let enrollments = EnrollmentRepository::new(self.db);
        if enrollments.is_enrolled(course.id, student.id).await? {
            return Err(AppError::bad_request("Already enrolled in this course"));
        }

        enrollments.enroll(course.id, student.id).await?;

        Ok(())
    }

    /// Removes the calling student's enrollment; a missing enrollment is not an error.
    pub async fn unenroll(&self, student: &User, course_id: i32) -> Result<(), AppError> {
        EnrollmentRepository::new(self.db)
            .unenroll(course_id, student.id)
            .await?;

        Ok(())
    }

    pub async fn students(&self, teacher: &User, course_id: i32) -> Result<Vec<User>, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_owner(teacher, &course)?;

        Ok(EnrollmentRepository::new(self.db)
            .get_students(course.id)
            .await?)
    }

    /// Imports a JSON roster into a course owned by the caller.
    ///
    /// Students are matched by `student_id`; unknown ones get an account whose username is
    /// the student ID. Incomplete or conflicting items are reported and skipped. Runs in one
    /// transaction.
    ///
    /// # Arguments
    /// - `teacher` - Caller, must own the course
    /// - `course_id` - Target course
    /// - `payload` - Roster items
    /// - `email_domain` - Required email suffix for new accounts
    /// - `default_password` - Password for new accounts without one
    ///
    /// # Returns
    /// - `Ok(ImportStudentsResultDto)` - Count of new enrollments and per-item errors
    /// - `Err(AppError)` - Access denied or database failure (nothing is committed)
    pub async fn import_students(
        &self,
        teacher: &User,
        course_id: i32,
        payload: ImportStudentsDto,
        email_domain: &str,
        default_password: &str,
    ) -> Result<ImportStudentsResultDto, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_owner(teacher, &course)?;

        if payload.students.is_empty() {
            return Err(AppError::bad_request("Missing student data"));
        }

        let txn = self.db.begin().await?;
        let users = UserRepository::new(&txn);
        let enrollments = EnrollmentRepository::new(&txn);

        let mut imported_count = 0;
        let mut errors = Vec::new();

        for (idx, item) in payload.students.into_iter().enumerate() {
            let entry = idx + 1;
            let (Some(student_id), Some(full_name), Some(email)) = (
                optional_text(item.student_id),
                optional_text(item.full_name),
                optional_text(item.email),
            ) else {
                errors.push(format!("Student {}: Incomplete student data", entry));
                continue;
            };

            let student = match users.find_by_student_id(&student_id).await? {
                Some(existing) if existing.role != Role::Student => {
                    errors.push(format!(
                        "Student {}: student ID belongs to a non-student account",
                        student_id
                    ));
                    continue;
                }
                Some(existing) => existing,
                None => {
                    let email = match validate_email(&email, email_domain) {
                        Ok(email) => email,
                        Err(reason) => {
                            errors.push(format!("Student {}: {}", student_id, reason));
                            continue;
                        }
                    };
                    if users.find_by_username(&student_id).await?.is_some()
                        || users.find_by_email(&email).await?.is_some()
                    {
                        errors.push(format!(
                            "Student {}: username or email already in use",
                            student_id
                        ));
                        continue;
                    }

                    let password = optional_text(item.password)
                        .unwrap_or_else(|| default_password.to_string());

                    users
                        .create(CreateUserParams {
                            username: student_id.clone(),
                            email,
                            password_hash: hash_password(&password)?,
                            role: Role::Student,
                            student_id: Some(student_id),
                            full_name,
                            department: optional_text(item.department),
                        })
                        .await?
                }
            };

            if !enrollments.is_enrolled(course.id, student.id).await? {
                enrollments.enroll(course.id, student.id).await?;
                imported_count += 1;
            }
        }

        txn.commit().await?;

        tracing::info!(
            "Imported {} students into course {}",
            imported_count,
            course.course_code
        );

        Ok(ImportStudentsResultDto {
            message: format!("Successfully imported {} students", imported_count),
            imported_count,
            errors,
        })
    }

    async fn detailed(&self, course: Course) -> Result<Course, AppError> {
        CourseRepository::new(self.db)
            .with_details(vec![course])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Course not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::import::ImportStudentDto, server::error::auth::AuthError};
    use test_utils::{builder::TestBuilder, factory};

    const DOMAIN: &str = "@connect.polyu.hk";

    async fn user(db: &DatabaseConnection, id: i32) -> User {
        UserRepository::new(db).find_by_id(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn rejects_duplicate_enrollment_and_inactive_course() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let closed = factory::course::CourseFactory::new(db, teacher.id)
            .is_active(false)
            .build()
            .await?;
        let student = user(db, factory::user::create_student(db).await?.id).await;

        let service = CourseService::new(db);
        service.enroll(&student, course.id).await?;

        let again = service.enroll(&student, course.id).await;
        assert!(matches!(
            again,
            Err(AppError::BadRequest(msg)) if msg == "Already enrolled in this course"
        ));

        let inactive = service.enroll(&student, closed.id).await;
        assert!(matches!(inactive, Err(AppError::BadRequest(_))));

        Ok(())
    }

    #[tokio::test]
    async fn only_viewers_can_open_course() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let enrolled = factory::helpers::create_enrolled_student(db, course.id).await?;
        let outsider = factory::user::create_student(db).await?;
        let admin = factory::user::create_admin(db).await?;

        let service = CourseService::new(db);
        assert!(service.get(&user(db, teacher.id).await, course.id).await.is_ok());
        assert!(service.get(&user(db, enrolled.id).await, course.id).await.is_ok());
        assert!(service.get(&user(db, admin.id).await, course.id).await.is_ok());

        let denied = service.get(&user(db, outsider.id).await, course.id).await;
        assert!(matches!(denied, Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))));

        let missing = service.get(&user(db, teacher.id).await, 999).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        Ok(())
    }

    #[tokio::test]
    async fn imports_json_roster() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let existing = factory::helpers::create_enrolled_student(db, course.id).await?;
        let teacher = user(db, teacher.id).await;

        let payload = ImportStudentsDto {
            students: vec![
                ImportStudentDto {
                    student_id: Some("23000001A".to_string()),
                    full_name: Some("New Student".to_string()),
                    email: Some("23000001a@connect.polyu.hk".to_string()),
                    ..Default::default()
                },
                ImportStudentDto {
                    student_id: existing.student_id.clone(),
                    full_name: Some(existing.full_name.clone()),
                    email: Some(existing.email.clone()),
                    ..Default::default()
                },
                ImportStudentDto {
                    student_id: Some("23000002A".to_string()),
                    ..Default::default()
                },
            ],
        };

        let result = CourseService::new(db)
            .import_students(&teacher, course.id, payload, DOMAIN, "123456")
            .await?;

        assert_eq!(result.imported_count, 1);
        assert_eq!(result.message, "Successfully imported 1 students");
        assert_eq!(result.errors, vec!["Student 3: Incomplete student data".to_string()]);

        let created = UserRepository::new(db)
            .find_by_username("23000001A")
            .await?
            .unwrap();
        assert_eq!(created.role, Role::Student);
        assert!(EnrollmentRepository::new(db).is_enrolled(course.id, created.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn teacher_cannot_import_into_foreign_course() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let other_teacher = user(db, factory::user::create_teacher(db).await?.id).await;

        let result = CourseService::new(db)
            .import_students(
                &other_teacher,
                course.id,
                ImportStudentsDto {
                    students: vec![ImportStudentDto::default()],
                },
                DOMAIN,
                "123456",
            )
            .await;

        assert!(matches!(result, Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))));

        Ok(())
    }

    #[tokio::test]
    async fn json_import_skips_non_student_with_matching_student_id() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let teacher = user(db, teacher.id).await;
        let colleague = factory::user::UserFactory::new(db)
            .role(Role::Teacher)
            .student_id(Some("23000009A"))
            .build()
            .await?;

        let payload = ImportStudentsDto {
            students: vec![ImportStudentDto {
                student_id: Some("23000009A".to_string()),
                full_name: Some(colleague.full_name.clone()),
                email: Some(colleague.email.clone()),
                ..Default::default()
            }],
        };

        let result = CourseService::new(db)
            .import_students(&teacher, course.id, payload, DOMAIN, "123456")
            .await?;

        assert_eq!(result.imported_count, 0);
        assert_eq!(
            result.errors,
            vec!["Student 23000009A: student ID belongs to a non-student account".to_string()]
        );
        assert!(!EnrollmentRepository::new(db).is_enrolled(course.id, colleague.id).await?);

        Ok(())
    }
}
