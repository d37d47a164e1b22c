//! Spreadsheet imports of students (teacher) and users (admin).
//!
//! Both imports work on [`ImportRow`]s so they run without a workbook in tests. Row
//! problems are collected in the [`ImportSummary`]; only database failures abort the
//! transaction.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use crate::server::{
    data::{course::CourseRepository, enrollment::EnrollmentRepository, user::UserRepository},
    error::AppError,
    model::{
        import::{ImportRow, ImportSummary},
        user::{CreateUserParams, UpdateUserParams, User},
    },
    util::{email::validate_email, password::hash_password},
};
use entity::user::Role;

/// Header columns a teacher's student sheet must contain.
pub const STUDENT_COLUMNS: &[&str] = &["student_id", "full_name", "email"];

/// Header columns an admin's user sheet must contain.
pub const USER_COLUMNS: &[&str] = &["username", "full_name", "email", "role"];

pub struct ImportService<'a> {
    db: &'a DatabaseConnection,
    email_domain: &'a str,
    default_password: &'a str,
}

/// Who is importing, which decides how `course_code` cells are honoured.
#[derive(Clone, Copy)]
enum Enroller {
    /// Only the teacher's own courses accept enrollments.
    Teacher(i32),
    Admin,
}

impl<'a> ImportService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        email_domain: &'a str,
        default_password: &'a str,
    ) -> Self {
        Self {
            db,
            email_domain,
            default_password,
        }
    }

    /// Creates or updates student accounts from a sheet and enrolls them into the
    /// teacher's courses named in `course_code`.
    ///
    /// Students are matched by `student_id`. New accounts use the student ID as username
    /// and the default import password.
    ///
    /// # Arguments
    /// - `teacher` - Importing teacher
    /// - `rows` - Parsed sheet rows
    ///
    /// # Returns
    /// - `Ok(ImportSummary)` - Tallies and row errors, committed
    /// - `Err(AppError)` - Database failure, nothing committed
    pub async fn import_students(
        &self,
        teacher: &User,
        rows: Vec<ImportRow>,
    ) -> Result<ImportSummary, AppError> {
        let mut summary = ImportSummary::new(rows.len());
        let txn = self.db.begin().await?;
        let default_hash = hash_password(self.default_password)?;

        for row in rows {
            let (Some(student_id), Some(full_name), Some(email)) = (
                row.get("student_id"),
                row.get("full_name"),
                row.get("email"),
            ) else {
                summary.skip(row.line, "student_id, full_name or email is empty");
                continue;
            };

            let email = match validate_email(email, self.email_domain) {
                Ok(email) => email,
                Err(reason) => {
                    summary.skip(row.line, format!("{} (email: {})", reason, email));
                    continue;
                }
            };

            let users = UserRepository::new(&txn);
            let student = match users.find_by_student_id(student_id).await? {
                None => {
                    if users.find_by_username(student_id).await?.is_some()
                        || users.find_by_email(&email).await?.is_some()
                    {
                        summary.skip(
                            row.line,
                            format!(
                                "username or email already in use (student ID: {})",
                                student_id
                            ),
                        );
                        continue;
                    }

                    let created = users
                        .create(CreateUserParams {
                            username: student_id.to_string(),
                            email,
                            password_hash: default_hash.clone(),
                            role: Role::Student,
                            student_id: Some(student_id.to_string()),
                            full_name: full_name.to_string(),
                            department: row.get("department").map(str::to_string),
                        })
                        .await?;
                    summary.imported_count += 1;
                    created
                }
                Some(existing) if existing.role != Role::Student => {
                    summary.skip(
                        row.line,
                        format!("student ID belongs to a non-student account: {}", student_id),
                    );
                    continue;
                }
                Some(existing) => {
                    let Some(updated) = self
                        .refresh_user(&txn, &mut summary, &row, existing, full_name, email, None)
                        .await?
                    else {
                        continue;
                    };
                    summary.updated_count += 1;
                    updated
                }
            };

            if let Some(course_code) = row.get("course_code") {
                let enroller = Enroller::Teacher(teacher.id);
                self.enroll_by_code(&txn, &mut summary, row.line, course_code, &student, enroller)
                    .await?;
            }
        }

        txn.commit().await?;

        tracing::info!(
            "Teacher {} imported students: {} created, {} updated, {} enrolled, {} skipped",
            teacher.id,
            summary.imported_count,
            summary.updated_count,
            summary.enrolled_count,
            summary.skipped_count
        );

        Ok(summary)
    }

    /// Creates or updates student and teacher accounts from a sheet.
    ///
    /// Users are matched by `username`. Students must carry a `student_id` and may be
    /// enrolled into any course named in `course_code`.
    ///
    /// # Returns
    /// - `Ok(ImportSummary)` - Tallies and row errors, committed
    /// - `Err(AppError)` - Database failure, nothing committed
    pub async fn import_users(&self, rows: Vec<ImportRow>) -> Result<ImportSummary, AppError> {
        let mut summary = ImportSummary::new(rows.len());
        let txn = self.db.begin().await?;
        let default_hash = hash_password(self.default_password)?;

        for row in rows {
            let (Some(username), Some(full_name), Some(email), Some(role)) = (
                row.get("username"),
                row.get("full_name"),
                row.get("email"),
                row.get("role"),
            ) else {
                summary.skip(row.line, "username, full_name, email or role is empty");
                continue;
            };

            let email = match validate_email(email, self.email_domain) {
                Ok(email) => email,
                Err(reason) => {
                    summary.skip(row.line, format!("{} (email: {})", reason, email));
                    continue;
                }
            };

            let role = match role.parse::<Role>() {
                Ok(role @ (Role::Student | Role::Teacher)) => role,
                _ => {
                    summary.skip(
                        row.line,
                        format!("role must be 'student' or 'teacher', got: {}", role),
                    );
                    continue;
                }
            };

            let student_id = row.get("student_id").filter(|_| role == Role::Student);
            if role == Role::Student && student_id.is_none() {
                summary.skip(row.line, "student_id is required for students");
                continue;
            }

            let users = UserRepository::new(&txn);
            let user = match users.find_by_username(username).await? {
                None => {
                    if users.find_by_email(&email).await?.is_some() {
                        summary.skip(
                            row.line,
                            format!("email already in use (username: {})", username),
                        );
                        continue;
                    }
                    if let Some(student_id) = student_id {
                        if users.find_by_student_id(student_id).await?.is_some() {
                            summary.skip(
                                row.line,
                                format!("student ID already in use (username: {})", username),
                            );
                            continue;
                        }
                    }

                    let created = users
                        .create(CreateUserParams {
                            username: username.to_string(),
                            email,
                            password_hash: default_hash.clone(),
                            role,
                            student_id: student_id.map(str::to_string),
                            full_name: full_name.to_string(),
                            department: row.get("department").map(str::to_string),
                        })
                        .await?;
                    summary.imported_count += 1;
                    created
                }
                Some(existing) if existing.role != role => {
                    summary.skip(
                        row.line,
                        format!("username belongs to an account with another role: {}", username),
                    );
                    continue;
                }
                Some(existing) => {
                    let Some(updated) = self
                        .refresh_user(
                            &txn,
                            &mut summary,
                            &row,
                            existing,
                            full_name,
                            email,
                            student_id,
                        )
                        .await?
                    else {
                        continue;
                    };
                    summary.updated_count += 1;
                    updated
                }
            };

            if role == Role::Student {
                if let Some(course_code) = row.get("course_code") {
                    let enroller = Enroller::Admin;
                    self.enroll_by_code(&txn, &mut summary, row.line, course_code, &user, enroller)
                        .await?;
                }
            }
        }

        txn.commit().await?;

        tracing::info!(
            "Admin imported users: {} created, {} updated, {} enrolled, {} skipped",
            summary.imported_count,
            summary.updated_count,
            summary.enrolled_count,
            summary.skipped_count
        );

        Ok(summary)
    }

    /// Updates name, email, department and student ID of an existing account.
    ///
    /// Returns `None` after recording a skip when the new email or student ID belongs to
    /// someone else.
    #[allow(clippy::too_many_arguments)]
    async fn refresh_user(
        &self,
        txn: &DatabaseTransaction,
        summary: &mut ImportSummary,
        row: &ImportRow,
        existing: User,
        full_name: &str,
        email: String,
        student_id: Option<&str>,
    ) -> Result<Option<User>, DbErr> {
        let users = UserRepository::new(txn);

        if existing.email != email {
            if let Some(other) = users.find_by_email(&email).await? {
                if other.id != existing.id {
                    summary.skip(
                        row.line,
                        format!("email already used by another user ({})", existing.username),
                    );
                    return Ok(None);
                }
            }
        }

        let student_id = student_id.filter(|id| existing.student_id.as_deref() != Some(*id));
        if let Some(student_id) = student_id {
            if let Some(other) = users.find_by_student_id(student_id).await? {
                if other.id != existing.id {
                    summary.skip(
                        row.line,
                        format!("student ID already used by another user ({})", existing.username),
                    );
                    return Ok(None);
                }
            }
        }

        let department = row
            .get("department")
            .filter(|d| existing.department.as_deref() != Some(*d));

        let updated = users
            .update(UpdateUserParams {
                id: existing.id,
                email: (existing.email != email).then_some(email),
                role: None,
                student_id: student_id.map(str::to_string),
                full_name: (existing.full_name != full_name).then(|| full_name.to_string()),
                department: department.map(str::to_string),
                password_hash: None,
            })
            .await?;

        Ok(Some(updated.unwrap_or(existing)))
    }

    async fn enroll_by_code(
        &self,
        txn: &DatabaseTransaction,
        summary: &mut ImportSummary,
        line: usize,
        course_code: &str,
        student: &User,
        enroller: Enroller,
    ) -> Result<(), DbErr> {
        let Some(course) = CourseRepository::new(txn).find_by_code(course_code).await? else {
            summary.error(line, format!("course code {} does not exist", course_code));
            return Ok(());
        };

        if let Enroller::Teacher(teacher_id) = enroller {
            if course.teacher_id != teacher_id {
                summary.error(line, format!("course {} is not taught by you", course_code));
                return Ok(());
            }
        }

        let enrollments = EnrollmentRepository::new(txn);
        if !enrollments.is_enrolled(course.id, student.id).await? {
            enrollments.enroll(course.id, student.id).await?;
            summary.enrolled_count += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use test_utils::{builder::TestBuilder, factory};

    const DOMAIN: &str = "@connect.polyu.hk";

    fn row(line: usize, cells: &[(&str, &str)]) -> ImportRow {
        ImportRow::new(
            line,
            cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[tokio::test]
    async fn teacher_import_creates_updates_and_enrolls() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let (_, foreign) = factory::helpers::create_course_with_teacher(db).await?;
        let existing = factory::user::UserFactory::new(db)
            .student_id(Some("21000001A"))
            .full_name("Old Name")
            .build()
            .await?;
        let teacher = UserRepository::new(db).find_by_id(teacher.id).await?.unwrap();

        let rows = vec![
            row(2, &[
                ("student_id", "21000002A"),
                ("full_name", "Fresh Student"),
                ("email", "fresh@connect.polyu.hk"),
                ("course_code", course.course_code.as_str()),
            ]),
            row(3, &[
                ("student_id", "21000001A"),
                ("full_name", "New Name"),
                ("email", existing.email.as_str()),
                ("course_code", foreign.course_code.as_str()),
            ]),
            row(4, &[
                ("student_id", "21000003A"),
                ("full_name", "Wrong Domain"),
                ("email", "someone@gmail.com"),
            ]),
            row(5, &[("student_id", "21000004A")]),
        ];

        let summary = ImportService::new(db, DOMAIN, "123456")
            .import_students(&teacher, rows)
            .await?;

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.updated_count, 1);
        assert_eq!(summary.enrolled_count, 1);
        assert_eq!(summary.skipped_count, 2);
        assert_eq!(summary.errors.len(), 3);
        assert!(summary.errors[0].starts_with("Row 3: course"));

        let renamed = UserRepository::new(db).find_by_id(existing.id).await?.unwrap();
        assert_eq!(renamed.full_name, "New Name");

        let fresh = UserRepository::new(db)
            .find_by_username("21000002A")
            .await?
            .unwrap();
        assert!(EnrollmentRepository::new(db).is_enrolled(course.id, fresh.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn admin_import_validates_roles_and_student_ids() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;

        let rows = vec![
            row(2, &[
                ("username", "newteacher"),
                ("full_name", "New Teacher"),
                ("email", "newteacher@connect.polyu.hk"),
                ("role", "Teacher"),
                ("course_code", course.course_code.as_str()),
            ]),
            row(3, &[
                ("username", "newstudent"),
                ("full_name", "New Student"),
                ("email", "newstudent@connect.polyu.hk"),
                ("role", "student"),
                ("student_id", "22000001A"),
                ("course_code", course.course_code.as_str()),
            ]),
            row(4, &[
                ("username", "nostudentid"),
                ("full_name", "No ID"),
                ("email", "noid@connect.polyu.hk"),
                ("role", "student"),
            ]),
            row(5, &[
                ("username", "boss"),
                ("full_name", "Boss"),
                ("email", "boss@connect.polyu.hk"),
                ("role", "admin"),
            ]),
            row(6, &[
                ("username", "ghost"),
                ("full_name", "Ghost"),
                ("email", "ghost@connect.polyu.hk"),
                ("role", "student"),
                ("student_id", "22000002A"),
                ("course_code", "NOPE101"),
            ]),
        ];

        let summary = ImportService::new(db, DOMAIN, "123456").import_users(rows).await?;

        assert_eq!(summary.imported_count, 3);
        assert_eq!(summary.enrolled_count, 1);
        assert_eq!(summary.skipped_count, 2);
        assert_eq!(
            summary.errors.last().map(String::as_str),
            Some("Row 6: course code NOPE101 does not exist")
        );

        let teacher = UserRepository::new(db)
            .find_by_username("newteacher")
            .await?
            .unwrap();
        assert_eq!(teacher.role, Role::Teacher);
        assert!(!EnrollmentRepository::new(db).is_enrolled(course.id, teacher.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn imports_skip_accounts_with_another_role() -> Result<(), AppError> {
        let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let teacher = UserRepository::new(db).find_by_id(teacher.id).await?.unwrap();
        let colleague = factory::user::UserFactory::new(db)
            .role(Role::Teacher)
            .student_id(Some("21000009A"))
            .full_name("Colleague")
            .build()
            .await?;

        let service = ImportService::new(db, DOMAIN, "123456");

        let summary = service
            .import_students(
                &teacher,
                vec![row(2, &[
                    ("student_id", "21000009A"),
                    ("full_name", "Renamed"),
                    ("email", colleague.email.as_str()),
                    ("course_code", course.course_code.as_str()),
                ])],
            )
            .await?;

        assert_eq!(summary.updated_count, 0);
        assert_eq!(summary.enrolled_count, 0);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(
            summary.errors,
            vec!["Row 2: student ID belongs to a non-student account: 21000009A".to_string()]
        );

        let summary = service
            .import_users(vec![row(3, &[
                ("username", colleague.username.as_str()),
                ("full_name", "Renamed"),
                ("email", colleague.email.as_str()),
                ("role", "student"),
                ("student_id", "21000010A"),
                ("course_code", course.course_code.as_str()),
            ])])
            .await?;

        assert_eq!(summary.updated_count, 0);
        assert_eq!(summary.skipped_count, 1);

        let unchanged = UserRepository::new(db).find_by_id(colleague.id).await?.unwrap();
        assert_eq!(unchanged.full_name, "Colleague");
        assert_eq!(unchanged.role, Role::Teacher);
        assert!(!EnrollmentRepository::new(db).is_enrolled(course.id, colleague.id).await?);

        Ok(())
    }
}
