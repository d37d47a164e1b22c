use super::*;

/// Tests filling derived course fields.
///
/// Expected: teacher name, two students and one activity
#[tokio::test]
async fn fills_teacher_name_and_counts() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    factory::helpers::create_enrolled_student(db, course.id).await?;
    factory::helpers::create_enrolled_student(db, course.id).await?;
    factory::activity::create_activity(db, course.id, teacher.id).await?;

    let repo = CourseRepository::new(db);
    let courses = repo.with_details(repo.get_by_teacher(teacher.id).await?).await?;

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].teacher_name.as_deref(), Some(teacher.full_name.as_str()));
    assert_eq!(courses[0].student_count, 2);
    assert_eq!(courses[0].activity_count, 1);

    Ok(())
}
