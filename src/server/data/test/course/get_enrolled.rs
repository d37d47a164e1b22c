use super::*;

/// Tests listing the courses a student is enrolled in.
///
/// Expected: only the enrolled course
#[tokio::test]
async fn returns_only_enrolled_courses() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, enrolled) = factory::helpers::create_course_with_teacher(db).await?;
    factory::course::create_course(db, teacher.id).await?;
    let student = factory::helpers::create_enrolled_student(db, enrolled.id).await?;

    let courses = CourseRepository::new(db).get_enrolled(student.id).await?;

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, enrolled.id);

    Ok(())
}

/// Tests a student with no enrollments.
///
/// Expected: empty list
#[tokio::test]
async fn returns_empty_without_enrollments() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::user::create_student(db).await?;

    let courses = CourseRepository::new(db).get_enrolled(student.id).await?;

    assert!(courses.is_empty());

    Ok(())
}
