use super::*;

/// Tests creating a course.
///
/// Expected: Ok with an active course owned by the teacher
#[tokio::test]
async fn creates_active_course() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    let teacher = factory::user::create_teacher(db).await?;

    let repo = CourseRepository::new(db);
    let course = repo
        .create(CreateCourseParams {
            course_code: "COMP1011".to_string(),
            course_name: "Programming Fundamentals".to_string(),
            description: None,
            teacher_id: teacher.id,
            semester: "Fall".to_string(),
            academic_year: "2025-2026".to_string(),
        })
        .await?;

    assert!(course.is_active);
    assert_eq!(course.teacher_id, teacher.id);
    assert_eq!(
        repo.find_by_code("COMP1011").await?.map(|c| c.id),
        Some(course.id)
    );

    Ok(())
}

/// Tests that course codes are unique.
///
/// Expected: Err on the duplicate code
#[tokio::test]
async fn rejects_duplicate_code() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, existing) = factory::helpers::create_course_with_teacher(db).await?;

    let result = CourseRepository::new(db)
        .create(CreateCourseParams {
            course_code: existing.course_code.clone(),
            course_name: "Another".to_string(),
            description: None,
            teacher_id: teacher.id,
            semester: "Spring".to_string(),
            academic_year: "2025-2026".to_string(),
        })
        .await;

    assert!(result.is_err());

    Ok(())
}

/// Tests deactivating a course through a partial update.
///
/// Expected: Ok(Some) with is_active false and the name unchanged
#[tokio::test]
async fn deactivates_course() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = &test.db;

    let (_, course) = factory::helpers::create_course_with_teacher(db).await?;

    let repo = CourseRepository::new(db);
    let updated = repo
        .update(UpdateCourseParams {
            id: course.id,
            is_active: Some(false),
            ..Default::default()
        })
        .await?
        .unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.course_name, course.course_name);
    assert_eq!(repo.get_all(true).await?.len(), 0);
    assert_eq!(repo.get_all(false).await?.len(), 1);

    Ok(())
}
