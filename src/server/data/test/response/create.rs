use super::*;

/// Tests storing a submission.
///
/// Expected: Ok and findable by activity and student
#[tokio::test]
async fn stores_submission() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;
    let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;

    let repo = ResponseRepository::new(db);
    let response = repo
        .create(CreateResponseParams {
            activity_id: activity.id,
            student_id: student.id,
            response_data: json!({ "answer": "B" }),
            time_spent_seconds: Some(42),
        })
        .await?;

    assert_eq!(response.time_spent_seconds, Some(42));
    assert!(response.score.is_none());

    let found = repo
        .find_by_activity_and_student(activity.id, student.id)
        .await?;
    assert_eq!(found.map(|r| r.id), Some(response.id));

    Ok(())
}

/// Tests filling activity and student names.
///
/// Expected: names and username set from the joined rows
#[tokio::test]
async fn fills_details() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;
    let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
    factory::response::create_response(db, activity.id, student.id).await?;

    let repo = ResponseRepository::new(db);
    let responses = repo.with_details(repo.get_by_activity(activity.id).await?).await?;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].activity_title.as_deref(), Some(activity.title.as_str()));
    assert_eq!(responses[0].student_name.as_deref(), Some(student.full_name.as_str()));
    assert_eq!(responses[0].student_username.as_deref(), Some(student.username.as_str()));

    Ok(())
}
