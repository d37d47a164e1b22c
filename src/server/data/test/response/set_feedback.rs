use super::*;

/// Tests storing feedback with a score.
///
/// Expected: feedback and score persisted
#[tokio::test]
async fn stores_feedback_and_score() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;
    let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
    let response = factory::response::create_response(db, activity.id, student.id).await?;

    let repo = ResponseRepository::new(db);
    let updated = repo
        .set_feedback(response.id, "Good work".to_string(), Some(90.0))
        .await?
        .unwrap();

    assert_eq!(updated.feedback.as_deref(), Some("Good work"));
    assert_eq!(updated.score, Some(90.0));

    Ok(())
}

/// Tests feedback without a score keeps the existing score.
///
/// Expected: score unchanged
#[tokio::test]
async fn keeps_score_when_omitted() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;
    let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;
    let response = factory::response::ResponseFactory::new(db, activity.id, student.id)
        .score(75.0)
        .build()
        .await?;

    let updated = ResponseRepository::new(db)
        .set_feedback(response.id, "See comments".to_string(), None)
        .await?
        .unwrap();

    assert_eq!(updated.score, Some(75.0));

    Ok(())
}

/// Tests analytics snapshots are listed newest first.
///
/// Expected: the second snapshot comes first
#[tokio::test]
async fn lists_analytics_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;

    let repo = AnalyticsRepository::new(db);
    let first = repo.create(activity.id, json!({ "run": 1 }), None).await?;
    let second = repo.create(activity.id, json!({ "run": 2 }), None).await?;

    let snapshots = repo.get_by_activity(activity.id).await?;
    let ids: Vec<i32> = snapshots.iter().map(|s| s.id).collect();

    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}
