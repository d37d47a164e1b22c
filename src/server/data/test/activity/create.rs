use super::*;

/// Tests creating an activity.
///
/// Expected: Ok with draft status and no start time
#[tokio::test]
async fn creates_draft_activity() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;

    let activity = ActivityRepository::new(db)
        .create(CreateActivityParams {
            title: "Warm-up poll".to_string(),
            description: None,
            activity_type: ActivityType::Poll,
            course_id: course.id,
            creator_id: teacher.id,
            config: Some(serde_json::json!({ "options": ["A", "B"] })),
            is_ai_generated: false,
            duration_minutes: 5,
        })
        .await?;

    assert_eq!(activity.status, ActivityStatus::Draft);
    assert_eq!(activity.activity_type, ActivityType::Poll);
    assert_eq!(activity.duration_minutes, 5);
    assert!(activity.start_time.is_none());

    Ok(())
}

/// Tests starting an activity through a partial update.
///
/// Expected: status active with start and end times set, title unchanged
#[tokio::test]
async fn starts_activity() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let activity = factory::activity::create_activity(db, course.id, teacher.id).await?;

    let now = Utc::now();
    let updated = ActivityRepository::new(db)
        .update(UpdateActivityParams {
            id: activity.id,
            status: Some(ActivityStatus::Active),
            start_time: Some(now),
            end_time: Some(now + Duration::minutes(10)),
            ..Default::default()
        })
        .await?
        .unwrap();

    assert_eq!(updated.status, ActivityStatus::Active);
    assert!(updated.start_time.is_some());
    assert!(updated.end_time.is_some());
    assert_eq!(updated.title, activity.title);

    Ok(())
}
