use super::*;

/// Tests filtering by a set of course IDs.
///
/// Expected: only activities of the listed courses, newest first
#[tokio::test]
async fn filters_by_course_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let other = factory::course::create_course(db, teacher.id).await?;

    let older = factory::activity::ActivityFactory::new(db, course.id, teacher.id)
        .created_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;
    let newer = factory::activity::create_activity(db, course.id, teacher.id).await?;
    factory::activity::create_activity(db, other.id, teacher.id).await?;

    let activities = ActivityRepository::new(db)
        .list(
            ActivityFilter {
                course_ids: Some(vec![course.id]),
                ..Default::default()
            },
            None,
        )
        .await?;

    let ids: Vec<i32> = activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    Ok(())
}

/// Tests an empty course scope.
///
/// Expected: no activities and a zero count
#[tokio::test]
async fn empty_course_scope_matches_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    factory::activity::create_activity(db, course.id, teacher.id).await?;

    let repo = ActivityRepository::new(db);
    let filter = ActivityFilter {
        course_ids: Some(Vec::new()),
        ..Default::default()
    };

    assert!(repo.list(filter.clone(), None).await?.is_empty());
    assert_eq!(repo.count(filter).await?, 0);

    Ok(())
}

/// Tests status and type filters together with a limit.
///
/// Expected: one active quiz
#[tokio::test]
async fn filters_by_status_and_type() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_activity_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    factory::activity::ActivityFactory::new(db, course.id, teacher.id)
        .status(ActivityStatus::Active)
        .build()
        .await?;
    factory::activity::ActivityFactory::new(db, course.id, teacher.id)
        .status(ActivityStatus::Active)
        .activity_type(ActivityType::Poll)
        .build()
        .await?;
    factory::activity::create_activity(db, course.id, teacher.id).await?;

    let activities = ActivityRepository::new(db)
        .list(
            ActivityFilter {
                status: Some(ActivityStatus::Active),
                activity_type: Some(ActivityType::Quiz),
                ..Default::default()
            },
            Some(5),
        )
        .await?;

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].status, ActivityStatus::Active);
    assert_eq!(activities[0].activity_type, ActivityType::Quiz);

    Ok(())
}
