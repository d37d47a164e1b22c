use super::*;

/// Tests moving the read marker.
///
/// Expected: the second mark overwrites the first
#[tokio::test]
async fn upserts_read_marker() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;

    let repo = ForumReadRepository::new(db);
    assert!(repo.get_last_read(student.id, course.id).await?.is_none());

    let first = Utc::now() - Duration::hours(1);
    let second = Utc::now();
    repo.mark_read(student.id, course.id, first).await?;
    repo.mark_read(student.id, course.id, second).await?;

    let stored = repo.get_last_read(student.id, course.id).await?;
    assert_eq!(
        stored.map(|t| t.timestamp_millis()),
        Some(second.timestamp_millis())
    );

    Ok(())
}

/// Tests detecting activity by other users after the marker.
///
/// Expected: own posts never count; a later reply by someone else does
#[tokio::test]
async fn detects_activity_by_others() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;
    let post = factory::forum::create_post(db, course.id, student.id).await?;

    let posts = ForumPostRepository::new(db);
    let replies = ForumReplyRepository::new(db);

    assert!(!posts.exists_by_others_since(course.id, student.id, None).await?);
    assert!(posts.exists_by_others_since(course.id, teacher.id, None).await?);

    let marker = Utc::now() - Duration::minutes(5);
    factory::forum::create_reply(db, post.id, teacher.id, None).await?;

    assert!(
        replies
            .exists_by_others_since(course.id, student.id, Some(marker))
            .await?
    );
    assert!(
        !replies
            .exists_by_others_since(course.id, teacher.id, Some(marker))
            .await?
    );

    Ok(())
}
