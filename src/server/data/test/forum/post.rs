use super::*;

/// Tests that pinned posts come before newer unpinned ones.
///
/// Expected: pinned post first, then newest
#[tokio::test]
async fn lists_pinned_posts_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let pinned = factory::forum::PostFactory::new(db, course.id, teacher.id)
        .pinned(true)
        .created_at(Utc::now() - Duration::hours(2))
        .build()
        .await?;
    let older = factory::forum::PostFactory::new(db, course.id, teacher.id)
        .created_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;
    let newer = factory::forum::create_post(db, course.id, teacher.id).await?;

    let (posts, total) = ForumPostRepository::new(db)
        .get_paginated(course.id, None, 1, 20)
        .await?;

    let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
    assert_eq!(total, 3);
    assert_eq!(ids, vec![pinned.id, newer.id, older.id]);
    assert_eq!(posts[0].author_role, Some(Role::Teacher));

    Ok(())
}

/// Tests searching titles and content.
///
/// Expected: only the matching post
#[tokio::test]
async fn searches_title_and_content() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let matching = factory::forum::PostFactory::new(db, course.id, teacher.id)
        .content("Question about recursion")
        .build()
        .await?;
    factory::forum::create_post(db, course.id, teacher.id).await?;

    let (posts, total) = ForumPostRepository::new(db)
        .get_paginated(course.id, Some("recursion"), 1, 20)
        .await?;

    assert_eq!(total, 1);
    assert_eq!(posts[0].id, matching.id);

    Ok(())
}

/// Tests pinning and the reply counter.
///
/// Expected: pinned with one reply counted
#[tokio::test]
async fn pins_and_counts_replies() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let post = factory::forum::create_post(db, course.id, teacher.id).await?;

    let repo = ForumPostRepository::new(db);
    repo.update(UpdatePostParams {
        id: post.id,
        title: None,
        content: None,
        is_pinned: Some(true),
    })
    .await?;
    repo.increment_reply_count(post.id).await?;

    let found = repo.find_by_id(post.id).await?.unwrap();
    assert!(found.is_pinned);
    assert_eq!(found.reply_count, 1);

    Ok(())
}
