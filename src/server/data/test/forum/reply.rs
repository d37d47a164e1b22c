use super::*;

/// Tests creating a nested reply and reading its parent pointer.
///
/// Expected: parent recorded; top-level reply has no parent
#[tokio::test]
async fn records_parent_reply() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let student = factory::helpers::create_enrolled_student(db, course.id).await?;
    let post = factory::forum::create_post(db, course.id, teacher.id).await?;

    let repo = ForumReplyRepository::new(db);
    let top = repo
        .create(CreateReplyParams {
            post_id: post.id,
            user_id: student.id,
            content: "First".to_string(),
            parent_reply_id: None,
        })
        .await?;
    let nested = repo
        .create(CreateReplyParams {
            post_id: post.id,
            user_id: teacher.id,
            content: "Answer".to_string(),
            parent_reply_id: Some(top.id),
        })
        .await?;

    assert_eq!(repo.get_parent_id(nested.id).await?, Some(top.id));
    assert_eq!(repo.get_parent_id(top.id).await?, None);
    assert_eq!(nested.author_role, Some(Role::Teacher));
    assert_eq!(repo.get_by_post(post.id).await?.len(), 2);

    Ok(())
}

/// Tests replacing reply content.
///
/// Expected: new content stored
#[tokio::test]
async fn updates_content() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
    let db = &test.db;

    let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
    let post = factory::forum::create_post(db, course.id, teacher.id).await?;
    let reply = factory::forum::create_reply(db, post.id, teacher.id, None).await?;

    let updated = ForumReplyRepository::new(db)
        .update_content(reply.id, "Edited".to_string())
        .await?
        .unwrap();

    assert_eq!(updated.content, "Edited");

    Ok(())
}
