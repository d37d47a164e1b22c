use super::*;

/// Tests paging through users filtered by role.
///
/// Expected: Ok with a page of teachers and the total teacher count
#[tokio::test]
async fn filters_by_role_and_pages() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    for _ in 0..3 {
        factory::user::create_teacher(db).await?;
    }
    factory::user::create_student(db).await?;

    let repo = UserRepository::new(db);
    let (first, total) = repo.get_paginated(Some(Role::Teacher), 1, 2).await?;
    let (second, _) = repo.get_paginated(Some(Role::Teacher), 2, 2).await?;

    assert_eq!(total, 3);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(first.iter().chain(second.iter()).all(|u| u.role == Role::Teacher));

    Ok(())
}

/// Tests paging without a role filter.
///
/// Expected: every user counted
#[tokio::test]
async fn counts_all_roles_without_filter() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    factory::user::create_teacher(db).await?;
    factory::user::create_student(db).await?;
    factory::user::create_admin(db).await?;

    let repo = UserRepository::new(db);
    let (users, total) = repo.get_paginated(None, 1, 20).await?;

    assert_eq!(total, 3);
    assert_eq!(users.len(), 3);
    assert_eq!(repo.count(Some(Role::Admin)).await?, 1);

    Ok(())
}
