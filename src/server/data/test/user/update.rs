use super::*;

/// Tests a partial update.
///
/// Verifies that only provided fields change.
///
/// Expected: Ok(Some) with new name and unchanged email
#[tokio::test]
async fn updates_only_provided_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    let student = factory::user::create_student(db).await?;

    let updated = UserRepository::new(db)
        .update(UpdateUserParams {
            id: student.id,
            full_name: Some("Renamed".to_string()),
            ..Default::default()
        })
        .await?
        .unwrap();

    assert_eq!(updated.full_name, "Renamed");
    assert_eq!(updated.email, student.email);
    assert_eq!(updated.role, Role::Student);

    Ok(())
}

/// Tests updating a user that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();

    let result = UserRepository::new(&test.db)
        .update(UpdateUserParams {
            id: 999,
            ..Default::default()
        })
        .await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests recording a login.
///
/// Expected: last_login set and counted by `count_logged_in_since`
#[tokio::test]
async fn touches_last_login() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    let student = factory::user::create_student(db).await?;
    factory::user::create_student(db).await?;

    let repo = UserRepository::new(db);
    repo.touch_last_login(student.id).await?;

    let user = repo.find_by_id(student.id).await?.unwrap();
    assert!(user.last_login.is_some());
    assert_eq!(
        repo.count_logged_in_since(Utc::now() - Duration::days(1)).await?,
        1
    );

    Ok(())
}
