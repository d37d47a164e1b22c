use super::*;

/// Tests creating a student account.
///
/// Verifies that the repository stores every field and leaves `last_login` unset.
///
/// Expected: Ok with user created
#[tokio::test]
async fn creates_student() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    let repo = UserRepository::new(db);
    let user = repo
        .create(CreateUserParams {
            username: "21012345a".to_string(),
            email: "21012345a@connect.polyu.hk".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Student,
            student_id: Some("21012345A".to_string()),
            full_name: "Chan Tai Man".to_string(),
            department: Some("COMP".to_string()),
        })
        .await?;

    assert_eq!(user.username, "21012345a");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.student_id.as_deref(), Some("21012345A"));
    assert!(user.last_login.is_none());

    let found = repo.find_by_student_id("21012345A").await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    Ok(())
}

/// Tests that usernames are unique.
///
/// Expected: Err on the second insert
#[tokio::test]
async fn rejects_duplicate_username() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    let existing = factory::user::create_student(db).await?;

    let result = UserRepository::new(db)
        .create(CreateUserParams {
            username: existing.username.clone(),
            email: "other@connect.polyu.hk".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Student,
            student_id: None,
            full_name: "Other".to_string(),
            department: None,
        })
        .await;

    assert!(result.is_err());

    Ok(())
}

/// Tests lookup by username and email.
///
/// Expected: Some for existing values, None otherwise
#[tokio::test]
async fn finds_by_username_and_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = &test.db;

    let teacher = factory::user::create_teacher(db).await?;
    let repo = UserRepository::new(db);

    assert!(repo.find_by_username(&teacher.username).await?.is_some());
    assert!(repo.find_by_email(&teacher.email).await?.is_some());
    assert!(repo.find_by_username("nobody").await?.is_none());

    Ok(())
}
