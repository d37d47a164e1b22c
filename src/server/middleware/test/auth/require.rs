use super::*;

/// Tests an empty permission list only requires authentication.
///
/// Expected: Ok(User) for any logged-in role
#[tokio::test]
async fn empty_permission_list_grants_access() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().with_session().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let student = factory::create_student(db).await?;
    AuthSession::new(session).set_user_id(student.id).await?;

    let user = AuthGuard::new(db, session).require(&[]).await?;

    assert_eq!(user.id, student.id);
    assert_eq!(user.role, Role::Student);

    Ok(())
}

/// Tests a user whose role is listed passes the guard.
///
/// Expected: Ok(User) for a teacher on a teacher-or-admin endpoint
#[tokio::test]
async fn grants_access_when_any_role_matches() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().with_session().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let teacher = factory::create_teacher(db).await?;
    AuthSession::new(session).set_user_id(teacher.id).await?;

    let user = AuthGuard::new(db, session)
        .require(&[Permission::Teacher, Permission::Admin])
        .await?;

    assert_eq!(user.id, teacher.id);

    Ok(())
}

/// Tests the role by endpoint matrix for the three roles.
///
/// Expected: only the matching role passes each single-role guard
#[tokio::test]
async fn enforces_role_matrix() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().with_session().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let student = factory::create_student(db).await?;
    let teacher = factory::create_teacher(db).await?;
    let admin = factory::create_admin(db).await?;

    let cases = [
        (student.id, Permission::Student, true),
        (student.id, Permission::Teacher, false),
        (student.id, Permission::Admin, false),
        (teacher.id, Permission::Student, false),
        (teacher.id, Permission::Teacher, true),
        (teacher.id, Permission::Admin, false),
        (admin.id, Permission::Student, false),
        (admin.id, Permission::Teacher, false),
        (admin.id, Permission::Admin, true),
    ];

    for (user_id, permission, allowed) in cases {
        AuthSession::new(session).set_user_id(user_id).await?;

        let result = AuthGuard::new(db, session).require(&[permission]).await;

        if allowed {
            assert!(result.is_ok(), "user {} should pass {:?}", user_id, permission);
        } else {
            match result {
                Err(AppError::AuthErr(AuthError::AccessDenied(denied_id, _))) => {
                    assert_eq!(denied_id, user_id)
                }
                other => panic!("Expected AccessDenied, got: {:?}", other.map(|u| u.id)),
            }
        }
    }

    Ok(())
}

/// Tests unauthenticated requests are rejected before any role check.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn denies_access_when_not_authenticated() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().with_session().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let result = AuthGuard::new(db, session).require(&[Permission::Admin]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}

/// Tests a session pointing at a deleted user is rejected.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn denies_access_when_user_not_in_database() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().with_session().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    AuthSession::new(session).set_user_id(999).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    match result {
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(user_id))) => assert_eq!(user_id, 999),
        other => panic!("Expected UserNotInDatabase, got: {:?}", other.map(|u| u.id)),
    }

    Ok(())
}
