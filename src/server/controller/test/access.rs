use super::*;

/// Endpoint under test. Bodies are empty so only the role guard decides the outcome.
struct Route {
    method: Method,
    uri: &'static str,
    multipart: bool,
}

impl Route {
    fn json(method: Method, uri: &'static str) -> Self {
        Self {
            method,
            uri,
            multipart: false,
        }
    }

    fn multipart(uri: &'static str) -> Self {
        Self {
            method: Method::POST,
            uri,
            multipart: true,
        }
    }

    fn request(&self, cookie: Option<&str>) -> Request<Body> {
        if self.multipart {
            multipart_request(self.uri, cookie)
        } else {
            json_request(self.method.clone(), self.uri, cookie, "{}")
        }
    }
}

fn admin_routes() -> Vec<Route> {
    vec![
        Route::json(Method::GET, "/api/admin/users"),
        Route::json(Method::POST, "/api/admin/users"),
        Route::json(Method::GET, "/api/admin/users/1"),
        Route::json(Method::PUT, "/api/admin/users/1"),
        Route::json(Method::DELETE, "/api/admin/users/1"),
        Route::json(Method::GET, "/api/admin/courses"),
        Route::json(Method::GET, "/api/admin/courses/1"),
        Route::json(Method::PUT, "/api/admin/courses/1"),
        Route::json(Method::DELETE, "/api/admin/courses/1"),
        Route::json(Method::GET, "/api/admin/activities"),
        Route::json(Method::DELETE, "/api/admin/activities/1"),
        Route::json(Method::GET, "/api/admin/stats"),
        Route::multipart("/api/admin/import-users-excel"),
    ]
}

fn student_routes() -> Vec<Route> {
    vec![
        Route::json(Method::POST, "/api/responses"),
        Route::json(Method::GET, "/api/courses/available"),
        Route::json(Method::POST, "/api/courses/1/enroll"),
        Route::json(Method::DELETE, "/api/courses/1/enroll"),
    ]
}

fn teacher_routes() -> Vec<Route> {
    vec![
        Route::json(Method::POST, "/api/courses"),
        Route::json(Method::PUT, "/api/courses/1"),
        Route::json(Method::GET, "/api/courses/1/students"),
        Route::json(Method::POST, "/api/courses/1/import-students"),
        Route::multipart("/api/courses/import-students-excel"),
        Route::json(Method::POST, "/api/activities"),
        Route::json(Method::POST, "/api/activities/1/start"),
        Route::json(Method::POST, "/api/activities/1/stop"),
        Route::json(Method::POST, "/api/activities/ai/generate"),
        Route::json(Method::POST, "/api/responses/ai/analyze/1"),
        Route::json(Method::GET, "/api/analytics/activity/1/analytics"),
        Route::multipart("/api/documents/course/1"),
    ]
}

async fn assert_status(
    app: &TestApp,
    routes: &[Route],
    cookie: Option<&str>,
    status: StatusCode,
) {
    for route in routes {
        let response = app.send(route.request(cookie)).await;
        assert_eq!(response.status(), status, "{} {}", route.method, route.uri);

        let body = json_body(response).await;
        assert!(body["error"].is_string(), "{} {}", route.method, route.uri);
    }
}

/// Tests every admin endpoint rejects anonymous callers.
///
/// Expected: 401 with a JSON error body
#[tokio::test]
async fn admin_routes_require_session() {
    let app = TestApp::new().await;

    assert_status(&app, &admin_routes(), None, StatusCode::UNAUTHORIZED).await;
}

/// Tests every admin endpoint rejects teachers and students.
///
/// Expected: 403 for both roles
#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let app = TestApp::new().await;

    for role in [Role::Student, Role::Teacher] {
        let cookie = app.login_as(role).await;
        assert_status(&app, &admin_routes(), Some(&cookie), StatusCode::FORBIDDEN).await;
    }
}

/// Tests student-only endpoints reject anonymous callers and other roles.
///
/// Expected: 401 without a session, 403 for teachers and admins
#[tokio::test]
async fn student_routes_reject_other_roles() {
    let app = TestApp::new().await;

    assert_status(&app, &student_routes(), None, StatusCode::UNAUTHORIZED).await;

    for role in [Role::Teacher, Role::Admin] {
        let cookie = app.login_as(role).await;
        assert_status(&app, &student_routes(), Some(&cookie), StatusCode::FORBIDDEN).await;
    }
}

/// Tests teacher-only endpoints reject anonymous callers and other roles.
///
/// Expected: 401 without a session, 403 for students and admins
#[tokio::test]
async fn teacher_routes_reject_other_roles() {
    let app = TestApp::new().await;

    assert_status(&app, &teacher_routes(), None, StatusCode::UNAUTHORIZED).await;

    for role in [Role::Student, Role::Admin] {
        let cookie = app.login_as(role).await;
        assert_status(&app, &teacher_routes(), Some(&cookie), StatusCode::FORBIDDEN).await;
    }
}

/// Tests an admin passes the guard on an admin endpoint through the session cookie.
///
/// Expected: 200 with the stats body
#[tokio::test]
async fn admin_session_reaches_admin_routes() {
    let app = TestApp::new().await;
    let cookie = app.login_as(Role::Admin).await;

    let response = app
        .send(json_request(Method::GET, "/api/admin/stats", Some(&cookie), "{}"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_users"], 1);
}

/// Tests logout clears the session so the cookie no longer authenticates.
///
/// Expected: 200 on the profile before logout, 401 after
#[tokio::test]
async fn logout_revokes_session() {
    let app = TestApp::new().await;
    let cookie = app.login_as(Role::Student).await;

    let profile = app
        .send(json_request(Method::GET, "/api/auth/profile", Some(&cookie), "{}"))
        .await;
    assert_eq!(profile.status(), StatusCode::OK);

    let logout = app
        .send(json_request(Method::POST, "/api/auth/logout", Some(&cookie), "{}"))
        .await;
    assert_eq!(logout.status(), StatusCode::OK);

    let profile = app
        .send(json_request(Method::GET, "/api/auth/profile", Some(&cookie), "{}"))
        .await;
    assert_eq!(profile.status(), StatusCode::UNAUTHORIZED);
}
