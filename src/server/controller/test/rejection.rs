use super::*;

/// Tests a body field of the wrong type is reported as a JSON bad request.
///
/// Expected: 400 with an `error` naming the invalid body
#[tokio::test]
async fn wrong_field_type_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .send(json_request(Method::POST, "/api/auth/register", None, r#"{"username": 5}"#))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

/// Tests malformed JSON is reported as a JSON bad request.
///
/// Expected: 400 with an `error` field
#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .send(json_request(Method::POST, "/api/auth/login", None, "{not json"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].is_string());
}

/// Tests a missing JSON content type is reported as a JSON bad request.
///
/// Expected: 400 instead of 415
#[tokio::test]
async fn missing_content_type_is_bad_request() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].is_string());
}

/// Tests a non-numeric path ID is reported as a JSON bad request.
///
/// Expected: 400 with an `error` naming the path parameter
#[tokio::test]
async fn non_numeric_path_id_is_bad_request() {
    let app = TestApp::new().await;
    let cookie = app.login_as(Role::Student).await;

    let response = app
        .send(json_request(Method::GET, "/api/courses/abc", Some(&cookie), "{}"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid path parameter"));
}

/// Tests an unparsable query value is reported as a JSON bad request.
///
/// Expected: 400 with an `error` naming the query string
#[tokio::test]
async fn invalid_query_is_bad_request() {
    let app = TestApp::new().await;
    let cookie = app.login_as(Role::Admin).await;

    let response = app
        .send(json_request(Method::GET, "/api/admin/users?page=x", Some(&cookie), "{}"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));
}
