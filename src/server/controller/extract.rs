//! Request extractors whose rejections are reported as `AppError::BadRequest`.
//!
//! axum's own extractors answer bad input with plain-text 400/415/422 responses. These
//! wrappers route the same failures through `AppError` so every invalid request gets the
//! usual `{"error": "<message>"}` body with status 400.

use axum::extract::{FromRequest, FromRequestParts, Multipart};

use crate::server::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Deserialized query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// Deserialized path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

/// Multipart upload body.
#[derive(FromRequest)]
#[from_request(rejection(AppError))]
pub struct MultipartBody(pub Multipart);
