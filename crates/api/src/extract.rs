//! Request extractors whose rejections render as [`AppError`] JSON bodies
//! instead of Axum's plain-text defaults.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body. Malformed JSON, a missing `Content-Type`, or a field
/// of the wrong type rejects with `400 BAD_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters. A segment that does not parse (e.g. a malformed item
/// id) rejects with `400 BAD_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
