// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const HEADER_NAME: &str = "X-Org-Id";

/// 请求所属组织
///
/// 由上游认证层写入 `X-Org-Id` 请求头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgId(pub i32);

impl<S> FromRequestParts<S> for OrgId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(HEADER_NAME)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .map(OrgId)
            .ok_or_else(|| {
                let body = Json(json!({ "error": "Missing or invalid X-Org-Id header" }));
                (StatusCode::BAD_REQUEST, body).into_response()
            })
    }
}
