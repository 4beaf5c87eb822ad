//! Assertions for problem+json error responses.
//!
//! Kept free of backend types so the wire contract is checked as a client
//! would see it.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;

pub const PROBLEM_JSON: &str = "application/problem+json";

/// An error body as a client decodes it.
#[derive(Debug, Clone, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

/// Decode a problem body, checking the content type and status field.
pub fn parse_problem(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Problem {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, PROBLEM_JSON, "error responses use {PROBLEM_JSON}");

    let problem: Problem = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "body is not a problem document ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });
    assert_eq!(problem.status, status.as_u16(), "body status mirrors the HTTP status");
    assert!(
        problem.type_uri.ends_with(&problem.code),
        "type {} should name code {}",
        problem.type_uri,
        problem.code
    );
    problem
}

/// Assert code, status and optionally a detail fragment; returns the problem
/// for further checks.
pub async fn assert_problem_details_from_service_response(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> Problem {
    let status = resp.status();
    assert_eq!(status, expected_status);
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    let problem = parse_problem(status, &headers, &body);
    assert_eq!(problem.code, expected_code);
    if let Some(fragment) = expected_detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "detail {:?} should contain {fragment:?}",
            problem.detail
        );
    }
    problem
}
