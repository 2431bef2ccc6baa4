// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error-to-response mapping: status codes and the uniform envelope.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use gym_tracker::error::AppError;

async fn into_json(error: AppError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let (status, body) = into_json(AppError::NotFound("Client not found".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Client not found");
}

#[tokio::test]
async fn test_bad_request_maps_to_400() {
    let (status, body) =
        into_json(AppError::BadRequest("Time slot is at maximum capacity".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Time slot is at maximum capacity");
}

#[tokio::test]
async fn test_validation_messages_are_joined() {
    let (status, body) = into_json(AppError::Validation(vec![
        "End time must be after start time".to_string(),
        "Max capacity must be at least 1".to_string(),
    ]))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "End time must be after start time, Max capacity must be at least 1"
    );
}

#[tokio::test]
async fn test_forbidden_maps_to_403() {
    let (status, _body) = into_json(AppError::Forbidden("Owner role required".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unauthorized_maps_to_401() {
    let (status, _body) = into_json(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_data_integrity_hides_details_behind_500() {
    let (status, body) = into_json(AppError::DataIntegrity(
        "Client block progression is out of bounds".to_string(),
    ))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Internal details never leak into the response body
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_database_error_hides_details_behind_500() {
    let (status, body) =
        into_json(AppError::Database("connection refused".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}
