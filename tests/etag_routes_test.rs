// ABOUTME: HTTP tests for the study routes and their etag middleware
// ABOUTME: Drives the full router with oneshot requests covering 200, 304, and 401 paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use anyhow::Result;
use axum::http::StatusCode;
use bridge_server::routes::{self, AppState};
use common::create_test_session;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use std::time::Duration;

const SCHEDULE: &str = "/v5/studies/study1/schedule";
const TIMELINE: &str = "/v5/studies/study1/participants/self/timeline";
const EVENTS: &str = "/v5/studies/study1/participants/self/activityevents";

async fn setup() -> Result<(AppState, String)> {
    let state = common::create_test_state().await?;
    let session = create_test_session(&state.sessions, "api").await?;
    Ok((state, session.session_token))
}

async fn put_schedule(state: &AppState, token: &str, body: &Value) {
    AxumTestRequest::put(SCHEDULE)
        .session(token)
        .json(body)
        .send(routes::router(state.clone()))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_get_schedule_returns_etag() -> Result<()> {
    let (state, token) = setup().await?;
    put_schedule(&state, &token, &json!({"sessions": ["baseline"]})).await;

    let response = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::OK);

    let etag = response.etag().expect("etag header");
    assert_eq!(etag.len(), 32);
    let body: Value = response.json();
    assert_eq!(body["studyId"], "study1");
    assert_eq!(body["schedule"]["sessions"][0], "baseline");
    Ok(())
}

#[tokio::test]
async fn test_matching_if_none_match_returns_304() -> Result<()> {
    let (state, token) = setup().await?;
    put_schedule(&state, &token, &json!({"sessions": []})).await;

    let first = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await;
    let etag = first.etag().expect("etag header");

    let second = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .header("If-None-Match", &etag)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::NOT_MODIFIED);

    assert_eq!(second.etag(), Some(etag));
    assert!(second.is_body_empty());
    Ok(())
}

#[tokio::test]
async fn test_update_invalidates_previous_etag() -> Result<()> {
    let (state, token) = setup().await?;
    put_schedule(&state, &token, &json!({"version": 1})).await;

    let old_etag = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await
        .etag()
        .expect("etag header");

    tokio::time::sleep(Duration::from_millis(5)).await;
    put_schedule(&state, &token, &json!({"version": 2})).await;

    let response = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .header("If-None-Match", &old_etag)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::OK);

    let new_etag = response.etag().expect("etag header");
    assert_ne!(new_etag, old_etag);
    let body: Value = response.json();
    assert_eq!(body["schedule"]["version"], 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() -> Result<()> {
    let (state, token) = setup().await?;
    put_schedule(&state, &token, &json!({})).await;

    let response = AxumTestRequest::get(SCHEDULE)
        .send(routes::router(state.clone()))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");

    AxumTestRequest::get(SCHEDULE)
        .session("not-a-session")
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_deleted_schedule_has_no_etag() -> Result<()> {
    let (state, token) = setup().await?;
    put_schedule(&state, &token, &json!({})).await;

    AxumTestRequest::delete(SCHEDULE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.etag(), None);
    Ok(())
}

#[tokio::test]
async fn test_timeline_etag_requires_every_timestamp() -> Result<()> {
    let (state, token) = setup().await?;
    put_schedule(&state, &token, &json!({"sessions": ["baseline"]})).await;

    let without_events = AxumTestRequest::get(TIMELINE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(without_events.etag(), None);

    AxumTestRequest::post(EVENTS)
        .session(&token)
        .json(&json!({"eventId": "timeline_retrieved"}))
        .send(routes::router(state.clone()))
        .await
        .assert_status(StatusCode::CREATED);

    let with_events = AxumTestRequest::get(TIMELINE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await
        .assert_status(StatusCode::OK);
    let etag = with_events.etag().expect("etag header");
    let body: Value = with_events.json();
    assert_eq!(body["events"][0]["eventId"], "timeline_retrieved");
    assert_eq!(body["schedule"]["studyId"], "study1");

    AxumTestRequest::get(TIMELINE)
        .session(&token)
        .header("If-None-Match", &etag)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::NOT_MODIFIED);
    Ok(())
}

#[tokio::test]
async fn test_timeline_etag_is_per_participant() -> Result<()> {
    let (state, token) = setup().await?;
    let other = create_test_session(&state.sessions, "api").await?;
    put_schedule(&state, &token, &json!({})).await;

    for session_token in [token.as_str(), other.session_token.as_str()] {
        AxumTestRequest::post(EVENTS)
            .session(session_token)
            .json(&json!({"eventId": "enrollment"}))
            .send(routes::router(state.clone()))
            .await
            .assert_status(StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let mine = AxumTestRequest::get(TIMELINE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await
        .etag()
        .expect("etag header");

    AxumTestRequest::get(TIMELINE)
        .session(&other.session_token)
        .header("If-None-Match", &mine)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_empty_event_id_is_rejected() -> Result<()> {
    let (state, token) = setup().await?;
    AxumTestRequest::post(EVENTS)
        .session(&token)
        .json(&json!({"eventId": " "}))
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_request_id_is_echoed() -> Result<()> {
    let (state, _) = setup().await?;

    let supplied = AxumTestRequest::get("/health")
        .header("x-request-id", "req_test")
        .send(routes::router(state.clone()))
        .await;
    assert_eq!(supplied.header("x-request-id").as_deref(), Some("req_test"));

    let generated = AxumTestRequest::get("/health")
        .send(routes::router(state))
        .await;
    assert!(generated
        .header("x-request-id")
        .is_some_and(|id| id.starts_with("req_")));
    Ok(())
}

#[tokio::test]
async fn test_health_reports_cache_backend() -> Result<()> {
    let (state, _) = setup().await?;
    let response = AxumTestRequest::get("/health")
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"]["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_query_string_does_not_rebind_identity_fields() -> Result<()> {
    let (state, token) = setup().await?;
    let other = create_test_session(&state.sessions, "other").await?;
    put_schedule(&state, &other.session_token, &json!({"owner": "other"})).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    put_schedule(&state, &token, &json!({"owner": "api"})).await;

    let own_etag = AxumTestRequest::get(SCHEDULE)
        .session(&token)
        .send(routes::router(state.clone()))
        .await
        .etag()
        .expect("etag header");

    for query in ["?appId=other", "?appId=", "?userId=&orgId="] {
        let response = AxumTestRequest::get(&format!("{SCHEDULE}{query}"))
            .session(&token)
            .send(routes::router(state.clone()))
            .await
            .assert_status(StatusCode::OK);
        assert_eq!(response.etag().as_deref(), Some(own_etag.as_str()));
        let body: Value = response.json();
        assert_eq!(body["schedule"]["owner"], "api");
    }

    tokio::time::sleep(Duration::from_millis(5)).await;
    put_schedule(&state, &token, &json!({"owner": "api", "version": 2})).await;

    let response = AxumTestRequest::get(&format!("{SCHEDULE}?appId=other"))
        .session(&token)
        .header("If-None-Match", &own_etag)
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::OK);
    assert_ne!(response.etag(), Some(own_etag));
    Ok(())
}

#[tokio::test]
async fn test_etag_rejection_carries_request_id() -> Result<()> {
    let (state, _) = setup().await?;

    let response = AxumTestRequest::get(SCHEDULE)
        .header("x-request-id", "req_rejected")
        .send(routes::router(state))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("x-request-id").as_deref(), Some("req_rejected"));
    let body: Value = response.json();
    assert_eq!(body["error"]["request_id"], "req_rejected");
    Ok(())
}
