// ABOUTME: Study schedule and participant timeline routes
// ABOUTME: Reads are guarded by etag support; writes keep the etag timestamps current
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Study routes
//!
//! Every write records or clears the etag timestamp of the entity it changes, so the
//! conditional reads stay consistent with the stored documents.

use super::AppState;
use crate::auth::AuthenticatedSession;
use crate::cache::factory::Cache;
use crate::cache::{CacheKey, CacheProvider};
use crate::errors::{AppError, AppResult};
use crate::etag::EtagCacheKey;
use crate::middleware::{etag_middleware, EtagSupport};
use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{middleware, Json, Router};
use chrono::{DateTime, FixedOffset, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Entity model of a study schedule
pub const SCHEDULE_MODEL: &str = "Schedule";
/// Entity model of a participant's activity events in one study
pub const ACTIVITY_EVENT_MODEL: &str = "StudyActivityEvent";

const SCHEDULE_PATH: &str = "/v5/studies/:studyId/schedule";
const TIMELINE_PATH: &str = "/v5/studies/:studyId/participants/self/timeline";
const ACTIVITY_EVENTS_PATH: &str = "/v5/studies/:studyId/participants/self/activityevents";

/// Schedule document stored for a study
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySchedule {
    /// Study the schedule belongs to
    pub study_id: String,
    /// Schedule content as submitted
    pub schedule: serde_json::Value,
    /// Last modification time
    pub modified_on: DateTime<FixedOffset>,
}

/// Activity event submitted by a participant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEventRequest {
    /// Event identifier (e.g. `timeline_retrieved`)
    pub event_id: String,
    /// When the event happened; defaults to the time of submission
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Optional answer attached to the event
    #[serde(default)]
    pub answer_value: Option<String>,
}

/// Activity event stored for a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyActivityEvent {
    /// Event identifier
    pub event_id: String,
    /// When the event happened
    pub timestamp: DateTime<FixedOffset>,
    /// Optional answer attached to the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_value: Option<String>,
    /// When the server recorded the event
    pub created_on: DateTime<FixedOffset>,
}

/// Schedule plus the caller's activity events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Study schedule, if one is stored
    pub schedule: Option<StudySchedule>,
    /// Caller's activity events in submission order
    pub events: Vec<StudyActivityEvent>,
}

/// Study routes implementation
pub struct StudyRoutes;

impl StudyRoutes {
    /// Create all study routes with etag support on the reads
    pub fn routes(state: &AppState) -> Router<AppState> {
        let schedule_etag = EtagSupport::new(
            state.etag.clone(),
            vec![EtagCacheKey::new(SCHEDULE_MODEL, &["appId", "studyId"])],
        );
        let timeline_etag = EtagSupport::new(
            state.etag.clone(),
            vec![
                EtagCacheKey::new(SCHEDULE_MODEL, &["appId", "studyId"]),
                EtagCacheKey::new(ACTIVITY_EVENT_MODEL, &["appId", "studyId", "userId"]),
            ],
        );

        Router::new()
            .route(
                SCHEDULE_PATH,
                get(get_schedule).layer(middleware::from_fn_with_state(
                    schedule_etag,
                    etag_middleware::<Cache>,
                )),
            )
            .route(SCHEDULE_PATH, put(put_schedule))
            .route(SCHEDULE_PATH, delete(delete_schedule))
            .route(
                TIMELINE_PATH,
                get(get_timeline).layer(middleware::from_fn_with_state(
                    timeline_etag,
                    etag_middleware::<Cache>,
                )),
            )
            .route(ACTIVITY_EVENTS_PATH, post(create_activity_event))
    }
}

fn schedule_values(app_id: &str, study_id: &str) -> Vec<String> {
    vec![app_id.to_owned(), study_id.to_owned()]
}

fn event_values(app_id: &str, study_id: &str, user_id: &str) -> Vec<String> {
    vec![app_id.to_owned(), study_id.to_owned(), user_id.to_owned()]
}

async fn load_schedule(
    state: &AppState,
    app_id: &str,
    study_id: &str,
) -> AppResult<Option<StudySchedule>> {
    state
        .cache
        .get(&CacheKey::document(
            SCHEDULE_MODEL,
            schedule_values(app_id, study_id),
        ))
        .await
}

async fn load_events(
    state: &AppState,
    app_id: &str,
    study_id: &str,
    user_id: &str,
) -> AppResult<Vec<StudyActivityEvent>> {
    let events: Option<Vec<StudyActivityEvent>> = state
        .cache
        .get(&CacheKey::document(
            ACTIVITY_EVENT_MODEL,
            event_values(app_id, study_id, user_id),
        ))
        .await?;
    Ok(events.unwrap_or_default())
}

async fn get_schedule(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(study_id): Path<String>,
) -> AppResult<Json<StudySchedule>> {
    load_schedule(&state, &session.app_id, &study_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Schedule"))
}

async fn put_schedule(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(study_id): Path<String>,
    Json(schedule): Json<serde_json::Value>,
) -> AppResult<Json<StudySchedule>> {
    let values = schedule_values(&session.app_id, &study_id);
    let modified_on = Utc::now().fixed_offset();
    let document = StudySchedule {
        study_id,
        schedule,
        modified_on,
    };

    // Document first, then its timestamp
    state
        .cache
        .set(
            &CacheKey::document(SCHEDULE_MODEL, values.clone()),
            &document,
            state.document_ttl,
        )
        .await?;
    state
        .timestamps
        .record(SCHEDULE_MODEL, values, modified_on)
        .await?;

    info!(app_id = %session.app_id, study_id = %document.study_id, "Schedule updated");
    Ok(Json(document))
}

async fn delete_schedule(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(study_id): Path<String>,
) -> AppResult<StatusCode> {
    let values = schedule_values(&session.app_id, &study_id);
    state
        .cache
        .invalidate(&CacheKey::document(SCHEDULE_MODEL, values.clone()))
        .await?;
    state.timestamps.clear(SCHEDULE_MODEL, values).await?;

    info!(app_id = %session.app_id, study_id = %study_id, "Schedule deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_timeline(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(study_id): Path<String>,
) -> AppResult<Json<Timeline>> {
    let schedule = load_schedule(&state, &session.app_id, &study_id).await?;
    let events = load_events(&state, &session.app_id, &study_id, &session.id).await?;
    Ok(Json(Timeline { schedule, events }))
}

async fn create_activity_event(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(study_id): Path<String>,
    Json(request): Json<ActivityEventRequest>,
) -> AppResult<(StatusCode, Json<StudyActivityEvent>)> {
    if request.event_id.trim().is_empty() {
        return Err(AppError::invalid_input("eventId is required"));
    }

    let created_on = Utc::now().fixed_offset();
    let event = StudyActivityEvent {
        event_id: request.event_id,
        timestamp: request.timestamp.unwrap_or(created_on),
        answer_value: request.answer_value,
        created_on,
    };

    let values = event_values(&session.app_id, &study_id, &session.id);
    let mut events = load_events(&state, &session.app_id, &study_id, &session.id).await?;
    events.push(event.clone());

    state
        .cache
        .set(
            &CacheKey::document(ACTIVITY_EVENT_MODEL, values.clone()),
            &events,
            state.document_ttl,
        )
        .await?;
    state
        .timestamps
        .record(ACTIVITY_EVENT_MODEL, values, created_on)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}
