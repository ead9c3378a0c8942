// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout flow, catalog search and statistics routes.

use crate::db::{ListQuery, Record};
use crate::error::{AppError, Result};
use crate::models::{MuscleGroup, TrainingStats};
use crate::services::{ActiveWorkout, ExerciseFilter, SetUpdate};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises/search", get(search_exercises))
        .route("/api/workouts/start", post(start_workout))
        .route("/api/workouts/sets", post(update_set))
        .route("/api/workouts/sets/toggle", post(toggle_set))
        .route("/api/workouts/finish", post(finish_workout))
        .route("/api/stats", get(get_stats))
}

// ─── Exercise Catalog ────────────────────────────────────────

#[derive(Deserialize)]
struct SearchParams {
    /// Name substring (case-insensitive)
    q: Option<String>,
    /// Muscle group, or "all"
    muscle_group: Option<String>,
}

fn parse_muscle_group(raw: Option<&str>) -> Result<Option<MuscleGroup>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value
            .parse::<MuscleGroup>()
            .map(Some)
            .map_err(AppError::BadRequest),
    }
}

/// Filter the exercise catalog, newest first.
async fn search_exercises(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Record>>> {
    let muscle_group = parse_muscle_group(params.muscle_group.as_deref())?;
    let filter = ExerciseFilter::new(params.q.as_deref(), muscle_group);

    let exercises = state
        .store
        .exercises()
        .list(ListQuery::newest_first())
        .await;
    Ok(Json(filter.apply(exercises)))
}

// ─── Active Workouts ─────────────────────────────────────────

#[derive(Deserialize)]
struct StartWorkoutRequest {
    template_id: String,
}

async fn start_workout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartWorkoutRequest>,
) -> Result<Json<ActiveWorkout>> {
    let workout = state.workout_service.start(&request.template_id).await?;
    Ok(Json(workout))
}

/// Identifies one set in a client-held active workout.
#[derive(Deserialize)]
struct SetRequest {
    workout: ActiveWorkout,
    exercise: usize,
    set: usize,
    #[serde(flatten)]
    update: SetUpdate,
}

/// Apply reps/weight/completed edits to one set and return the workout.
async fn update_set(Json(request): Json<SetRequest>) -> Result<Json<ActiveWorkout>> {
    let mut workout = request.workout;
    workout.update_set(request.exercise, request.set, request.update)?;
    Ok(Json(workout))
}

/// Flip one set's completion flag and return the workout.
async fn toggle_set(Json(request): Json<SetRequest>) -> Result<Json<ActiveWorkout>> {
    let mut workout = request.workout;
    workout.toggle_set(request.exercise, request.set)?;
    Ok(Json(workout))
}

#[derive(Deserialize)]
struct FinishWorkoutRequest {
    workout: ActiveWorkout,
    /// Elapsed timer value; defaults to time since `start_time`
    duration_seconds: Option<u64>,
}

async fn finish_workout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FinishWorkoutRequest>,
) -> Result<(StatusCode, Json<Record>)> {
    let record = state
        .workout_service
        .finish(request.workout, request.duration_seconds)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// ─── Statistics ──────────────────────────────────────────────

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<TrainingStats>> {
    let sessions = state
        .store
        .workout_sessions()
        .list(ListQuery::unsorted())
        .await;
    Ok(Json(TrainingStats::from_records(
        &sessions,
        chrono::Utc::now(),
    )))
}
