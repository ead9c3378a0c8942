// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end workout flow: catalog → template → active workout → session.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use workout_tracker::db::ListQuery;
use workout_tracker::models::{ExercisePlanEntry, TrainingStats, WorkoutSession, WorkoutTemplate};
use workout_tracker::services::ActiveWorkout;

mod common;
use common::{body_json, create_test_app, json_request, object, test_store};

#[tokio::test]
async fn test_bench_press_session_round_trip() {
    let (store, _) = test_store();

    let exercise = store
        .exercises()
        .create(object(json!({
            "name": "Bench Press",
            "category": "strength",
            "muscle_group": "chest",
            "equipment": "barbell"
        })))
        .await
        .unwrap();
    let exercise_id = exercise.id().unwrap().to_string();

    // Template embeds a snapshot of the exercise with default sets
    let entry = ExercisePlanEntry::for_exercise(&exercise_id, "Bench Press");
    let template = store
        .workout_templates()
        .create(object(json!({
            "name": "Push Day",
            "exercises": [entry]
        })))
        .await
        .unwrap();
    let typed: WorkoutTemplate = template.to_typed().unwrap();
    assert_eq!(typed.exercises[0].set_count(), 3);

    let session = store
        .workout_sessions()
        .create(object(json!({
            "template_id": template.id().unwrap(),
            "template_name": "Push Day",
            "start_time": "2024-03-01T10:00:00.000Z",
            "end_time": "2024-03-01T10:45:00.000Z",
            "duration_seconds": 2700,
            "total_volume": 1350,
            "exercises": [{
                "exercise_id": exercise_id,
                "exercise_name": "Bench Press",
                "sets": [
                    {"reps": 10, "weight": 135, "completed": true},
                    {"reps": 8, "weight": 155, "completed": false}
                ]
            }]
        })))
        .await
        .unwrap();

    let newest = store
        .workout_sessions()
        .list(ListQuery::newest_first().limit(1))
        .await;
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0], session);
    assert_eq!(newest[0].get("total_volume"), Some(&json!(1350)));

    let typed: WorkoutSession = newest[0].to_typed().unwrap();
    assert_eq!(typed.total_volume, Some(1350.0));
    assert_eq!(typed.computed_volume(), 1350.0);
}

async fn edit_set(app: &axum::Router, uri: &str, body: serde_json::Value) -> ActiveWorkout {
    let response = app
        .clone()
        .oneshot(json_request("POST", uri, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_value(body_json(response).await).unwrap()
}

#[tokio::test]
async fn test_start_and_finish_workout_over_http() {
    let (app, state) = create_test_app();

    let template = state
        .store
        .workout_templates()
        .create(object(json!({
            "name": "Leg Day",
            "exercises": [
                {"exercise_id": "e1", "exercise_name": "Squat", "sets": 2},
                {"exercise_id": "e2", "exercise_name": "Leg Press"}
            ]
        })))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/workouts/start",
            Some(json!({"template_id": template.id().unwrap()})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let workout: ActiveWorkout = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(workout.template_name, "Leg Day");
    assert_eq!(workout.exercises[0].sets.len(), 2);
    assert_eq!(workout.exercises[1].sets.len(), 3);

    // Log weights, then tick off only the squat set
    let workout = edit_set(
        &app,
        "/api/workouts/sets",
        json!({"workout": workout, "exercise": 0, "set": 0, "reps": 5, "weight": 225.0}),
    )
    .await;
    let workout = edit_set(
        &app,
        "/api/workouts/sets",
        json!({"workout": workout, "exercise": 1, "set": 2, "reps": 12, "weight": 90.0}),
    )
    .await;
    let workout = edit_set(
        &app,
        "/api/workouts/sets/toggle",
        json!({"workout": workout, "exercise": 0, "set": 0}),
    )
    .await;
    assert!(workout.exercises[0].sets[0].completed);
    assert!(!workout.exercises[1].sets[2].completed);
    assert_eq!(workout.total_volume(), 1125.0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/workouts/finish",
            Some(json!({"workout": workout, "duration_seconds": 1800})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["total_volume"], json!(1125.0));
    assert_eq!(body["duration_seconds"], json!(1800));
    assert!(body["id"].is_string());

    let response = app
        .oneshot(json_request("GET", "/api/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats: TrainingStats = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.workouts_this_week, 1);
    assert_eq!(stats.completed_sets, 1);
    assert_eq!(stats.total_volume, 1125.0);
    assert_eq!(stats.average_duration_minutes, 30.0);
}

#[tokio::test]
async fn test_stats_with_extreme_durations() {
    let (app, state) = create_test_app();
    for _ in 0..2 {
        state
            .store
            .workout_sessions()
            .create(object(json!({"duration_seconds": u64::MAX, "total_volume": 10})))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(json_request("GET", "/api/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats: TrainingStats = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(stats.total_workouts, 2);
    assert_eq!(stats.total_duration_seconds, u64::MAX);
    assert_eq!(stats.total_volume, 20.0);
}

#[tokio::test]
async fn test_start_workout_with_unset_sets_uses_default() {
    let (app, state) = create_test_app();

    for sets in [json!(null), json!(0)] {
        let template = state
            .store
            .workout_templates()
            .create(object(json!({
                "name": "Cleared Input",
                "exercises": [{"exercise_id": "e1", "exercise_name": "Squat", "sets": sets}]
            })))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/workouts/start",
                Some(json!({"template_id": template.id().unwrap()})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let workout: ActiveWorkout = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(workout.exercises[0].sets.len(), 3);
    }
}

#[tokio::test]
async fn test_start_workout_with_oversized_plan_is_rejected() {
    let (app, state) = create_test_app();
    let template = state
        .store
        .workout_templates()
        .create(object(json!({
            "name": "Typo",
            "exercises": [{"exercise_id": "e1", "exercise_name": "Squat", "sets": 4294967295u64}]
        })))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/workouts/start",
            Some(json!({"template_id": template.id().unwrap()})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_missing_set_is_bad_request() {
    let (app, _) = create_test_app();
    let workout = json!({
        "template_id": "t1",
        "template_name": "Leg Day",
        "start_time": "2024-03-01T10:00:00.000Z",
        "exercises": [{
            "exercise_id": "e1",
            "exercise_name": "Squat",
            "sets": [{"reps": 0, "weight": 0.0, "completed": false}]
        }]
    });

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/workouts/sets/toggle",
            Some(json!({"workout": workout, "exercise": 0, "set": 4})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["details"], json!("No set 4 for exercise 0"));
}

#[tokio::test]
async fn test_start_workout_unknown_template() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/workouts/start",
            Some(json!({"template_id": "missing"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exercise_search() {
    let (app, state) = create_test_app();
    state.store.initialize().await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/exercises/search?q=press&muscle_group=chest",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let results = body.as_array().unwrap();
    assert!(!results.is_empty());
    for record in results {
        assert_eq!(record["muscle_group"], json!("chest"));
        assert!(record["name"]
            .as_str()
            .unwrap()
            .to_lowercase()
            .contains("press"));
    }

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/exercises/search?muscle_group=elbows",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_creates_all_persist() {
    let (store, _) = test_store();

    let handles: Vec<_> = (0..25)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .workout_sessions()
                    .create(object(json!({"template_name": format!("Run {}", i)})))
                    .await
            })
        })
        .collect();

    let results = futures_util::future::join_all(handles).await;
    for result in results {
        result.expect("task panicked").expect("create failed");
    }

    let sessions = store
        .workout_sessions()
        .list(ListQuery::unsorted())
        .await;
    assert_eq!(sessions.len(), 25);
}
