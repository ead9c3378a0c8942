// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Active workout flow: start from a template, log sets, finish into a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{Record, RecordStore};
use crate::error::AppError;
use crate::models::template::MAX_SETS;
use crate::models::{ExerciseLog, SetLog, WorkoutSession, WorkoutTemplate};
use crate::time_utils::{format_utc_rfc3339, parse_utc};

/// Errors raised while editing or finishing an active workout.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WorkoutError {
    #[error("No set {set} for exercise {exercise}")]
    SetOutOfRange { exercise: usize, set: usize },

    #[error("Invalid start time: {0}")]
    InvalidStartTime(String),

    #[error("Exercise {exercise} plans {sets} sets, at most {max} allowed")]
    TooManySets { exercise: String, sets: u32, max: u32 },
}

impl From<WorkoutError> for AppError {
    fn from(err: WorkoutError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// An in-progress, unsaved workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActiveWorkout {
    pub template_id: String,
    pub template_name: String,
    /// ISO 8601
    pub start_time: String,
    pub exercises: Vec<ExerciseLog>,
}

/// Partial edit of one set.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SetUpdate {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub completed: Option<bool>,
}

impl ActiveWorkout {
    /// Expand each plan entry into `sets` empty set logs.
    pub fn from_template(
        template_id: impl Into<String>,
        template: &WorkoutTemplate,
        start: DateTime<Utc>,
    ) -> Result<Self, WorkoutError> {
        let exercises = template
            .exercises
            .iter()
            .map(|entry| {
                let sets = entry.set_count();
                if sets > MAX_SETS {
                    return Err(WorkoutError::TooManySets {
                        exercise: entry.exercise_name.clone(),
                        sets,
                        max: MAX_SETS,
                    });
                }
                Ok(ExerciseLog {
                    exercise_id: entry.exercise_id.clone(),
                    exercise_name: entry.exercise_name.clone(),
                    sets: vec![SetLog::default(); sets as usize],
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            template_id: template_id.into(),
            template_name: template.name.clone(),
            start_time: format_utc_rfc3339(start),
            exercises,
        })
    }

    fn set_mut(&mut self, exercise: usize, set: usize) -> Result<&mut SetLog, WorkoutError> {
        self.exercises
            .get_mut(exercise)
            .and_then(|log| log.sets.get_mut(set))
            .ok_or(WorkoutError::SetOutOfRange { exercise, set })
    }

    /// Apply the fields present in `update` to one set.
    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        update: SetUpdate,
    ) -> Result<(), WorkoutError> {
        let target = self.set_mut(exercise, set)?;
        if let Some(reps) = update.reps {
            target.reps = reps;
        }
        if let Some(weight) = update.weight {
            target.weight = weight;
        }
        if let Some(completed) = update.completed {
            target.completed = completed;
        }
        Ok(())
    }

    /// Flip a set's completion flag, returning the new value.
    pub fn toggle_set(&mut self, exercise: usize, set: usize) -> Result<bool, WorkoutError> {
        let target = self.set_mut(exercise, set)?;
        target.completed = !target.completed;
        Ok(target.completed)
    }

    /// Σ reps × weight over completed sets.
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseLog::volume).sum()
    }

    /// Close the workout into a session record.
    ///
    /// `duration_seconds` defaults to the time elapsed since `start_time`;
    /// callers with a pausable timer pass their own value.
    pub fn finish(
        self,
        end: DateTime<Utc>,
        duration_seconds: Option<u64>,
    ) -> Result<WorkoutSession, WorkoutError> {
        let start = parse_utc(&self.start_time)
            .ok_or_else(|| WorkoutError::InvalidStartTime(self.start_time.clone()))?;
        let duration = duration_seconds
            .unwrap_or_else(|| (end - start).num_seconds().max(0) as u64);
        let total_volume = self.total_volume();

        Ok(WorkoutSession {
            template_id: Some(self.template_id),
            template_name: Some(self.template_name),
            start_time: Some(self.start_time),
            end_time: Some(format_utc_rfc3339(end)),
            duration_seconds: Some(duration),
            total_volume: Some(total_volume),
            exercises: self.exercises,
            ..Default::default()
        })
    }
}

/// Runs workouts against the record store.
#[derive(Clone)]
pub struct WorkoutService {
    store: RecordStore,
}

impl WorkoutService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Build an active workout from a stored template.
    pub async fn start(&self, template_id: &str) -> Result<ActiveWorkout, AppError> {
        let record = self.store.workout_templates().get(template_id).await?;
        let template: WorkoutTemplate = record.to_typed().map_err(|e| {
            AppError::BadRequest(format!("Template {} is malformed: {}", template_id, e))
        })?;

        let workout = ActiveWorkout::from_template(template_id, &template, Utc::now())?;
        tracing::info!(
            template_id,
            exercises = workout.exercises.len(),
            "Workout started"
        );
        Ok(workout)
    }

    /// Finish an active workout and store it as a session.
    pub async fn finish(
        &self,
        workout: ActiveWorkout,
        duration_seconds: Option<u64>,
    ) -> Result<Record, AppError> {
        let session = workout.finish(Utc::now(), duration_seconds)?;
        let fields = Record::from_serializable(&session)
            .map_err(|e| AppError::Internal(e.into()))?
            .into_fields();

        let record = self.store.workout_sessions().create(fields).await?;
        tracing::info!(
            id = ?record.id(),
            duration_seconds = ?session.duration_seconds,
            total_volume = ?session.total_volume,
            "Workout saved"
        );
        Ok(record)
    }
}
