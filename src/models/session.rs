// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout session model (completed workout history).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One logged set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SetLog {
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub completed: bool,
}

impl SetLog {
    /// Reps × weight for a completed set, zero otherwise.
    pub fn volume(&self) -> f64 {
        if self.completed {
            self.reps as f64 * self.weight
        } else {
            0.0
        }
    }
}

/// Sets logged for one exercise during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseLog {
    #[serde(default)]
    pub exercise_id: String,
    #[serde(default)]
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Vec<SetLog>,
}

impl ExerciseLog {
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|set| set.completed).count()
    }

    pub fn volume(&self) -> f64 {
        self.sets.iter().map(SetLog::volume).sum()
    }
}

/// Workout session record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    /// ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub duration_seconds: Option<u64>,
    /// Stored as supplied; never recomputed by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
}

impl WorkoutSession {
    pub fn completed_sets(&self) -> usize {
        self.exercises.iter().map(ExerciseLog::completed_sets).sum()
    }

    /// Volume computed from the set logs.
    pub fn computed_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseLog::volume).sum()
    }
}
