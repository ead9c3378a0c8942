// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout template model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Sets used when a plan entry does not specify any.
pub const DEFAULT_SETS: u32 = 3;
/// Upper bound on sets expanded for one plan entry.
pub const MAX_SETS: u32 = 100;
/// Reps suggested for a freshly added plan entry.
pub const DEFAULT_REPS: u32 = 10;
/// Rest suggested for a freshly added plan entry.
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Snapshot of an exercise embedded in a template.
///
/// Holds a copy of the exercise's id and name, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExercisePlanEntry {
    pub exercise_id: String,
    pub exercise_name: String,
    /// Missing, null and 0 all mean [`DEFAULT_SETS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExercisePlanEntry {
    /// Entry with the defaults offered when adding an exercise to a template.
    pub fn for_exercise(exercise_id: impl Into<String>, exercise_name: impl Into<String>) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            exercise_name: exercise_name.into(),
            sets: Some(DEFAULT_SETS),
            reps: Some(DEFAULT_REPS),
            rest_seconds: Some(DEFAULT_REST_SECONDS),
            notes: Some(String::new()),
        }
    }

    /// Number of sets to log, with unset or zero falling back to the default.
    pub fn set_count(&self) -> u32 {
        match self.sets {
            None | Some(0) => DEFAULT_SETS,
            Some(n) => n,
        }
    }
}

/// Workout template record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,
    /// Ordered plan entries
    #[serde(default)]
    pub exercises: Vec<ExercisePlanEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
}
