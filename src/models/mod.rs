// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Typed views of stored records.

pub mod exercise;
pub mod session;
pub mod stats;
pub mod template;

pub use exercise::{Equipment, Exercise, ExerciseCategory, MuscleGroup};
pub use session::{ExerciseLog, SetLog, WorkoutSession};
pub use stats::TrainingStats;
pub use template::{ExercisePlanEntry, WorkoutTemplate};
