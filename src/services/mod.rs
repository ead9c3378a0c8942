// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod workout;

pub use catalog::ExerciseFilter;
pub use workout::{ActiveWorkout, SetUpdate, WorkoutError, WorkoutService};
