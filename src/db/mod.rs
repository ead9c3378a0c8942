// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (embedded record store).

pub mod medium;
pub mod record;
pub mod seed;
pub mod store;

pub use medium::{FileMedium, MediumError, MemoryMedium, StorageMedium};
pub use record::Record;
pub use store::{
    Collection, CollectionKind, DeleteResult, ListQuery, RecordStore, SortOrder, StoreError,
    StoreOptions,
};

/// Storage keys, one per collection.
pub mod collections {
    pub const EXERCISES: &str = "app_exercises";
    pub const WORKOUT_TEMPLATES: &str = "app_workout_templates";
    pub const WORKOUT_SESSIONS: &str = "app_workout_sessions";
}
