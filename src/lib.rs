// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: exercises, workout templates and session history
//!
//! This crate provides an embedded record store over a key/value text
//! medium and a local JSON API for a browser front end.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RecordStore;
use services::WorkoutService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
    pub workout_service: WorkoutService,
}

impl AppState {
    pub fn new(config: Config, store: RecordStore) -> Self {
        let workout_service = WorkoutService::new(store.clone());
        Self {
            config,
            store,
            workout_service,
        }
    }
}
