// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog filtering.

use crate::db::Record;
use crate::models::MuscleGroup;

/// Name search plus optional muscle-group filter.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    search: Option<String>,
    muscle_group: Option<MuscleGroup>,
}

impl ExerciseFilter {
    pub fn new(search: Option<&str>, muscle_group: Option<MuscleGroup>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self {
            search,
            muscle_group,
        }
    }

    /// Case-insensitive substring match on `name`, equality on `muscle_group`.
    pub fn matches(&self, record: &Record) -> bool {
        let name_matches = match &self.search {
            Some(needle) => record
                .get_str("name")
                .is_some_and(|name| name.to_lowercase().contains(needle)),
            None => true,
        };
        let group_matches = match self.muscle_group {
            Some(group) => record.get_str("muscle_group") == Some(group.as_str()),
            None => true,
        };
        name_matches && group_matches
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
