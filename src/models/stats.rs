// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training statistics aggregated from workout history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::Record;
use crate::models::WorkoutSession;
use crate::time_utils::parse_utc;

/// Window counted as "this week".
const RECENT_WINDOW_DAYS: i64 = 7;

/// Aggregates shown on the dashboard and history views.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingStats {
    // ─── Counts ──────────────────────────────────────────────────
    /// Total sessions recorded
    pub total_workouts: u32,
    /// Sessions created in the last 7 days
    pub workouts_this_week: u32,
    /// Completed sets across all sessions
    pub completed_sets: u32,

    // ─── Totals ──────────────────────────────────────────────────
    /// Sum of stored `total_volume` values
    pub total_volume: f64,
    /// Sum of `duration_seconds`
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration_seconds: u64,
    /// Mean session duration in minutes (0 with no sessions)
    pub average_duration_minutes: f64,
}

impl TrainingStats {
    /// Fold one session into the totals. Call [`Self::finalize`] afterwards.
    pub fn add_session(&mut self, session: &WorkoutSession, now: DateTime<Utc>) {
        // Stored values are unchecked; counters saturate instead of overflowing
        let completed = u32::try_from(session.completed_sets()).unwrap_or(u32::MAX);
        self.total_workouts = self.total_workouts.saturating_add(1);
        self.completed_sets = self.completed_sets.saturating_add(completed);
        self.total_volume += session.total_volume.unwrap_or(0.0);
        self.total_duration_seconds = self
            .total_duration_seconds
            .saturating_add(session.duration_seconds.unwrap_or(0));

        let recent = session
            .created_date
            .as_deref()
            .and_then(parse_utc)
            .is_some_and(|created| created >= now - Duration::days(RECENT_WINDOW_DAYS));
        if recent {
            self.workouts_this_week = self.workouts_this_week.saturating_add(1);
        }
    }

    /// Recompute derived averages.
    pub fn finalize(&mut self) {
        self.average_duration_minutes = if self.total_workouts > 0 {
            self.total_duration_seconds as f64 / self.total_workouts as f64 / 60.0
        } else {
            0.0
        };
    }

    pub fn from_sessions<'a>(
        sessions: impl IntoIterator<Item = &'a WorkoutSession>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut stats = Self::default();
        for session in sessions {
            stats.add_session(session, now);
        }
        stats.finalize();
        stats
    }

    /// Aggregate raw session records, skipping any that do not decode.
    pub fn from_records(records: &[Record], now: DateTime<Utc>) -> Self {
        let sessions: Vec<WorkoutSession> = records
            .iter()
            .filter_map(|record| match record.to_typed::<WorkoutSession>() {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(
                        id = ?record.id(),
                        error = %e,
                        "Skipping undecodable workout session"
                    );
                    None
                }
            })
            .collect();
        Self::from_sessions(&sessions, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseLog, SetLog};
    use crate::time_utils::format_utc_rfc3339;
    use serde_json::json;

    fn session(days_ago: i64, duration: u64, volume: f64, now: DateTime<Utc>) -> WorkoutSession {
        WorkoutSession {
            duration_seconds: Some(duration),
            total_volume: Some(volume),
            exercises: vec![ExerciseLog {
                exercise_id: "e1".to_string(),
                exercise_name: "Squat".to_string(),
                sets: vec![
                    SetLog {
                        reps: 5,
                        weight: 100.0,
                        completed: true,
                    },
                    SetLog::default(),
                ],
            }],
            created_date: Some(format_utc_rfc3339(now - Duration::days(days_ago))),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = TrainingStats::from_sessions(&Vec::<WorkoutSession>::new(), Utc::now());
        assert_eq!(stats, TrainingStats::default());
    }

    #[test]
    fn test_aggregates() {
        let now = Utc::now();
        let sessions = [
            session(1, 3600, 1000.0, now),
            session(3, 1800, 500.0, now),
            session(30, 2700, 250.0, now),
        ];

        let stats = TrainingStats::from_sessions(&sessions, now);

        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.workouts_this_week, 2);
        assert_eq!(stats.completed_sets, 3);
        assert_eq!(stats.total_volume, 1750.0);
        assert_eq!(stats.total_duration_seconds, 8100);
        assert_eq!(stats.average_duration_minutes, 45.0);
    }

    #[test]
    fn test_from_records_skips_undecodable() {
        let good: Record = serde_json::from_value(json!({"total_volume": 100})).unwrap();
        let bad: Record =
            serde_json::from_value(json!({"id": "x", "duration_seconds": "long"})).unwrap();

        let stats = TrainingStats::from_records(&[good, bad], Utc::now());
        assert_eq!(stats.total_workouts, 1);
        assert_eq!(stats.total_volume, 100.0);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let now = Utc::now();
        let sessions = [
            session(1, u64::MAX, 0.0, now),
            session(2, u64::MAX, 0.0, now),
        ];

        let stats = TrainingStats::from_sessions(&sessions, now);
        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.total_duration_seconds, u64::MAX);
        assert!(stats.average_duration_minutes.is_finite());
    }
}
