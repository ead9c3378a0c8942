// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-collection record store over a key/value text medium.
//!
//! Each collection lives under one storage key as a JSON array of records.
//! Every mutation is a full read-modify-write of that array, serialized by a
//! per-collection lock so concurrent writers never lose each other's
//! records. Collections lock and persist independently.
//!
//! Read faults (missing or corrupt text, unavailable medium) degrade to an
//! empty collection and are logged. Write faults are returned to the caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::db::collections;
use crate::db::medium::{MediumError, StorageMedium};
use crate::db::record::{fields, generate_id, Record};
use crate::db::seed;
use crate::time_utils::{format_utc_rfc3339, now_after};

/// Attempts at drawing an ID not already present in the collection.
const MAX_ID_ATTEMPTS: usize = 8;

/// Stored creation dates further ahead of the clock than this are not
/// used to order new records.
const MAX_CREATED_LEAD: Duration = Duration::seconds(1);

/// The sort value accepted by `list`.
pub const SORT_CREATED_DESC: &str = "-created_date";

// ─── Collection Kinds ────────────────────────────────────────

/// The three named collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Exercise,
    WorkoutTemplate,
    WorkoutSession,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Exercise,
        CollectionKind::WorkoutTemplate,
        CollectionKind::WorkoutSession,
    ];

    /// Storage key holding this collection.
    pub fn storage_key(self) -> &'static str {
        match self {
            CollectionKind::Exercise => collections::EXERCISES,
            CollectionKind::WorkoutTemplate => collections::WORKOUT_TEMPLATES,
            CollectionKind::WorkoutSession => collections::WORKOUT_SESSIONS,
        }
    }

    /// Entity name as used by API clients.
    pub fn entity_name(self) -> &'static str {
        match self {
            CollectionKind::Exercise => "Exercise",
            CollectionKind::WorkoutTemplate => "WorkoutTemplate",
            CollectionKind::WorkoutSession => "WorkoutSession",
        }
    }

    /// Human-readable name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            CollectionKind::Exercise => "Exercise",
            CollectionKind::WorkoutTemplate => "Workout template",
            CollectionKind::WorkoutSession => "Workout session",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

impl FromStr for CollectionKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.entity_name() == s)
            .ok_or_else(|| StoreError::UnknownCollection(s.to_string()))
    }
}

// ─── Errors ──────────────────────────────────────────────────

/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{} not found", .collection.display_name())]
    NotFound {
        collection: CollectionKind,
        id: String,
    },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Failed to persist {collection}: {source}")]
    StorageWrite {
        collection: CollectionKind,
        source: MediumError,
    },

    #[error("Failed to encode {collection}: {source}")]
    Encode {
        collection: CollectionKind,
        source: serde_json::Error,
    },

    #[error("Failed to generate a unique id for {0}")]
    IdGeneration(CollectionKind),
}

// ─── Queries ─────────────────────────────────────────────────

/// Ordering applied by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Storage order, untouched.
    Unsorted,
    /// Descending by parsed `created_date`; unparsable dates last.
    #[default]
    NewestFirst,
}

impl SortOrder {
    /// Only `-created_date` sorts; any other value leaves storage order.
    pub fn parse(raw: &str) -> Self {
        if raw == SORT_CREATED_DESC {
            SortOrder::NewestFirst
        } else {
            SortOrder::Unsorted
        }
    }
}

/// Parameters for `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: SortOrder,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn unsorted() -> Self {
        Self {
            sort: SortOrder::Unsorted,
            limit: None,
        }
    }

    pub fn newest_first() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Result of a delete; always reports success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub success: bool,
}

// ─── Collection ──────────────────────────────────────────────

/// Decoded collection contents with an id → position index.
struct Snapshot {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    fn new(records: Vec<Record>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if let Some(id) = record.id() {
                // First match wins, as with a linear scan
                index.entry(id.to_string()).or_insert(pos);
            }
        }
        Self { records, index }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

/// One named collection of records.
pub struct Collection {
    kind: CollectionKind,
    medium: Arc<dyn StorageMedium>,
    lock: Mutex<()>,
}

impl Collection {
    fn new(kind: CollectionKind, medium: Arc<dyn StorageMedium>) -> Self {
        Self {
            kind,
            medium,
            lock: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// List records, optionally sorted newest-first and truncated.
    pub async fn list(&self, query: ListQuery) -> Vec<Record> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await.records;

        if query.sort == SortOrder::NewestFirst {
            // Stable: equal timestamps keep storage order
            records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        }
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        records
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: &str) -> Result<Record, StoreError> {
        let _guard = self.lock.lock().await;
        let snapshot = self.load().await;
        snapshot
            .position(id)
            .map(|pos| snapshot.records[pos].clone())
            .ok_or_else(|| self.not_found(id))
    }

    /// Create a record from arbitrary fields.
    ///
    /// `id`, `created_date` and `updated_date` are assigned by the store and
    /// override any values in `data`.
    pub async fn create(&self, data: Map<String, Value>) -> Result<Record, StoreError> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await;

        // Strictly after recent records so creation order is total
        let now = Utc::now();
        let horizon = now + MAX_CREATED_LEAD;
        let latest = snapshot
            .records
            .iter()
            .filter_map(Record::created_at)
            .filter(|created| *created < horizon)
            .max();
        let now = match latest {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };
        let id = self.fresh_id(&snapshot, now)?;
        let stamp = format_utc_rfc3339(now);

        let mut record = Record::new(data);
        record.set(fields::ID, id.clone());
        record.set(fields::CREATED_DATE, stamp.clone());
        record.set(fields::UPDATED_DATE, stamp);

        snapshot.records.push(record.clone());
        self.persist(&snapshot.records).await?;

        tracing::debug!(collection = %self.kind, id = %id, "Record created");
        Ok(record)
    }

    /// Shallow-merge `data` into an existing record and refresh `updated_date`.
    ///
    /// Envelope fields in `data` are ignored. Nothing is written when the
    /// record does not exist.
    pub async fn update(
        &self,
        id: &str,
        mut data: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await;
        let pos = snapshot.position(id).ok_or_else(|| self.not_found(id))?;

        data.remove(fields::ID);
        data.remove(fields::CREATED_DATE);
        data.remove(fields::UPDATED_DATE);

        let record = &mut snapshot.records[pos];
        let previous = record.updated_at();
        record.merge(data);
        record.set(fields::UPDATED_DATE, format_utc_rfc3339(now_after(previous)));
        let updated = record.clone();

        self.persist(&snapshot.records).await?;

        tracing::debug!(collection = %self.kind, id = %id, "Record updated");
        Ok(updated)
    }

    /// Remove every record with `id`. Absent ids are not an error.
    pub async fn delete(&self, id: &str) -> Result<DeleteResult, StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await.records;
        let before = records.len();

        let remaining: Vec<Record> = records
            .into_iter()
            .filter(|record| record.id() != Some(id))
            .collect();
        self.persist(&remaining).await?;

        tracing::debug!(
            collection = %self.kind,
            id = %id,
            removed = before - remaining.len(),
            "Record deleted"
        );
        Ok(DeleteResult { success: true })
    }

    /// Write `seeds` as the collection contents if it is currently empty.
    ///
    /// Returns the number of records written. Seeds are stamped with
    /// decreasing timestamps so newest-first order matches seed order.
    pub(crate) async fn seed_if_empty(
        &self,
        seeds: Vec<Map<String, Value>>,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await;
        if !snapshot.records.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        for (offset, data) in seeds.into_iter().enumerate() {
            let id = self.fresh_id(&snapshot, now)?;
            let stamp = format_utc_rfc3339(now - Duration::microseconds(offset as i64));

            let mut record = Record::new(data);
            record.set(fields::ID, id.clone());
            record.set(fields::CREATED_DATE, stamp.clone());
            record.set(fields::UPDATED_DATE, stamp);

            snapshot.index.insert(id, snapshot.records.len());
            snapshot.records.push(record);
        }

        self.persist(&snapshot.records).await?;
        Ok(snapshot.records.len())
    }

    // ─── Helper Methods ──────────────────────────────────────

    fn not_found(&self, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: self.kind,
            id: id.to_string(),
        }
    }

    fn fresh_id(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_id(now).map_err(|_| StoreError::IdGeneration(self.kind))?;
            if snapshot.position(&id).is_none() {
                return Ok(id);
            }
            tracing::warn!(collection = %self.kind, id = %id, "Generated id collided, retrying");
        }
        Err(StoreError::IdGeneration(self.kind))
    }

    /// Read and decode the collection, substituting an empty one on any fault.
    async fn load(&self) -> Snapshot {
        let key = self.kind.storage_key();
        let medium = Arc::clone(&self.medium);
        let read = tokio::task::spawn_blocking(move || medium.get_item(key))
            .await
            .unwrap_or_else(|e| Err(MediumError::Unavailable(e.to_string())));

        let records = match read {
            Ok(Some(text)) if !text.trim().is_empty() => {
                match serde_json::from_str::<Vec<Record>>(&text) {
                    Ok(records) => records,
                    Err(e) => {
                        tracing::error!(
                            collection = %self.kind,
                            key,
                            error = %e,
                            "Stored collection is corrupt, using empty default"
                        );
                        Vec::new()
                    }
                }
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::error!(
                    collection = %self.kind,
                    key,
                    error = %e,
                    "Failed to read collection, using empty default"
                );
                Vec::new()
            }
        };
        Snapshot::new(records)
    }

    /// Serialize the whole collection and overwrite its storage key.
    async fn persist(&self, records: &[Record]) -> Result<(), StoreError> {
        let text = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            collection: self.kind,
            source,
        })?;

        // Medium I/O may block (file writes are synced)
        let key = self.kind.storage_key();
        let medium = Arc::clone(&self.medium);
        let written = tokio::task::spawn_blocking(move || medium.set_item(key, &text))
            .await
            .unwrap_or_else(|e| Err(MediumError::Unavailable(e.to_string())));

        written.map_err(|source| {
            tracing::error!(
                collection = %self.kind,
                error = %source,
                "Failed to persist collection"
            );
            StoreError::StorageWrite {
                collection: self.kind,
                source,
            }
        })
    }
}

// ─── Record Store ────────────────────────────────────────────

/// Options applied when opening a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Seed the exercise catalog when the collection is empty.
    pub seed_exercises: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_exercises: true,
        }
    }
}

/// Handle to the three collections. Cheap to clone.
#[derive(Clone)]
pub struct RecordStore {
    exercises: Arc<Collection>,
    workout_templates: Arc<Collection>,
    workout_sessions: Arc<Collection>,
}

impl RecordStore {
    /// Create a store over `medium` without running initialization.
    pub fn new(medium: Arc<dyn StorageMedium>) -> Self {
        Self {
            exercises: Arc::new(Collection::new(CollectionKind::Exercise, medium.clone())),
            workout_templates: Arc::new(Collection::new(
                CollectionKind::WorkoutTemplate,
                medium.clone(),
            )),
            workout_sessions: Arc::new(Collection::new(CollectionKind::WorkoutSession, medium)),
        }
    }

    /// Create a store and run initialization according to `options`.
    pub async fn open(
        medium: Arc<dyn StorageMedium>,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let store = Self::new(medium);
        if options.seed_exercises {
            store.initialize().await?;
        }
        Ok(store)
    }

    /// Seed the exercise catalog if, and only if, it is empty.
    ///
    /// Returns the number of exercises written (0 when already populated).
    pub async fn initialize(&self) -> Result<usize, StoreError> {
        let seeded = self
            .exercises
            .seed_if_empty(seed::exercise_catalog()?)
            .await?;
        if seeded > 0 {
            tracing::info!(count = seeded, "Seeded exercise catalog");
        } else {
            tracing::debug!("Exercise catalog already populated, skipping seed");
        }
        Ok(seeded)
    }

    pub fn collection(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::Exercise => &self.exercises,
            CollectionKind::WorkoutTemplate => &self.workout_templates,
            CollectionKind::WorkoutSession => &self.workout_sessions,
        }
    }

    pub fn exercises(&self) -> &Collection {
        &self.exercises
    }

    pub fn workout_templates(&self) -> &Collection {
        &self.workout_templates
    }

    pub fn workout_sessions(&self) -> &Collection {
        &self.workout_sessions
    }
}
