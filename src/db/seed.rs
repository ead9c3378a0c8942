// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Built-in exercise catalog written on first start.

use serde_json::{Map, Value};

use crate::db::record::Record;
use crate::db::store::{CollectionKind, StoreError};
use crate::models::{Equipment, Exercise, ExerciseCategory, MuscleGroup};

fn exercise(
    name: &str,
    category: ExerciseCategory,
    muscle_group: MuscleGroup,
    equipment: Equipment,
    description: &str,
) -> Exercise {
    Exercise {
        category: Some(category),
        muscle_group: Some(muscle_group),
        equipment: Some(equipment),
        description: Some(description.to_string()),
        ..Exercise::named(name)
    }
}

/// Catalog exercises. Covers every muscle group and equipment kind.
pub fn default_exercises() -> Vec<Exercise> {
    use Equipment as E;
    use ExerciseCategory as C;
    use MuscleGroup as M;

    vec![
        exercise("Bench Press", C::Strength, M::Chest, E::Barbell, "Classic chest exercise"),
        exercise("Squat", C::Strength, M::Legs, E::Barbell, "Compound leg exercise"),
        exercise("Deadlift", C::Strength, M::Back, E::Barbell, "Full body compound movement"),
        exercise("Overhead Press", C::Strength, M::Shoulders, E::Barbell, "Standing barbell press"),
        exercise("Pull-Up", C::Strength, M::Back, E::Bodyweight, "Vertical pull from a dead hang"),
        exercise("Dumbbell Curl", C::Strength, M::Arms, E::Dumbbell, "Dumbbell elbow flexion"),
        exercise("Tricep Pushdown", C::Strength, M::Arms, E::Cable, "Cable elbow extension"),
        exercise("Leg Press", C::Strength, M::Legs, E::Machine, "Machine-guided leg drive"),
        exercise("Band Pull-Apart", C::Strength, M::Shoulders, E::Bands, "Rear delts, upper back"),
        exercise("Plank", C::Strength, M::Core, E::Bodyweight, "Isometric core hold"),
        exercise("Kettlebell Swing", C::Strength, M::FullBody, E::Other, "Explosive hip hinge"),
        exercise("Rowing Machine", C::Cardio, M::Cardio, E::Machine, "Steady-state conditioning"),
        exercise("Hamstring Stretch", C::Flexibility, M::Legs, E::Bodyweight, "Forward fold"),
    ]
}

/// Catalog as raw record fields, ready for the store.
pub fn exercise_catalog() -> Result<Vec<Map<String, Value>>, StoreError> {
    default_exercises()
        .iter()
        .map(|exercise| {
            Record::from_serializable(exercise)
                .map(Record::into_fields)
                .map_err(|source| StoreError::Encode {
                    collection: CollectionKind::Exercise,
                    source,
                })
        })
        .collect()
}
