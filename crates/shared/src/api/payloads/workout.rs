use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{ensure_min, Workout, ValidateModel},
    types::Uuid,
};

/// Which catalog exercise a workout refers to. The catalog is looked up by
/// name when no id is given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseRef<'a> {
    Id(&'a Uuid),
    Name(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    pub reps: u32,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub pause_duration: Option<u32>,
    /// 1 based position within the sequence. Appended after the existing
    /// workouts when missing
    #[serde(default)]
    pub workout_order: Option<u32>,
}

impl NewWorkout {
    pub fn exercise_ref(&self) -> Option<ExerciseRef<'_>> {
        match (&self.exercise_id, &self.exercise_name) {
            (Some(id), _) => Some(ExerciseRef::Id(id)),
            (None, Some(name)) => Some(ExerciseRef::Name(name)),
            (None, None) => None,
        }
    }
}

/// Body of `POST /api/challenges/:id/workouts`, which names the sequence in
/// the body rather than the path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChallengeWorkout {
    pub sequence_id: Uuid,
    #[serde(flatten)]
    pub workout: NewWorkout,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub duration: Option<Option<u32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub pause_duration: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_order: Option<u32>,
}

impl UpdateWorkout {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn exercise_ref(&self) -> Option<ExerciseRef<'_>> {
        match (&self.exercise_id, &self.exercise_name) {
            (Some(id), _) => Some(ExerciseRef::Id(id)),
            (None, Some(name)) => Some(ExerciseRef::Name(name)),
            (None, None) => None,
        }
    }

    /// Apply everything except the exercise reference, which has to be
    /// resolved against the catalog first
    pub fn apply_to(&self, workout: &mut Workout) {
        if let Some(reps) = self.reps {
            workout.reps = reps;
        }
        if let Some(duration) = self.duration {
            workout.duration = duration;
        }
        if let Some(pause_duration) = self.pause_duration {
            workout.pause_duration = pause_duration;
        }
        if let Some(workout_order) = self.workout_order {
            workout.workout_order = workout_order;
        }
    }
}

fn validate_numbers(reps: Option<u32>, workout_order: Option<u32>) -> Result<(), ValidationError> {
    ValidationError::collect([
        reps.map_or(Ok(()), |r| ensure_min("reps", r, 1)),
        workout_order.map_or(Ok(()), |o| ensure_min("workout_order", o, 1)),
    ])
}

impl ValidateModel for NewWorkout {
    fn validate(&self) -> Result<(), ValidationError> {
        let exercise = match self.exercise_ref() {
            Some(_) => Ok(()),
            None => Err(ValidationError::new("exercise_id or exercise_name is required")),
        };
        ValidationError::collect([exercise, validate_numbers(Some(self.reps), self.workout_order)])
    }
}

impl ValidateModel for NewChallengeWorkout {
    fn validate(&self) -> Result<(), ValidationError> {
        self.workout.validate()
    }
}

impl ValidateModel for UpdateWorkout {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_numbers(self.reps, self.workout_order)
    }
}

/// Rewrite `workout_order` so it matches each workout's position in the slice
pub fn renumber_workouts(workouts: &mut [NewWorkout]) {
    for (i, workout) in workouts.iter_mut().enumerate() {
        workout.workout_order = Some(i as u32 + 1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exercise_id_wins_over_name() {
        let id = Uuid::new_v4();
        let workout = NewWorkout {
            exercise_id: Some(id),
            exercise_name: Some("Squat".to_owned()),
            reps: 5,
            ..Default::default()
        };
        assert_eq!(workout.exercise_ref(), Some(ExerciseRef::Id(&id)));
    }

    #[test]
    fn test_workout_needs_exercise_and_reps() {
        let workout = NewWorkout { reps: 0, ..Default::default() };
        let err = workout.validate().unwrap_err();
        assert_eq!(err.error_messages.len(), 2);
    }

    #[test]
    fn test_renumber_workouts() {
        let mut workouts = vec![
            NewWorkout { workout_order: Some(7), ..Default::default() },
            NewWorkout { workout_order: None, ..Default::default() },
        ];
        renumber_workouts(&mut workouts);
        assert_eq!(workouts[0].workout_order, Some(1));
        assert_eq!(workouts[1].workout_order, Some(2));
    }

    #[test]
    fn test_challenge_workout_flattens() {
        let json = r#"{"sequence_id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "exercise_name": "Lunge", "reps": 12}"#;
        let body: NewChallengeWorkout = serde_json::from_str(json).unwrap();
        assert_eq!(body.workout.exercise_ref(), Some(ExerciseRef::Name("Lunge")));
    }
}
