use axum::{
    extract::FromRef,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{RowContext, ServerError},
        payloads::{ExerciseRef, MessageResponse, NewChallengeWorkout, NewWorkout, UpdateWorkout},
        Object,
    },
    bad_request_error,
    model::{Challenge, Exercise, Sequence, ValidateModel, Workout},
    types::Uuid,
};
use tracing::{debug, instrument};

use crate::{db::DatabaseConnection, JsonBody, PathParams, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(Object::ChallengeWorkouts.path(), post(create_challenge_workout))
        .route(Object::Workouts.path(), get(list_workouts).post(create_workouts))
        .route(
            Object::Workout.path(),
            get(fetch_workout).put(update_workout).delete(delete_workout),
        )
}

/// Resolve a workout's exercise against the loaded catalog
pub fn resolve_exercise(
    catalog: &[Exercise],
    exercise: Option<ExerciseRef<'_>>,
) -> Result<Uuid, ServerError> {
    match exercise {
        Some(ExerciseRef::Id(id)) => catalog
            .iter()
            .find(|e| &e.exercise_id == id)
            .map(|e| e.exercise_id)
            .ok_or_else(|| bad_request_error!("Invalid exercise id")),
        Some(ExerciseRef::Name(name)) => {
            let found = Exercise::find_by_name(catalog, name).map(|e| e.exercise_id);
            if found.is_none() {
                debug!(name, catalog = catalog.len(), "Exercise name not in catalog");
            }
            found.ok_or_else(|| bad_request_error!("Invalid exercise name"))
        },
        None => Err(bad_request_error!("exercise_id or exercise_name is required")),
    }
}

/// Add a workout to one of the challenge's sequences, naming the exercise
#[instrument(skip(conn))]
pub async fn create_challenge_workout(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams(id): PathParams<Uuid>,
    JsonBody(new): JsonBody<NewChallengeWorkout>,
) -> Result<(StatusCode, Json<Workout>), ServerError> {
    new.validate()?;
    let workout = conn
        .interact(move |conn| {
            Challenge::fetch_by_id(conn, &id).or_not_found("Challenge")?;
            Sequence::fetch_in_challenge(conn, &id, &new.sequence_id).or_not_found("Sequence")?;

            let catalog = Exercise::fetch_all(conn)?;
            let exercise_id = resolve_exercise(&catalog, new.workout.exercise_ref())?;

            Ok::<_, ServerError>(Workout::create(
                conn,
                &new.sequence_id,
                &exercise_id,
                &new.workout,
            )?)
        })
        .await??;
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip(conn))]
pub async fn list_workouts(
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<Vec<Workout>>, ServerError> {
    let workouts = conn
        .interact(move |conn| {
            Sequence::fetch_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")?;
            Ok::<_, ServerError>(Workout::fetch_by_sequence(conn, &sequence_id)?)
        })
        .await??;
    Ok(Json(workouts))
}

/// Bulk create. Workouts without a `workout_order` are appended in body order
#[instrument(skip(conn, new))]
pub async fn create_workouts(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id)): PathParams<(Uuid, Uuid)>,
    JsonBody(new): JsonBody<Vec<NewWorkout>>,
) -> Result<(StatusCode, Json<Vec<Workout>>), ServerError> {
    new.validate()?;
    let workouts = conn
        .interact(move |conn| {
            let tx = conn.transaction()?;
            Sequence::fetch_in_challenge(&tx, &id, &sequence_id).or_not_found("Sequence")?;

            let catalog = Exercise::fetch_all(&tx)?;
            let workouts = new
                .iter()
                .map(|workout| -> Result<Workout, ServerError> {
                    let exercise_id = resolve_exercise(&catalog, workout.exercise_ref())?;
                    Ok(Workout::create(&tx, &sequence_id, &exercise_id, workout)?)
                })
                .collect::<Result<Vec<_>, _>>()?;

            tx.commit()?;
            Ok::<_, ServerError>(workouts)
        })
        .await??;
    Ok((StatusCode::CREATED, Json(workouts)))
}

#[instrument(skip(conn))]
pub async fn fetch_workout(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id, workout_id)): PathParams<(Uuid, Uuid, Uuid)>,
) -> Result<Json<Workout>, ServerError> {
    let workout = conn
        .interact(move |conn| {
            Sequence::fetch_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")?;
            Workout::fetch_in_sequence(conn, &sequence_id, &workout_id).or_not_found("Workout")
        })
        .await??;
    Ok(Json(workout))
}

#[instrument(skip(conn))]
pub async fn update_workout(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id, workout_id)): PathParams<(Uuid, Uuid, Uuid)>,
    JsonBody(update): JsonBody<UpdateWorkout>,
) -> Result<Json<Workout>, ServerError> {
    update.validate()?;
    let workout = conn
        .interact(move |conn| {
            Sequence::fetch_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")?;
            let mut workout = Workout::fetch_in_sequence(conn, &sequence_id, &workout_id)
                .or_not_found("Workout")?;
            if update.is_empty() {
                return Ok(workout);
            }

            if let Some(exercise) = update.exercise_ref() {
                let catalog = Exercise::fetch_all(conn)?;
                workout.exercise_id = resolve_exercise(&catalog, Some(exercise))?;
            }
            update.apply_to(&mut workout);
            workout.save(conn)?;
            Ok::<_, ServerError>(workout)
        })
        .await??;
    Ok(Json(workout))
}

#[instrument(skip(conn))]
pub async fn delete_workout(
    _user: UserState,
    DatabaseConnection(conn): DatabaseConnection,
    PathParams((id, sequence_id, workout_id)): PathParams<(Uuid, Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ServerError> {
    conn.interact(move |conn| {
        Sequence::fetch_in_challenge(conn, &id, &sequence_id).or_not_found("Sequence")?;
        Workout::delete_in_sequence(conn, &sequence_id, &workout_id).or_not_found("Workout")
    })
    .await??;
    Ok(Json(MessageResponse::new("Workout deleted")))
}

#[cfg(test)]
mod test {
    use super::*;

    fn catalog() -> Vec<Exercise> {
        vec![Exercise { exercise_id: Uuid::new_v4(), name: "Plank".to_owned(), description: None }]
    }

    #[test]
    fn test_resolve_by_name_and_id() {
        let catalog = catalog();
        let id = catalog[0].exercise_id;
        assert_eq!(resolve_exercise(&catalog, Some(ExerciseRef::Name("Plank"))).unwrap(), id);
        assert_eq!(resolve_exercise(&catalog, Some(ExerciseRef::Id(&id))).unwrap(), id);
    }

    #[test]
    fn test_unknown_exercise_is_bad_request() {
        let err = resolve_exercise(&catalog(), Some(ExerciseRef::Name("Handstand"))).unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid exercise name");

        // Names are matched exactly
        let err = resolve_exercise(&catalog(), Some(ExerciseRef::Name(" plank "))).unwrap_err();
        assert_eq!(err.message, "Invalid exercise name");

        let err = resolve_exercise(&catalog(), None).unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
    }
}
