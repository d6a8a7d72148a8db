use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::{delete, expect_rows, fetch_all, fetch_one, update},
    crate::api::payloads::NewWorkout,
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{
        enum_def, Asterisk, Expr, Func, Order, Query, SelectStatement, SqliteQueryBuilder,
    },
    sea_query_rusqlite::RusqliteBinder,
};

use crate::types::Uuid;

/// One exercise instruction within a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Workout {
    pub workout_id: Uuid,
    pub sequence_id: Uuid,
    pub exercise_id: Uuid,
    pub reps: u32,
    /// Seconds
    pub duration: Option<u32>,
    /// Seconds
    pub pause_duration: Option<u32>,
    /// 1 based position within the sequence
    pub workout_order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Workout {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(WorkoutIden::Table).to_owned()
    }

    pub fn fetch_in_sequence(
        conn: &Connection,
        sequence_id: &Uuid,
        id: &Uuid,
    ) -> Result<Workout, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(WorkoutIden::WorkoutId).eq(id))
            .and_where(Expr::col(WorkoutIden::SequenceId).eq(sequence_id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Workout::from_row)
    }

    /// Workouts of a sequence in the order they should be performed
    pub fn fetch_by_sequence(
        conn: &Connection,
        sequence_id: &Uuid,
    ) -> Result<Vec<Workout>, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(WorkoutIden::SequenceId).eq(sequence_id))
            .order_by(WorkoutIden::WorkoutOrder, Order::Asc)
            .order_by(WorkoutIden::CreatedAt, Order::Asc)
            .to_owned();
        fetch_all(conn, &select, Workout::from_row)
    }

    /// Position a workout appended to the sequence would get
    pub fn next_order(conn: &Connection, sequence_id: &Uuid) -> Result<u32, rusqlite::Error> {
        let (sql, values) = Query::select()
            .expr(Func::max(Expr::col(WorkoutIden::WorkoutOrder)))
            .from(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::SequenceId).eq(sequence_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let max: Option<u32> = stmt.query_row(&*values.as_params(), |row| row.get(0))?;
        Ok(max.unwrap_or(0) + 1)
    }

    /// Insert a workout whose exercise has already been resolved against the
    /// catalog
    pub fn create(
        conn: &Connection,
        sequence_id: &Uuid,
        exercise_id: &Uuid,
        new: &NewWorkout,
    ) -> Result<Workout, rusqlite::Error> {
        let workout_order = match new.workout_order {
            Some(order) => order,
            None => Self::next_order(conn, sequence_id)?,
        };
        let now = Utc::now();
        let workout = Workout {
            workout_id: Uuid::new_v4(),
            sequence_id: *sequence_id,
            exercise_id: *exercise_id,
            reps: new.reps,
            duration: new.duration,
            pause_duration: new.pause_duration,
            workout_order,
            created_at: now,
            updated_at: now,
        };
        workout.insert(conn)?;
        Ok(workout)
    }

    pub fn save(&mut self, conn: &Connection) -> Result<(), rusqlite::Error> {
        self.updated_at = Utc::now();
        let stmt = Query::update()
            .table(WorkoutIden::Table)
            .value(WorkoutIden::ExerciseId, &self.exercise_id)
            .value(WorkoutIden::Reps, self.reps)
            .value(WorkoutIden::Duration, self.duration)
            .value(WorkoutIden::PauseDuration, self.pause_duration)
            .value(WorkoutIden::WorkoutOrder, self.workout_order)
            .value(WorkoutIden::UpdatedAt, self.updated_at)
            .and_where(Expr::col(WorkoutIden::WorkoutId).eq(&self.workout_id))
            .to_owned();
        expect_rows(update(conn, &stmt)?)
    }

    pub fn delete_in_sequence(
        conn: &Connection,
        sequence_id: &Uuid,
        id: &Uuid,
    ) -> Result<(), rusqlite::Error> {
        let stmt = Query::delete()
            .from_table(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::WorkoutId).eq(id))
            .and_where(Expr::col(WorkoutIden::SequenceId).eq(sequence_id))
            .to_owned();
        expect_rows(delete(conn, &stmt)?)
    }
}
