use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::fetch_all,
    crate::api::payloads::NewSubmission,
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Order, Query},
};

use crate::types::Uuid;

/// A participant's record of doing a workout on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("submission"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Submission {
    pub submission_id: Uuid,
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
    pub reps_completed: Option<u32>,
    /// Seconds
    pub duration_taken: Option<u32>,
    pub proof_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Submission {
    pub fn fetch_for_user(
        conn: &Connection,
        workout_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Vec<Submission>, rusqlite::Error> {
        let select = Query::select()
            .column(Asterisk)
            .from(SubmissionIden::Table)
            .and_where(Expr::col(SubmissionIden::WorkoutId).eq(workout_id))
            .and_where(Expr::col(SubmissionIden::UserId).eq(user_id))
            .order_by(SubmissionIden::Date, Order::Asc)
            .to_owned();
        fetch_all(conn, &select, Submission::from_row)
    }

    pub fn create(
        conn: &Connection,
        workout_id: &Uuid,
        user_id: &Uuid,
        new: &NewSubmission,
    ) -> Result<Submission, rusqlite::Error> {
        let now = Utc::now();
        let submission = Submission {
            submission_id: Uuid::new_v4(),
            workout_id: *workout_id,
            user_id: *user_id,
            date: new.date,
            completed: new.completed,
            reps_completed: new.reps_completed,
            duration_taken: new.duration_taken,
            proof_url: new.proof_url.clone(),
            created_at: now,
            updated_at: now,
        };
        submission.insert(conn)?;
        Ok(submission)
    }
}
