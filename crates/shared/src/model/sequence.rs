use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::{
        query::{delete, expect_rows, fetch_all, fetch_one, update},
        ChallengeIden,
    },
    crate::api::payloads::NewSequence,
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Order, Query, SelectStatement},
};

use crate::types::{DateList, Uuid};

/// An ordered grouping of workouts within a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("sequence"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Sequence {
    pub sequence_id: Uuid,
    pub challenge_id: Uuid,
    pub sequence_dates: DateList,
    /// Seconds
    pub duration: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Sequence {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(SequenceIden::Table).to_owned()
    }

    /// Fetch a sequence only if it belongs to the given challenge
    pub fn fetch_in_challenge(
        conn: &Connection,
        challenge_id: &Uuid,
        id: &Uuid,
    ) -> Result<Sequence, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(SequenceIden::SequenceId).eq(id))
            .and_where(Expr::col(SequenceIden::ChallengeId).eq(challenge_id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Sequence::from_row)
    }

    pub fn fetch_by_challenge(
        conn: &Connection,
        challenge_id: &Uuid,
    ) -> Result<Vec<Sequence>, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(SequenceIden::ChallengeId).eq(challenge_id))
            .order_by(SequenceIden::CreatedAt, Order::Asc)
            .to_owned();
        fetch_all(conn, &select, Sequence::from_row)
    }

    fn program_challenges(program_id: &Uuid) -> SelectStatement {
        Query::select()
            .column(ChallengeIden::ChallengeId)
            .from(ChallengeIden::Table)
            .and_where(Expr::col(ChallengeIden::ProgramId).eq(program_id))
            .to_owned()
    }

    /// Sequences of every challenge in a program
    pub fn fetch_by_program(
        conn: &Connection,
        program_id: &Uuid,
    ) -> Result<Vec<Sequence>, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(
                Expr::col(SequenceIden::ChallengeId).in_subquery(Self::program_challenges(program_id)),
            )
            .order_by(SequenceIden::CreatedAt, Order::Asc)
            .to_owned();
        fetch_all(conn, &select, Sequence::from_row)
    }

    /// Fetch a sequence only if its challenge belongs to the given program
    pub fn fetch_in_program(
        conn: &Connection,
        program_id: &Uuid,
        id: &Uuid,
    ) -> Result<Sequence, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(SequenceIden::SequenceId).eq(id))
            .and_where(
                Expr::col(SequenceIden::ChallengeId).in_subquery(Self::program_challenges(program_id)),
            )
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Sequence::from_row)
    }

    pub fn create(
        conn: &Connection,
        challenge_id: &Uuid,
        new: &NewSequence,
    ) -> Result<Sequence, rusqlite::Error> {
        let now = Utc::now();
        let sequence = Sequence {
            sequence_id: Uuid::new_v4(),
            challenge_id: *challenge_id,
            sequence_dates: new.sequence_dates.clone(),
            duration: new.duration,
            created_at: now,
            updated_at: now,
        };
        sequence.insert(conn)?;
        Ok(sequence)
    }

    pub fn save(&mut self, conn: &Connection) -> Result<(), rusqlite::Error> {
        self.updated_at = Utc::now();
        let stmt = Query::update()
            .table(SequenceIden::Table)
            .value(SequenceIden::SequenceDates, &self.sequence_dates)
            .value(SequenceIden::Duration, self.duration)
            .value(SequenceIden::UpdatedAt, self.updated_at)
            .and_where(Expr::col(SequenceIden::SequenceId).eq(&self.sequence_id))
            .to_owned();
        expect_rows(update(conn, &stmt)?)
    }

    pub fn delete_in_challenge(
        conn: &Connection,
        challenge_id: &Uuid,
        id: &Uuid,
    ) -> Result<(), rusqlite::Error> {
        let stmt = Query::delete()
            .from_table(SequenceIden::Table)
            .and_where(Expr::col(SequenceIden::SequenceId).eq(id))
            .and_where(Expr::col(SequenceIden::ChallengeId).eq(challenge_id))
            .to_owned();
        expect_rows(delete(conn, &stmt)?)
    }
}
