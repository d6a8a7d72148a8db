use chrono::{DateTime, Utc};
#[cfg(feature = "exemplar-model")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::{delete, expect_rows, fetch_all, fetch_one},
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Order, Query, SelectStatement},
};

use crate::types::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    #[default]
    Joined,
    Completed,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Joined => "joined",
            ParticipantStatus::Completed => "completed",
        }
    }
}

#[cfg(feature = "exemplar-model")]
impl ToSql for ParticipantStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(feature = "exemplar-model")]
impl FromSql for ParticipantStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "joined" => Ok(ParticipantStatus::Joined),
            "completed" => Ok(ParticipantStatus::Completed),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A user enrolled in a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("participant"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Participant {
    pub participant_id: Uuid,
    pub challenge_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub status: ParticipantStatus,
}

#[cfg(feature = "backend")]
impl Participant {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(ParticipantIden::Table).to_owned()
    }

    pub fn fetch_by_challenge(
        conn: &Connection,
        challenge_id: &Uuid,
    ) -> Result<Vec<Participant>, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ParticipantIden::ChallengeId).eq(challenge_id))
            .order_by(ParticipantIden::JoinedAt, Order::Asc)
            .to_owned();
        fetch_all(conn, &select, Participant::from_row)
    }

    pub fn fetch_for_user(
        conn: &Connection,
        challenge_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Participant, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ParticipantIden::ChallengeId).eq(challenge_id))
            .and_where(Expr::col(ParticipantIden::UserId).eq(user_id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Participant::from_row)
    }

    /// Joining twice violates the (challenge_id, user_id) unique index
    pub fn join(
        conn: &Connection,
        challenge_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Participant, rusqlite::Error> {
        let participant = Participant {
            participant_id: Uuid::new_v4(),
            challenge_id: *challenge_id,
            user_id: *user_id,
            joined_at: Utc::now(),
            status: ParticipantStatus::Joined,
        };
        participant.insert(conn)?;
        Ok(participant)
    }

    pub fn withdraw(
        conn: &Connection,
        challenge_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), rusqlite::Error> {
        let stmt = Query::delete()
            .from_table(ParticipantIden::Table)
            .and_where(Expr::col(ParticipantIden::ChallengeId).eq(challenge_id))
            .and_where(Expr::col(ParticipantIden::UserId).eq(user_id))
            .to_owned();
        expect_rows(delete(conn, &stmt)?)
    }
}
