use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
#[cfg(feature = "exemplar-model")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::{delete, expect_rows, fetch_all, fetch_one, update},
    crate::api::payloads::NewChallenge,
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Order, Query, SelectStatement},
};

use crate::types::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    #[default]
    Draft,
    Published,
    Active,
    Completed,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Draft => "draft",
            ChallengeStatus::Published => "published",
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown challenge status: {0}")]
pub struct UnknownChallengeStatus(pub String);

impl FromStr for ChallengeStatus {
    type Err = UnknownChallengeStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "draft" => ChallengeStatus::Draft,
            "published" => ChallengeStatus::Published,
            "active" => ChallengeStatus::Active,
            "completed" => ChallengeStatus::Completed,
            other => return Err(UnknownChallengeStatus(other.to_owned())),
        })
    }
}

#[cfg(feature = "exemplar-model")]
impl ToSql for ChallengeStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(feature = "exemplar-model")]
impl FromSql for ChallengeStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(feature = "sea-query-enum")]
impl From<ChallengeStatus> for sea_query::Value {
    fn from(value: ChallengeStatus) -> Self {
        value.as_str().into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("challenge"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Challenge {
    pub challenge_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub entry_fee: f64,
    pub status: ChallengeStatus,
    pub program_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Challenge {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(ChallengeIden::Table).to_owned()
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Challenge, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ChallengeIden::ChallengeId).eq(id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Challenge::from_row)
    }

    pub fn fetch_all(conn: &Connection) -> Result<Vec<Challenge>, rusqlite::Error> {
        let select = Self::select_star().order_by(ChallengeIden::CreatedAt, Order::Asc).to_owned();
        fetch_all(conn, &select, Challenge::from_row)
    }

    pub fn fetch_by_program(
        conn: &Connection,
        program_id: &Uuid,
    ) -> Result<Vec<Challenge>, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ChallengeIden::ProgramId).eq(program_id))
            .order_by(ChallengeIden::CreatedAt, Order::Asc)
            .to_owned();
        fetch_all(conn, &select, Challenge::from_row)
    }

    /// Fetch a challenge only if it belongs to the given program
    pub fn fetch_in_program(
        conn: &Connection,
        program_id: &Uuid,
        id: &Uuid,
    ) -> Result<Challenge, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ChallengeIden::ChallengeId).eq(id))
            .and_where(Expr::col(ChallengeIden::ProgramId).eq(program_id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Challenge::from_row)
    }

    pub fn create(conn: &Connection, new: &NewChallenge) -> Result<Challenge, rusqlite::Error> {
        let now = Utc::now();
        let challenge = Challenge {
            challenge_id: Uuid::new_v4(),
            name: new.name.trim().to_owned(),
            description: new.description.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            entry_fee: new.entry_fee,
            status: new.status.unwrap_or_default(),
            program_id: new.program_id,
            created_at: now,
            updated_at: now,
        };
        challenge.insert(conn)?;
        Ok(challenge)
    }

    /// Write the mutable columns back and bump `updated_at`. `program_id` is
    /// only changed through the program routes
    pub fn save(&mut self, conn: &Connection) -> Result<(), rusqlite::Error> {
        self.updated_at = Utc::now();
        let stmt = Query::update()
            .table(ChallengeIden::Table)
            .value(ChallengeIden::Name, self.name.clone())
            .value(ChallengeIden::Description, self.description.clone())
            .value(ChallengeIden::StartDate, self.start_date)
            .value(ChallengeIden::EndDate, self.end_date)
            .value(ChallengeIden::EntryFee, self.entry_fee)
            .value(ChallengeIden::Status, self.status)
            .value(ChallengeIden::UpdatedAt, self.updated_at)
            .and_where(Expr::col(ChallengeIden::ChallengeId).eq(&self.challenge_id))
            .to_owned();
        expect_rows(update(conn, &stmt)?)
    }

    pub fn delete_by_id(conn: &Connection, id: &Uuid) -> Result<(), rusqlite::Error> {
        let stmt = Query::delete()
            .from_table(ChallengeIden::Table)
            .and_where(Expr::col(ChallengeIden::ChallengeId).eq(id))
            .to_owned();
        expect_rows(delete(conn, &stmt)?)
    }

    pub fn delete_in_program(
        conn: &Connection,
        program_id: &Uuid,
        id: &Uuid,
    ) -> Result<(), rusqlite::Error> {
        let stmt = Query::delete()
            .from_table(ChallengeIden::Table)
            .and_where(Expr::col(ChallengeIden::ChallengeId).eq(id))
            .and_where(Expr::col(ChallengeIden::ProgramId).eq(program_id))
            .to_owned();
        expect_rows(delete(conn, &stmt)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            ChallengeStatus::Draft,
            ChallengeStatus::Published,
            ChallengeStatus::Active,
            ChallengeStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<ChallengeStatus>(), Ok(status));
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{status}\""));
        }
        assert!("archived".parse::<ChallengeStatus>().is_err());
    }
}
