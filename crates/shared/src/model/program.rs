use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::{delete, expect_rows, fetch_all, fetch_one, update},
    crate::api::payloads::NewProgram,
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Order, Query, SelectStatement},
};

use crate::types::Uuid;

/// Optional grouping of challenges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("program"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Program {
    pub program_id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Program {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(ProgramIden::Table).to_owned()
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Program, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ProgramIden::ProgramId).eq(id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Program::from_row)
    }

    pub fn fetch_all(conn: &Connection) -> Result<Vec<Program>, rusqlite::Error> {
        let select = Self::select_star().order_by(ProgramIden::CreatedAt, Order::Asc).to_owned();
        fetch_all(conn, &select, Program::from_row)
    }

    pub fn create(conn: &Connection, new: &NewProgram) -> Result<Program, rusqlite::Error> {
        let now = Utc::now();
        let program = Program {
            program_id: Uuid::new_v4(),
            name: new.normalized_name(),
            created_at: now,
            updated_at: now,
        };
        program.insert(conn)?;
        Ok(program)
    }

    /// Write the mutable columns back and bump `updated_at`
    pub fn save(&mut self, conn: &Connection) -> Result<(), rusqlite::Error> {
        self.updated_at = Utc::now();
        let stmt = Query::update()
            .table(ProgramIden::Table)
            .value(ProgramIden::Name, self.name.clone())
            .value(ProgramIden::UpdatedAt, self.updated_at)
            .and_where(Expr::col(ProgramIden::ProgramId).eq(&self.program_id))
            .to_owned();
        expect_rows(update(conn, &stmt)?)
    }

    pub fn delete_by_id(conn: &Connection, id: &Uuid) -> Result<(), rusqlite::Error> {
        let stmt = Query::delete()
            .from_table(ProgramIden::Table)
            .and_where(Expr::col(ProgramIden::ProgramId).eq(id))
            .to_owned();
        expect_rows(delete(conn, &stmt)?)
    }
}
