use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::{fetch_all, fetch_one},
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Order, Query, SelectStatement},
};

use crate::types::Uuid;

/// Catalog entry. The catalog is seeded by a migration and read only at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Exercise {
    pub exercise_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl Exercise {
    /// Find an exercise in a loaded catalog. Names must match exactly
    pub fn find_by_name<'a>(catalog: &'a [Exercise], name: &str) -> Option<&'a Exercise> {
        catalog.iter().find(|e| e.name == name)
    }
}

#[cfg(feature = "backend")]
impl Exercise {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(ExerciseIden::Table).to_owned()
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Exercise, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ExerciseIden::ExerciseId).eq(id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Exercise::from_row)
    }

    pub fn fetch_all(conn: &Connection) -> Result<Vec<Exercise>, rusqlite::Error> {
        let select = Self::select_star().order_by(ExerciseIden::Name, Order::Asc).to_owned();
        fetch_all(conn, &select, Exercise::from_row)
    }
}
