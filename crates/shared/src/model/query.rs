//! Thin helpers around running sea-query statements on a rusqlite connection

use rusqlite::{Connection, Row};
use sea_query::{DeleteStatement, SelectStatement, SqliteQueryBuilder, UpdateStatement};
use sea_query_rusqlite::RusqliteBinder;

pub fn fetch_one<T, F>(
    conn: &Connection,
    select: &SelectStatement,
    from_row: F,
) -> rusqlite::Result<T>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row(&*values.as_params(), from_row)
}

pub fn fetch_all<T, F>(
    conn: &Connection,
    select: &SelectStatement,
    from_row: F,
) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
    let mut stmt = conn.prepare_cached(&sql)?;
    let res = stmt.query_map(&*values.as_params(), from_row)?.collect::<Result<_, _>>()?;
    Ok(res)
}

pub fn update(conn: &Connection, update: &UpdateStatement) -> rusqlite::Result<usize> {
    let (sql, values) = update.build_rusqlite(SqliteQueryBuilder);
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.execute(&*values.as_params())
}

pub fn delete(conn: &Connection, delete: &DeleteStatement) -> rusqlite::Result<usize> {
    let (sql, values) = delete.build_rusqlite(SqliteQueryBuilder);
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.execute(&*values.as_params())
}

/// Updates that touch no rows mean the addressed row doesn't exist
pub fn expect_rows(changed: usize) -> rusqlite::Result<()> {
    if changed == 0 {
        Err(rusqlite::Error::QueryReturnedNoRows)
    } else {
        Ok(())
    }
}
