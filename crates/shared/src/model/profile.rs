use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::query::fetch_one,
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Asterisk, Expr, Query, SelectStatement},
};

use crate::types::Uuid;

/// Account record of a user. The password lives in the server side credential
/// table so this can be handed to clients as is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("profile"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Profile {
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl Profile {
    fn select_star() -> SelectStatement {
        Query::select().column(Asterisk).from(ProfileIden::Table).to_owned()
    }

    pub fn new(username: &str, avatar_url: Option<String>) -> Self {
        let now = Utc::now();
        Profile {
            user_id: Uuid::new_v4(),
            username: username.to_owned(),
            avatar_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Profile, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ProfileIden::UserId).eq(id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Profile::from_row)
    }

    pub fn fetch_by_username(conn: &Connection, username: &str) -> Result<Profile, rusqlite::Error> {
        let select = Self::select_star()
            .and_where(Expr::col(ProfileIden::Username).eq(username))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Profile::from_row)
    }
}
