use exemplar::Model;
use rusqlite::Connection;
use sea_query::{enum_def, Expr, Query};

use super::query::fetch_one;
use crate::types::Uuid;

/// Password hash of a profile, in the PHC string format. Never leaves the server
#[derive(Debug, Clone, PartialEq, Eq, Model)]
#[table("credential")]
#[enum_def]
pub struct Credential {
    pub user_id: Uuid,
    pub password_hash: String,
}

impl Credential {
    pub fn fetch_by_user_id(conn: &Connection, user_id: &Uuid) -> Result<Credential, rusqlite::Error> {
        let select = Query::select()
            .columns([CredentialIden::UserId, CredentialIden::PasswordHash])
            .from(CredentialIden::Table)
            .and_where(Expr::col(CredentialIden::UserId).eq(user_id))
            .limit(1)
            .to_owned();
        fetch_one(conn, &select, Credential::from_row)
    }
}
