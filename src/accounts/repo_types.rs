use std::str::FromStr;

use sqlx::FromRow;

use crate::accounts::error::{AccountError, UniqueField};
use crate::accounts::password::PasswordDigest;

/// Row of the `users` table as returned by Postgres.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// User record. The digest stays inside the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub(crate) password_hash: PasswordDigest,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password_hash: PasswordDigest::from_stored(r.password_hash),
        }
    }
}

/// Which unique column identifies the user at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    ByEmail,
    ByUsername,
}

impl LookupKind {
    pub fn field(self) -> UniqueField {
        match self {
            LookupKind::ByEmail => UniqueField::Email,
            LookupKind::ByUsername => UniqueField::Username,
        }
    }
}

impl FromStr for LookupKind {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(LookupKind::ByEmail),
            "username" => Ok(LookupKind::ByUsername),
            other => Err(AccountError::InvalidInput(format!(
                "unknown lookup kind {other:?}, expected \"email\" or \"username\""
            ))),
        }
    }
}
