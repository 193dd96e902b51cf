use serde::{Deserialize, Serialize};

use crate::accounts::repo_types::User;

/// Request body for creating or replacing a user.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for credential verification.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub kind: String, // "email" or "username"
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

/// User as exposed over HTTP. No password material.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}
