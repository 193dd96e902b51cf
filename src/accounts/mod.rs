use crate::state::AppState;
use axum::Router;

mod dto;
mod error;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
mod password;
pub mod repo;
mod repo_types;
mod store;

pub use error::{AccountError, UniqueField};
pub use password::{PasswordCodec, PasswordDigest};
pub use repo::{PgUserRepository, UserRepository};
pub use repo_types::{LookupKind, User};
pub use store::AccountStore;

#[cfg(test)]
pub(crate) use password::test_codec;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::user_routes())
        .merge(handlers::auth_routes())
}
