use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::accounts::error::AccountError;
use crate::accounts::password::{PasswordCodec, PasswordDigest};
use crate::accounts::repo::UserRepository;
use crate::accounts::repo_types::{LookupKind, User};

/// Account operations over a user repository. Every plaintext password that
/// enters goes through the codec before it reaches the repository.
#[derive(Clone)]
pub struct AccountStore {
    repo: Arc<dyn UserRepository>,
    codec: PasswordCodec,
}

impl AccountStore {
    pub fn new(repo: Arc<dyn UserRepository>, codec: PasswordCodec) -> Self {
        Self { repo, codec }
    }

    #[instrument(skip(self, password))]
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let hash = self.hash(password).await?;
        let user = self
            .repo
            .insert(username, email, &hash)
            .await
            .inspect_err(|e| log_write_error(e, "create user"))?;
        info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn update(
        &self,
        id: i32,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let hash = self.hash(password).await?;
        let user = self
            .repo
            .update(id, username, email, &hash)
            .await
            .inspect_err(|e| log_write_error(e, "update user"))?
            .ok_or_else(|| {
                warn!(user_id = id, "update target not found");
                AccountError::NotFound(id)
            })?;
        info!(user_id = user.id, username = %user.username, "user updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, AccountError> {
        let users = self.repo.list().await.inspect_err(|e| {
            error!(error = %e, "list users failed");
        })?;
        debug!(count = users.len(), "users listed");
        Ok(users)
    }

    /// `Ok(false)` both for an unknown identifier and a wrong password.
    #[instrument(skip(self, password))]
    pub async fn verify(
        &self,
        kind: LookupKind,
        identifier: &str,
        password: &str,
    ) -> Result<bool, AccountError> {
        let found = self.repo.find_by(kind, identifier).await.inspect_err(|e| {
            error!(error = %e, "user lookup failed");
        })?;

        let codec = self.codec.clone();
        let password = password.to_owned();
        let (user_id, ok) = match found {
            Some(user) => {
                let id = user.id;
                let digest = user.password_hash;
                let ok = blocking(move || codec.verify(&password, &digest)).await?;
                (Some(id), ok)
            }
            None => {
                blocking(move || {
                    codec.verify_decoy(&password);
                    Ok(())
                })
                .await?;
                (None, false)
            }
        };

        if ok {
            info!(?user_id, "credentials verified");
        } else {
            warn!(?user_id, field = %kind.field(), "credential verification failed");
        }
        Ok(ok)
    }

    async fn hash(&self, password: &str) -> Result<PasswordDigest, AccountError> {
        let codec = self.codec.clone();
        let password = password.to_owned();
        blocking(move || codec.hash(&password)).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T, AccountError>
where
    F: FnOnce() -> Result<T, AccountError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "password task panicked");
        AccountError::Codec(e.to_string())
    })?
}

fn log_write_error(e: &AccountError, op: &str) {
    match e {
        AccountError::Conflict(field) => warn!(?field, "{op}: duplicate username or email"),
        other => error!(error = %other, "{op} failed"),
    }
}
