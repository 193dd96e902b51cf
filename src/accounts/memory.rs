use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::accounts::error::{AccountError, UniqueField};
use crate::accounts::password::PasswordDigest;
use crate::accounts::repo::UserRepository;
use crate::accounts::repo_types::{LookupKind, User};

/// In-process backend for tests. One mutex guards check and write together,
/// mirroring what the UNIQUE constraints give us in Postgres.
#[derive(Default)]
pub struct MemoryUserRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

impl Inner {
    fn taken(&self, username: &str, email: &str, except: Option<i32>) -> Option<UniqueField> {
        let others = self.rows.values().filter(|u| Some(u.id) != except);
        for u in others {
            if u.username == username {
                return Some(UniqueField::Username);
            }
            if u.email == email {
                return Some(UniqueField::Email);
            }
        }
        None
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &PasswordDigest,
    ) -> Result<User, AccountError> {
        let mut inner = self.inner.lock().expect("memory repo poisoned");
        if let Some(field) = inner.taken(username, email, None) {
            return Err(AccountError::Conflict(Some(field)));
        }
        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.clone(),
        };
        inner.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: i32,
        username: &str,
        email: &str,
        password_hash: &PasswordDigest,
    ) -> Result<Option<User>, AccountError> {
        let mut inner = self.inner.lock().expect("memory repo poisoned");
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(field) = inner.taken(username, email, Some(id)) {
            return Err(AccountError::Conflict(Some(field)));
        }
        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.clone(),
        };
        inner.rows.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn list(&self) -> Result<Vec<User>, AccountError> {
        let inner = self.inner.lock().expect("memory repo poisoned");
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by(
        &self,
        kind: LookupKind,
        identifier: &str,
    ) -> Result<Option<User>, AccountError> {
        let inner = self.inner.lock().expect("memory repo poisoned");
        let found = inner.rows.values().find(|u| match kind {
            LookupKind::ByEmail => u.email == identifier,
            LookupKind::ByUsername => u.username == identifier,
        });
        Ok(found.cloned())
    }
}
