use std::fmt;

/// Unique column of the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn column(self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }

    /// Maps a constraint name from the `users` migration back to its column.
    pub(crate) fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_username_key" => Some(UniqueField::Username),
            "users_email_key" => Some(UniqueField::Email),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Errors surfaced by the account store.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Username or email already belongs to another user.
    #[error("{}", conflict_message(.0))]
    Conflict(Option<UniqueField>),

    #[error("user {0} not found")]
    NotFound(i32),

    /// Caller contract violation, e.g. an unknown lookup kind.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing failed or a stored digest could not be parsed.
    #[error("credential codec failure: {0}")]
    Codec(String),

    #[error("storage failure: {0}")]
    Storage(#[source] sqlx::Error),
}

fn conflict_message(field: &Option<UniqueField>) -> String {
    match field {
        Some(f) => format!("{f} already exists"),
        None => "username or email already exists".to_string(),
    }
}

impl From<sqlx::Error> for AccountError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AccountError::Conflict(
                    db_err.constraint().and_then(UniqueField::from_constraint),
                );
            }
        }
        AccountError::Storage(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[test]
    fn constraint_names_map_to_columns() {
        assert_eq!(
            UniqueField::from_constraint("users_username_key"),
            Some(UniqueField::Username)
        );
        assert_eq!(
            UniqueField::from_constraint("users_email_key"),
            Some(UniqueField::Email)
        );
        assert_eq!(UniqueField::from_constraint("users_pkey"), None);
        assert_eq!(UniqueField::from_constraint("users_username_lower_idx"), None);
    }

    #[test]
    fn conflict_message_names_the_field() {
        assert_eq!(
            AccountError::Conflict(Some(UniqueField::Email)).to_string(),
            "email already exists"
        );
        assert_eq!(
            AccountError::Conflict(None).to_string(),
            "username or email already exists"
        );
    }

    #[test]
    fn non_database_errors_are_storage() {
        let err = AccountError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AccountError::Storage(_)));
    }

    /// Postgres-like error carrying a kind and a constraint name.
    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct PgLikeError {
        message: String,
        kind: ErrorKind,
        constraint: Option<&'static str>,
    }

    impl DatabaseError for PgLikeError {
        fn message(&self) -> &str {
            &self.message
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match &self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                ErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: ErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgLikeError {
            message: "duplicate key value violates unique constraint".into(),
            kind,
            constraint,
        }))
    }

    #[test]
    fn unique_violation_on_username_is_conflict() {
        let err = AccountError::from(db_error(
            ErrorKind::UniqueViolation,
            Some("users_username_key"),
        ));
        assert!(matches!(err, AccountError::Conflict(Some(UniqueField::Username))));
    }

    #[test]
    fn unique_violation_on_email_is_conflict() {
        let err = AccountError::from(db_error(ErrorKind::UniqueViolation, Some("users_email_key")));
        assert!(matches!(err, AccountError::Conflict(Some(UniqueField::Email))));
    }

    #[test]
    fn unique_violation_without_known_constraint_is_unattributed_conflict() {
        let err = AccountError::from(db_error(ErrorKind::UniqueViolation, None));
        assert!(matches!(err, AccountError::Conflict(None)));
    }

    #[test]
    fn other_database_errors_are_storage() {
        let err = AccountError::from(db_error(ErrorKind::NotNullViolation, None));
        assert!(matches!(err, AccountError::Storage(sqlx::Error::Database(_))));
    }
}
