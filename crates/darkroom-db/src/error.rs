use rusqlite::ErrorCode;

/// Typed store errors. The HTTP layer maps these onto status codes; nothing
/// above the store ever inspects a SQLite message string.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    Conflict,

    #[error("interaction between these users is blocked")]
    Blocked,

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// True when the underlying SQLite error is a constraint violation
    /// (unique key, foreign key, check). Matched by error code, not message.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }

    /// Collapse a constraint violation into `Conflict`, leaving every other
    /// error untouched.
    pub fn constraint_as_conflict(self) -> StoreError {
        if self.is_constraint_violation() {
            StoreError::Conflict
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x TEXT PRIMARY KEY);")
            .unwrap();
        conn.execute("INSERT INTO t (x) VALUES ('a')", []).unwrap();

        let err: StoreError = conn
            .execute("INSERT INTO t (x) VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(err.is_constraint_violation());
        assert!(matches!(err.constraint_as_conflict(), StoreError::Conflict));
    }

    #[test]
    fn other_errors_pass_through() {
        let err = StoreError::NotFound;
        assert!(!err.is_constraint_violation());
        assert!(matches!(err.constraint_as_conflict(), StoreError::NotFound));
    }
}
