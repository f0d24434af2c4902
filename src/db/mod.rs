//! SQLite persistence for components and detection records.

pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot prepare database location {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("{entity_type} '{id}' not found")]
    NotFound { entity_type: String, id: String },

    #[error("Unknown {field} value in database: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Schema migration v{version} failed: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

impl DatabaseError {
    /// Unique, foreign-key and check failures, raised by SQLite or by the
    /// repository itself.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            DatabaseError::ConstraintViolation(_) => true,
            DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_constraint_counts_as_violation() {
        assert!(DatabaseError::ConstraintViolation("palm".into()).is_constraint_violation());
        let not_found = DatabaseError::NotFound {
            entity_type: "motor".into(),
            id: "M-1".into(),
        };
        assert!(!not_found.is_constraint_violation());
        assert_eq!(not_found.to_string(), "motor 'M-1' not found");
    }
}
