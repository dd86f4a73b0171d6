use crate::application::repos::RepoError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const QUERY_CANCELED: &str = "57014";
/// Class 23 covers every integrity constraint violation.
const INTEGRITY_CLASS: &str = "23";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) => {
            let code = db.code().map(|code| code.into_owned()).unwrap_or_default();
            classify(&code, db.message(), db.constraint())
        }
        other => RepoError::from_persistence(other),
    }
}

fn classify(code: &str, message: &str, constraint: Option<&str>) -> RepoError {
    match code {
        UNIQUE_VIOLATION => RepoError::Duplicate {
            constraint: constraint.unwrap_or("unknown").to_string(),
        },
        FOREIGN_KEY_VIOLATION | INVALID_TEXT_REPRESENTATION => RepoError::InvalidInput {
            message: message.to_string(),
        },
        QUERY_CANCELED => RepoError::Timeout,
        _ if code.starts_with(INTEGRITY_CLASS) => RepoError::Integrity {
            message: message.to_string(),
        },
        _ => RepoError::from_persistence(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_the_constraint() {
        match classify(UNIQUE_VIOLATION, "duplicate key", Some("roles_code_live_key")) {
            RepoError::Duplicate { constraint } => assert_eq!(constraint, "roles_code_live_key"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn other_integrity_errors_keep_the_message() {
        assert!(matches!(
            classify("23502", "null value in column", None),
            RepoError::Integrity { .. }
        ));
        assert!(matches!(
            classify(FOREIGN_KEY_VIOLATION, "violates foreign key constraint", None),
            RepoError::InvalidInput { .. }
        ));
        assert!(matches!(
            classify(QUERY_CANCELED, "canceling statement", None),
            RepoError::Timeout
        ));
        assert!(matches!(
            classify("42P01", "relation does not exist", None),
            RepoError::Persistence(_)
        ));
    }
}
