use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed") => {
            let constraint = db
                .message()
                .rsplit_once(": ")
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            RepoError::Duplicate { constraint }
        }
        sqlx::Error::Database(db) if db.message().contains("FOREIGN KEY constraint failed") => {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("constraint failed") => {
            RepoError::Integrity {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}
