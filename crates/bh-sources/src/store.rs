//! Shared read-only SQLite plumbing for the adapters.

use std::path::Path;

use rusqlite::{Connection, ErrorCode, OpenFlags};

use crate::{Browser, FetchError};

/// Opens a history store read-only, classifying the failure modes the
/// caller must distinguish.
pub(crate) fn open_read_only(browser: Browser, path: &Path) -> Result<Connection, FetchError> {
    if !path.exists() {
        return Err(FetchError::SourceUnavailable {
            browser,
            path: Some(path.to_path_buf()),
        });
    }
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|err| classify(browser, path, err))
}

/// Maps an sqlite error onto the fetch taxonomy. Lock conditions can
/// surface at query time too (WAL stores), so query errors go through
/// here as well.
pub(crate) fn classify(browser: Browser, path: &Path, err: rusqlite::Error) -> FetchError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                FetchError::SourceLocked { browser }
            }
            ErrorCode::CannotOpen => FetchError::SourceUnavailable {
                browser,
                path: Some(path.to_path_buf()),
            },
            _ => FetchError::Sqlite(err),
        },
        _ => FetchError::Sqlite(err),
    }
}

/// Names of all tables in the store, used for schema probing.
pub(crate) fn table_names(conn: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

pub(crate) fn ensure_positive_days(days: u32) -> Result<(), FetchError> {
    if days == 0 {
        return Err(FetchError::InvalidArgument(
            "days must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
