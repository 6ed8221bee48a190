//! Schema migrations for the meeting store.
//!
//! Each step is an embedded SQL script keyed by the `PRAGMA user_version` it
//! leaves behind. Pending steps run in one transaction, so a database is either
//! fully upgraded or left at its previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// Ordered `(user_version, script)` pairs; versions start at 1 and increase by 1.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_meetings.sql"))];

/// Returns the schema version this binary migrates to.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Brings the connection's schema up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let to = latest_version();

    match from.cmp(&to) {
        std::cmp::Ordering::Equal => Ok(()),
        std::cmp::Ordering::Greater => Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        }),
        std::cmp::Ordering::Less => {
            let tx = conn.transaction()?;
            let applied = run_pending_steps(&tx, from)?;
            tx.commit()?;
            info!(
                "event=db_migrate module=db status=ok from_version={from} to_version={to} steps={applied}"
            );
            Ok(())
        }
    }
}

fn run_pending_steps(tx: &Transaction<'_>, from: u32) -> DbResult<usize> {
    let pending = SCHEMA_STEPS.iter().filter(|(version, _)| *version > from);
    let mut applied = 0;
    for (version, script) in pending {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, current_user_version, latest_version, SCHEMA_STEPS};
    use rusqlite::Connection;

    #[test]
    fn schema_steps_are_contiguous_from_one() {
        for (index, (version, _)) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(*version as usize, index + 1);
        }
    }

    #[test]
    fn fresh_connection_is_migrated_to_latest() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());

        apply_migrations(&mut conn).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }
}
