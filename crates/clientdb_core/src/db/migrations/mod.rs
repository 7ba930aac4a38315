//! Embedded client schema and its executor.
//!
//! # Responsibility
//! - Register versioned schema steps in strictly increasing order.
//! - Re-ensure the `client`/`phone` tables on every run, even when the
//!   recorded version is already current.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Steps marked `reensure` contain only `IF NOT EXISTS` DDL and run on
//!   every call; other steps run once, when their version is pending.
//! - One call is one transaction: a failing step leaves the schema untouched.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    sql: &'static str,
    reensure: bool,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
    reensure: true,
}];

const REQUIRED_TABLES: &[&str] = &["client", "phone"];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the schema up to date and recreates any missing client table.
///
/// Safe to call repeatedly; existing rows are never touched.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the database was written by a
///   newer binary.
/// - `DbError::Sqlite` when a step fails; the whole run is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    let missing = missing_tables(&tx)?;
    for step in SCHEMA_STEPS {
        let pending = step.version > current_version;
        if pending || step.reensure {
            tx.execute_batch(step.sql)?;
        }
        if pending {
            tx.execute_batch(&format!("PRAGMA user_version = {};", step.version))?;
        }
    }
    tx.commit()?;

    if current_version < latest {
        info!(
            "event=schema_migrate module=db status=ok from_version={} to_version={}",
            current_version, latest
        );
    } else if !missing.is_empty() {
        warn!(
            "event=schema_repair module=db status=ok version={} recreated={}",
            latest,
            missing.join(",")
        );
    }
    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn missing_tables(tx: &Transaction<'_>) -> DbResult<Vec<&'static str>> {
    let mut stmt = tx.prepare(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
    )?;
    let mut missing = Vec::new();
    for &table in REQUIRED_TABLES {
        let exists: i64 = stmt.query_row([table], |row| row.get(0))?;
        if exists == 0 {
            missing.push(table);
        }
    }
    Ok(missing)
}
