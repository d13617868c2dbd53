//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity CRUD contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Translate storage failures into semantic errors.
//!
//! # Invariants
//! - Repositories only wrap connections that pass `ensure_connection_ready`:
//!   latest schema, required columns present, `foreign_keys=ON`.
//! - Lookups of a missing id return `Ok(None)`; updates and deletes of a
//!   missing id return `RepoError::NotFound`.
//! - Foreign-key violations surface as `RepoError::ForeignKeyViolation`.
//! - Multi-statement writes join a transaction the caller already holds
//!   (through a savepoint) instead of opening their own.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::item::ItemValidationError;
use rusqlite::types::Value;
use log::warn;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer_repo;
pub mod item_repo;
pub mod review_repo;

pub type RepoResult<T> = Result<T, RepoError>;

const WRITE_SAVEPOINT: &str = "shopreview_write";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("customers", &["id", "name"]),
    ("items", &["id", "name", "price"]),
    ("reviews", &["id", "comment", "customer_id", "item_id"]),
];

/// Entity kinds addressed by repository errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Item,
    Review,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Item => "item",
            Self::Review => "review",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound {
        entity: EntityKind,
        id: i64,
    },
    /// A review referenced a customer or item that does not exist.
    ForeignKeyViolation(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    ForeignKeysDisabled,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ForeignKeyViolation(message) => {
                write!(f, "foreign key constraint failed: {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::ForeignKeysDisabled => {
                write!(f, "connection has foreign_keys=OFF; cascades would be skipped")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(inner, message)
                if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Self::ForeignKeyViolation(message.unwrap_or_else(|| inner.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Pagination options shared by list queries. Results are ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListQuery {
    pub(crate) fn push_pagination(&self, sql: &mut String, bind_values: &mut Vec<Value>) {
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(self.offset)));
        }
    }
}

/// Runs `body` atomically on `conn`.
///
/// Starts a transaction when `conn` is in autocommit mode; otherwise nests a
/// savepoint inside the caller's open transaction. On error every change made
/// by `body` is rolled back and the caller's transaction stays usable.
pub(crate) fn in_write_scope<T>(
    conn: &Connection,
    body: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    if conn.is_autocommit() {
        let tx = conn.unchecked_transaction()?;
        let value = body(&tx)?;
        tx.commit()?;
        return Ok(value);
    }

    conn.execute_batch(&format!("SAVEPOINT {WRITE_SAVEPOINT};"))?;
    match body(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {WRITE_SAVEPOINT};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch(&format!(
                "ROLLBACK TO {WRITE_SAVEPOINT}; RELEASE {WRITE_SAVEPOINT};"
            )) {
                warn!(
                    "event=savepoint_rollback module=repo status=error error={}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

/// Verifies that `conn` carries the schema and pragmas repositories rely on.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    if actual_version > expected_version {
        return Err(RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        }));
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
