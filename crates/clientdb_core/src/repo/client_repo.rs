//! Client repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and search APIs over `client` and `phone` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before any SQL mutation.
//! - Every multi-statement write runs in one immediate transaction, so a
//!   failure part-way leaves no partial client or phone set behind.
//! - Storage constraint failures surface as `ConstraintViolation`, never as
//!   silent success.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{bootstrap_connection, DbError};
use crate::model::client::{
    validate_phone, Client, ClientChanges, ClientId, ClientRecord, ClientValidationError,
    NewClient,
};
use crate::repo::update_builder::ClientUpdate;
use crate::search::client_search::{self, ClientSearchQuery};
use log::{debug, info};
use rusqlite::{
    params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before reaching storage.
    Validation(ClientValidationError),
    /// Storage-level constraint failure, e.g. duplicate email.
    ConstraintViolation(String),
    /// Operation needs an existing client and the id is unknown.
    ReferenceError(ClientId),
    /// Update/delete target does not exist.
    NotFound(ClientId),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted data cannot be converted into the read model.
    InvalidData(String),
    /// Connection schema is not at the expected version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection does not enforce foreign keys; cascade delete would not fire.
    ForeignKeysDisabled,
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::ReferenceError(id) => write!(f, "client does not exist: {id}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "client repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::ForeignKeysDisabled => {
                write!(f, "client repository requires `PRAGMA foreign_keys = ON`")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "client repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "client repository requires column `{column}` in table `{table}`"
            ),
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

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
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
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation {
                let message = message.clone().unwrap_or_else(|| value.to_string());
                return Self::ConstraintViolation(message);
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for client and phone operations.
pub trait ClientRepository {
    /// Ensures the schema exists. Safe to call repeatedly.
    fn initialize(&mut self) -> RepoResult<()>;
    /// Inserts the client and its initial phones in one transaction.
    fn create_client(&mut self, client: &NewClient) -> RepoResult<ClientId>;
    /// Appends one phone to an existing client.
    fn add_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<()>;
    /// Applies a partial update; returns `NotFound` for unknown ids.
    fn update_client(&mut self, client_id: ClientId, changes: &ClientChanges) -> RepoResult<()>;
    /// Removes matching phone rows and returns how many were removed.
    fn delete_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<usize>;
    /// Removes the client and, by cascade, its phones; `NotFound` for unknown ids.
    fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()>;
    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<ClientRecord>>;
    fn list_phones(&self, client_id: ClientId) -> RepoResult<Vec<String>>;
    fn find_clients(&self, query: &ClientSearchQuery) -> RepoResult<Vec<ClientRecord>>;
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Constructs a repository from an already bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `ForeignKeysDisabled` when cascade delete would not be enforced.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for a malformed schema.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_client_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Configures the connection, applies the schema, then constructs the
    /// repository. Use this for connections opened outside `db::open_db`.
    pub fn bootstrap(conn: &'conn mut Connection) -> RepoResult<Self> {
        bootstrap_connection(conn)?;
        Self::try_new(conn)
    }

    fn begin(&mut self) -> RepoResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn initialize(&mut self) -> RepoResult<()> {
        bootstrap_connection(self.conn)?;
        ensure_client_connection_ready(self.conn)
    }

    fn create_client(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        client.validate()?;

        let tx = self.begin()?;
        tx.execute(
            "INSERT INTO client (first_name, last_name, email) VALUES (?1, ?2, ?3);",
            params![
                client.first_name.as_str(),
                client.last_name.as_str(),
                client.email.as_str(),
            ],
        )?;
        let client_id = tx.last_insert_rowid();
        insert_phones(&tx, client_id, &client.phones)?;
        tx.commit()?;

        info!(
            "event=client_create module=repo status=ok client_id={} phone_count={}",
            client_id,
            client.phones.len()
        );
        Ok(client_id)
    }

    fn add_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<()> {
        validate_phone(phone)?;

        let tx = self.begin()?;
        if !client_exists(&tx, client_id)? {
            return Err(RepoError::ReferenceError(client_id));
        }
        insert_phones(&tx, client_id, [phone])?;
        tx.commit()?;

        debug!("event=phone_add module=repo status=ok client_id={client_id}");
        Ok(())
    }

    fn update_client(&mut self, client_id: ClientId, changes: &ClientChanges) -> RepoResult<()> {
        changes.validate()?;

        let tx = self.begin()?;
        if !client_exists(&tx, client_id)? {
            return Err(RepoError::NotFound(client_id));
        }

        let update = ClientUpdate::from_changes(client_id, changes);
        if let Some((sql, bind_values)) = update.build() {
            tx.execute(&sql, params_from_iter(bind_values))?;
        }

        if let Some(phones) = changes.phones.as_ref() {
            tx.execute("DELETE FROM phone WHERE client_id = ?1;", [client_id])?;
            insert_phones(&tx, client_id, phones)?;
        }
        tx.commit()?;

        info!(
            "event=client_update module=repo status=ok client_id={} fields={} phones_replaced={}",
            client_id,
            changes.supplied_fields().count(),
            changes.phones.is_some()
        );
        Ok(())
    }

    fn delete_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM phone WHERE client_id = ?1 AND phone = ?2;",
            params![client_id, phone],
        )?;

        debug!(
            "event=phone_delete module=repo status=ok client_id={client_id} removed={removed}"
        );
        Ok(removed)
    }

    fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()> {
        // Phone rows go with the client through ON DELETE CASCADE.
        let removed = self
            .conn
            .execute("DELETE FROM client WHERE id = ?1;", [client_id])?;

        if removed == 0 {
            return Err(RepoError::NotFound(client_id));
        }

        info!("event=client_delete module=repo status=ok client_id={client_id}");
        Ok(())
    }

    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<ClientRecord>> {
        let client = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, email FROM client WHERE id = ?1;",
                [client_id],
                parse_client_row,
            )
            .optional()?;

        match client {
            Some(client) => {
                let phones = load_phones(self.conn, client.id)?;
                Ok(Some(ClientRecord::from_parts(client, phones)))
            }
            None => Ok(None),
        }
    }

    fn list_phones(&self, client_id: ClientId) -> RepoResult<Vec<String>> {
        load_phones(self.conn, client_id)
    }

    fn find_clients(&self, query: &ClientSearchQuery) -> RepoResult<Vec<ClientRecord>> {
        client_search::find_clients(self.conn, query)
    }
}

/// Maps one `client` row selected as `id, first_name, last_name, email`.
pub(crate) fn parse_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    })
}

/// Loads every phone of one client in insertion order.
pub(crate) fn load_phones(conn: &Connection, client_id: ClientId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT phone FROM phone WHERE client_id = ?1 ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([client_id])?;
    let mut phones = Vec::new();
    while let Some(row) = rows.next()? {
        phones.push(row.get(0)?);
    }
    Ok(phones)
}

fn insert_phones<I, S>(tx: &Transaction<'_>, client_id: ClientId, phones: I) -> RepoResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stmt = tx.prepare_cached("INSERT INTO phone (client_id, phone) VALUES (?1, ?2);")?;
    for phone in phones {
        stmt.execute(params![client_id, phone.as_ref()])?;
    }
    Ok(())
}

fn client_exists(tx: &Transaction<'_>, client_id: ClientId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM client WHERE id = ?1);",
        [client_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_client_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    const REQUIRED: &[(&str, &[&str])] = &[
        ("client", &["id", "first_name", "last_name", "email"]),
        ("phone", &["id", "client_id", "phone"]),
    ];
    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
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
