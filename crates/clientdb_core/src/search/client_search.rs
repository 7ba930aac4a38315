//! Exact-match client search.
//!
//! # Responsibility
//! - Match clients by any combination of name, email and phone.
//! - Return each match with its complete phone list.
//!
//! # Invariants
//! - Supplied filters combine with AND; `None` and empty-string filters are
//!   ignored, so `first_name("")` behaves like no name filter at all.
//! - A client is returned at most once, however many of its phones match.
//! - Results are ordered by client id ascending.
//! - Returned phones are never narrowed by the phone filter.

use crate::model::client::ClientRecord;
use crate::repo::client_repo::{load_phones, parse_client_row, RepoResult};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Search filters. Every field is optional; an empty query returns all clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSearchQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Matches clients owning at least one phone with exactly this value.
    pub phone: Option<String>,
}

impl ClientSearchQuery {
    /// Query without filters.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    /// Returns `true` when no filter would restrict the result.
    pub fn is_unfiltered(&self) -> bool {
        active(&self.first_name).is_none()
            && active(&self.last_name).is_none()
            && active(&self.email).is_none()
            && active(&self.phone).is_none()
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|value| !value.is_empty())
}

/// Finds clients matching every supplied filter.
///
/// Returns an empty list when nothing matches.
pub fn find_clients(conn: &Connection, query: &ClientSearchQuery) -> RepoResult<Vec<ClientRecord>> {
    let (sql, bind_values) = build_search_sql(query);

    let mut stmt = conn.prepare(&sql)?;
    let clients = stmt
        .query_map(params_from_iter(bind_values), parse_client_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(clients.len());
    for client in clients {
        let phones = load_phones(conn, client.id)?;
        records.push(ClientRecord::from_parts(client, phones));
    }

    debug!(
        "event=client_search module=search status=ok unfiltered={} hits={}",
        query.is_unfiltered(),
        records.len()
    );
    Ok(records)
}

fn build_search_sql(query: &ClientSearchQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(
        "SELECT c.id, c.first_name, c.last_name, c.email
         FROM client c
         WHERE 1 = 1",
    );
    let mut bind_values: Vec<Value> = Vec::new();

    let column_filters = [
        ("c.first_name", active(&query.first_name)),
        ("c.last_name", active(&query.last_name)),
        ("c.email", active(&query.email)),
    ];
    for (column, value) in column_filters {
        if let Some(value) = value {
            sql.push_str(&format!(" AND {column} = ?"));
            bind_values.push(Value::Text(value.to_string()));
        }
    }

    // EXISTS instead of JOIN: a client owning the phone twice still yields one row.
    if let Some(phone) = active(&query.phone) {
        sql.push_str(
            " AND EXISTS (
                SELECT 1
                FROM phone p
                WHERE p.client_id = c.id
                  AND p.phone = ?
            )",
        );
        bind_values.push(Value::Text(phone.to_string()));
    }

    sql.push_str(" ORDER BY c.id ASC;");
    (sql, bind_values)
}

#[cfg(test)]
mod tests {
    use super::{build_search_sql, ClientSearchQuery};

    #[test]
    fn unfiltered_query_has_no_bind_values() {
        let (sql, values) = build_search_sql(&ClientSearchQuery::all());
        assert!(values.is_empty());
        assert!(!sql.contains("EXISTS"));
        assert!(sql.ends_with("ORDER BY c.id ASC;"));
    }

    #[test]
    fn filters_bind_in_clause_order() {
        let query = ClientSearchQuery::all().phone("+1").first_name("Mike");
        let (sql, values) = build_search_sql(&query);

        assert_eq!(values.len(), 2);
        assert!(sql.find("c.first_name = ?").unwrap() < sql.find("p.phone = ?").unwrap());
    }

    #[test]
    fn empty_string_filters_are_not_applied() {
        let query = ClientSearchQuery::all().first_name("").phone("");
        assert!(query.is_unfiltered());

        let (sql, values) = build_search_sql(&query);
        assert!(values.is_empty());
        assert!(!sql.contains("c.first_name"));
        assert!(!sql.contains("EXISTS"));
    }
}
