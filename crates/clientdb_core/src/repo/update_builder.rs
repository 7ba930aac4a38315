//! Structured partial-update builder for `client` rows.
//!
//! # Responsibility
//! - Turn a set of supplied client fields into one parameterized `UPDATE`.
//!
//! # Invariants
//! - Column names come only from `ClientField`; caller data is always bound.
//! - Each column appears at most once; a later `set` overrides an earlier one.

use crate::model::client::{ClientChanges, ClientField, ClientId};
use rusqlite::types::Value;

/// Pending `UPDATE client SET ... WHERE id = ?` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientUpdate {
    client_id: ClientId,
    assignments: Vec<(ClientField, Value)>,
}

impl ClientUpdate {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            assignments: Vec::new(),
        }
    }

    /// Collects every supplied identity field from `changes`.
    ///
    /// The phone list is not part of the `client` row and is ignored here.
    pub fn from_changes(client_id: ClientId, changes: &ClientChanges) -> Self {
        let mut update = Self::new(client_id);
        for (field, value) in changes.supplied_fields() {
            update.set(field, value);
        }
        update
    }

    /// Assigns `value` to `field`.
    pub fn set(&mut self, field: ClientField, value: impl Into<String>) -> &mut Self {
        let value = Value::Text(value.into());
        match self
            .assignments
            .iter_mut()
            .find(|(existing, _)| *existing == field)
        {
            Some((_, slot)) => *slot = value,
            None => self.assignments.push((field, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders SQL text and bind values in placeholder order.
    ///
    /// Returns `None` when no field was assigned.
    pub fn build(&self) -> Option<(String, Vec<Value>)> {
        if self.assignments.is_empty() {
            return None;
        }

        let mut set_clauses = Vec::with_capacity(self.assignments.len());
        let mut bind_values = Vec::with_capacity(self.assignments.len() + 1);
        for (index, (field, value)) in self.assignments.iter().enumerate() {
            set_clauses.push(format!("{} = ?{}", field.column(), index + 1));
            bind_values.push(value.clone());
        }
        bind_values.push(Value::Integer(self.client_id));

        let sql = format!(
            "UPDATE client SET {} WHERE id = ?{};",
            set_clauses.join(", "),
            bind_values.len()
        );
        Some((sql, bind_values))
    }
}

#[cfg(test)]
mod tests {
    use super::ClientUpdate;
    use crate::model::client::{ClientChanges, ClientField};
    use rusqlite::types::Value;

    #[test]
    fn empty_update_renders_nothing() {
        let update = ClientUpdate::from_changes(7, &ClientChanges::new().phones(["+1"]));
        assert!(update.is_empty());
        assert!(update.build().is_none());
    }

    #[test]
    fn renders_only_supplied_columns_with_positional_binds() {
        let changes = ClientChanges::new().first_name("Nina S.").email("nina@example.com");
        let (sql, values) = ClientUpdate::from_changes(2, &changes).build().unwrap();

        assert_eq!(
            sql,
            "UPDATE client SET first_name = ?1, email = ?2 WHERE id = ?3;"
        );
        assert_eq!(
            values,
            vec![
                Value::Text("Nina S.".to_string()),
                Value::Text("nina@example.com".to_string()),
                Value::Integer(2),
            ]
        );
    }

    #[test]
    fn repeated_set_overrides_previous_value() {
        let mut update = ClientUpdate::new(1);
        update
            .set(ClientField::LastName, "Tyson")
            .set(ClientField::LastName, "Ali");
        let (sql, values) = update.build().unwrap();

        assert_eq!(sql, "UPDATE client SET last_name = ?1 WHERE id = ?2;");
        assert_eq!(values[0], Value::Text("Ali".to_string()));
    }

    #[test]
    fn hostile_values_never_reach_sql_text() {
        let mut update = ClientUpdate::new(1);
        update.set(ClientField::FirstName, "x'; DROP TABLE client; --");
        let (sql, _) = update.build().unwrap();
        assert!(!sql.contains("DROP"));
    }
}
