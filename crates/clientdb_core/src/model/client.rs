//! Client and phone domain model.
//!
//! # Responsibility
//! - Define the client record, its write requests and its read model.
//! - Validate field presence and width before anything reaches SQL.
//!
//! # Invariants
//! - `first_name`, `last_name`, `email` are never blank.
//! - Phone values are never blank and fit the phone column width.
//! - Values are stored as given; no trimming or case folding happens here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated surrogate identifier of a client row.
pub type ClientId = i64;

pub const NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PHONE_MAX_CHARS: usize = 20;

/// Client identity fields addressed by validation and partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientField {
    FirstName,
    LastName,
    Email,
}

impl ClientField {
    /// Storage column name. Also used in error messages.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }

    /// Maximum width in characters.
    pub fn max_chars(self) -> usize {
        match self {
            Self::FirstName | Self::LastName => NAME_MAX_CHARS,
            Self::Email => EMAIL_MAX_CHARS,
        }
    }
}

/// Field-level rejection raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyField(ClientField),
    FieldTooLong {
        field: ClientField,
        max: usize,
        actual: usize,
    },
    EmptyPhone,
    PhoneTooLong {
        max: usize,
        actual: usize,
    },
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "client `{}` must not be empty", field.column()),
            Self::FieldTooLong { field, max, actual } => write!(
                f,
                "client `{}` exceeds {max} characters (got {actual})",
                field.column()
            ),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
            Self::PhoneTooLong { max, actual } => {
                write!(f, "phone exceeds {max} characters (got {actual})")
            }
        }
    }
}

impl Error for ClientValidationError {}

/// Persisted client row without its phones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Client together with every phone number it owns.
///
/// This is the row shape returned by search: phones are always the full set
/// for the client, independent of any phone filter used to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Insertion order.
    pub phones: Vec<String>,
}

impl ClientRecord {
    pub fn from_parts(client: Client, phones: Vec<String>) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phones,
        }
    }
}

/// Input for creating a client, optionally with initial phones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phones: Vec<String>,
}

impl NewClient {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phones: Vec::new(),
        }
    }

    /// Replaces the initial phone list.
    pub fn with_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = phones.into_iter().map(Into::into).collect();
        self
    }

    /// Checks every field and every phone.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        validate_field(ClientField::FirstName, &self.first_name)?;
        validate_field(ClientField::LastName, &self.last_name)?;
        validate_field(ClientField::Email, &self.email)?;
        self.phones
            .iter()
            .try_for_each(|phone| validate_phone(phone))
    }
}

/// Partial update for one client.
///
/// `None` means "leave untouched". For `phones`, `Some(vec![])` clears every
/// phone while `None` keeps the current ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phones: Option<Vec<String>>,
}

impl ClientChanges {
    pub fn new() -> Self {
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

    /// Requests replacement of the whole phone set.
    pub fn phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = Some(phones.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phones.is_none()
    }

    /// Supplied identity fields in column order.
    pub fn supplied_fields(&self) -> impl Iterator<Item = (ClientField, &str)> {
        [
            (ClientField::FirstName, self.first_name.as_deref()),
            (ClientField::LastName, self.last_name.as_deref()),
            (ClientField::Email, self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
    }

    /// Checks only the supplied fields.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        for (field, value) in self.supplied_fields() {
            validate_field(field, value)?;
        }
        if let Some(phones) = &self.phones {
            for phone in phones {
                validate_phone(phone)?;
            }
        }
        Ok(())
    }
}

/// Rejects blank or over-wide identity values.
pub fn validate_field(field: ClientField, value: &str) -> Result<(), ClientValidationError> {
    if value.trim().is_empty() {
        return Err(ClientValidationError::EmptyField(field));
    }
    let actual = value.chars().count();
    if actual > field.max_chars() {
        return Err(ClientValidationError::FieldTooLong {
            field,
            max: field.max_chars(),
            actual,
        });
    }
    Ok(())
}

/// Rejects blank or over-wide phone values. Format is otherwise free.
pub fn validate_phone(phone: &str) -> Result<(), ClientValidationError> {
    if phone.trim().is_empty() {
        return Err(ClientValidationError::EmptyPhone);
    }
    let actual = phone.chars().count();
    if actual > PHONE_MAX_CHARS {
        return Err(ClientValidationError::PhoneTooLong {
            max: PHONE_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        validate_phone, ClientChanges, ClientField, ClientValidationError, NewClient,
        NAME_MAX_CHARS,
    };

    #[test]
    fn new_client_rejects_blank_identity_fields() {
        let err = NewClient::new("Mike", "  ", "mike@example.com")
            .validate()
            .unwrap_err();
        assert_eq!(err, ClientValidationError::EmptyField(ClientField::LastName));
    }

    #[test]
    fn new_client_rejects_blank_phone_in_list() {
        let err = NewClient::new("Mike", "Tyson", "mike@example.com")
            .with_phones(["+1", ""])
            .validate()
            .unwrap_err();
        assert_eq!(err, ClientValidationError::EmptyPhone);
    }

    #[test]
    fn name_width_is_counted_in_characters() {
        let exact = "й".repeat(NAME_MAX_CHARS);
        NewClient::new(exact.as_str(), "Tyson", "mike@example.com")
            .validate()
            .expect("50 characters should fit");

        let too_long = "й".repeat(NAME_MAX_CHARS + 1);
        let err = NewClient::new(too_long, "Tyson", "mike@example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ClientValidationError::FieldTooLong {
                field: ClientField::FirstName,
                actual: 51,
                ..
            }
        ));
    }

    #[test]
    fn phone_width_limit_is_enforced() {
        validate_phone("+7 (900) 111-11-11").expect("formatted phone fits");
        assert!(matches!(
            validate_phone("+0000000000000000000001"),
            Err(ClientValidationError::PhoneTooLong { max: 20, .. })
        ));
    }

    #[test]
    fn empty_changes_validate_and_report_empty() {
        let changes = ClientChanges::new();
        assert!(changes.is_empty());
        changes.validate().expect("nothing to validate");
    }

    #[test]
    fn changes_validate_only_supplied_fields() {
        let changes = ClientChanges::new().email("");
        assert_eq!(
            changes.validate().unwrap_err(),
            ClientValidationError::EmptyField(ClientField::Email)
        );

        let clear_phones = ClientChanges::new().phones(Vec::<String>::new());
        assert!(!clear_phones.is_empty());
        clear_phones.validate().expect("empty phone list is allowed");
    }

    #[test]
    fn supplied_fields_keep_column_order() {
        let changes = ClientChanges::new().email("a@b.c").first_name("Ann");
        let fields: Vec<_> = changes.supplied_fields().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![ClientField::FirstName, ClientField::Email]);
    }
}
