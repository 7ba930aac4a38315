use clientdb_core::db::open_db_in_memory;
use clientdb_core::{
    ClientChanges, ClientSearchQuery, ClientStore, MissingTarget, NewClient, RepoError,
    SqliteClientRepository, StoreConfig,
};

#[test]
fn ignore_policy_turns_missing_update_into_noop() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = ClientStore::with_config(
        SqliteClientRepository::try_new(&mut conn).unwrap(),
        StoreConfig::idempotent(),
    );

    store
        .change_client(5, &ClientChanges::new().first_name("Ghost").phones(["+1"]))
        .unwrap();
    assert!(store
        .find_clients(&ClientSearchQuery::all())
        .unwrap()
        .is_empty());
}

#[test]
fn error_policy_reports_missing_delete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = ClientStore::with_config(
        SqliteClientRepository::try_new(&mut conn).unwrap(),
        StoreConfig::strict(),
    );

    let err = store.delete_client(11).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(11)));
}

#[test]
fn ignore_policy_still_surfaces_other_errors() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = ClientStore::with_config(
        SqliteClientRepository::try_new(&mut conn).unwrap(),
        StoreConfig::idempotent(),
    );

    let id = store
        .add_client(&NewClient::new("Mike", "Tyson", "mike@example.com"))
        .unwrap();
    let err = store
        .change_client(id, &ClientChanges::new().email(""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_phone_is_silent_under_strict_policy() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = ClientStore::with_config(
        SqliteClientRepository::try_new(&mut conn).unwrap(),
        StoreConfig::strict(),
    );

    assert_eq!(store.delete_phone(1, "+999").unwrap(), 0);
}

#[test]
fn store_config_round_trips_through_json() {
    let config = StoreConfig {
        on_missing_update: MissingTarget::Ignore,
        on_missing_delete: MissingTarget::Error,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(
        json,
        r#"{"on_missing_update":"ignore","on_missing_delete":"error"}"#
    );

    let partial: StoreConfig = serde_json::from_str(r#"{"on_missing_delete":"error"}"#).unwrap();
    assert_eq!(partial, StoreConfig::strict());
}
