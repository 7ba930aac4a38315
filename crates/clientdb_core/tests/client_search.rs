use clientdb_core::db::open_db_in_memory;
use clientdb_core::{
    find_clients, ClientSearchQuery, ClientStore, NewClient, SqliteClientRepository,
};
use rusqlite::Connection;

fn seed(conn: &mut Connection) {
    let mut store = ClientStore::new(SqliteClientRepository::try_new(conn).unwrap());
    store
        .add_client(&NewClient::new("Mike", "Tyson", "mike@example.com").with_phones(["+1", "+2"]))
        .unwrap();
    store
        .add_client(&NewClient::new("Nina", "Dobrev", "nina@example.com"))
        .unwrap();
    store
        .add_client(&NewClient::new("Mike", "Alba", "alba@example.com").with_phones(["+3", "+3"]))
        .unwrap();
}

#[test]
fn phone_filter_returns_full_phone_list() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let found = find_clients(&conn, &ClientSearchQuery::all().phone("+1")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
    assert_eq!(found[0].phones, vec!["+1", "+2"]);
}

#[test]
fn duplicate_matching_phones_yield_one_row() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let found = find_clients(&conn, &ClientSearchQuery::all().phone("+3")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "alba@example.com");
    assert_eq!(found[0].phones, vec!["+3", "+3"]);
}

#[test]
fn unfiltered_search_returns_all_clients_in_id_order() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let ids: Vec<_> = find_clients(&conn, &ClientSearchQuery::all())
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn filters_combine_with_and() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let by_first = find_clients(&conn, &ClientSearchQuery::all().first_name("Mike")).unwrap();
    assert_eq!(by_first.len(), 2);

    let narrowed = find_clients(
        &conn,
        &ClientSearchQuery::all().first_name("Mike").last_name("Alba"),
    )
    .unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id, 3);

    let contradicting = find_clients(
        &conn,
        &ClientSearchQuery::all().first_name("Mike").phone("+3").email("mike@example.com"),
    )
    .unwrap();
    assert!(contradicting.is_empty());
}

#[test]
fn matching_is_exact_not_substring_or_case_insensitive() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    assert!(find_clients(&conn, &ClientSearchQuery::all().first_name("Mik"))
        .unwrap()
        .is_empty());
    assert!(find_clients(&conn, &ClientSearchQuery::all().email("MIKE@example.com"))
        .unwrap()
        .is_empty());
}

#[test]
fn client_without_phones_has_empty_list() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let found = find_clients(&conn, &ClientSearchQuery::all().email("nina@example.com")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
    assert!(found[0].phones.is_empty());
}

#[test]
fn no_match_returns_empty_list() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let found = find_clients(&conn, &ClientSearchQuery::all().phone("+404")).unwrap();
    assert!(found.is_empty());
}

#[test]
fn store_search_matches_free_function() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);
    let expected = find_clients(&conn, &ClientSearchQuery::all().last_name("Tyson")).unwrap();

    let store = ClientStore::new(SqliteClientRepository::try_new(&mut conn).unwrap());
    let actual = store
        .find_clients(&ClientSearchQuery::all().last_name("Tyson"))
        .unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn empty_filter_values_act_as_absent() {
    let mut conn = open_db_in_memory().unwrap();
    seed(&mut conn);

    let all = find_clients(&conn, &ClientSearchQuery::all()).unwrap();
    let blank = find_clients(&conn, &ClientSearchQuery::all().first_name("").email("")).unwrap();
    assert_eq!(blank, all);

    let narrowed = find_clients(&conn, &ClientSearchQuery::all().phone("").last_name("Alba"))
        .unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id, 3);
}
