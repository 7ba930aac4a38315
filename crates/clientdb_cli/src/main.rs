//! Demonstration driver for `clientdb_core`.
//!
//! # Responsibility
//! - Run a fixed sequence of client store calls and print each outcome.
//! - Read storage and logging settings from `CLIENTDB_*` environment variables.
//!
//! Environment:
//! - `CLIENTDB_PATH`: database file; a private in-memory database when unset.
//! - `CLIENTDB_LOG_DIR`: absolute log directory; logging stays off when unset.
//! - `CLIENTDB_LOG_LEVEL`: log level, build-mode default when unset.

use clientdb_core::db::{open_db, open_db_in_memory};
use clientdb_core::{
    core_version, default_log_level, init_logging, ClientChanges, ClientRecord,
    ClientSearchQuery, ClientStore, NewClient, SqliteClientRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

const ENV_DB_PATH: &str = "CLIENTDB_PATH";
const ENV_LOG_DIR: &str = "CLIENTDB_LOG_DIR";
const ENV_LOG_LEVEL: &str = "CLIENTDB_LOG_LEVEL";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("clientdb: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(ENV_LOG_DIR) {
        let level =
            std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let mut conn = match std::env::var(ENV_DB_PATH) {
        Ok(path) => open_db(path)?,
        Err(_) => open_db_in_memory()?,
    };
    let mut store = ClientStore::new(SqliteClientRepository::try_new(&mut conn)?);
    store.initialize()?;
    println!("clientdb {} schema ready", core_version());
    info!("event=demo_start module=cli status=ok");

    let mike = store.add_client(
        &NewClient::new("Mike", "Tyson", "mike@example.com")
            .with_phones(["+79001111111", "+79002222222"]),
    )?;
    let nina = store.add_client(
        &NewClient::new("Nina", "Dobrev", "nina@example.com").with_phones(["+79003333333"]),
    )?;
    let jessica = store.add_client(&NewClient::new("Jessica", "Alba", "jessica@example.com"))?;
    println!("clients added: mike={mike} nina={nina} jessica={jessica}");

    store.add_phone(jessica, "+79004444444")?;
    println!("phone added for client {jessica}");

    store.change_client(
        nina,
        &ClientChanges::new()
            .first_name("Nina S.")
            .phones(["+79005555555"]),
    )?;
    println!("client {nina} renamed, phones replaced");

    let removed = store.delete_phone(mike, "+79002222222")?;
    println!("removed {removed} phone(s) from client {mike}");

    print_search(
        &store,
        "first_name = 'Nina S.'",
        ClientSearchQuery::all().first_name("Nina S."),
    )?;
    print_search(
        &store,
        "phone = '+79004444444'",
        ClientSearchQuery::all().phone("+79004444444"),
    )?;
    print_search(
        &store,
        "email = 'mike@example.com'",
        ClientSearchQuery::all().email("mike@example.com"),
    )?;

    store.delete_client(mike)?;
    println!("\nclient {mike} deleted");

    print_search(&store, "all remaining clients", ClientSearchQuery::all())?;
    info!("event=demo_finish module=cli status=ok");
    Ok(())
}

fn print_search(
    store: &ClientStore<SqliteClientRepository<'_>>,
    label: &str,
    query: ClientSearchQuery,
) -> Result<(), Box<dyn Error>> {
    println!("\nsearch: {label}");
    let records = store.find_clients(&query)?;
    if records.is_empty() {
        println!("  (no match)");
    }
    for record in &records {
        println!("  {}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &ClientRecord) -> String {
    format!(
        "#{} {} {} <{}> phones=[{}]",
        record.id,
        record.first_name,
        record.last_name,
        record.email,
        record.phones.join(", ")
    )
}
