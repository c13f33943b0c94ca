use log::info;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database as SeaDatabase;
use std::env;

pub mod entities;
mod migration;

// Re-exports of database types
pub use sea_orm::DatabaseConnection;
pub use sea_orm::DbErr;

/// Database error result type
pub type DbResult<T> = Result<T, DbErr>;

/// Environment variable containing the database connection string
const DATABASE_URL_ENV: &str = "SB_DATABASE_URL";

/// Connects to the database and ensures the schema is present,
/// returning the database connection.
///
/// Any failure at this stage is fatal to the process: there is
/// no recovery path without a reachable database.
pub async fn init() -> DatabaseConnection {
    let url = env::var(DATABASE_URL_ENV)
        .expect("Environment SB_DATABASE_URL must contain the database connection string");

    let connection = SeaDatabase::connect(&url)
        .await
        .expect("Unable to create database connection");

    // Run migrations
    Migrator::up(&connection, None)
        .await
        .expect("Failed to run database migrations");

    info!("Connected to database..");

    connection
}

/// Connects to an in-memory database for tests
#[cfg(test)]
pub async fn connect_in_memory() -> DatabaseConnection {
    let connection = SeaDatabase::connect("sqlite::memory:")
        .await
        .expect("Unable to create in-memory database connection");

    Migrator::up(&connection, None)
        .await
        .expect("Failed to run database migrations");

    connection
}
