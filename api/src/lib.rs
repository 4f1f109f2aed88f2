// Film API
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! REST service to manage a catalog of movies and their directors.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use film_api_core::clocks::SystemClock;
use film_api_core::db::Db;
#[cfg(feature = "postgres")]
use film_api_core::db::postgres::{PostgresDb, PostgresOptions};
use film_api_core::env::get_optional_var;
use std::error::Error;
use std::net::Ipv4Addr;
#[cfg(feature = "sqlite")]
use std::path::PathBuf;
use std::sync::Arc;

mod db;
mod driver;
use driver::Driver;
mod model;
mod rest;
use rest::app;

/// Port to listen on when none is configured.
const DEFAULT_PORT: u16 = 3000;

/// Backend to use when none is configured.
const DEFAULT_BACKEND: &str = "sqlite";

/// Database file to use for the SQLite backend when none is configured.
#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_PATH: &str = "film-api.db";

/// Storage backend selection along with its connection details.
#[derive(Debug)]
pub enum BackendOptions {
    /// Store data in a SQLite database file.
    #[cfg(feature = "sqlite")]
    Sqlite {
        /// Path to the database file, which is created if missing.
        path: PathBuf,
    },

    /// Store data in a PostgreSQL server.
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),
}

/// Configuration of the service.
#[derive(Debug)]
pub struct ServiceOptions {
    /// TCP port to listen on, on all interfaces.
    pub port: u16,

    /// Storage backend to use.
    pub backend: BackendOptions,
}

impl ServiceOptions {
    /// Creates a set of options from environment variables whose name is prefixed with the given
    /// `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT`, `<prefix>_BACKEND` and
    /// `<prefix>_SQLITE_PATH`.  PostgreSQL settings are read from `<prefix>_PGSQL_*` and are
    /// only required when that backend is selected.
    pub fn from_env(prefix: &str) -> Result<ServiceOptions, String> {
        let port = get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT);

        let backend = get_optional_var::<String>(prefix, "BACKEND")?
            .unwrap_or_else(|| DEFAULT_BACKEND.to_owned());
        let backend = match backend.as_str() {
            #[cfg(feature = "sqlite")]
            "sqlite" => {
                let path = get_optional_var::<PathBuf>(prefix, "SQLITE_PATH")?
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH));
                BackendOptions::Sqlite { path }
            }
            #[cfg(feature = "postgres")]
            "postgres" => {
                BackendOptions::Postgres(PostgresOptions::from_env(&format!("{}_PGSQL", prefix))?)
            }
            other => {
                return Err(format!(
                    "Invalid value in environment variable {}_BACKEND: unsupported backend '{}'",
                    prefix, other
                ))
            }
        };

        Ok(ServiceOptions { port, backend })
    }
}

/// Connects to the database described by `opts`.
async fn connect(opts: BackendOptions) -> Result<Arc<dyn Db + Send + Sync>, Box<dyn Error>> {
    match opts {
        #[cfg(feature = "sqlite")]
        BackendOptions::Sqlite { path } => {
            log::info!("Using SQLite database at {}", path.display());
            let db = film_api_core::db::sqlite::connect_file(&path).await?;
            Ok(Arc::new(db))
        }

        #[cfg(feature = "postgres")]
        BackendOptions::Postgres(opts) => {
            log::info!(
                "Using PostgreSQL database {} at {}:{}",
                opts.database,
                opts.host,
                opts.port
            );
            let db = PostgresDb::connect(opts)?;
            Ok(Arc::new(db))
        }
    }
}

/// Waits until the process receives a termination request.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C; shutdown will not be graceful: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

/// Serves the application on top of `db` until shutdown is requested.
async fn run(db: Arc<dyn Db + Send + Sync>, port: u16) -> Result<(), Box<dyn Error>> {
    db::init_schema(&mut db.ex().await?).await?;

    let driver = Driver::new(db, Arc::new(SystemClock::default()));
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

/// Runs the application on top of `db` and closes `db` once done, whether serving succeeded or
/// not.
async fn serve_db(db: Arc<dyn Db + Send + Sync>, port: u16) -> Result<(), Box<dyn Error>> {
    let result = run(db.clone(), port).await;
    db.close().await;
    result
}

/// Instantiates all resources to serve the application as configured by `opts`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(opts: ServiceOptions) -> Result<(), Box<dyn Error>> {
    let db = connect(opts.backend).await?;
    serve_db(db, opts.port).await
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clears all configuration variables for `FILM_API_TEST` and runs `f` with `vars` set.
    fn with_vars<F: FnOnce()>(vars: Vec<(&str, Option<&str>)>, f: F) {
        let mut all = vec![
            ("FILM_API_TEST_PORT", None),
            ("FILM_API_TEST_BACKEND", None),
            ("FILM_API_TEST_SQLITE_PATH", None),
            ("FILM_API_TEST_PGSQL_HOST", None),
            ("FILM_API_TEST_PGSQL_PORT", None),
            ("FILM_API_TEST_PGSQL_DATABASE", None),
            ("FILM_API_TEST_PGSQL_USERNAME", None),
            ("FILM_API_TEST_PGSQL_PASSWORD", None),
        ];
        all.extend(vars);
        temp_env::with_vars(all, f);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_service_options_defaults() {
        with_vars(vec![], || {
            let opts = ServiceOptions::from_env("FILM_API_TEST").unwrap();
            assert_eq!(3000, opts.port);
            match opts.backend {
                BackendOptions::Sqlite { path } => assert_eq!(PathBuf::from("film-api.db"), path),
                #[allow(unreachable_patterns)]
                other => panic!("Unexpected backend {:?}", other),
            }
        });
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_service_options_sqlite() {
        let overrides = vec![
            ("FILM_API_TEST_PORT", Some("8080")),
            ("FILM_API_TEST_BACKEND", Some("sqlite")),
            ("FILM_API_TEST_SQLITE_PATH", Some("/tmp/films.db")),
        ];
        with_vars(overrides, || {
            let opts = ServiceOptions::from_env("FILM_API_TEST").unwrap();
            assert_eq!(8080, opts.port);
            match opts.backend {
                BackendOptions::Sqlite { path } => assert_eq!(PathBuf::from("/tmp/films.db"), path),
                #[allow(unreachable_patterns)]
                other => panic!("Unexpected backend {:?}", other),
            }
        });
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_service_options_postgres() {
        let overrides = vec![
            ("FILM_API_TEST_BACKEND", Some("postgres")),
            ("FILM_API_TEST_PGSQL_HOST", Some("db.example.com")),
            ("FILM_API_TEST_PGSQL_PORT", Some("5433")),
            ("FILM_API_TEST_PGSQL_DATABASE", Some("films")),
            ("FILM_API_TEST_PGSQL_USERNAME", Some("admin")),
            ("FILM_API_TEST_PGSQL_PASSWORD", Some("secret")),
        ];
        with_vars(overrides, || {
            let opts = ServiceOptions::from_env("FILM_API_TEST").unwrap();
            match opts.backend {
                BackendOptions::Postgres(pg) => {
                    assert_eq!("db.example.com", pg.host);
                    assert_eq!(5433, pg.port);
                    assert_eq!("films", pg.database);
                    assert_eq!("admin", pg.username);
                    assert_eq!("secret", pg.password);
                }
                #[allow(unreachable_patterns)]
                other => panic!("Unexpected backend {:?}", other),
            }
        });
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_service_options_postgres_missing_settings() {
        with_vars(vec![("FILM_API_TEST_BACKEND", Some("postgres"))], || {
            let err = ServiceOptions::from_env("FILM_API_TEST").unwrap_err();
            assert!(err.contains("FILM_API_TEST_PGSQL_HOST"));
        });
    }

    #[test]
    fn test_service_options_bad_backend() {
        with_vars(vec![("FILM_API_TEST_BACKEND", Some("mongodb"))], || {
            let err = ServiceOptions::from_env("FILM_API_TEST").unwrap_err();
            assert!(err.contains("FILM_API_TEST_BACKEND"));
            assert!(err.contains("mongodb"));
        });
    }

    #[test]
    fn test_service_options_bad_port() {
        with_vars(vec![("FILM_API_TEST_PORT", Some("http"))], || {
            let err = ServiceOptions::from_env("FILM_API_TEST").unwrap_err();
            assert!(err.contains("FILM_API_TEST_PORT"));
        });
    }

    #[tokio::test]
    async fn test_serve_db_closes_db_when_port_is_busy() {
        let busy = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await.unwrap();
        let port = busy.local_addr().unwrap().port();

        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(film_api_core::db::sqlite::testutils::setup().await);
        serve_db(db.clone(), port).await.unwrap_err();

        assert!(db.ex().await.is_err());
    }
}
