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

//! Database abstraction to manipulate movies and directors.
//!
//! Every operation accepts identifiers in their raw textual form, as they come from the URL, and
//! parses them according to the format of the backend behind the executor.  Identifiers that do
//! not have that format are reported as `DbError::InvalidId`.

#[cfg(feature = "postgres")]
use film_api_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use film_api_core::db::sqlite;
use film_api_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use uuid::Uuid;

mod directors;
pub(crate) use directors::*;
mod movies;
pub(crate) use movies::*;
#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Parses a `raw` identifier handed out by the SQLite backend.
#[cfg(any(feature = "sqlite", test))]
fn parse_serial_id(raw: &str) -> DbResult<i64> {
    raw.parse::<i64>().map_err(|_| DbError::InvalidId)
}

/// Parses a `raw` identifier handed out by the PostgreSQL backend.
#[cfg(feature = "postgres")]
fn parse_opaque_id(raw: &str) -> DbResult<Uuid> {
    Uuid::try_parse(raw).map_err(|_| DbError::InvalidId)
}

/// Verifies that a statement that targets a single record by its identifier touched exactly
/// `rows_affected` rows, turning zero into `DbError::NotFound`.
fn expect_one_row(rows_affected: u64) -> DbResult<()> {
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        n => Err(DbError::BackendError(format!("Statement affected {} rows instead of 1", n))),
    }
}
