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

//! Persistence of movies.

use super::expect_one_row;
#[cfg(feature = "postgres")]
use super::parse_opaque_id;
#[cfg(any(feature = "sqlite", test))]
use super::parse_serial_id;
use crate::model::{Movie, MovieFields, RecordId};
#[cfg(feature = "postgres")]
use crate::model::Timestamps;
#[cfg(feature = "postgres")]
use film_api_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use film_api_core::db::sqlite;
use film_api_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;
#[cfg(feature = "postgres")]
use uuid::Uuid;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Movie {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let director: String = row.try_get("director").map_err(postgres::map_sqlx_error)?;
        let year: i32 = row.try_get("year").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Movie::new(
            RecordId::Opaque(id),
            title,
            director,
            year,
            Some(Timestamps::new(created_at, updated_at)),
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Movie {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let director: String = row.try_get("director").map_err(sqlite::map_sqlx_error)?;
        let year: i32 = row.try_get("year").map_err(sqlite::map_sqlx_error)?;

        Ok(Movie::new(RecordId::Serial(id), title, director, year, None))
    }
}

/// Gets all movies in insertion order.
pub(crate) async fn list_movies(ex: &mut Executor) -> DbResult<Vec<Movie>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM movies ORDER BY created_at, id";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Movie::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM movies ORDER BY id ASC";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Movie::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the movie identified by `raw_id`.
pub(crate) async fn get_movie(ex: &mut Executor, raw_id: &str) -> DbResult<Movie> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = parse_opaque_id(raw_id)?;
            let query_str = "SELECT * FROM movies WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Movie::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let id = parse_serial_id(raw_id)?;
            let query_str = "SELECT * FROM movies WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Movie::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Stores a new movie with the given `fields` and returns it with its newly-assigned identifier.
///
/// `now` is recorded as the creation and modification time on backends that keep timestamps.
pub(crate) async fn create_movie(
    ex: &mut Executor,
    fields: MovieFields,
    now: OffsetDateTime,
) -> DbResult<Movie> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = Uuid::new_v4();
            let query_str = "
                INSERT INTO movies (id, title, director, year, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)";
            let done = sqlx::query(query_str)
                .bind(id)
                .bind(fields.title().as_str())
                .bind(fields.director().as_str())
                .bind(*fields.year())
                .bind(now)
                .bind(now)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            Ok(Movie::from_fields(RecordId::Opaque(id), fields, Some(Timestamps::new(now, now))))
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO movies (title, director, year) VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(fields.title().as_str())
                .bind(fields.director().as_str())
                .bind(*fields.year())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            Ok(Movie::from_fields(RecordId::Serial(done.last_insert_rowid()), fields, None))
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces all fields of the movie identified by `raw_id` with `fields`.
///
/// `now` is recorded as the modification time on backends that keep timestamps.
pub(crate) async fn update_movie(
    ex: &mut Executor,
    raw_id: &str,
    fields: MovieFields,
    now: OffsetDateTime,
) -> DbResult<Movie> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = parse_opaque_id(raw_id)?;
            let query_str = "
                UPDATE movies SET title = $1, director = $2, year = $3, updated_at = $4
                WHERE id = $5
                RETURNING created_at";
            let row = sqlx::query(query_str)
                .bind(fields.title().as_str())
                .bind(fields.director().as_str())
                .bind(*fields.year())
                .bind(now)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let created_at: OffsetDateTime =
                row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
            Ok(Movie::from_fields(
                RecordId::Opaque(id),
                fields,
                Some(Timestamps::new(created_at, now)),
            ))
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let id = parse_serial_id(raw_id)?;
            let query_str = "UPDATE movies SET title = ?, director = ?, year = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(fields.title().as_str())
                .bind(fields.director().as_str())
                .bind(*fields.year())
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            Ok(Movie::from_fields(RecordId::Serial(id), fields, None))
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the movie identified by `raw_id`.
pub(crate) async fn delete_movie(ex: &mut Executor, raw_id: &str) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = parse_opaque_id(raw_id)?;
            let query_str = "DELETE FROM movies WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let id = parse_serial_id(raw_id)?;
            let query_str = "DELETE FROM movies WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    expect_one_row(rows_affected)
}
