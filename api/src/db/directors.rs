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

//! Persistence of directors.

use super::expect_one_row;
#[cfg(feature = "postgres")]
use super::parse_opaque_id;
#[cfg(any(feature = "sqlite", test))]
use super::parse_serial_id;
use crate::model::{Director, DirectorFields, RecordId};
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
impl TryFrom<PgRow> for Director {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let birth_year: i32 = row.try_get("birth_year").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Director::new(
            RecordId::Opaque(id),
            name,
            birth_year,
            Some(Timestamps::new(created_at, updated_at)),
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Director {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let birth_year: i32 = row.try_get("birth_year").map_err(sqlite::map_sqlx_error)?;

        Ok(Director::new(RecordId::Serial(id), name, birth_year, None))
    }
}

/// Gets all directors in insertion order.
pub(crate) async fn list_directors(ex: &mut Executor) -> DbResult<Vec<Director>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM directors ORDER BY created_at, id";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Director::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM directors ORDER BY id ASC";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Director::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the director identified by `raw_id`.
pub(crate) async fn get_director(ex: &mut Executor, raw_id: &str) -> DbResult<Director> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = parse_opaque_id(raw_id)?;
            let query_str = "SELECT * FROM directors WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Director::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let id = parse_serial_id(raw_id)?;
            let query_str = "SELECT * FROM directors WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Director::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Stores a new director with the given `fields` and returns it with its newly-assigned identifier.
///
/// `now` is recorded as the creation and modification time on backends that keep timestamps.
pub(crate) async fn create_director(
    ex: &mut Executor,
    fields: DirectorFields,
    now: OffsetDateTime,
) -> DbResult<Director> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = Uuid::new_v4();
            let query_str = "
                INSERT INTO directors (id, name, birth_year, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)";
            let done = sqlx::query(query_str)
                .bind(id)
                .bind(fields.name().as_str())
                .bind(*fields.birth_year())
                .bind(now)
                .bind(now)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            Ok(Director::from_fields(
                RecordId::Opaque(id),
                fields,
                Some(Timestamps::new(now, now)),
            ))
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO directors (name, birth_year) VALUES (?, ?)";
            let done = sqlx::query(query_str)
                .bind(fields.name().as_str())
                .bind(*fields.birth_year())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            Ok(Director::from_fields(RecordId::Serial(done.last_insert_rowid()), fields, None))
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces all fields of the director identified by `raw_id` with `fields`.
///
/// `now` is recorded as the modification time on backends that keep timestamps.
pub(crate) async fn update_director(
    ex: &mut Executor,
    raw_id: &str,
    fields: DirectorFields,
    now: OffsetDateTime,
) -> DbResult<Director> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = parse_opaque_id(raw_id)?;
            let query_str = "
                UPDATE directors SET name = $1, birth_year = $2, updated_at = $3
                WHERE id = $4
                RETURNING created_at";
            let row = sqlx::query(query_str)
                .bind(fields.name().as_str())
                .bind(*fields.birth_year())
                .bind(now)
                .bind(id)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let created_at: OffsetDateTime =
                row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
            Ok(Director::from_fields(
                RecordId::Opaque(id),
                fields,
                Some(Timestamps::new(created_at, now)),
            ))
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let id = parse_serial_id(raw_id)?;
            let query_str = "UPDATE directors SET name = ?, birth_year = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(fields.name().as_str())
                .bind(*fields.birth_year())
                .bind(id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            Ok(Director::from_fields(RecordId::Serial(id), fields, None))
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the director identified by `raw_id`.
pub(crate) async fn delete_director(ex: &mut Executor, raw_id: &str) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let id = parse_opaque_id(raw_id)?;
            let query_str = "DELETE FROM directors WHERE id = $1";
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
            let query_str = "DELETE FROM directors WHERE id = ?";
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
