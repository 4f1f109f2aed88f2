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

//! Database tests shared by all implementations.

use crate::db::*;
use crate::model::*;
use film_api_core::db::{Db, DbError};
use std::sync::Arc;
use time::macros::datetime;

/// Syntactic sugar to build the fields of a movie.
fn movie_fields(title: &str, director: &str, year: i32) -> MovieFields {
    MovieFields::new(title.to_owned(), director.to_owned(), year)
}

/// Syntactic sugar to build the fields of a director.
fn director_fields(name: &str, birth_year: i32) -> DirectorFields {
    DirectorFields::new(name.to_owned(), birth_year)
}

pub(crate) async fn test_movies_crud(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let created = create_movie(
        &mut ex,
        movie_fields("Inception", "Nolan", 2010),
        datetime!(2024-05-01 10:00:00 UTC),
    )
    .await
    .unwrap();
    assert_eq!("Inception", created.title());
    assert_eq!("Nolan", created.director());
    assert_eq!(2010, *created.year());
    let id = created.id().to_string();

    assert_eq!(created, get_movie(&mut ex, &id).await.unwrap());
    assert_eq!(vec![created], list_movies(&mut ex).await.unwrap());

    let updated = update_movie(
        &mut ex,
        &id,
        movie_fields("X", "Y", 2020),
        datetime!(2024-05-02 11:00:00 UTC),
    )
    .await
    .unwrap();
    assert_eq!(
        ("X", "Y", 2020),
        (updated.title().as_str(), updated.director().as_str(), *updated.year())
    );
    assert_eq!(updated, get_movie(&mut ex, &id).await.unwrap());

    delete_movie(&mut ex, &id).await.unwrap();
    assert_eq!(DbError::NotFound, get_movie(&mut ex, &id).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_movie(&mut ex, &id).await.unwrap_err());
    assert!(list_movies(&mut ex).await.unwrap().is_empty());
}

pub(crate) async fn test_movies_list_in_insertion_order(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let mut exp_movies = vec![];
    for (i, title) in ["Following", "Memento", "Insomnia"].into_iter().enumerate() {
        let now = datetime!(2024-05-01 10:00:00 UTC) + time::Duration::minutes(i as i64);
        exp_movies
            .push(create_movie(&mut ex, movie_fields(title, "Nolan", 1998), now).await.unwrap());
    }

    assert_eq!(exp_movies, list_movies(&mut ex).await.unwrap());
}

pub(crate) async fn test_movies_timestamps(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let created_at = datetime!(2024-05-01 10:00:00 UTC);
    let updated_at = datetime!(2024-06-01 12:30:00 UTC);

    let movie = create_movie(&mut ex, movie_fields("Tenet", "Nolan", 2020), created_at)
        .await
        .unwrap();
    let id = movie.id().to_string();
    update_movie(&mut ex, &id, movie_fields("Tenet", "Nolan", 2021), updated_at).await.unwrap();

    let movie = get_movie(&mut ex, &id).await.unwrap();
    match movie.id() {
        RecordId::Serial(_) => assert_eq!(&None, movie.timestamps()),
        RecordId::Opaque(_) => {
            assert_eq!(&Some(Timestamps::new(created_at, updated_at)), movie.timestamps())
        }
    }
}

pub(crate) async fn test_movies_malformed_id(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::InvalidId, get_movie(&mut ex, "abc").await.unwrap_err());
    assert_eq!(
        DbError::InvalidId,
        update_movie(
            &mut ex,
            "abc",
            movie_fields("X", "Y", 2020),
            datetime!(2024-05-01 10:00:00 UTC)
        )
        .await
        .unwrap_err()
    );
    assert_eq!(DbError::InvalidId, delete_movie(&mut ex, "abc").await.unwrap_err());
}

pub(crate) async fn test_movies_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let gone = create_movie(
        &mut ex,
        movie_fields("Doodlebug", "Nolan", 1997),
        datetime!(2024-05-01 10:00:00 UTC),
    )
    .await
    .unwrap();
    let id = gone.id().to_string();
    delete_movie(&mut ex, &id).await.unwrap();

    assert_eq!(DbError::NotFound, get_movie(&mut ex, &id).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        update_movie(
            &mut ex,
            &id,
            movie_fields("X", "Y", 2020),
            datetime!(2024-05-01 10:00:00 UTC)
        )
        .await
        .unwrap_err()
    );
    assert_eq!(DbError::NotFound, delete_movie(&mut ex, &id).await.unwrap_err());
}

pub(crate) async fn test_movies_schema_rejects_empty_text(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    match create_movie(&mut ex, movie_fields("", "Nolan", 2000), datetime!(2024-05-01 10:00:00 UTC))
        .await
    {
        Err(DbError::InvalidData(_)) => (),
        e => panic!("Must have failed with InvalidData but got: {:?}", e),
    }
}

pub(crate) async fn test_directors_crud(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let nolan =
        create_director(&mut ex, director_fields("Nolan", 1970), datetime!(2024-05-01 10:00:00 UTC))
            .await
            .unwrap();
    assert_eq!("Nolan", nolan.name());
    assert_eq!(1970, *nolan.birth_year());
    let id = nolan.id().to_string();

    let villeneuve = create_director(
        &mut ex,
        director_fields("Villeneuve", 1967),
        datetime!(2024-05-01 10:05:00 UTC),
    )
    .await
    .unwrap();
    assert_ne!(nolan.id(), villeneuve.id());

    assert_eq!(nolan, get_director(&mut ex, &id).await.unwrap());

    let updated = update_director(
        &mut ex,
        &id,
        director_fields("Christopher Nolan", 1970),
        datetime!(2024-05-02 11:00:00 UTC),
    )
    .await
    .unwrap();
    assert_eq!("Christopher Nolan", updated.name());
    assert_eq!(vec![updated, villeneuve], list_directors(&mut ex).await.unwrap());

    delete_director(&mut ex, &id).await.unwrap();
    assert_eq!(DbError::NotFound, get_director(&mut ex, &id).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_director(&mut ex, &id).await.unwrap_err());
    assert_eq!(1, list_directors(&mut ex).await.unwrap().len());
}

pub(crate) async fn test_directors_malformed_id(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::InvalidId, get_director(&mut ex, "abc").await.unwrap_err());
    assert_eq!(
        DbError::InvalidId,
        update_director(
            &mut ex,
            "abc",
            director_fields("Nolan", 1970),
            datetime!(2024-05-01 10:00:00 UTC)
        )
        .await
        .unwrap_err()
    );
    assert_eq!(DbError::InvalidId, delete_director(&mut ex, "abc").await.unwrap_err());
}

pub(crate) async fn test_directors_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let gone =
        create_director(&mut ex, director_fields("Nolan", 1970), datetime!(2024-05-01 10:00:00 UTC))
            .await
            .unwrap();
    let id = gone.id().to_string();
    delete_director(&mut ex, &id).await.unwrap();

    assert_eq!(DbError::NotFound, get_director(&mut ex, &id).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        update_director(
            &mut ex,
            &id,
            director_fields("Nolan", 1970),
            datetime!(2024-05-01 10:00:00 UTC)
        )
        .await
        .unwrap_err()
    );
}

pub(crate) async fn test_directors_schema_rejects_zero_year(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    match create_director(&mut ex, director_fields("Nolan", 0), datetime!(2024-05-01 10:00:00 UTC))
        .await
    {
        Err(DbError::InvalidData(_)) => (),
        e => panic!("Must have failed with InvalidData but got: {:?}", e),
    }
}

pub(crate) async fn test_tables_are_independent(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_director(&mut ex, director_fields("Nolan", 1970), datetime!(2024-05-01 10:00:00 UTC))
        .await
        .unwrap();

    assert!(list_movies(&mut ex).await.unwrap().is_empty());
    assert_eq!(1, list_directors(&mut ex).await.unwrap().len());
}

pub(crate) async fn test_schema_is_idempotent(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_movie(&mut ex, movie_fields("Tenet", "Nolan", 2020), datetime!(2024-05-01 10:00:00 UTC))
        .await
        .unwrap();
    init_schema(&mut ex).await.unwrap();

    assert_eq!(1, list_movies(&mut ex).await.unwrap().len());
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        film_api_core::db::testutils::generate_tests!(
            $( #[$extra], )?
            $setup,
            crate::db::tests,
            test_movies_crud,
            test_movies_list_in_insertion_order,
            test_movies_timestamps,
            test_movies_malformed_id,
            test_movies_not_found,
            test_movies_schema_rejects_empty_text,
            test_directors_crud,
            test_directors_malformed_id,
            test_directors_not_found,
            test_directors_schema_rejects_zero_year,
            test_tables_are_independent,
            test_schema_is_idempotent
        );
    }
];

mod sqlite {
    use super::*;
    use film_api_core::db::sqlite::testutils::setup;

    /// Opens an in-memory SQLite database with the service schema.
    async fn setup_db() -> Arc<dyn Db + Send + Sync> {
        let db = Arc::new(setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(setup_db().await);
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use film_api_core::db::postgres::testutils::setup;

    /// Connects to the test PostgreSQL database and creates the service schema in it.
    async fn setup_db() -> Arc<dyn Db + Send + Sync> {
        let db = Arc::new(setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        setup_db().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}
