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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use film_api_core::clocks::testutils::SettableClock;
use film_api_core::db::{Db, DbError};
use std::sync::Arc;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app, for direct access.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app on top of an in-memory SQLite database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(film_api_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2024-05-01 09:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock);
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a copy of the app to send a request to it while keeping the context alive.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app, for tests that send a single request.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Stores a movie directly in the database.
    pub(crate) async fn insert_movie(&self, title: &str, director: &str, year: i32) -> Movie {
        let fields = MovieFields::new(title.to_owned(), director.to_owned(), year);
        db::create_movie(&mut self.db.ex().await.unwrap(), fields, datetime!(2024-01-01 0:00 UTC))
            .await
            .unwrap()
    }

    /// Stores a director directly in the database.
    pub(crate) async fn insert_director(&self, name: &str, birth_year: i32) -> Director {
        let fields = DirectorFields::new(name.to_owned(), birth_year);
        db::create_director(
            &mut self.db.ex().await.unwrap(),
            fields,
            datetime!(2024-01-01 0:00 UTC),
        )
        .await
        .unwrap()
    }

    /// Gets a movie directly from the database, if it exists.
    pub(crate) async fn get_movie(&self, id: &RecordId) -> Option<Movie> {
        match db::get_movie(&mut self.db.ex().await.unwrap(), &id.to_string()).await {
            Ok(movie) => Some(movie),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("Unexpected database error: {:?}", e),
        }
    }

    /// Gets a director directly from the database, if it exists.
    pub(crate) async fn get_director(&self, id: &RecordId) -> Option<Director> {
        match db::get_director(&mut self.db.ex().await.unwrap(), &id.to_string()).await {
            Ok(director) => Some(director),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("Unexpected database error: {:?}", e),
        }
    }

    /// Gets all movies directly from the database.
    pub(crate) async fn movies(&self) -> Vec<Movie> {
        db::list_movies(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    /// Gets all directors directly from the database.
    pub(crate) async fn directors(&self) -> Vec<Director> {
        db::list_directors(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
