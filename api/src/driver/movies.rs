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

//! Operations on movies.

use super::for_resource;
use crate::db;
use crate::driver::Driver;
use crate::model::*;
use film_api_core::driver::DriverResult;

impl Driver {
    /// Gets all movies.
    pub(crate) async fn list_movies(self) -> DriverResult<Vec<Movie>> {
        let mut ex = self.db.ex().await?;
        let movies = db::list_movies(&mut ex).await?;
        Ok(movies)
    }

    /// Gets the movie identified by `raw_id`.
    pub(crate) async fn get_movie(self, raw_id: &str) -> DriverResult<Movie> {
        let mut ex = self.db.ex().await?;
        db::get_movie(&mut ex, raw_id).await.map_err(for_resource(Resource::Movie))
    }

    /// Stores a new movie with the given `fields`.
    pub(crate) async fn create_movie(self, fields: MovieFields) -> DriverResult<Movie> {
        let now = self.clock.now_utc();
        let mut ex = self.db.ex().await?;
        let movie = db::create_movie(&mut ex, fields, now).await?;
        Ok(movie)
    }

    /// Replaces the contents of the movie identified by `raw_id` with `fields`.
    pub(crate) async fn update_movie(
        self,
        raw_id: &str,
        fields: MovieFields,
    ) -> DriverResult<Movie> {
        let now = self.clock.now_utc();
        let mut ex = self.db.ex().await?;
        db::update_movie(&mut ex, raw_id, fields, now).await.map_err(for_resource(Resource::Movie))
    }

    /// Deletes the movie identified by `raw_id`.
    pub(crate) async fn delete_movie(self, raw_id: &str) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::delete_movie(&mut ex, raw_id).await.map_err(for_resource(Resource::Movie))
    }
}
