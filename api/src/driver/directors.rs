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

//! Operations on directors.

use super::for_resource;
use crate::db;
use crate::driver::Driver;
use crate::model::*;
use film_api_core::driver::DriverResult;

impl Driver {
    /// Gets all directors.
    pub(crate) async fn list_directors(self) -> DriverResult<Vec<Director>> {
        let mut ex = self.db.ex().await?;
        let directors = db::list_directors(&mut ex).await?;
        Ok(directors)
    }

    /// Gets the director identified by `raw_id`.
    pub(crate) async fn get_director(self, raw_id: &str) -> DriverResult<Director> {
        let mut ex = self.db.ex().await?;
        db::get_director(&mut ex, raw_id).await.map_err(for_resource(Resource::Director))
    }

    /// Stores a new director with the given `fields`.
    pub(crate) async fn create_director(self, fields: DirectorFields) -> DriverResult<Director> {
        let now = self.clock.now_utc();
        let mut ex = self.db.ex().await?;
        let director = db::create_director(&mut ex, fields, now).await?;
        Ok(director)
    }

    /// Replaces the contents of the director identified by `raw_id` with `fields`.
    pub(crate) async fn update_director(
        self,
        raw_id: &str,
        fields: DirectorFields,
    ) -> DriverResult<Director> {
        let now = self.clock.now_utc();
        let mut ex = self.db.ex().await?;
        db::update_director(&mut ex, raw_id, fields, now)
            .await
            .map_err(for_resource(Resource::Director))
    }

    /// Deletes the director identified by `raw_id`.
    pub(crate) async fn delete_director(self, raw_id: &str) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::delete_director(&mut ex, raw_id).await.map_err(for_resource(Resource::Director))
    }
}
