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

//! Business logic for the service.

use crate::model::Resource;
use film_api_core::clocks::Clock;
use film_api_core::db::{Db, DbError};
use film_api_core::driver::DriverError;
use std::sync::Arc;

mod directors;
mod movies;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": each of them maps to a single
/// statement against the database, so it's incorrect for the caller to use two separate calls to
/// implement a higher-level operation.  For this reason, these operations consume the driver in an
/// attempt to minimize the possibility of executing two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock used to stamp the records on backends that keep timestamps.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { db, clock }
    }
}

/// Returns a function that converts database errors for operations on `resource` into driver
/// errors, naming the kind of record that could not be found.
fn for_resource(resource: Resource) -> impl Fn(DbError) -> DriverError {
    move |e| match e {
        DbError::NotFound => DriverError::NotFound(resource.not_found_message().to_owned()),
        e => DriverError::from(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_resource_not_found() {
        assert_eq!(
            DriverError::NotFound("Film tidak ditemukan".to_owned()),
            for_resource(Resource::Movie)(DbError::NotFound)
        );
        assert_eq!(
            DriverError::NotFound("Sutradara tidak ditemukan".to_owned()),
            for_resource(Resource::Director)(DbError::NotFound)
        );
    }

    #[test]
    fn test_for_resource_other_errors() {
        assert_eq!(
            DriverError::InvalidInput("Format ID tidak valid".to_owned()),
            for_resource(Resource::Movie)(DbError::InvalidId)
        );
        assert_eq!(
            DriverError::BackendError("Unavailable".to_owned()),
            for_resource(Resource::Director)(DbError::Unavailable)
        );
    }
}
