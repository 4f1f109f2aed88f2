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

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::routing::get;
use axum::Router;
use film_api_core::rest::RestError;
use tower_http::cors::CorsLayer;

mod director_delete;
mod director_get;
mod director_put;
mod directors_get;
mod directors_post;
mod movie_delete;
mod movie_get;
mod movie_put;
mod movies_get;
mod movies_post;
mod status_get;
#[cfg(test)]
mod testutils;

/// Handler for requests that do not match any route or method.
async fn route_not_found() -> RestError {
    RestError::route_not_found()
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    Router::new()
        .route(
            "/movies",
            get(movies_get::handler).post(movies_post::handler).fallback(route_not_found),
        )
        .route(
            "/movies/:id",
            get(movie_get::handler)
                .put(movie_put::handler)
                .delete(movie_delete::handler)
                .fallback(route_not_found),
        )
        .route(
            "/directors",
            get(directors_get::handler).post(directors_post::handler).fallback(route_not_found),
        )
        .route(
            "/directors/:id",
            get(director_get::handler)
                .put(director_put::handler)
                .delete(director_delete::handler)
                .fallback(route_not_found),
        )
        .route("/status", get(status_get::handler).fallback(route_not_found))
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
