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

//! API to get one director.

use crate::driver::Driver;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use film_api_core::rest::{PathId, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathId(id): PathId,
) -> Result<impl IntoResponse, RestError> {
    let director = driver.get_director(&id).await?;
    Ok(Json(director))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use film_api_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/directors/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let director = context.insert_director("Nolan", 1970).await;

        let response = OneShotBuilder::new(context.into_app(), route(&director.id().to_string()))
            .send_empty()
            .await
            .expect_json::<serde_json::Value>()
            .await;
        assert_eq!(serde_json::json!({"id": 1, "name": "Nolan", "birthYear": 1970}), response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("4"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Sutradara tidak ditemukan$")
            .await;
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("abc"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^Format ID tidak valid$")
            .await;
    }

    #[tokio::test]
    async fn test_undecodable_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("%FF"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^Format ID tidak valid$")
            .await;
    }

    #[tokio::test]
    async fn test_body_is_ignored() {
        let context = TestContext::setup().await;

        let director = context.insert_director("Nolan", 1970).await;

        let response = OneShotBuilder::new(context.app(), route(&director.id().to_string()))
            .send_json(serde_json::json!({}))
            .await
            .expect_json::<Director>()
            .await;
        assert_eq!(director, response);
    }
}
