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

//! API to check whether the service is up.

use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Name reported by the health check.
const SERVICE_NAME: &str = "film-api";

/// Message returned by the health check.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct StatusResponse {
    /// Always true while the service can answer requests.
    ok: bool,

    /// Name of the service that answered.
    service: String,
}

/// API handler.
pub(crate) async fn handler() -> impl IntoResponse {
    Json(StatusResponse { ok: true, service: SERVICE_NAME.to_owned() })
}
