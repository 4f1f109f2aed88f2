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

//! High-level data types and validation of the payloads that create or replace them.

use derive_getters::Getters;
use derive_more::Constructor;
use film_api_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// The kinds of records exposed by the service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Resource {
    /// Records of type `Movie`.
    Movie,

    /// Records of type `Director`.
    Director,
}

impl Resource {
    /// Returns the message to report to clients when a record of this kind does not exist.
    pub(crate) fn not_found_message(self) -> &'static str {
        match self {
            Resource::Movie => "Film tidak ditemukan",
            Resource::Director => "Sutradara tidak ditemukan",
        }
    }
}

/// Identifier of a stored record.
///
/// The format depends on the backend that generated it: the relational file store hands out
/// auto-incremented integers while the document store hands out opaque UUIDs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(untagged)]
pub(crate) enum RecordId {
    /// An integer identifier assigned by the database.
    Serial(i64),

    /// An opaque identifier generated by the service.
    Opaque(Uuid),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Serial(id) => write!(f, "{}", id),
            RecordId::Opaque(id) => write!(f, "{}", id.hyphenated()),
        }
    }
}

/// Bookkeeping timestamps maintained by the backends that support them.
#[derive(Clone, Constructor, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Timestamps {
    /// When the record was first stored.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// When the record was last replaced.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

/// Validated contents of a movie, as supplied by clients.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct MovieFields {
    /// Title of the movie.  Never empty.
    title: String,

    /// Free-form name of the movie's director.  Never empty.
    director: String,

    /// Release year.  Never zero.
    year: i32,
}

/// A stored movie.
#[derive(Constructor, Debug, Getters, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub(crate) struct Movie {
    /// Identifier of the movie.
    id: RecordId,

    /// Title of the movie.
    title: String,

    /// Free-form name of the movie's director.
    director: String,

    /// Release year.
    year: i32,

    /// Creation and modification times, if the backend keeps them.
    #[serde(flatten)]
    timestamps: Option<Timestamps>,
}

impl Movie {
    /// Creates a movie from its validated `fields`.
    pub(crate) fn from_fields(
        id: RecordId,
        fields: MovieFields,
        timestamps: Option<Timestamps>,
    ) -> Self {
        Movie::new(id, fields.title, fields.director, fields.year, timestamps)
    }
}

/// Validated contents of a director, as supplied by clients.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct DirectorFields {
    /// Name of the director.  Never empty.
    name: String,

    /// Year the director was born.  Never zero.
    birth_year: i32,
}

/// A stored director.
#[derive(Constructor, Debug, Getters, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Director {
    /// Identifier of the director.
    id: RecordId,

    /// Name of the director.
    name: String,

    /// Year the director was born.
    birth_year: i32,

    /// Creation and modification times, if the backend keeps them.
    #[serde(flatten)]
    timestamps: Option<Timestamps>,
}

impl Director {
    /// Creates a director from its validated `fields`.
    pub(crate) fn from_fields(
        id: RecordId,
        fields: DirectorFields,
        timestamps: Option<Timestamps>,
    ) -> Self {
        Director::new(id, fields.name, fields.birth_year, timestamps)
    }
}

/// Untrusted body of a request to create or replace a movie.
///
/// Fields are kept as raw JSON values so that validation can report every problem at once.
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct MovieRequest {
    /// Candidate title.
    #[serde(default)]
    pub(crate) title: Option<Value>,

    /// Candidate director name.
    #[serde(default)]
    pub(crate) director: Option<Value>,

    /// Candidate release year.
    #[serde(default)]
    pub(crate) year: Option<Value>,
}

/// Untrusted body of a request to create or replace a director.
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct DirectorRequest {
    /// Candidate name.
    #[serde(default)]
    pub(crate) name: Option<Value>,

    /// Candidate birth year.
    #[serde(default)]
    pub(crate) birth_year: Option<Value>,
}

/// Extracts the integer held by `n`, accepting floating point values without a fractional part.
fn whole_number(n: &serde_json::Number) -> Option<i64> {
    match n.as_i64() {
        Some(i) => Some(i),
        None => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            _ => None,
        },
    }
}

/// Accumulates the problems found while validating a request body.
#[derive(Default)]
struct Problems {
    /// Names of the fields that were absent or empty.
    missing: Vec<&'static str>,

    /// Descriptions of the fields that had values of the wrong type.
    invalid: Vec<String>,
}

impl Problems {
    /// Extracts a non-empty, trimmed string from the `name` field.
    fn text(&mut self, name: &'static str, value: Option<Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) => {
                self.missing.push(name);
                None
            }
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    self.missing.push(name);
                    None
                } else {
                    Some(s.to_owned())
                }
            }
            Some(_) => {
                self.invalid.push(format!("{} harus berupa teks", name));
                None
            }
        }
    }

    /// Extracts a non-zero integer from the `name` field, which can be given as a JSON number or
    /// as a string that holds one.
    fn integer(&mut self, name: &'static str, value: Option<Value>) -> Option<i32> {
        let raw = match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match whole_number(&n) {
                Some(i) => Some(i),
                None => {
                    self.invalid.push(format!("{} harus berupa bilangan bulat", name));
                    return None;
                }
            },
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Some(i),
                Err(_) => {
                    self.invalid.push(format!("{} harus berupa bilangan bulat", name));
                    return None;
                }
            },
            Some(_) => {
                self.invalid.push(format!("{} harus berupa bilangan bulat", name));
                return None;
            }
        };

        match raw {
            None | Some(0) => {
                self.missing.push(name);
                None
            }
            Some(i) => match i32::try_from(i) {
                Ok(i) => Some(i),
                Err(_) => {
                    self.invalid.push(format!("{} harus berupa bilangan bulat", name));
                    None
                }
            },
        }
    }

    /// Turns the accumulated problems into an error, if there were any.
    fn check(self) -> ModelResult<()> {
        let mut messages = vec![];
        match self.missing.as_slice() {
            [] => (),
            [one] => messages.push(format!("{} wajib diisi", one)),
            [first, second] => messages.push(format!("{} dan {} wajib diisi", first, second)),
            many => messages.push(format!("{} wajib diisi", many.join(", "))),
        }
        messages.extend(self.invalid);

        if messages.is_empty() {
            Ok(())
        } else {
            Err(ModelError(messages.join("; ")))
        }
    }
}

impl TryFrom<MovieRequest> for MovieFields {
    type Error = ModelError;

    fn try_from(request: MovieRequest) -> ModelResult<Self> {
        let mut problems = Problems::default();
        let title = problems.text("title", request.title);
        let director = problems.text("director", request.director);
        let year = problems.integer("year", request.year);
        problems.check()?;

        match (title, director, year) {
            (Some(title), Some(director), Some(year)) => Ok(MovieFields { title, director, year }),
            _ => Err(ModelError("title, director, year wajib diisi".to_owned())),
        }
    }
}

impl TryFrom<DirectorRequest> for DirectorFields {
    type Error = ModelError;

    fn try_from(request: DirectorRequest) -> ModelResult<Self> {
        let mut problems = Problems::default();
        let name = problems.text("name", request.name);
        let birth_year = problems.integer("birthYear", request.birth_year);
        problems.check()?;

        match (name, birth_year) {
            (Some(name), Some(birth_year)) => Ok(DirectorFields { name, birth_year }),
            _ => Err(ModelError("name dan birthYear wajib diisi".to_owned())),
        }
    }
}
