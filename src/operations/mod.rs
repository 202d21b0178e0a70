//! One function per remote operation.
//!
//! Each function takes already-validated parameters, builds the remote path,
//! issues the request(s) through [`ApiClient`](crate::client::ApiClient) and
//! validates the response against the matching entity shape. Nothing is
//! mutated locally.

pub mod projects;
pub mod tasks;


use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TickTickResult;
use crate::schema::{self, Shape};

/// Validate a remote response and decode it.
pub(crate) fn decode<T: DeserializeOwned>(shape: &Shape, value: Value) -> TickTickResult<T> {
    Ok(schema::parse(shape, value)?)
}
