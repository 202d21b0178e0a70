//! HTTP wrapper around the TickTick REST API.

mod api_client;

#[cfg(test)]
mod api_client_test;

pub use api_client::ApiClient;
