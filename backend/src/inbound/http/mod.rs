//! HTTP inbound adapter: actix-web handlers, extractors and page views.

pub mod accounts;
pub mod avatar;
pub mod error;
pub mod extractors;
pub mod forms;
pub mod health;
pub mod pages;
pub mod posts;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

pub use error::ApiResult;
