pub mod auth_client;
pub mod diff_engine;
pub mod requests_client;
