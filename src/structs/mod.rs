pub mod api;
pub mod change_set;
pub mod cli;
pub mod config;
pub mod field_path;
pub mod review;
