pub mod auth;
pub mod config;
pub mod habit;
pub mod stats;
pub mod today;
