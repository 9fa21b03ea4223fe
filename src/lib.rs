//! Command-line client for the automation REST API: resolves an auth token
//! from flags, environment or config file and attaches it to every request.

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod shell;

pub use error::ClientError;
