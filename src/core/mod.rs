pub mod accounts;
pub mod authenticator;
pub mod cli;
pub mod common;
pub mod configuration;
pub mod core;
pub mod logger;
