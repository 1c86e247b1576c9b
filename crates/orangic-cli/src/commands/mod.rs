//! CLI commands module.

pub mod account;
pub mod chat;
pub mod completions;
pub mod config;
pub mod models;
