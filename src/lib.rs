pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod tally;
pub mod tasks;
pub mod voting;
