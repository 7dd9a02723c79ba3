pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod effects;
pub mod local;
pub mod models;
pub mod output;
