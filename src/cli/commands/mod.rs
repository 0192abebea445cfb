//! Command handlers, one module per top-level command group

pub mod browse;
pub mod config;
pub mod diag;
pub mod game;
pub mod library;
pub mod search;
