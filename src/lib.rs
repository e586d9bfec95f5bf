//! Test history bridge library.
//!
//! This library provides a typed client for the host's test history
//! functions, an in-process host serving them, and Markdown rendering
//! helpers for analysis reports.

pub mod bridge;
pub mod config;
pub mod db;
pub mod error;
pub mod markdown;
pub mod models;
pub mod services;
