//! Treco test report collector library.
//!
//! Decodes JUnit reports, classifies and aggregates their test cases, links
//! scenarios to issue-tracker features and saves each run through a
//! pluggable storage backend.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod report;
pub mod server;
pub mod services;
