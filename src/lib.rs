//! linktrio - a three-service URL shortener
//!
//! One library backs three HTTP services that talk to each other over
//! plain HTTP:
//! - redirect: allocates short codes, serves redirects, emits click events
//! - analytics: aggregates clicks, orchestrates creation, serves dashboard data
//! - metadata: fetches pages and extracts title, description and favicon
//!
//! # Architecture
//! - `storage`: per-service SQLite stores (sea-orm)
//! - `services`: business logic and upstream clients
//! - `api`: HTTP handlers and wire types
//! - `config`: configuration management
//! - `runtime`: service startup and shutdown
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
