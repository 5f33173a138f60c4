//! Command line tools for the HydroShare REST API.
//!
//! This crate provides a session façade over the HydroShare `hsapi` service:
//! authenticating from local credential files, listing, describing,
//! downloading, creating, extending and deleting resources, and locating the
//! content of previously downloaded resources on disk.
//!
//! # Modules
//!
//! - `actions`: Implementations of the CLI subcommands
//! - `auth`: Credential providers for basic and OAuth2 authentication
//! - `commands`: CLI command parsing
//! - `configuration`: Configuration management
//! - `error`: CLI error type and its exit codes
//! - `exit_codes`: Process exit codes
//! - `format`: Output formatting in plain, YAML, JSON and CSV
//! - `hydroshare`: HTTP client for the HydroShare REST API
//! - `metadata`: System and science metadata of a resource
//! - `model`: Data models for users, resource listings and filters
//! - `progress`: Worker tasks with a progress spinner
//! - `resolver`: Lookup of downloaded content on the local filesystem
//! - `session`: The session façade tying the above together

pub mod actions;
pub mod auth;
pub mod commands;
pub mod configuration;
pub mod error;
pub mod exit_codes;
pub mod format;
pub mod hydroshare;
pub mod metadata;
pub mod model;
pub mod progress;
pub mod resolver;
pub mod session;
