//! `SuperAndes` - retail-chain management over a relational store
//!
//! This crate provides the persistence and domain layers for a supermarket chain:
//! typed CRUD operations for supermarkets, branches, products, warehouses, shelves,
//! suppliers, orders, clients and promotions, all backed by hand-built parameterized
//! SQL executed inside explicit transactions, with a shared identifier sequence and
//! a remappable table-name configuration.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Explicit command enum and dispatch table for front ends
pub mod commands;
/// Configuration management for the database path and table-name mapping
pub mod config;
/// Persistence layer - per-entity SQL helpers, schema, sequence, connection
pub mod db;
/// Unified error types and result handling
pub mod errors;
/// Value objects returned by the persistence layer
pub mod models;
/// Domain facade delegating to the persistence layer
pub mod store;
