//! PDF Share Server Library
//!
//! Upload PDFs, get a shareable link, view, download, list and delete them.
//! The server binary is in main.rs; everything it wires together lives here
//! so the router can be driven in-process by tests.
//!
//! # Modules
//!
//! - `metadata`: file records and the metadata store
//! - `storage`: the on-disk blob store
//! - `routes`: HTTP handlers and the application router

pub mod config;
pub mod error;
pub mod metadata;
pub mod routes;
pub mod state;
pub mod storage;
