//! Accounting API client
//!
//! This module provides the HTTP-based client for the remote accounting
//! service: a generic CRUD surface, the query engine entry points, and the
//! per-entity convenience wrappers generated from a single table.
//!
//! # Architecture
//!
//! - Uses the crate's `HttpClient` (no direct reqwest)
//! - Bearer-token authentication via the [`AccessTokenProvider`] port
//! - Implements `ledgerlink-core`'s `ApiTransport` so the pagination driver
//!   stays transport-agnostic

pub mod auth;
pub mod client;
pub mod entities;
pub mod transport;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use client::{DeleteTarget, LedgerClient, LedgerClientBuilder};
pub use transport::RestTransport;
