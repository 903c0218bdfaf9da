//! Outbound adapters implementing the driven domain ports.
//!
//! - **catalog**: reqwest client for the remote card catalog.
//! - **cache**: time-windowed decorator over any catalog.
//! - **offline_pool**: JSON loader for the fallback card pool.
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: process-local repositories for development and tests.

pub mod cache;
pub mod catalog;
pub mod memory;
pub mod offline_pool;
pub mod persistence;
