//! Clementine Storefront library.
//!
//! This crate provides the storefront engine as a library, allowing it to be
//! tested and reused. The binary in `main.rs` wires it to the network.
//!
//! # Architecture
//!
//! - Cart, wishlist, and theme stores owning their state and persisting every
//!   mutation to a key-value store (one JSON document per key)
//! - A notification queue with per-toast expiry timers
//! - A read-only catalog accessor with derived product views
//! - A checkout orchestrator that submits orders to the commerce backend
//! - An axum JSON facade over all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod commerce;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;
pub mod toast;
