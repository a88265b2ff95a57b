//! Reconciles declared custom-text overrides of a multi-tenant identity
//! platform against its administrative API.
//!
//! Operators declare the UI and message texts a platform instance (or one of
//! its tenants) should show for a given language. This crate turns those
//! declarations into administrative API calls: it creates overrides that do
//! not exist yet, refreshes declared state from the remote record, and
//! reverts a scope to the platform default when its declaration is removed.
//!
//! The entry point is [`controller::TextOverrideController`], one instance
//! per [`category::TextCategory`]. It consumes two collaborators supplied by
//! the host: an implementation of [`client::AdminTextClient`] wrapping the
//! actual RPC transport, and the [`state::AttributeBag`] holding one
//! instance's declared state.

pub mod category;
pub mod client;
pub mod controller;
pub mod schema;
pub mod scope;
pub mod state;
pub mod transcode;
