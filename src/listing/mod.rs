// src/listing/mod.rs
// =============================================================================
// This module talks to the external listing service (products, categories).
//
// Submodules:
// - model: the record shapes we decode and the Collection enum
// - fetch: the HTTP client with per-request timeout
// =============================================================================

mod fetch;
mod model;

pub use fetch::ListingClient;
pub use model::{Collection, RemoteListing};
