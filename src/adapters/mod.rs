//! Adapters Layer
//!
//! Outbound adapters implementing the domain ports over HTTP.

pub mod outbound;
