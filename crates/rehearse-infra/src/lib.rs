//! Infrastructure layer for Rehearse.
//!
//! Concrete implementations of the ports defined in `rehearse-core`:
//! the HTTP interview transport, the config file loader, and the
//! environment credential source.

pub mod config;
pub mod credential_source;
pub mod http;
