//! Shared domain types for Rehearse.
//!
//! This crate contains the types used across the Rehearse interview client:
//! Credential, Persona, Turn, Feedback, the controller state and event enums,
//! the JSON wire shapes of the interview service, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, secrecy, thiserror.

pub mod config;
pub mod credential;
pub mod error;
pub mod event;
pub mod interview;
pub mod persona;
pub mod state;
pub mod wire;
