//! Session controller and port definitions for Rehearse.
//!
//! This crate owns the interview lifecycle: the credential store, the
//! transcript, the elapsed-time clock, and the state machine that drives the
//! interview service through the [`transport::InterviewTransport`] port.
//! It depends only on `rehearse-types` -- never on `rehearse-infra` or any
//! HTTP crate.

pub mod clock;
pub mod controller;
pub mod credential;
pub mod event;
pub mod export;
pub mod session;
pub mod transport;
