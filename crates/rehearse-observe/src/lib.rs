//! Observability for Rehearse: tracing subscriber setup.

pub mod tracing_setup;
