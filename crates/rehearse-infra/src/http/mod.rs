//! HTTP implementation of the interview transport.

pub mod client;

pub use client::HttpInterviewTransport;
