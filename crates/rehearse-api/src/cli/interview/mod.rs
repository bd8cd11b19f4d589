//! Interactive mock interview in the terminal.
//!
//! Login, persona pick, the chat loop with a live elapsed-time prompt, slash
//! commands, and the feedback screen with export. Entry point:
//! `loop_runner::run_interview`.

pub mod banner;
pub mod commands;
pub mod feedback;
pub mod input;
pub mod login;
pub mod loop_runner;
pub mod renderer;
