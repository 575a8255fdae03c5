//! tutor-shell - a simulated Linux shell for teaching system administration
//!
//! Commands run against an in-memory filesystem with Unix permissions, a
//! mock multi-user registry and simulated background jobs. Everything a
//! command can touch lives in one [`session::ShellSession`]; the
//! [`interpreter::Shell`] turns raw lines into terminal text.

pub mod commands;
pub mod config;
pub mod environment;
pub mod fs;
pub mod history;
pub mod interpreter;
pub mod jobs;
pub mod parser;
pub mod permissions;
pub mod session;
pub mod users;

pub use config::ShellConfig;
pub use interpreter::{Shell, ShellError};
pub use session::ShellSession;
