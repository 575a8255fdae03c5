//! Interpreter module
//!
//! Line execution on top of the parser and the command set: lists,
//! pipelines, expansion, redirection, scripts and background jobs.

pub mod errors;
pub mod interpreter;
pub mod redirections;
pub mod word_expansion;

pub use errors::ShellError;
pub use interpreter::Shell;
pub use redirections::OutputTarget;
pub use word_expansion::{expand_word, expand_words, glob_paths};
