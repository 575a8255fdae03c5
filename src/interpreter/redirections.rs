//! Redirections
//!
//! `<` reads a file into the first stage's input. `>` and `>>` open their
//! target before the pipeline runs, so a failing pipeline still leaves a
//! truncated or created file behind, as in bash.

use crate::commands::utils::{read_file, write_file};
use crate::fs::segments_of;
use crate::interpreter::errors::ShellError;
use crate::session::ShellSession;

const CONTEXT: &str = "bash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// `/dev/null`.
    Discard,
    File(String),
}

/// Read the input redirection target.
pub fn read_input(session: &ShellSession, path: &str) -> Result<String, ShellError> {
    read_file(session, path, CONTEXT)
}

/// Create (or truncate, unless appending) the output target.
pub fn open_output(session: &mut ShellSession, path: &str, append: bool) -> Result<OutputTarget, ShellError> {
    if session.resolve(path) == segments_of("/dev/null") {
        return Ok(OutputTarget::Discard);
    }
    // An empty append creates a missing file and checks write access.
    write_file(session, path, "", append, CONTEXT)?;
    Ok(OutputTarget::File(path.to_string()))
}

/// Write pipeline output to an opened target.
pub fn deliver(session: &mut ShellSession, target: &OutputTarget, output: &str) -> Result<(), ShellError> {
    match target {
        OutputTarget::Discard => Ok(()),
        OutputTarget::File(path) => write_file(session, path, output, true, CONTEXT),
    }
}
