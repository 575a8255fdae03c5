//! Shell Errors
//!
//! Every failure a command can report is a `ShellError` variant. Handlers
//! return `Result<String, ShellError>` and never format their own error text;
//! the `Display` impl produces the bash-style message, and only
//! `Shell::execute` turns an error into terminal output.
//!
//! Variants that name a path carry a `context`: the message prefix that comes
//! before the reason, e.g. `cat: notes.md` or `cp: cannot stat 'a.txt'`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("{context}: No such file or directory")]
    NoSuchFile { context: String },

    #[error("{context}: Not a directory")]
    NotADirectory { context: String },

    #[error("{context}: Is a directory")]
    IsADirectory { context: String },

    #[error("{context}: Directory not empty")]
    DirectoryNotEmpty { context: String },

    #[error("{context}: File exists")]
    FileExists { context: String },

    #[error("{context}: Permission denied")]
    PermissionDenied { context: String },

    #[error("{context}: Operation not permitted")]
    OperationNotPermitted { context: String },

    #[error("{command}: invalid mode: '{mode}'\nTry '{command} --help' for more information.")]
    InvalidMode { command: String, mode: String },

    #[error("{command}: missing operand\nTry '{command} --help' for more information.")]
    MissingOperand { command: String },

    #[error("{command}: extra operand '{operand}'\nTry '{command} --help' for more information.")]
    ExtraOperand { command: String, operand: String },

    #[error("{command}: invalid option -- '{option}'\nTry '{command} --help' for more information.")]
    InvalidOption { command: String, option: char },

    #[error("{command}: unrecognized option '{option}'\nTry '{command} --help' for more information.")]
    UnrecognizedOption { command: String, option: String },

    #[error("{command}: option requires an argument -- '{option}'\nTry '{command} --help' for more information.")]
    OptionRequiresArgument { command: String, option: char },

    #[error("bash: {name}: command not found{}", render_suggestions(.suggestions))]
    CommandNotFound { name: String, suggestions: Vec<String> },

    #[error("bash: {command}: {spec}: no such job")]
    NoSuchJob { command: String, spec: String },

    #[error("bash: {command}: ({pid}) - No such process")]
    NoSuchProcess { command: String, pid: String },

    /// Free-form usage or argument error, already fully worded.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("bash: {0}")]
    Syntax(String),

    /// Output produced before (or alongside) one or more failures.
    #[error("{}", render_partial(.output, .errors))]
    Partial { output: String, errors: Vec<ShellError> },
}

impl ShellError {
    pub fn no_such_file(context: impl Into<String>) -> Self {
        Self::NoSuchFile { context: context.into() }
    }

    pub fn not_a_directory(context: impl Into<String>) -> Self {
        Self::NotADirectory { context: context.into() }
    }

    pub fn is_a_directory(context: impl Into<String>) -> Self {
        Self::IsADirectory { context: context.into() }
    }

    pub fn directory_not_empty(context: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty { context: context.into() }
    }

    pub fn file_exists(context: impl Into<String>) -> Self {
        Self::FileExists { context: context.into() }
    }

    pub fn permission_denied(context: impl Into<String>) -> Self {
        Self::PermissionDenied { context: context.into() }
    }

    pub fn not_permitted(context: impl Into<String>) -> Self {
        Self::OperationNotPermitted { context: context.into() }
    }

    pub fn invalid_mode(command: &str, mode: &str) -> Self {
        Self::InvalidMode { command: command.to_string(), mode: mode.to_string() }
    }

    pub fn missing_operand(command: &str) -> Self {
        Self::MissingOperand { command: command.to_string() }
    }

    pub fn extra_operand(command: &str, operand: &str) -> Self {
        Self::ExtraOperand { command: command.to_string(), operand: operand.to_string() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Combine accumulated output and per-target failures into one result.
    /// A lone failure with no output is returned as itself.
    pub fn collect(output: String, mut errors: Vec<ShellError>) -> Result<String, ShellError> {
        match errors.len() {
            0 => Ok(output),
            1 if output.is_empty() => Err(errors.remove(0)),
            _ => Err(Self::Partial { output, errors }),
        }
    }

    /// Attach output produced earlier in a command list to a later failure.
    pub fn with_output(self, output: String) -> Self {
        if output.is_empty() {
            return self;
        }
        match self {
            Self::Partial { output: inner, errors } => Self::Partial {
                output: format!("{}{}", ensure_newline(&output), inner),
                errors,
            },
            other => Self::Partial { output, errors: vec![other] },
        }
    }

    /// Output that still reaches stdout despite the failure.
    pub fn partial_output(&self) -> &str {
        match self {
            Self::Partial { output, .. } => output,
            _ => "",
        }
    }

    /// The failures with any partial output stripped away.
    pub fn failures(&self) -> Vec<&ShellError> {
        match self {
            Self::Partial { errors, .. } => errors.iter().flat_map(|e| e.failures()).collect(),
            other => vec![other],
        }
    }

    /// Only the error lines, without partial output.
    pub fn error_text(&self) -> String {
        self.failures()
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn ensure_newline(s: &str) -> String {
    if s.is_empty() || s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{}\n", s)
    }
}

fn render_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\nDid you mean:");
    for s in suggestions {
        out.push_str("\n  ");
        out.push_str(s);
    }
    out
}

fn render_partial(output: &str, errors: &[ShellError]) -> String {
    let mut out = ensure_newline(output);
    let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    out.push_str(&lines.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_errors_render_with_context() {
        let err = ShellError::no_such_file("cat: missing.txt");
        assert_eq!(err.to_string(), "cat: missing.txt: No such file or directory");
        let err = ShellError::permission_denied("bash: cd: /root");
        assert_eq!(err.to_string(), "bash: cd: /root: Permission denied");
    }

    #[test]
    fn test_validator_errors_carry_hint() {
        let err = ShellError::InvalidOption { command: "ls".into(), option: 'z' };
        assert_eq!(
            err.to_string(),
            "ls: invalid option -- 'z'\nTry 'ls --help' for more information."
        );
        assert!(ShellError::missing_operand("mkdir").to_string().starts_with("mkdir: missing operand\n"));
    }

    #[test]
    fn test_command_not_found_with_suggestions() {
        let err = ShellError::CommandNotFound { name: "sl".into(), suggestions: vec!["ls".into()] };
        assert_eq!(err.to_string(), "bash: sl: command not found\n\nDid you mean:\n  ls");
        let err = ShellError::CommandNotFound { name: "zzz".into(), suggestions: vec![] };
        assert_eq!(err.to_string(), "bash: zzz: command not found");
    }

    #[test]
    fn test_collect_and_partial_rendering() {
        assert_eq!(ShellError::collect("ok\n".into(), vec![]), Ok("ok\n".to_string()));
        let err = ShellError::collect(
            "a\n".into(),
            vec![ShellError::no_such_file("cat: b"), ShellError::no_such_file("cat: c")],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "a\ncat: b: No such file or directory\ncat: c: No such file or directory"
        );
        assert_eq!(err.partial_output(), "a\n");
        assert_eq!(err.failures().len(), 2);
        assert_eq!(
            ShellError::collect(String::new(), vec![ShellError::no_such_file("rm: x")]),
            Err(ShellError::no_such_file("rm: x"))
        );
    }

    #[test]
    fn test_with_output_prepends() {
        let err = ShellError::no_such_file("cd: x").with_output("first".into());
        assert_eq!(err.to_string(), "first\ncd: x: No such file or directory");
        let same = ShellError::no_such_file("cd: x").with_output(String::new());
        assert_eq!(same, ShellError::no_such_file("cd: x"));
    }
}
