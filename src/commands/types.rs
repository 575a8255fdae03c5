// src/commands/types.rs
use async_trait::async_trait;

use super::args::{ArgSpec, ParsedArgs};
use super::registry::CommandRegistry;
use crate::interpreter::errors::ShellError;
use crate::session::ShellSession;

/// Output text on success (empty means "no output"), a `ShellError` otherwise.
pub type CommandResult = Result<String, ShellError>;

/// One command call as the interpreter hands it to dispatch.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
    /// Output of the previous pipeline stage, if it is passed down.
    pub stdin: Option<String>,
    /// The line ended in `&`.
    pub background: bool,
    /// Command text as typed, used for job listings.
    pub line: String,
}

impl Invocation {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        let name = name.into();
        let line = if args.is_empty() {
            name.clone()
        } else {
            format!("{} {}", name, args.join(" "))
        };
        Self { name, args, stdin: None, background: false, line }
    }

    pub fn with_stdin(mut self, stdin: Option<String>) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn in_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }
}

/// Everything a handler may use. The session is borrowed mutably for the
/// duration of the call.
pub struct CommandContext<'a> {
    pub name: String,
    /// Arguments exactly as expanded, before validation.
    pub raw_args: Vec<String>,
    /// Validated flags and operands.
    pub args: ParsedArgs,
    pub stdin: Option<String>,
    pub session: &'a mut ShellSession,
    pub registry: &'a CommandRegistry,
    pub background: bool,
    pub line: String,
}

/// An emulated utility.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    /// One line shown by `help` and `--help`.
    fn summary(&self) -> &'static str;

    fn usage(&self) -> &'static str;

    /// Flag and arity rules. `None` skips validation.
    fn spec(&self) -> Option<ArgSpec> {
        None
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult;
}
