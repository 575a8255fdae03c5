// src/commands/cat/mod.rs
use async_trait::async_trait;

use crate::commands::args::{ArgSpec, ParsedArgs};
use crate::commands::utils::gather_inputs;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct CatCommand;

struct Display {
    number_all: bool,
    number_nonblank: bool,
    show_ends: bool,
    show_tabs: bool,
}

impl Display {
    fn from_args(args: &ParsedArgs) -> Self {
        let all = args.has_flag('A');
        Self {
            number_all: args.has_flag('n'),
            number_nonblank: args.has_flag('b'),
            show_ends: all || args.has_flag('E'),
            show_tabs: all || args.has_flag('T'),
        }
    }

    fn is_plain(&self) -> bool {
        !(self.number_all || self.number_nonblank || self.show_ends || self.show_tabs)
    }

    /// Decorate `text`; `counter` carries line numbers across files.
    fn apply(&self, text: &str, counter: &mut usize) -> String {
        let mut out = String::new();
        for raw in text.split_inclusive('\n') {
            let (line, newline) = match raw.strip_suffix('\n') {
                Some(l) => (l, true),
                None => (raw, false),
            };
            let numbered = if self.number_nonblank {
                !line.is_empty()
            } else {
                self.number_all
            };
            if numbered {
                *counter += 1;
                out.push_str(&format!("{:>6}\t", counter));
            }
            if self.show_tabs {
                out.push_str(&line.replace('\t', "^I"));
            } else {
                out.push_str(line);
            }
            if self.show_ends && newline {
                out.push('$');
            }
            if newline {
                out.push('\n');
            }
        }
        out
    }
}

#[async_trait]
impl Command for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn summary(&self) -> &'static str {
        "concatenate files and print on the standard output"
    }

    fn usage(&self) -> &'static str {
        "cat [-nbETA] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("nbETvA"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let display = Display::from_args(&ctx.args);
        let (inputs, errors) = gather_inputs(&ctx, &ctx.args.operands)?;

        let mut stdout = String::new();
        let mut counter = 0;
        for input in &inputs {
            if display.is_plain() {
                stdout.push_str(&input.text);
            } else {
                stdout.push_str(&display.apply(&input.text, &mut counter));
            }
        }
        ShellError::collect(stdout, errors)
    }
}
