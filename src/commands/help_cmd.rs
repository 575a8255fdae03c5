// src/commands/help_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::registry::help_text;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn summary(&self) -> &'static str {
        "list commands or show help for one"
    }

    fn usage(&self) -> &'static str {
        "help [COMMAND]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if let Some(topic) = ctx.args.operands.first() {
            return ctx
                .registry
                .get(topic)
                .map(help_text)
                .ok_or_else(|| ShellError::invalid(format!("bash: help: no help topics match `{}'.", topic)));
        }
        let names = ctx.registry.names();
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
        let mut out = String::from("Available commands:\n");
        for name in names {
            if let Some(command) = ctx.registry.get(name) {
                out.push_str(&format!("  {:<width$}  {}\n", name, command.summary(), width = width));
            }
        }
        out.push_str("\nUse 'help COMMAND' or 'COMMAND --help' for details.\n");
        Ok(out)
    }
}
