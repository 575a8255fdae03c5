// src/commands/history_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::history::format_history;
use crate::interpreter::errors::ShellError;

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn summary(&self) -> &'static str {
        "display or clear the command history"
    }

    fn usage(&self) -> &'static str {
        "history [-c] [N]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("c").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.has_flag('c') {
            ctx.session.history.clear();
            return Ok(String::new());
        }
        let limit = match ctx.args.operands.first() {
            Some(n) => Some(n.parse::<usize>().map_err(|_| {
                ShellError::invalid(format!("bash: history: {}: numeric argument required", n))
            })?),
            None => None,
        };
        Ok(format_history(&ctx.session.history, limit))
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};

    #[tokio::test]
    async fn test_history_listing() {
        let mut s = session();
        for line in ["ls", "cd /tmp", "pwd"] {
            s.history.add(line);
        }
        assert_eq!(run(&mut s, "history").await.unwrap(), "    1  ls\n    2  cd /tmp\n    3  pwd\n");
        assert_eq!(run(&mut s, "history 1").await.unwrap(), "    3  pwd\n");
        assert!(run(&mut s, "history x").await.unwrap_err().to_string().contains("numeric argument required"));
    }

    #[tokio::test]
    async fn test_history_clear() {
        let mut s = session();
        s.history.add("ls");
        run(&mut s, "history -c").await.unwrap();
        assert!(s.history.is_empty());
    }
}
