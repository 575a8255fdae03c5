// src/commands/clear_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct ClearCommand;

/// Erase the screen and home the cursor.
pub const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[H";

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn summary(&self) -> &'static str {
        "clear the terminal screen"
    }

    fn usage(&self) -> &'static str {
        "clear"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("x").max(0))
    }

    async fn execute(&self, _ctx: CommandContext<'_>) -> CommandResult {
        Ok(CLEAR_SEQUENCE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::CLEAR_SEQUENCE;
    use crate::commands::testing::{run, session};

    #[tokio::test]
    async fn test_clear() {
        let mut s = session();
        assert_eq!(run(&mut s, "clear").await.unwrap(), CLEAR_SEQUENCE);
    }
}
