// src/commands/whoami_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct WhoamiCommand;

#[async_trait]
impl Command for WhoamiCommand {
    fn name(&self) -> &'static str {
        "whoami"
    }

    fn summary(&self) -> &'static str {
        "print effective user name"
    }

    fn usage(&self) -> &'static str {
        "whoami"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").max(0))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        Ok(format!("{}\n", ctx.session.users.current_name()))
    }
}
