// src/commands/reset_cmd.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext, CommandResult};

pub struct ResetCommand;

const WARNING: &str = "This will reset your entire filesystem to default. All files you created will be lost!\n\
To confirm, run: reset --confirm\n";

fn storage_info(ctx: &CommandContext<'_>) -> String {
    let session = &*ctx.session;
    let nodes = session.vfs.root().count_nodes();
    let saved = match (&session.config.state_dir, session.last_saved_bytes) {
        (None, _) => "persistence disabled".to_string(),
        (Some(dir), Some(bytes)) => format!("{} bytes in {}", bytes, dir.display()),
        (Some(dir), None) => format!("nothing saved yet in {}", dir.display()),
    };
    format!(
        "Filesystem: {} nodes\nHistory: {} entries\nSaved state: {}\n",
        nodes,
        session.history.len(),
        saved
    )
}

#[async_trait]
impl Command for ResetCommand {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn summary(&self) -> &'static str {
        "restore the default filesystem and clear history"
    }

    fn usage(&self) -> &'static str {
        "reset [--confirm | --info]"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.has_long("info") || ctx.args.has_flag('i') {
            return Ok(storage_info(&ctx));
        }
        if !ctx.args.has_long("confirm") {
            return Ok(WARNING.to_string());
        }
        log::info!("resetting session state");
        ctx.session.reset();
        Ok("Filesystem reset successful!\n".to_string())
    }
}
