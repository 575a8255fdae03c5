// src/commands/su_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{dispatch, Command, CommandContext, CommandResult, Invocation};
use crate::interpreter::errors::ShellError;

pub struct SuCommand;
pub struct SudoCommand;

#[async_trait]
impl Command for SuCommand {
    fn name(&self) -> &'static str {
        "su"
    }

    fn summary(&self) -> &'static str {
        "switch user (root by default)"
    }

    fn usage(&self) -> &'static str {
        "su [-l] [-] [USER]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("l").max(2))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let names: Vec<&String> = ctx.args.operands.iter().filter(|a| *a != "-").collect();
        if names.len() > 1 {
            return Err(ShellError::extra_operand("su", names[1]));
        }
        let target = names.first().map_or("root", |n| n.as_str());
        ctx.session.switch_user(target)?;
        Ok(String::new())
    }
}

#[async_trait]
impl Command for SudoCommand {
    fn name(&self) -> &'static str {
        "sudo"
    }

    fn summary(&self) -> &'static str {
        "execute a command as root"
    }

    fn usage(&self) -> &'static str {
        "sudo COMMAND [ARG]..."
    }

    /// Runs the inner command with root as the current user, then puts the
    /// caller back unless the inner command switched users itself.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some((name, args)) = ctx.raw_args.split_first() else {
            return Err(ShellError::invalid("usage: sudo COMMAND [ARG]..."));
        };
        let caller = ctx.session.users.current_name().to_string();
        if !ctx.session.user().can_sudo() {
            return Err(ShellError::invalid(format!(
                "{} is not in the sudoers file.  This incident will be reported.",
                caller
            )));
        }
        if !ctx.registry.contains(name) {
            return Err(ShellError::invalid(format!("sudo: {}: command not found", name)));
        }

        let session = &mut *ctx.session;
        session
            .users
            .set_current("root")
            .map_err(|e| ShellError::invalid(format!("sudo: {}", e)))?;
        log::info!("sudo: {} ran {}", caller, name);

        let invocation = Invocation::new(name.clone(), args.to_vec()).with_stdin(ctx.stdin.clone());
        let result = dispatch(session, ctx.registry, invocation).await;

        if session.users.current_name() == "root" && session.users.contains(&caller) {
            let _ = session.users.set_current(&caller);
        }
        result
    }
}
