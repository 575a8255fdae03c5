// src/commands/pwd/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct PwdCommand;

#[async_trait]
impl Command for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn summary(&self) -> &'static str {
        "print name of current/working directory"
    }

    fn usage(&self) -> &'static str {
        "pwd"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("LP").max(0))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        // No symlinks, so -L and -P agree.
        Ok(format!("{}\n", ctx.session.cwd_display()))
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_pwd_default() {
        let mut s = session();
        assert_eq!(run(&mut s, "pwd").await.unwrap(), "/home/user\n");
    }

    #[tokio::test]
    async fn test_pwd_root() {
        let mut s = session();
        run(&mut s, "cd /").await.unwrap();
        assert_eq!(run(&mut s, "pwd -P").await.unwrap(), "/\n");
    }

    #[tokio::test]
    async fn test_pwd_rejects_operands() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "pwd extra").await,
            Err(ShellError::extra_operand("pwd", "extra"))
        );
    }
}
