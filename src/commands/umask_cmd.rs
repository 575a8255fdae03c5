// src/commands/umask_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::Umask;

pub struct UmaskCommand;

#[async_trait]
impl Command for UmaskCommand {
    fn name(&self) -> &'static str {
        "umask"
    }

    fn summary(&self) -> &'static str {
        "display or set the file mode creation mask"
    }

    fn usage(&self) -> &'static str {
        "umask [-S] [MODE]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("S").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        match ctx.args.operands.first() {
            None if ctx.args.has_flag('S') => Ok(format!("{}\n", ctx.session.umask.symbolic())),
            None => Ok(format!("{}\n", ctx.session.umask)),
            Some(mode) => {
                let mask = Umask::parse(mode).map_err(|_| {
                    ShellError::invalid(format!("bash: umask: {}: octal number out of range", mode))
                })?;
                log::debug!("umask {} -> {}", ctx.session.umask, mask);
                ctx.session.umask = mask;
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{mode, run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_umask_show_and_set() {
        let mut s = session();
        assert_eq!(run(&mut s, "umask").await.unwrap(), "0022\n");
        assert_eq!(run(&mut s, "umask -S").await.unwrap(), "u=rwx,g=rx,o=rx\n");
        run(&mut s, "umask 077").await.unwrap();
        assert_eq!(run(&mut s, "umask").await.unwrap(), "0077\n");
        run(&mut s, "touch private.txt").await.unwrap();
        run(&mut s, "mkdir private").await.unwrap();
        assert_eq!(mode(&s, "private.txt"), Some(0o600));
        assert_eq!(mode(&s, "private"), Some(0o700));
    }

    #[tokio::test]
    async fn test_umask_rejects_bad_mask() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "umask 089").await,
            Err(ShellError::invalid("bash: umask: 089: octal number out of range"))
        );
        assert_eq!(run(&mut s, "umask").await.unwrap(), "0022\n");
    }
}
