use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, Access};

pub struct CdCommand;

#[async_trait]
impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn summary(&self) -> &'static str {
        "change the working directory"
    }

    fn usage(&self) -> &'static str {
        "cd [-L|-P] [DIR|-]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("LP").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let session = ctx.session;
        let target = ctx.args.operands.first().map(String::as_str);

        let (path, announce) = match target {
            None => (String::from("~"), false),
            Some("-") => match session.env.get("OLDPWD") {
                Some(old) => (old.to_string(), true),
                None => return Err(ShellError::invalid("bash: cd: OLDPWD not set")),
            },
            Some(p) => (p.to_string(), false),
        };

        let context = format!("bash: cd: {}", path);
        let segments = session.resolve(&path);
        let node = session.check_walk(&segments, &context)?;
        if !node.is_dir() {
            return Err(ShellError::not_a_directory(context));
        }
        if !can_access(node, session.user(), Access::Execute) {
            return Err(ShellError::permission_denied(context));
        }

        session.set_cwd(segments);
        if announce {
            Ok(format!("{}\n", session.cwd_display()))
        } else {
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{run, session};

    #[tokio::test]
    async fn test_cd_relative_and_parent() {
        let mut s = session();
        run(&mut s, "cd documents").await.unwrap();
        assert_eq!(s.cwd_display(), "/home/user/documents");
        run(&mut s, "cd ../..").await.unwrap();
        assert_eq!(s.cwd_display(), "/home");
        run(&mut s, "cd ../../..").await.unwrap();
        assert_eq!(s.cwd_display(), "/");
    }

    #[tokio::test]
    async fn test_cd_home_and_dash() {
        let mut s = session();
        run(&mut s, "cd /tmp").await.unwrap();
        assert_eq!(s.env.get("OLDPWD"), Some("/home/user"));
        run(&mut s, "cd").await.unwrap();
        assert_eq!(s.cwd_display(), "/home/user");
        let out = run(&mut s, "cd -").await.unwrap();
        assert_eq!(out, "/tmp\n");
        assert_eq!(s.env.get("PWD"), Some("/tmp"));
    }

    #[tokio::test]
    async fn test_cd_errors() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "cd nowhere").await,
            Err(ShellError::no_such_file("bash: cd: nowhere"))
        );
        assert_eq!(
            run(&mut s, "cd README.txt").await,
            Err(ShellError::not_a_directory("bash: cd: README.txt"))
        );
        assert_eq!(
            run(&mut s, "cd /root").await,
            Err(ShellError::permission_denied("bash: cd: /root"))
        );
        assert!(matches!(run(&mut s, "cd a b").await, Err(ShellError::ExtraOperand { .. })));
        assert_eq!(s.cwd_display(), "/home/user");
    }
}
