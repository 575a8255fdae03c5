// src/commands/touch/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, can_create, is_owner_or_root, Access};
use crate::session::ShellSession;

pub struct TouchCommand;

fn touch_one(session: &mut ShellSession, path: &str, no_create: bool) -> Result<(), ShellError> {
    let context = format!("touch: cannot touch '{}'", path);
    let segments = session.resolve(path);
    match session.check_walk(&segments, &context) {
        Ok(node) => {
            let user = session.user();
            if !is_owner_or_root(node, user) && !can_access(node, user, Access::Write) {
                return Err(ShellError::permission_denied(context));
            }
            if let Some(node) = session.vfs.get_node_mut(&segments) {
                node.touch();
            }
            Ok(())
        }
        Err(ShellError::NoSuchFile { .. }) if no_create => Ok(()),
        Err(ShellError::NoSuchFile { .. }) => {
            let (parent, name) = session.lookup_parent(path, &context)?;
            let dir = session.check_walk(&parent, &context)?;
            if !can_create(dir, session.user()) {
                return Err(ShellError::permission_denied(context));
            }
            let node = session.new_file("");
            session
                .vfs
                .insert(&parent, &name, node)
                .ok_or_else(|| ShellError::not_a_directory(context))?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[async_trait]
impl Command for TouchCommand {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn summary(&self) -> &'static str {
        "change file timestamps, creating empty files as needed"
    }

    fn usage(&self) -> &'static str {
        "touch [-acm] FILE..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("amc").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let no_create = ctx.args.has_flag('c');
        let mut errors = Vec::new();
        for path in &ctx.args.operands {
            if let Err(e) = touch_one(ctx.session, path, no_create) {
                errors.push(e);
            }
        }
        ShellError::collect(String::new(), errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{content, mode, run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_touch_creates_empty_file() {
        let mut s = session();
        run(&mut s, "touch a.txt b.txt").await.unwrap();
        assert_eq!(content(&s, "a.txt").as_deref(), Some(""));
        assert_eq!(mode(&s, "b.txt"), Some(0o644));
    }

    #[tokio::test]
    async fn test_touch_existing_keeps_content() {
        let mut s = session();
        let before = s.node(&s.resolve("README.txt")).unwrap().clone();
        run(&mut s, "touch README.txt").await.unwrap();
        let after = s.node(&s.resolve("README.txt")).unwrap();
        assert_eq!(after.content(), before.content());
        assert!(after.modified >= before.modified);
    }

    #[tokio::test]
    async fn test_touch_no_create() {
        let mut s = session();
        run(&mut s, "touch -c ghost").await.unwrap();
        assert!(!s.vfs.exists(&s.resolve("ghost")));
    }

    #[tokio::test]
    async fn test_touch_errors() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "touch /etc/x").await,
            Err(ShellError::permission_denied("touch: cannot touch '/etc/x'"))
        );
        assert_eq!(
            run(&mut s, "touch nodir/x").await,
            Err(ShellError::no_such_file("touch: cannot touch 'nodir/x'"))
        );
        assert_eq!(run(&mut s, "touch").await, Err(ShellError::missing_operand("touch")));
    }

    #[tokio::test]
    async fn test_touch_respects_umask() {
        let mut s = session();
        run(&mut s, "umask 027").await.unwrap();
        run(&mut s, "touch locked").await.unwrap();
        assert_eq!(mode(&s, "locked"), Some(0o640));
    }
}
