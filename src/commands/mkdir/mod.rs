// src/commands/mkdir/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::display_path;
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_create, parse_mode};
use crate::session::ShellSession;

pub struct MkdirCommand;

struct MkdirOptions {
    parents: bool,
    verbose: bool,
    mode: Option<u32>,
}

fn created(path: &str) -> String {
    format!("mkdir: created directory '{}'\n", path)
}

fn create_one(
    session: &mut ShellSession,
    path: &str,
    opts: &MkdirOptions,
    out: &mut String,
) -> Result<(), ShellError> {
    let context = format!("mkdir: cannot create directory '{}'", path);
    let segments = session.resolve(path);
    if segments.is_empty() {
        return if opts.parents { Ok(()) } else { Err(ShellError::file_exists(context)) };
    }

    let last = segments.len() - 1;
    let first_new = if opts.parents { 0 } else { last };
    for i in first_new..=last {
        let parent = &segments[..i];
        let name = &segments[i];
        let dir = session.check_walk(parent, &context)?;
        if !dir.is_dir() {
            return Err(ShellError::not_a_directory(context));
        }
        match dir.child(name) {
            Some(existing) if existing.is_dir() && opts.parents => continue,
            Some(_) => return Err(ShellError::file_exists(context)),
            None => {}
        }
        if !can_create(dir, session.user()) {
            return Err(ShellError::permission_denied(context));
        }

        let mut node = session.new_dir();
        if i == last {
            if let Some(mode) = opts.mode {
                node.permissions = mode;
            }
        }
        session
            .vfs
            .insert(parent, name, node)
            .ok_or_else(|| ShellError::not_a_directory(context.clone()))?;
        if opts.verbose {
            let shown = if i == last { path.to_string() } else { display_path(&segments[..=i]) };
            out.push_str(&created(&shown));
        }
    }
    Ok(())
}

#[async_trait]
impl Command for MkdirCommand {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn summary(&self) -> &'static str {
        "make directories"
    }

    fn usage(&self) -> &'static str {
        "mkdir [-pv] [-m MODE] DIRECTORY..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("pvm").values("m").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mode = match ctx.args.value('m') {
            Some(m) => Some(parse_mode(m, 0o777, true).map_err(|_| ShellError::invalid_mode("mkdir", m))?),
            None => None,
        };
        let opts = MkdirOptions {
            parents: ctx.args.has_flag('p'),
            verbose: ctx.args.has_flag('v'),
            mode,
        };

        let mut out = String::new();
        let mut errors = Vec::new();
        for path in &ctx.args.operands {
            if let Err(e) = create_one(ctx.session, path, &opts, &mut out) {
                errors.push(e);
            }
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{mode, run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_mkdir_simple() {
        let mut s = session();
        run(&mut s, "mkdir newdir").await.unwrap();
        let node = s.node(&s.resolve("newdir")).unwrap();
        assert!(node.is_dir());
        assert_eq!(node.owner, "user");
        assert_eq!(node.permissions, 0o755);
    }

    #[tokio::test]
    async fn test_mkdir_existing_and_missing_parent() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "mkdir documents").await,
            Err(ShellError::file_exists("mkdir: cannot create directory 'documents'"))
        );
        assert_eq!(
            run(&mut s, "mkdir a/b").await,
            Err(ShellError::no_such_file("mkdir: cannot create directory 'a/b'"))
        );
    }

    #[tokio::test]
    async fn test_mkdir_parents_is_idempotent() {
        let mut s = session();
        run(&mut s, "mkdir -p a/b/c").await.unwrap();
        run(&mut s, "mkdir -p a/b/c").await.unwrap();
        assert!(s.node(&s.resolve("a/b/c")).map_or(false, |n| n.is_dir()));
    }

    #[tokio::test]
    async fn test_mkdir_parents_through_file_fails_every_time() {
        let mut s = session();
        run(&mut s, "touch f").await.unwrap();
        for _ in 0..2 {
            assert!(run(&mut s, "mkdir -p f/b/c").await.is_err());
        }
        run(&mut s, "mkdir -p x").await.unwrap();
        run(&mut s, "touch x/y").await.unwrap();
        for _ in 0..2 {
            assert_eq!(
                run(&mut s, "mkdir -p x/y/z").await,
                Err(ShellError::file_exists("mkdir: cannot create directory 'x/y/z'"))
            );
        }
    }

    #[tokio::test]
    async fn test_mkdir_mode_and_verbose() {
        let mut s = session();
        let out = run(&mut s, "mkdir -v -m 700 private").await.unwrap();
        assert_eq!(out, "mkdir: created directory 'private'\n");
        assert_eq!(mode(&s, "private"), Some(0o700));
        run(&mut s, "mkdir -m u=rwx,go= sym").await.unwrap();
        assert_eq!(mode(&s, "sym"), Some(0o700));
        assert!(matches!(
            run(&mut s, "mkdir -m 9z bad").await,
            Err(ShellError::InvalidMode { .. })
        ));
    }

    #[tokio::test]
    async fn test_mkdir_permission_denied() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "mkdir /etc/app").await,
            Err(ShellError::permission_denied("mkdir: cannot create directory '/etc/app'"))
        );
    }

    #[tokio::test]
    async fn test_mkdir_partial_failure() {
        let mut s = session();
        let err = run(&mut s, "mkdir ok1 documents ok2").await.unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(s.vfs.exists(&s.resolve("ok1")));
        assert!(s.vfs.exists(&s.resolve("ok2")));
    }
}
