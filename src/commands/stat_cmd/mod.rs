// src/commands/stat_cmd/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::format_time;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{display_path, FsNode};
use crate::interpreter::errors::ShellError;
use crate::permissions::format_mode;
use crate::session::ShellSession;

pub struct StatCommand;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

fn links(node: &FsNode) -> usize {
    match node.children() {
        Some(children) => 2 + children.values().filter(|c| c.is_dir()).count(),
        None => 1,
    }
}

fn describe(session: &ShellSession, path: &str, segments: &[String], node: &FsNode) -> String {
    let uid = session.users.get(&node.owner).map_or(0, |u| u.uid);
    let gid = session.users.group(&node.group).map_or(0, |g| g.gid);
    let kind = if node.is_dir() { "directory" } else { "regular file" };
    let blocks = node.size.div_ceil(4096) * 8;
    let shown = if path.starts_with('/') { path.to_string() } else { display_path(segments) };

    format!(
        "  File: {}\n  Size: {:<15} Blocks: {:<10} IO Block: 4096   {}\nDevice: 801h/2049d      Links: {}\nAccess: ({:04o}/{})  Uid: ({:>5}/{:>8})   Gid: ({:>5}/{:>8})\nAccess: {}\nModify: {}\nChange: {}\n Birth: {}\n",
        shown,
        node.size,
        blocks,
        kind,
        links(node),
        node.permissions,
        format_mode(node.permissions, node.is_dir()),
        uid,
        node.owner,
        gid,
        node.group,
        format_time(node.modified, TIME_FORMAT),
        format_time(node.modified, TIME_FORMAT),
        format_time(node.modified, TIME_FORMAT),
        format_time(node.created, TIME_FORMAT),
    )
}

#[async_trait]
impl Command for StatCommand {
    fn name(&self) -> &'static str {
        "stat"
    }

    fn summary(&self) -> &'static str {
        "display file status"
    }

    fn usage(&self) -> &'static str {
        "stat FILE..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let session = &*ctx.session;
        let mut out = String::new();
        let mut errors = Vec::new();
        for path in &ctx.args.operands {
            let segments = session.resolve(path);
            match session.check_walk(&segments, &format!("stat: cannot stat '{}'", path)) {
                Ok(node) => out.push_str(&describe(session, path, &segments, node)),
                Err(e) => errors.push(e),
            }
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_stat_directory() {
        let mut s = session();
        let out = run(&mut s, "stat documents").await.unwrap();
        assert!(out.starts_with("  File: /home/user/documents\n"));
        assert!(out.contains("directory\n"));
        assert!(out.contains("Access: (0755/drwxr-xr-x)  Uid: ( 1000/    user)   Gid: ( 1000/    user)\n"));
    }

    #[tokio::test]
    async fn test_stat_special_bits() {
        let mut s = session();
        run(&mut s, "touch f").await.unwrap();
        run(&mut s, "chmod 4755 f").await.unwrap();
        let out = run(&mut s, "stat f").await.unwrap();
        assert!(out.contains("Access: (4755/-rwsr-xr-x)"));
        run(&mut s, "chmod 4655 f").await.unwrap();
        let out = run(&mut s, "stat f").await.unwrap();
        assert!(out.contains("Access: (4655/-rwSr-xr-x)"));
    }

    #[tokio::test]
    async fn test_stat_missing() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "stat nope").await,
            Err(ShellError::no_such_file("stat: cannot stat 'nope'"))
        );
        assert!(matches!(run(&mut s, "stat").await, Err(ShellError::MissingOperand { .. })));
    }
}
