// src/commands/locate_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct LocateCommand;

#[async_trait]
impl Command for LocateCommand {
    fn name(&self) -> &'static str {
        "locate"
    }

    fn summary(&self) -> &'static str {
        "find files by name"
    }

    fn usage(&self) -> &'static str {
        "locate [-ib] PATTERN..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("ib").min(1))
    }

    /// Case-insensitive substring search over every path in the tree,
    /// ignoring permissions like a prebuilt database would.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let basename_only = ctx.args.has_flag('b');
        let patterns: Vec<String> = ctx.args.operands.iter().map(|p| p.to_lowercase()).collect();

        let mut out = String::new();
        for path in ctx.session.vfs.all_paths().into_iter().skip(1) {
            let target = if basename_only {
                path.rsplit('/').next().unwrap_or(&path).to_lowercase()
            } else {
                path.to_lowercase()
            };
            if patterns.iter().any(|p| target.contains(p.as_str())) {
                out.push_str(&path);
                out.push('\n');
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};

    #[tokio::test]
    async fn test_locate_substring() {
        let mut s = session();
        let out = run(&mut s, "locate NOTES").await.unwrap();
        assert_eq!(out, "/home/user/documents/notes.md\n");
    }

    #[tokio::test]
    async fn test_locate_basename() {
        let mut s = session();
        let all = run(&mut s, "locate user").await.unwrap();
        assert!(all.lines().count() > 5);
        let base = run(&mut s, "locate -b user").await.unwrap();
        assert_eq!(base, "/home/user\n");
    }
}
