// src/commands/find/mod.rs
pub mod parser;

use async_trait::async_trait;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::FsNode;
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, Access};
use crate::users::User;
use parser::{parse_arguments, Filters};

pub struct FindCommand;

struct Search<'a> {
    filters: &'a Filters,
    user: &'a User,
    matches: Vec<String>,
    errors: Vec<ShellError>,
}

impl Search<'_> {
    fn visit(&mut self, node: &FsNode, name: &str, path: &str, depth: usize) {
        if depth >= self.filters.min_depth && self.filters.matches(name, node) {
            self.matches.push(path.to_string());
        }
        let Some(children) = node.children() else {
            return;
        };
        if self.filters.max_depth.map_or(false, |max| depth >= max) {
            return;
        }
        if !can_access(node, self.user, Access::Read) || !can_access(node, self.user, Access::Execute) {
            self.errors.push(ShellError::permission_denied(format!("find: '{}'", path)));
            return;
        }
        for (child_name, child) in children {
            let child_path = if path.ends_with('/') {
                format!("{}{}", path, child_name)
            } else {
                format!("{}/{}", path, child_name)
            };
            self.visit(child, child_name, &child_path, depth + 1);
        }
    }
}

#[async_trait]
impl Command for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn summary(&self) -> &'static str {
        "search for files in a directory hierarchy"
    }

    fn usage(&self) -> &'static str {
        "find [PATH...] [-type f|d] [-name PATTERN] [-iname PATTERN] [-size [+-]N[ckMG]] [-perm [-/]MODE] [-user NAME] [-group NAME] [-empty] [-maxdepth N] [-mindepth N]"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let (paths, filters) = parse_arguments(&ctx.raw_args)?;
        let session = &*ctx.session;
        let mut search = Search { filters: &filters, user: session.user(), matches: Vec::new(), errors: Vec::new() };

        for path in &paths {
            let segments = session.resolve(path);
            match session.check_walk(&segments, &format!("find: '{}'", path)) {
                Ok(node) => {
                    let name = segments.last().map_or("/", |s| s.as_str());
                    search.visit(node, name, path, 0);
                }
                Err(e) => search.errors.push(e),
            }
        }

        let mut out = search.matches.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        ShellError::collect(out, search.errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_find_by_name() {
        let mut s = session();
        let out = run(&mut s, "find . -name *.md").await.unwrap();
        assert_eq!(out, "./documents/notes.md\n");
        let out = run(&mut s, "find projects -type f -name *.js").await.unwrap();
        assert_eq!(out, "projects/my_blog/script.js\n");
    }

    #[tokio::test]
    async fn test_find_includes_start_directory() {
        let mut s = session();
        let out = run(&mut s, "find documents").await.unwrap();
        assert_eq!(out, "documents\ndocuments/notes.md\ndocuments/report.txt\n");
    }

    #[tokio::test]
    async fn test_find_size_only_files() {
        let mut s = session();
        let out = run(&mut s, "find . -type f -size +100").await.unwrap();
        assert_eq!(out, "./projects/my_blog/index.html\n");
    }

    #[tokio::test]
    async fn test_find_empty_and_depth() {
        let mut s = session();
        let out = run(&mut s, "find . -empty").await.unwrap();
        assert_eq!(out, "./downloads\n./projects/game_dev/assets\n");
        let out = run(&mut s, "find . -maxdepth 1 -type d").await.unwrap();
        assert_eq!(out, ".\n./documents\n./downloads\n./projects\n");
        let out = run(&mut s, "find . -mindepth 3 -type d").await.unwrap();
        assert_eq!(out, "./projects/game_dev/assets\n");
    }

    #[tokio::test]
    async fn test_find_perm_and_user() {
        let mut s = session();
        run(&mut s, "touch run.sh").await.unwrap();
        run(&mut s, "chmod 755 run.sh").await.unwrap();
        let out = run(&mut s, "find . -type f -perm 755").await.unwrap();
        assert_eq!(out, "./run.sh\n");
        let out = run(&mut s, "find /etc -user root -name host*").await.unwrap();
        assert_eq!(out, "/etc/hostname\n");
    }

    #[tokio::test]
    async fn test_find_skips_unsearchable_directories() {
        let mut s = session();
        let err = run(&mut s, "find / -name secret").await.unwrap_err();
        assert_eq!(err, ShellError::permission_denied("find: '/root'"));
    }

    #[tokio::test]
    async fn test_find_missing_path() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "find nope").await,
            Err(ShellError::no_such_file("find: 'nope'"))
        );
    }

    #[tokio::test]
    async fn test_find_huge_size_is_rejected() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "find . -size +99999999999999G").await,
            Err(ShellError::invalid("find: invalid argument `+99999999999999G' to `-size'"))
        );
    }
}
