// src/commands/mv/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::cp::{destination, is_existing_dir};
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_create, can_unlink};
use crate::session::ShellSession;

pub struct MvCommand;

fn move_one(
    session: &mut ShellSession,
    source: &str,
    dest: &str,
    into_dir: bool,
    no_clobber: bool,
) -> Result<Option<String>, ShellError> {
    let src_segments = session.resolve(source);
    let src_is_dir = session
        .check_walk(&src_segments, &format!("mv: cannot stat '{}'", source))?
        .is_dir();
    let (target, shown) = destination(session, source, dest, into_dir);
    let denied = || ShellError::permission_denied(format!("mv: cannot move '{}' to '{}'", source, shown));

    if target == src_segments {
        return Err(ShellError::invalid(format!("mv: '{}' and '{}' are the same file", source, shown)));
    }
    if src_is_dir && target.starts_with(&src_segments) {
        return Err(ShellError::invalid(format!(
            "mv: cannot move '{}' to a subdirectory of itself, '{}'",
            source, shown
        )));
    }
    let (Some((src_name, src_parent)), Some((name, parent))) =
        (src_segments.split_last(), target.split_last())
    else {
        return Err(ShellError::invalid(format!("mv: cannot move '{}' to '{}'", source, shown)));
    };

    let user = session.user();
    let src_parent_node = session
        .node(src_parent)
        .ok_or_else(|| ShellError::no_such_file(format!("mv: cannot stat '{}'", source)))?;
    let src_node = src_parent_node
        .child(src_name)
        .ok_or_else(|| ShellError::no_such_file(format!("mv: cannot stat '{}'", source)))?;
    if !can_unlink(src_parent_node, src_node, user) {
        return Err(denied());
    }

    let parent_node = session.check_walk(parent, &format!("mv: cannot move '{}' to '{}'", source, shown))?;
    if !parent_node.is_dir() {
        return Err(ShellError::not_a_directory(format!("mv: cannot move '{}' to '{}'", source, shown)));
    }
    if !can_create(parent_node, user) {
        return Err(denied());
    }
    if let Some(existing) = parent_node.child(name) {
        if no_clobber {
            return Ok(None);
        }
        if existing.is_dir() && !src_is_dir {
            return Err(ShellError::invalid(format!(
                "mv: cannot overwrite directory '{}' with non-directory",
                shown
            )));
        }
        if !existing.is_dir() && src_is_dir {
            return Err(ShellError::invalid(format!(
                "mv: cannot overwrite non-directory '{}' with directory '{}'",
                shown, source
            )));
        }
        if existing.is_dir() && !existing.is_empty() {
            return Err(ShellError::directory_not_empty(format!(
                "mv: cannot move '{}' to '{}'",
                source, shown
            )));
        }
        if !can_unlink(parent_node, existing, user) {
            return Err(denied());
        }
    }

    let node = session.vfs.remove(src_parent, src_name).ok_or_else(denied)?;
    session.vfs.insert(parent, name, node).ok_or_else(denied)?;
    log::debug!("moved {} to {}", source, shown);
    Ok(Some(shown))
}

#[async_trait]
impl Command for MvCommand {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn summary(&self) -> &'static str {
        "move (rename) files"
    }

    fn usage(&self) -> &'static str {
        "mv [-fivn] SOURCE... DEST"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("fivn").min(2))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let verbose = ctx.args.has_flag('v');
        let no_clobber = ctx.args.has_flag('n');
        let Some((dest, sources)) = ctx.args.operands.split_last() else {
            return Err(ShellError::missing_operand("mv"));
        };

        let into_dir = is_existing_dir(ctx.session, dest);
        if sources.len() > 1 && !into_dir {
            return Err(ShellError::invalid(format!("mv: target '{}' is not a directory", dest)));
        }

        let mut out = String::new();
        let mut errors = Vec::new();
        for source in sources {
            match move_one(ctx.session, source, dest, into_dir, no_clobber) {
                Ok(Some(shown)) if verbose => {
                    out.push_str(&format!("renamed '{}' -> '{}'\n", source, shown));
                }
                Ok(_) => {}
                Err(e) => errors.push(e),
            }
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{content, run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_mv_rename() {
        let mut s = session();
        let before = content(&s, "README.txt");
        run(&mut s, "mv README.txt readme.md").await.unwrap();
        assert_eq!(content(&s, "readme.md"), before);
        assert!(!s.vfs.exists(&s.resolve("README.txt")));
    }

    #[tokio::test]
    async fn test_mv_into_directory_verbose() {
        let mut s = session();
        let out = run(&mut s, "mv -v README.txt documents/notes.md downloads").await.unwrap();
        assert_eq!(
            out,
            "renamed 'README.txt' -> 'downloads/README.txt'\nrenamed 'documents/notes.md' -> 'downloads/notes.md'\n"
        );
        assert!(s.vfs.exists(&s.resolve("downloads/notes.md")));
        assert!(!s.vfs.exists(&s.resolve("documents/notes.md")));
    }

    #[tokio::test]
    async fn test_mv_directory_keeps_subtree() {
        let mut s = session();
        run(&mut s, "mv projects work").await.unwrap();
        assert!(content(&s, "work/game_dev/main.py").is_some());
    }

    #[tokio::test]
    async fn test_mv_into_own_subdirectory() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "mv projects projects/game_dev").await,
            Err(ShellError::invalid(
                "mv: cannot move 'projects' to a subdirectory of itself, 'projects/game_dev/projects'"
            ))
        );
    }

    #[tokio::test]
    async fn test_mv_missing_source_continues() {
        let mut s = session();
        let err = run(&mut s, "mv nope README.txt downloads").await.unwrap_err();
        assert_eq!(
            err,
            ShellError::no_such_file("mv: cannot stat 'nope'")
        );
        assert!(s.vfs.exists(&s.resolve("downloads/README.txt")));
    }

    #[tokio::test]
    async fn test_mv_no_clobber() {
        let mut s = session();
        let notes = content(&s, "documents/notes.md");
        run(&mut s, "mv -n README.txt documents/notes.md").await.unwrap();
        assert_eq!(content(&s, "documents/notes.md"), notes);
        assert!(s.vfs.exists(&s.resolve("README.txt")));
    }

    #[tokio::test]
    async fn test_mv_permission_and_sticky() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "mv /etc/hostname here").await,
            Err(ShellError::permission_denied("mv: cannot move '/etc/hostname' to 'here'"))
        );
        s.switch_user("guest").unwrap();
        run(&mut s, "touch /tmp/guest.txt").await.unwrap();
        s.switch_user("user").unwrap();
        assert_eq!(
            run(&mut s, "mv /tmp/guest.txt mine.txt").await,
            Err(ShellError::permission_denied("mv: cannot move '/tmp/guest.txt' to 'mine.txt'"))
        );
    }

    #[tokio::test]
    async fn test_mv_onto_non_empty_directory() {
        let mut s = session();
        run(&mut s, "mkdir -p box/documents").await.unwrap();
        run(&mut s, "touch box/documents/x").await.unwrap();
        assert_eq!(
            run(&mut s, "mv documents box").await,
            Err(ShellError::directory_not_empty("mv: cannot move 'documents' to 'box/documents'"))
        );
    }
}
