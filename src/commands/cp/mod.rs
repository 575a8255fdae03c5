// src/commands/cp/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{FsNode, NodeData};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, can_create, can_unlink, Access};
use crate::session::ShellSession;

pub struct CpCommand;

struct CpOptions {
    recursive: bool,
    force: bool,
    preserve: bool,
    verbose: bool,
}

/// Where `source` lands for destination operand `dest`: inside it when
/// `into_dir`, otherwise at `dest` itself. Returns segments and display form.
pub(crate) fn destination(
    session: &ShellSession,
    source: &str,
    dest: &str,
    into_dir: bool,
) -> (Vec<String>, String) {
    let mut segments = session.resolve(dest);
    if !into_dir {
        return (segments, dest.to_string());
    }
    let base = session
        .resolve(source)
        .last()
        .cloned()
        .unwrap_or_else(|| source.to_string());
    segments.push(base.clone());
    let display = if dest.ends_with('/') {
        format!("{}{}", dest, base)
    } else {
        format!("{}/{}", dest, base)
    };
    (segments, display)
}

/// Whether `dest` names an existing directory the caller can see.
pub(crate) fn is_existing_dir(session: &ShellSession, dest: &str) -> bool {
    let segments = session.resolve(dest);
    session.check_walk(&segments, "").map_or(false, |n| n.is_dir())
}

/// Deep copy of `src` owned by the current user.
///
/// Unreadable files and directories inside the tree are reported and left
/// out; everything else is copied.
fn copy_tree(
    session: &ShellSession,
    src: &FsNode,
    display: &str,
    preserve: bool,
    errors: &mut Vec<ShellError>,
) -> FsNode {
    let user = session.user();
    let mut copy = match &src.data {
        NodeData::File { content } => session.new_file(content),
        NodeData::Directory { children } => {
            let mut dir = session.new_dir();
            if !can_access(src, user, Access::Read) || !can_access(src, user, Access::Execute) {
                errors.push(ShellError::permission_denied(format!("cp: cannot access '{}'", display)));
            } else if let Some(out) = dir.children_mut() {
                for (name, child) in children {
                    let child_display = format!("{}/{}", display, name);
                    if child.is_file() && !can_access(child, user, Access::Read) {
                        errors.push(ShellError::permission_denied(format!(
                            "cp: cannot open '{}' for reading",
                            child_display
                        )));
                        continue;
                    }
                    out.insert(name.clone(), copy_tree(session, child, &child_display, preserve, errors));
                }
            }
            dir
        }
    };

    if preserve {
        copy.permissions = src.permissions;
        copy.modified = src.modified;
        if user.is_root() {
            copy.owner = src.owner.clone();
            copy.group = src.group.clone();
        }
    } else {
        copy.permissions = session.umask.apply(src.permissions & 0o777);
    }
    copy
}

/// Merge the children of a copied directory into the existing directory at
/// `target`. Every write is checked the way a fresh copy would be: new
/// entries need write and search on the directory, overwritten files need
/// write on the file. Failures are recorded and the remaining entries still
/// get copied.
fn merge_into(
    session: &mut ShellSession,
    target: &[String],
    shown: &str,
    children: std::collections::BTreeMap<String, FsNode>,
    preserve: bool,
    errors: &mut Vec<ShellError>,
) {
    for (name, child) in children {
        let child_shown = format!("{}/{}", shown, name.as_str());
        let mut child_target = target.to_vec();
        child_target.push(name.clone());
        let Some(dir) = session.node(target) else {
            errors.push(ShellError::no_such_file(format!("cp: cannot stat '{}'", shown)));
            return;
        };
        let user = session.user();
        match dir.child(&name) {
            Some(existing) if existing.is_dir() && child.is_dir() => {
                if !can_access(existing, user, Access::Execute) {
                    errors.push(ShellError::permission_denied(format!("cp: cannot access '{}'", child_shown)));
                    continue;
                }
                if let NodeData::Directory { children } = child.data {
                    merge_into(session, &child_target, &child_shown, children, preserve, errors);
                }
            }
            Some(existing) if existing.is_dir() => {
                errors.push(ShellError::invalid(format!(
                    "cp: cannot overwrite directory '{}' with non-directory",
                    child_shown
                )));
            }
            Some(_) if child.is_dir() => {
                errors.push(ShellError::invalid(format!(
                    "cp: cannot overwrite non-directory '{}' with directory",
                    child_shown
                )));
            }
            Some(existing) => {
                if !can_access(existing, user, Access::Write) {
                    errors.push(ShellError::permission_denied(format!(
                        "cp: cannot create regular file '{}'",
                        child_shown
                    )));
                    continue;
                }
                let content = child.content().unwrap_or_default().to_string();
                if let Some(node) = session.vfs.get_node_mut(&child_target) {
                    node.set_content(content);
                    if preserve {
                        node.permissions = child.permissions;
                        node.modified = child.modified;
                    }
                }
            }
            None => {
                if !can_create(dir, user) {
                    let kind = if child.is_dir() { "directory" } else { "regular file" };
                    errors.push(ShellError::permission_denied(format!(
                        "cp: cannot create {} '{}'",
                        kind, child_shown
                    )));
                    continue;
                }
                session.vfs.insert(target, &name, child);
            }
        }
    }
}

fn copy_one(
    session: &mut ShellSession,
    source: &str,
    dest: &str,
    into_dir: bool,
    opts: &CpOptions,
    out: &mut String,
    errors: &mut Vec<ShellError>,
) -> Result<(), ShellError> {
    let src_segments = session.resolve(source);
    let src = session
        .check_walk(&src_segments, &format!("cp: cannot stat '{}'", source))?
        .clone();
    if src.is_dir() && !opts.recursive {
        return Err(ShellError::invalid(format!(
            "cp: -r not specified; omitting directory '{}'",
            source
        )));
    }
    if src.is_file() && !can_access(&src, session.user(), Access::Read) {
        return Err(ShellError::permission_denied(format!("cp: cannot open '{}' for reading", source)));
    }

    let (target, shown) = destination(session, source, dest, into_dir);
    if target == src_segments {
        return Err(ShellError::invalid(format!("cp: '{}' and '{}' are the same file", source, shown)));
    }
    if src.is_dir() && target.starts_with(&src_segments) {
        return Err(ShellError::invalid(format!(
            "cp: cannot copy a directory, '{}', into itself, '{}'",
            source, shown
        )));
    }

    let create_context = if src.is_dir() {
        format!("cp: cannot create directory '{}'", shown)
    } else {
        format!("cp: cannot create regular file '{}'", shown)
    };
    let Some((name, parent)) = target.split_last() else {
        return Err(ShellError::invalid(format!("cp: cannot overwrite directory '{}'", shown)));
    };
    let parent_node = session.check_walk(parent, &create_context)?;
    if !parent_node.is_dir() {
        return Err(ShellError::not_a_directory(create_context));
    }

    match parent_node.child(name) {
        Some(existing) if existing.is_dir() && !src.is_dir() => {
            return Err(ShellError::invalid(format!(
                "cp: cannot overwrite directory '{}' with non-directory",
                shown
            )));
        }
        Some(existing) if !existing.is_dir() && src.is_dir() => {
            return Err(ShellError::invalid(format!(
                "cp: cannot overwrite non-directory '{}' with directory '{}'",
                shown, source
            )));
        }
        Some(existing) if existing.is_file() => {
            let user = session.user();
            let writable = can_access(existing, user, Access::Write);
            let replaceable = opts.force && can_unlink(parent_node, existing, user);
            if !writable && !replaceable {
                return Err(ShellError::permission_denied(create_context));
            }
            if writable {
                let content = src.content().unwrap_or_default().to_string();
                let node = session
                    .vfs
                    .get_node_mut(&target)
                    .ok_or_else(|| ShellError::no_such_file(create_context.clone()))?;
                node.set_content(content);
                if opts.preserve {
                    node.permissions = src.permissions;
                    node.modified = src.modified;
                }
            } else {
                let copy = copy_tree(session, &src, source, opts.preserve, errors);
                session.vfs.insert(parent, name, copy);
            }
        }
        Some(existing) => {
            if !can_access(existing, session.user(), Access::Execute) {
                return Err(ShellError::permission_denied(format!("cp: cannot access '{}'", shown)));
            }
            let copy = copy_tree(session, &src, source, opts.preserve, errors);
            if let NodeData::Directory { children } = copy.data {
                merge_into(session, &target, &shown, children, opts.preserve, errors);
            }
        }
        None => {
            if !can_create(parent_node, session.user()) {
                return Err(ShellError::permission_denied(create_context));
            }
            let copy = copy_tree(session, &src, source, opts.preserve, errors);
            session.vfs.insert(parent, name, copy);
        }
    }

    if opts.verbose {
        out.push_str(&format!("'{}' -> '{}'\n", source, shown));
    }
    Ok(())
}

#[async_trait]
impl Command for CpCommand {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn summary(&self) -> &'static str {
        "copy files and directories"
    }

    fn usage(&self) -> &'static str {
        "cp [-rRfvpa] SOURCE... DEST"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("rRfivpa").min(2))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let opts = CpOptions {
            recursive: ctx.args.has_any("rRa"),
            force: ctx.args.has_flag('f'),
            preserve: ctx.args.has_any("pa"),
            verbose: ctx.args.has_flag('v'),
        };
        let Some((dest, sources)) = ctx.args.operands.split_last() else {
            return Err(ShellError::missing_operand("cp"));
        };

        let into_dir = is_existing_dir(ctx.session, dest);
        if sources.len() > 1 && !into_dir {
            return Err(ShellError::invalid(format!("cp: target '{}' is not a directory", dest)));
        }

        let mut out = String::new();
        let mut errors = Vec::new();
        for source in sources {
            if let Err(e) = copy_one(ctx.session, source, dest, into_dir, &opts, &mut out, &mut errors) {
                errors.push(e);
            }
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{content, mode, run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_cp_file() {
        let mut s = session();
        run(&mut s, "cp README.txt copy.txt").await.unwrap();
        assert_eq!(content(&s, "copy.txt"), content(&s, "README.txt"));
    }

    #[tokio::test]
    async fn test_cp_into_directory() {
        let mut s = session();
        let out = run(&mut s, "cp -v README.txt documents/notes.md downloads").await.unwrap();
        assert_eq!(
            out,
            "'README.txt' -> 'downloads/README.txt'\n'documents/notes.md' -> 'downloads/notes.md'\n"
        );
        assert!(s.vfs.exists(&s.resolve("downloads/notes.md")));
    }

    #[tokio::test]
    async fn test_cp_directory_requires_recursive() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "cp documents backup").await,
            Err(ShellError::invalid("cp: -r not specified; omitting directory 'documents'"))
        );
        run(&mut s, "cp -r documents backup").await.unwrap();
        assert_eq!(content(&s, "backup/report.txt"), content(&s, "documents/report.txt"));
    }

    #[tokio::test]
    async fn test_cp_is_a_deep_copy() {
        let mut s = session();
        run(&mut s, "cp -r documents backup").await.unwrap();
        run(&mut s, "rm backup/notes.md").await.unwrap();
        assert!(s.vfs.exists(&s.resolve("documents/notes.md")));
    }

    #[tokio::test]
    async fn test_cp_into_itself() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "cp -r projects projects/game_dev").await,
            Err(ShellError::invalid(
                "cp: cannot copy a directory, 'projects', into itself, 'projects/game_dev/projects'"
            ))
        );
    }

    #[tokio::test]
    async fn test_cp_multiple_sources_need_directory() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "cp README.txt documents/notes.md nowhere").await,
            Err(ShellError::invalid("cp: target 'nowhere' is not a directory"))
        );
    }

    #[tokio::test]
    async fn test_cp_permissions() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "cp README.txt /etc/readme").await,
            Err(ShellError::permission_denied("cp: cannot create regular file '/etc/readme'"))
        );
        run(&mut s, "touch mine").await.unwrap();
        run(&mut s, "chmod 000 mine").await.unwrap();
        assert_eq!(
            run(&mut s, "cp mine again").await,
            Err(ShellError::permission_denied("cp: cannot open 'mine' for reading"))
        );
    }

    #[tokio::test]
    async fn test_cp_preserve_mode() {
        let mut s = session();
        run(&mut s, "touch script.sh").await.unwrap();
        run(&mut s, "chmod 750 script.sh").await.unwrap();
        run(&mut s, "cp script.sh plain.sh").await.unwrap();
        run(&mut s, "cp -p script.sh kept.sh").await.unwrap();
        assert_eq!(mode(&s, "plain.sh"), Some(0o750 & !0o022));
        assert_eq!(mode(&s, "kept.sh"), Some(0o750));
    }

    #[tokio::test]
    async fn test_cp_overwrites_existing_file() {
        let mut s = session();
        run(&mut s, "cp README.txt documents/notes.md").await.unwrap();
        assert_eq!(content(&s, "documents/notes.md"), content(&s, "README.txt"));
        assert_eq!(
            run(&mut s, "cp README.txt documents").await.map(|_| ()),
            Ok(())
        );
        assert_eq!(
            run(&mut s, "cp -r documents README.txt").await,
            Err(ShellError::invalid(
                "cp: cannot overwrite non-directory 'README.txt' with directory 'documents'"
            ))
        );
    }

    #[tokio::test]
    async fn test_cp_merge_into_foreign_directory_is_denied() {
        let mut s = session();
        run(&mut s, "mkdir guest").await.unwrap();
        run(&mut s, "touch guest/evil").await.unwrap();
        let err = run(&mut s, "cp -r guest /home").await.unwrap_err();
        assert_eq!(
            err.failures(),
            vec![&ShellError::permission_denied("cp: cannot create regular file '/home/guest/evil'")]
        );
        assert!(!s.vfs.exists(&s.resolve("/home/guest/evil")));
    }

    #[tokio::test]
    async fn test_cp_merge_checks_each_entry() {
        let mut s = session();
        run(&mut s, "mkdir -p src/sub dst/src/sub").await.unwrap();
        run(&mut s, "touch src/a src/locked src/sub/b dst/src/locked").await.unwrap();
        run(&mut s, "chmod 444 dst/src/locked").await.unwrap();
        let err = run(&mut s, "cp -r src dst").await.unwrap_err();
        assert_eq!(
            err.failures(),
            vec![&ShellError::permission_denied("cp: cannot create regular file 'dst/src/locked'")]
        );
        assert!(s.vfs.exists(&s.resolve("dst/src/a")));
        assert!(s.vfs.exists(&s.resolve("dst/src/sub/b")));
    }
}
