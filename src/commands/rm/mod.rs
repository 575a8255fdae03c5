// src/commands/rm/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, can_unlink, Access};
use crate::session::ShellSession;

pub struct RmCommand;

struct RmOptions {
    recursive: bool,
    force: bool,
    empty_dirs: bool,
    verbose: bool,
}

fn cannot_remove(path: &str) -> String {
    format!("rm: cannot remove '{}'", path)
}

/// Unlink `segments` (shown as `display`) after removing its contents.
///
/// Failures are recorded per node and do not stop siblings. Returns whether
/// the node itself is gone.
fn remove_tree(
    session: &mut ShellSession,
    segments: &[String],
    display: &str,
    opts: &RmOptions,
    out: &mut String,
    errors: &mut Vec<ShellError>,
) -> bool {
    let Some((name, parent_segments)) = segments.split_last() else {
        return false;
    };
    let Some(node) = session.node(segments) else {
        return false;
    };
    let is_dir = node.is_dir();

    if is_dir {
        let names: Vec<String> = node.children().map(|c| c.keys().cloned().collect()).unwrap_or_default();
        if !names.is_empty() {
            let user = session.user();
            if !can_access(node, user, Access::Read) || !can_access(node, user, Access::Execute) {
                errors.push(ShellError::permission_denied(cannot_remove(display)));
                return false;
            }
        }
        let mut all_removed = true;
        for child in names {
            let mut child_segments = segments.to_vec();
            child_segments.push(child.clone());
            let child_display = format!("{}/{}", display.trim_end_matches('/'), child);
            all_removed &= remove_tree(session, &child_segments, &child_display, opts, out, errors);
        }
        if !all_removed {
            return false;
        }
    }

    let (Some(parent), Some(node)) = (session.node(parent_segments), session.node(segments)) else {
        return false;
    };
    if !can_unlink(parent, node, session.user()) {
        errors.push(ShellError::permission_denied(cannot_remove(display)));
        return false;
    }
    session.vfs.remove(parent_segments, name);
    if opts.verbose {
        if is_dir {
            out.push_str(&format!("removed directory '{}'\n", display));
        } else {
            out.push_str(&format!("removed '{}'\n", display));
        }
    }
    true
}

fn remove_operand(
    session: &mut ShellSession,
    path: &str,
    opts: &RmOptions,
    out: &mut String,
    errors: &mut Vec<ShellError>,
) {
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    if last == "." || last == ".." {
        errors.push(ShellError::invalid(format!(
            "rm: refusing to remove '.' or '..' directory: skipping '{}'",
            path
        )));
        return;
    }
    let segments = session.resolve(path);
    if segments.is_empty() {
        errors.push(ShellError::invalid(
            "rm: it is dangerous to operate recursively on '/'\nrm: use --no-preserve-root to override this failsafe",
        ));
        return;
    }

    let node = match session.check_walk(&segments, &cannot_remove(path)) {
        Ok(node) => node,
        Err(ShellError::NoSuchFile { .. }) if opts.force => return,
        Err(e) => {
            errors.push(e);
            return;
        }
    };
    if node.is_dir() && !opts.recursive && !(opts.empty_dirs && node.is_empty()) {
        errors.push(ShellError::is_a_directory(cannot_remove(path)));
        return;
    }
    remove_tree(session, &segments, path, opts, out, errors);
}

#[async_trait]
impl Command for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn summary(&self) -> &'static str {
        "remove files or directories"
    }

    fn usage(&self) -> &'static str {
        "rm [-rRfdv] FILE..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("rfivdR").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let opts = RmOptions {
            recursive: ctx.args.has_any("rR"),
            force: ctx.args.has_flag('f'),
            empty_dirs: ctx.args.has_flag('d'),
            verbose: ctx.args.has_flag('v'),
        };
        let mut out = String::new();
        let mut errors = Vec::new();
        for path in &ctx.args.operands {
            remove_operand(ctx.session, path, &opts, &mut out, &mut errors);
        }
        ShellError::collect(out, errors)
    }
}
