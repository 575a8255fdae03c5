// src/commands/utils/mod.rs
pub mod head_tail;

pub use head_tail::{get_head, get_tail, parse_count, run_head_tail, HeadTailOptions, HEAD_TAIL_SPEC};

use chrono::{Local, TimeZone};

use crate::commands::CommandContext;
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, can_create, Access};
use crate::session::ShellSession;

pub fn context(command: &str, path: &str) -> String {
    format!("{}: {}", command, path)
}

/// Contents of the regular file at `path`, after traversal and read checks.
pub fn read_file(session: &ShellSession, path: &str, command: &str) -> Result<String, ShellError> {
    let ctx = context(command, path);
    let segments = session.resolve(path);
    let node = session.check_walk(&segments, &ctx)?;
    if node.is_dir() {
        return Err(ShellError::is_a_directory(ctx));
    }
    if !can_access(node, session.user(), Access::Read) {
        return Err(ShellError::permission_denied(ctx));
    }
    Ok(node.content().unwrap_or_default().to_string())
}

/// Create or overwrite (or append to) a regular file.
///
/// An existing file needs write permission; a new one needs write and
/// search permission on its parent directory.
pub fn write_file(
    session: &mut ShellSession,
    path: &str,
    content: &str,
    append: bool,
    command: &str,
) -> Result<(), ShellError> {
    let ctx = context(command, path);
    let segments = session.resolve(path);
    match session.check_walk(&segments, &ctx) {
        Ok(node) => {
            if node.is_dir() {
                return Err(ShellError::is_a_directory(ctx));
            }
            if !can_access(node, session.user(), Access::Write) {
                return Err(ShellError::permission_denied(ctx));
            }
            let node = session
                .vfs
                .get_node_mut(&segments)
                .ok_or_else(|| ShellError::no_such_file(ctx.clone()))?;
            if append {
                node.append_content(content);
            } else {
                node.set_content(content.to_string());
            }
            Ok(())
        }
        Err(ShellError::NoSuchFile { .. }) => {
            let (parent, name) = session.lookup_parent(path, &ctx)?;
            let dir = session.check_walk(&parent, &ctx)?;
            if !can_create(dir, session.user()) {
                return Err(ShellError::permission_denied(ctx));
            }
            let node = session.new_file(content);
            session
                .vfs
                .insert(&parent, &name, node)
                .ok_or_else(|| ShellError::not_a_directory(ctx))?;
            Ok(())
        }
        Err(other) => Err(other),
    }
}

/// One text source for a filter command: a named file or piped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: Option<String>,
    pub text: String,
}

/// Texts to process: every readable file operand, or stdin when there are
/// none. Unreadable files become per-file errors; no input at all is a
/// missing operand.
pub fn gather_inputs(
    ctx: &CommandContext<'_>,
    files: &[String],
) -> Result<(Vec<Input>, Vec<ShellError>), ShellError> {
    if files.is_empty() {
        return match &ctx.stdin {
            Some(text) => Ok((vec![Input { name: None, text: text.clone() }], Vec::new())),
            None => Err(ShellError::missing_operand(&ctx.name)),
        };
    }
    let mut inputs = Vec::new();
    let mut errors = Vec::new();
    for file in files {
        match read_file(ctx.session, file, &ctx.name) {
            Ok(text) => inputs.push(Input { name: Some(file.clone()), text }),
            Err(e) => errors.push(e),
        }
    }
    Ok((inputs, errors))
}

/// Lines of `text` without their terminators. A trailing newline does not
/// produce an extra empty line.
pub fn lines_of(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Join lines back with a newline after each.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];
    if bytes < 1024 {
        return bytes.to_string();
    }
    let mut value = bytes as f64;
    let mut unit = "";
    for u in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = u;
    }
    if value < 10.0 {
        format!("{:.1}{}", value, unit)
    } else {
        format!("{:.0}{}", value, unit)
    }
}

/// Render a millisecond timestamp in local time with a chrono format string.
pub fn format_time(millis: i64, fmt: &str) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(t) => t.format(fmt).to_string(),
        None => String::from("?"),
    }
}
