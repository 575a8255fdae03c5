// src/commands/chmod/mod.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, is_owner_or_root, mode_to_string, parse_mode, Access};
use crate::session::ShellSession;

pub struct ChmodCommand;

#[derive(Debug, Default, Clone, Copy)]
struct ChmodOptions {
    recursive: bool,
    verbose: bool,
    changes: bool,
}

/// `-w`, `-x,g+r` and friends are modes, not options.
fn is_mode_like(arg: &str) -> bool {
    arg.len() > 1 && arg[1..].chars().all(|c| "rwxXst,+-=ugoa".contains(c))
}

fn describe(mode: u32) -> String {
    format!("{:04o} ({})", mode & 0o7777, mode_to_string(mode))
}

struct Chmod<'a> {
    mode: &'a str,
    opts: ChmodOptions,
    out: String,
    errors: Vec<ShellError>,
}

impl Chmod<'_> {
    fn apply(&mut self, session: &mut ShellSession, segments: &[String], shown: &str) {
        let Some(node) = session.node(segments) else {
            self.errors.push(ShellError::no_such_file(format!("chmod: cannot access '{}'", shown)));
            return;
        };
        if !is_owner_or_root(node, session.user()) {
            self.errors.push(ShellError::not_permitted(format!(
                "chmod: changing permissions of '{}'",
                shown
            )));
            return;
        }
        let old = node.permissions;
        let is_dir = node.is_dir();
        let new = match parse_mode(self.mode, old, is_dir) {
            Ok(mode) => mode,
            Err(_) => {
                self.errors.push(ShellError::invalid_mode("chmod", self.mode));
                return;
            }
        };

        if let Some(node) = session.vfs.get_node_mut(segments) {
            node.set_permissions(new);
        }
        if old != new && (self.opts.verbose || self.opts.changes) {
            self.out.push_str(&format!(
                "mode of '{}' changed from {} to {}\n",
                shown,
                describe(old),
                describe(new)
            ));
        } else if old == new && self.opts.verbose {
            self.out.push_str(&format!("mode of '{}' retained as {}\n", shown, describe(new)));
        }

        if !(self.opts.recursive && is_dir) {
            return;
        }
        let names: Vec<String> = match session.node(segments) {
            Some(node) if can_access(node, session.user(), Access::Read) && can_access(node, session.user(), Access::Execute) => {
                node.children().map(|c| c.keys().cloned().collect()).unwrap_or_default()
            }
            _ => {
                self.errors.push(ShellError::permission_denied(format!(
                    "chmod: cannot read directory '{}'",
                    shown
                )));
                return;
            }
        };
        for name in names {
            let mut child = segments.to_vec();
            child.push(name.clone());
            let child_shown = format!("{}/{}", shown.trim_end_matches('/'), name);
            self.apply(session, &child, &child_shown);
        }
    }
}

#[async_trait]
impl Command for ChmodCommand {
    fn name(&self) -> &'static str {
        "chmod"
    }

    fn summary(&self) -> &'static str {
        "change file mode bits"
    }

    fn usage(&self) -> &'static str {
        "chmod [-Rvcf] MODE FILE..."
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut opts = ChmodOptions::default();
        let mut rest = ctx.raw_args.as_slice();
        while let Some((arg, tail)) = rest.split_first() {
            if arg == "--" {
                rest = tail;
                break;
            }
            if !arg.starts_with('-') || arg == "-" || is_mode_like(arg) {
                break;
            }
            for c in arg[1..].chars() {
                match c {
                    'R' => opts.recursive = true,
                    'v' => opts.verbose = true,
                    'c' => opts.changes = true,
                    'f' => {}
                    other => {
                        return Err(ShellError::InvalidOption { command: "chmod".into(), option: other });
                    }
                }
            }
            rest = tail;
        }

        let Some((mode, files)) = rest.split_first() else {
            return Err(ShellError::missing_operand("chmod"));
        };
        if files.is_empty() {
            return Err(ShellError::invalid(format!(
                "chmod: missing operand after '{}'\nTry 'chmod --help' for more information.",
                mode
            )));
        }
        if parse_mode(mode, 0o644, false).is_err() {
            return Err(ShellError::invalid_mode("chmod", mode));
        }

        let mut chmod = Chmod { mode, opts, out: String::new(), errors: Vec::new() };
        for file in files {
            let context = format!("chmod: cannot access '{}'", file);
            match ctx.session.lookup(file, &context) {
                Ok(segments) => chmod.apply(&mut *ctx.session, &segments, file),
                Err(e) => chmod.errors.push(e),
            }
        }
        ShellError::collect(chmod.out, chmod.errors)
    }
}
