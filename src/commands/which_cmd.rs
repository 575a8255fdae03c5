// src/commands/which_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::environment::DEFAULT_PATH;
use crate::session::ShellSession;

pub struct WhichCommand;
pub struct WhereisCommand;

const BINARY_DIRS: [&str; 5] = ["/bin", "/usr/bin", "/usr/local/bin", "/sbin", "/usr/sbin"];

fn is_file_at(session: &ShellSession, path: &str) -> bool {
    session.node(&session.resolve(path)).map_or(false, |n| n.is_file())
}

/// Files named `name` in each `$PATH` directory, in search order.
fn search_path(session: &ShellSession, name: &str) -> Vec<String> {
    let path = session.env.get("PATH").unwrap_or(DEFAULT_PATH).to_string();
    path.split(':')
        .filter(|dir| !dir.is_empty())
        .map(|dir| format!("{}/{}", dir.trim_end_matches('/'), name))
        .filter(|candidate| is_file_at(session, candidate))
        .collect()
}

#[async_trait]
impl Command for WhichCommand {
    fn name(&self) -> &'static str {
        "which"
    }

    fn summary(&self) -> &'static str {
        "locate a command"
    }

    fn usage(&self) -> &'static str {
        "which [-a] COMMAND..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("a"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let all = ctx.args.has_flag('a');
        let mut out = String::new();
        for name in &ctx.args.operands {
            let mut found = Vec::new();
            if ctx.registry.contains(name) {
                found.push(format!("/usr/bin/{}", name));
            }
            for path in search_path(ctx.session, name) {
                if !found.contains(&path) {
                    found.push(path);
                }
            }
            let shown = if all { found.len() } else { found.len().min(1) };
            for path in &found[..shown] {
                out.push_str(path);
                out.push('\n');
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Command for WhereisCommand {
    fn name(&self) -> &'static str {
        "whereis"
    }

    fn summary(&self) -> &'static str {
        "locate the binary, source, and manual page files for a command"
    }

    fn usage(&self) -> &'static str {
        "whereis [-bms] COMMAND..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("bms").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let restricted = ctx.args.has_any("bms");
        let binaries = !restricted || ctx.args.has_flag('b');
        let manuals = !restricted || ctx.args.has_flag('m');

        let mut out = String::new();
        for name in &ctx.args.operands {
            let mut locations = Vec::new();
            if binaries {
                if ctx.registry.contains(name) {
                    locations.push(format!("/usr/bin/{}", name));
                }
                for dir in BINARY_DIRS {
                    let candidate = format!("{}/{}", dir, name);
                    if !locations.contains(&candidate) && is_file_at(ctx.session, &candidate) {
                        locations.push(candidate);
                    }
                }
            }
            if manuals {
                for section in ["1", "8"] {
                    let candidate = format!("/usr/share/man/man{0}/{1}.{0}", section, name);
                    if is_file_at(ctx.session, &candidate) {
                        locations.push(candidate);
                    }
                }
            }
            out.push_str(name);
            out.push(':');
            for location in &locations {
                out.push(' ');
                out.push_str(location);
            }
            out.push('\n');
        }
        Ok(out)
    }
}
