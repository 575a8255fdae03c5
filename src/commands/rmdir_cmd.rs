use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::can_unlink;
use crate::session::ShellSession;

pub struct RmdirCommand;

fn remove_empty_dir(session: &mut ShellSession, path: &str, shown: &str) -> Result<(), ShellError> {
    let context = format!("rmdir: failed to remove '{}'", shown);
    let mut segments = session.resolve(path);
    let node = session.check_walk(&segments, &context)?;
    if !node.is_dir() {
        return Err(ShellError::not_a_directory(context));
    }
    if !node.is_empty() {
        return Err(ShellError::directory_not_empty(context));
    }
    let name = segments.pop().ok_or_else(|| ShellError::invalid("rmdir: failed to remove '/': Device or resource busy"))?;
    let parent = session
        .vfs
        .get_node(&segments)
        .ok_or_else(|| ShellError::no_such_file(context.clone()))?;
    if !can_unlink(parent, node, session.user()) {
        return Err(ShellError::permission_denied(context));
    }
    session.vfs.remove(&segments, &name);
    Ok(())
}

#[async_trait]
impl Command for RmdirCommand {
    fn name(&self) -> &'static str {
        "rmdir"
    }

    fn summary(&self) -> &'static str {
        "remove empty directories"
    }

    fn usage(&self) -> &'static str {
        "rmdir [-pv] DIRECTORY..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("pv").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let parents = ctx.args.has_flag('p');
        let verbose = ctx.args.has_flag('v');
        let mut out = String::new();
        let mut errors = Vec::new();

        for path in &ctx.args.operands {
            // With -p, `a/b/c` also removes `a/b` and then `a`.
            let mut targets = vec![path.trim_end_matches('/').to_string()];
            if parents {
                let mut current = targets[0].clone();
                while let Some((head, _)) = current.rsplit_once('/') {
                    if head.is_empty() {
                        break;
                    }
                    targets.push(head.to_string());
                    current = head.to_string();
                }
            }
            for target in targets {
                match remove_empty_dir(ctx.session, &target, &target) {
                    Ok(()) => {
                        if verbose {
                            out.push_str(&format!("rmdir: removing directory, '{}'\n", target));
                        }
                    }
                    Err(e) => {
                        errors.push(e);
                        break;
                    }
                }
            }
        }
        ShellError::collect(out, errors)
    }
}
