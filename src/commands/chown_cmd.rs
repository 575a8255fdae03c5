// src/commands/chown_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, Access};
use crate::session::ShellSession;

pub struct ChownCommand;

/// Parsed `OWNER[:GROUP]`; either side may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Ownership {
    owner: Option<String>,
    group: Option<String>,
}

fn parse_ownership(session: &ShellSession, spec: &str) -> Result<Ownership, ShellError> {
    let (owner, group) = match spec.split_once(|c| c == ':' || c == '.') {
        Some((owner, group)) => (owner, Some(group)),
        None => (spec, None),
    };
    let owner = if owner.is_empty() { None } else { Some(owner.to_string()) };
    if let Some(name) = &owner {
        if !session.users.contains(name) {
            return Err(ShellError::invalid(format!("chown: invalid user: '{}'", spec)));
        }
    }
    let group = match group {
        // `user:` means the user's login group.
        Some("") => owner
            .as_deref()
            .and_then(|name| session.users.get(name))
            .map(|user| session.users.primary_group(user)),
        Some(name) => {
            if session.users.group(name).is_none() {
                return Err(ShellError::invalid(format!("chown: invalid group: '{}'", spec)));
            }
            Some(name.to_string())
        }
        None => None,
    };
    if owner.is_none() && group.is_none() {
        return Err(ShellError::invalid(format!("chown: invalid spec: '{}'", spec)));
    }
    Ok(Ownership { owner, group })
}

struct Chown<'a> {
    target: &'a Ownership,
    recursive: bool,
    verbose: bool,
    changes: bool,
    out: String,
    errors: Vec<ShellError>,
}

impl Chown<'_> {
    fn permitted(&self, session: &ShellSession, owner: &str, group: &str) -> bool {
        let user = session.user();
        if user.is_root() {
            return true;
        }
        if self.target.owner.as_deref().map_or(false, |o| o != owner) {
            return false;
        }
        match self.target.group.as_deref() {
            Some(g) if g != group => {
                owner == user.username && (user.in_group(g) || session.users.primary_group(user) == g)
            }
            _ => owner == user.username,
        }
    }

    fn apply(&mut self, session: &mut ShellSession, segments: &[String], shown: &str) {
        let Some(node) = session.node(segments) else {
            self.errors.push(ShellError::no_such_file(format!("chown: cannot access '{}'", shown)));
            return;
        };
        let (old_owner, old_group) = (node.owner.clone(), node.group.clone());
        let is_dir = node.is_dir();
        if !self.permitted(session, &old_owner, &old_group) {
            self.errors.push(ShellError::not_permitted(format!("chown: changing ownership of '{}'", shown)));
            return;
        }

        let new_owner = self.target.owner.clone().unwrap_or_else(|| old_owner.clone());
        let new_group = self.target.group.clone().unwrap_or_else(|| old_group.clone());
        let changed = new_owner != old_owner || new_group != old_group;
        if let Some(node) = session.vfs.get_node_mut(segments) {
            node.owner = new_owner.clone();
            node.group = new_group.clone();
            if changed {
                node.touch();
            }
        }
        if changed && (self.verbose || self.changes) {
            self.out.push_str(&format!(
                "changed ownership of '{}' from {}:{} to {}:{}\n",
                shown, old_owner, old_group, new_owner, new_group
            ));
        } else if !changed && self.verbose {
            self.out.push_str(&format!("ownership of '{}' retained as {}:{}\n", shown, new_owner, new_group));
        }

        if !(self.recursive && is_dir) {
            return;
        }
        let names: Vec<String> = match session.node(segments) {
            Some(node) if can_access(node, session.user(), Access::Read) && can_access(node, session.user(), Access::Execute) => {
                node.children().map(|c| c.keys().cloned().collect()).unwrap_or_default()
            }
            _ => {
                self.errors.push(ShellError::permission_denied(format!("chown: cannot read directory '{}'", shown)));
                return;
            }
        };
        for name in names {
            let mut child = segments.to_vec();
            child.push(name.clone());
            self.apply(session, &child, &format!("{}/{}", shown.trim_end_matches('/'), name));
        }
    }
}

#[async_trait]
impl Command for ChownCommand {
    fn name(&self) -> &'static str {
        "chown"
    }

    fn summary(&self) -> &'static str {
        "change file owner and group"
    }

    fn usage(&self) -> &'static str {
        "chown [-Rvch] OWNER[:GROUP] FILE..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("Rvchf").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some((spec, files)) = ctx.args.operands.split_first() else {
            return Err(ShellError::missing_operand("chown"));
        };
        if files.is_empty() {
            return Err(ShellError::invalid(format!(
                "chown: missing operand after '{}'\nTry 'chown --help' for more information.",
                spec
            )));
        }
        let target = parse_ownership(ctx.session, spec)?;

        let mut chown = Chown {
            target: &target,
            recursive: ctx.args.has_flag('R'),
            verbose: ctx.args.has_flag('v'),
            changes: ctx.args.has_flag('c'),
            out: String::new(),
            errors: Vec::new(),
        };
        for file in files {
            match ctx.session.lookup(file, &format!("chown: cannot access '{}'", file)) {
                Ok(segments) => chown.apply(&mut *ctx.session, &segments, file),
                Err(e) => chown.errors.push(e),
            }
        }
        ShellError::collect(chown.out, chown.errors)
    }
}
