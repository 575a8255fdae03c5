// src/commands/id_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::session::ShellSession;
use crate::users::User;

pub struct IdCommand;
pub struct GroupsCommand;

fn target_user<'a>(session: &'a ShellSession, name: Option<&String>, command: &str) -> Result<&'a User, ShellError> {
    match name {
        None => Ok(session.user()),
        Some(name) => session
            .users
            .get(name)
            .ok_or_else(|| ShellError::invalid(format!("{}: '{}': no such user", command, name))),
    }
}

/// The user's groups as `(gid, name)`, primary group first. Names with no
/// matching group entry are skipped.
fn group_list(session: &ShellSession, user: &User) -> Vec<(u32, String)> {
    let primary = session.users.primary_group(user);
    let mut list = vec![(user.gid, primary.clone())];
    for name in &user.groups {
        if *name == primary {
            continue;
        }
        if let Some(group) = session.users.group(name) {
            list.push((group.gid, group.name.clone()));
        }
    }
    list
}

#[async_trait]
impl Command for IdCommand {
    fn name(&self) -> &'static str {
        "id"
    }

    fn summary(&self) -> &'static str {
        "print real and effective user and group IDs"
    }

    fn usage(&self) -> &'static str {
        "id [-ugGnr] [USER]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("ugGnr").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let session = &*ctx.session;
        let user = target_user(session, ctx.args.operands.first(), "id")?;
        let groups = group_list(session, user);
        let names = ctx.args.has_flag('n');

        let selected = ctx.args.flags.iter().filter(|c| "ugG".contains(**c)).count();
        if selected > 1 {
            return Err(ShellError::invalid("id: cannot print \"only\" of more than one choice"));
        }
        if names && selected == 0 {
            return Err(ShellError::invalid("id: cannot print only names or real IDs in default format"));
        }

        let line = if ctx.args.has_flag('u') {
            if names { user.username.clone() } else { user.uid.to_string() }
        } else if ctx.args.has_flag('g') {
            let (gid, name) = &groups[0];
            if names { name.clone() } else { gid.to_string() }
        } else if ctx.args.has_flag('G') {
            groups
                .iter()
                .map(|(gid, name)| if names { name.clone() } else { gid.to_string() })
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            let (gid, name) = &groups[0];
            let all: Vec<String> = groups.iter().map(|(gid, name)| format!("{}({})", gid, name)).collect();
            format!("uid={}({}) gid={}({}) groups={}", user.uid, user.username, gid, name, all.join(","))
        };
        Ok(format!("{}\n", line))
    }
}

#[async_trait]
impl Command for GroupsCommand {
    fn name(&self) -> &'static str {
        "groups"
    }

    fn summary(&self) -> &'static str {
        "print the groups a user is in"
    }

    fn usage(&self) -> &'static str {
        "groups [USER]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags(""))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let session = &*ctx.session;
        let render = |user: &User| {
            group_list(session, user).into_iter().map(|(_, name)| name).collect::<Vec<_>>().join(" ")
        };
        if ctx.args.operands.is_empty() {
            return Ok(format!("{}\n", render(session.user())));
        }
        let mut out = String::new();
        let mut errors = Vec::new();
        for name in &ctx.args.operands {
            match target_user(session, Some(name), "groups") {
                Ok(user) => out.push_str(&format!("{} : {}\n", user.username, render(user))),
                Err(e) => errors.push(e),
            }
        }
        ShellError::collect(out, errors)
    }
}
