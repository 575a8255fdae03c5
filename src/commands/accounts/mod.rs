// src/commands/accounts/mod.rs
//! Account administration: `useradd`, `usermod`, `userdel`, `groupadd`.
//!
//! All four are root-only and rewrite `/etc/passwd` and `/etc/group` after
//! every successful change.

use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{segments_of, FsNode};
use crate::interpreter::errors::ShellError;
use crate::session::ShellSession;
use crate::users::{User, UserError};

pub struct UseraddCommand;
pub struct UsermodCommand;
pub struct UserdelCommand;
pub struct GroupaddCommand;

fn require_root(session: &ShellSession, command: &str) -> Result<(), ShellError> {
    if session.user().is_root() {
        Ok(())
    } else {
        Err(ShellError::invalid(format!("{}: Permission denied.", command)))
    }
}

fn account_error(command: &str, err: UserError) -> ShellError {
    ShellError::invalid(format!("{}: {}", command, err))
}

/// `[a-z_][a-z0-9_-]*`, at most 32 characters.
fn is_valid_account_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        && name.len() <= 32
}

fn parse_id(command: &str, what: &str, value: &str) -> Result<u32, ShellError> {
    value
        .parse()
        .map_err(|_| ShellError::invalid(format!("{}: invalid {} '{}'", command, what, value)))
}

/// A group given by name or numeric id.
fn existing_group(session: &ShellSession, command: &str, spec: &str) -> Result<(String, u32), ShellError> {
    let group = match spec.parse::<u32>() {
        Ok(gid) => session.users.group_by_gid(gid),
        Err(_) => session.users.group(spec),
    };
    group
        .map(|g| (g.name.clone(), g.gid))
        .ok_or_else(|| ShellError::invalid(format!("{}: group '{}' does not exist", command, spec)))
}

fn supplementary(session: &ShellSession, command: &str, list: &str) -> Result<Vec<String>, ShellError> {
    list.split(',')
        .filter(|g| !g.is_empty())
        .map(|g| existing_group(session, command, g).map(|(name, _)| name))
        .collect()
}

/// Create `home` owned by `owner:group`. Returns a warning when it exists.
fn create_home(session: &mut ShellSession, home: &str, owner: &str, group: &str) -> Result<Option<String>, ShellError> {
    let mut segments = segments_of(home);
    if session.vfs.exists(&segments) {
        return Ok(Some(format!(
            "useradd: warning: the home directory {} already exists.\nuseradd: Not copying any file from skel directory into it.\n",
            home
        )));
    }
    let name = segments
        .pop()
        .ok_or_else(|| ShellError::invalid(format!("useradd: cannot create directory {}", home)))?;
    let dir = FsNode::directory(owner, group, 0o755);
    session
        .vfs
        .insert(&segments, &name, dir)
        .ok_or_else(|| ShellError::invalid(format!("useradd: cannot create directory {}", home)))?;
    Ok(None)
}

#[async_trait]
impl Command for UseraddCommand {
    fn name(&self) -> &'static str {
        "useradd"
    }

    fn summary(&self) -> &'static str {
        "create a new user"
    }

    fn usage(&self) -> &'static str {
        "useradd [-mM] [-d HOME] [-s SHELL] [-u UID] [-g GROUP] [-G LIST] [-c COMMENT] NAME"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("mMdsugGc").values("dsugGc").min(1).max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        const CMD: &str = "useradd";
        let session = &mut *ctx.session;
        require_root(session, CMD)?;
        let name = &ctx.args.operands[0];
        if !is_valid_account_name(name) {
            return Err(ShellError::invalid(format!("{}: invalid user name '{}'", CMD, name)));
        }
        if session.users.contains(name) {
            return Err(account_error(CMD, UserError::UserExists(name.clone())));
        }

        let uid = match ctx.args.value('u') {
            Some(v) => parse_id(CMD, "user ID", v)?,
            None => session.users.next_uid(),
        };
        if session.users.by_uid(uid).is_some() {
            return Err(account_error(CMD, UserError::UidTaken(uid)));
        }
        let extra = match ctx.args.value('G') {
            Some(list) => supplementary(session, CMD, list)?,
            None => Vec::new(),
        };
        let (group_name, gid, new_group) = match ctx.args.value('g') {
            Some(spec) => {
                let (name, gid) = existing_group(session, CMD, spec)?;
                (name, gid, false)
            }
            None if session.users.group(name).is_some() => {
                return Err(ShellError::invalid(format!(
                    "{0}: group {1} exists - if you want to add this user to that group, use -g.",
                    CMD, name
                )));
            }
            None => {
                let gid = if session.users.group_by_gid(uid).is_none() { uid } else { session.users.next_gid() };
                (name.clone(), gid, true)
            }
        };

        let home = ctx.args.value('d').map_or_else(|| format!("/home/{}", name), String::from);
        let mut groups = vec![group_name.as_str()];
        groups.extend(extra.iter().map(|g| g.as_str()).filter(|g| *g != group_name));
        let mut user = User::new(name, uid, gid, &home, &groups);
        if let Some(shell) = ctx.args.value('s') {
            user.shell = shell.to_string();
        }

        if new_group {
            session.users.add_group(&group_name, Some(gid)).map_err(|e| account_error(CMD, e))?;
        }
        session.users.add_user(user).map_err(|e| account_error(CMD, e))?;

        let mut out = String::new();
        if ctx.args.has_flag('m') && !ctx.args.has_flag('M') {
            if let Some(warning) = create_home(session, &home, name, &group_name)? {
                out.push_str(&warning);
            }
        }
        session.sync_account_files();
        log::info!("useradd {} uid={} gid={}", name, uid, gid);
        Ok(out)
    }
}

#[async_trait]
impl Command for UsermodCommand {
    fn name(&self) -> &'static str {
        "usermod"
    }

    fn summary(&self) -> &'static str {
        "modify a user account"
    }

    fn usage(&self) -> &'static str {
        "usermod [-a] [-G LIST] [-g GROUP] [-d HOME] [-s SHELL] NAME"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("aGgds").values("Ggds").min(1).max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        const CMD: &str = "usermod";
        let session = &mut *ctx.session;
        require_root(session, CMD)?;
        let name = &ctx.args.operands[0];
        let Some(current) = session.users.get(name).cloned() else {
            return Err(account_error(CMD, UserError::NoSuchUser(name.clone())));
        };
        if !ctx.args.has_any("Ggds") {
            return Err(ShellError::invalid(format!("{}: no changes", CMD)));
        }
        if ctx.args.has_flag('a') && !ctx.args.has_flag('G') {
            return Err(ShellError::invalid(format!("{}: -a flag is only allowed with the -G flag", CMD)));
        }

        let mut updated = current.clone();
        if let Some(spec) = ctx.args.value('g') {
            let (group, gid) = existing_group(session, CMD, spec)?;
            updated.gid = gid;
            updated.groups.retain(|g| *g != group);
            if let Some(first) = updated.groups.first_mut() {
                if *first == session.users.primary_group(&current) {
                    *first = group.clone();
                } else {
                    updated.groups.insert(0, group.clone());
                }
            } else {
                updated.groups.push(group.clone());
            }
        }
        if let Some(list) = ctx.args.value('G') {
            let extra = supplementary(session, CMD, list)?;
            let primary = updated.groups.first().cloned().unwrap_or_else(|| name.clone());
            if !ctx.args.has_flag('a') {
                updated.groups.truncate(1);
            }
            for group in extra {
                if group != primary && !updated.groups.contains(&group) {
                    updated.groups.push(group);
                }
            }
        }
        if let Some(home) = ctx.args.value('d') {
            updated.home = home.to_string();
        }
        if let Some(shell) = ctx.args.value('s') {
            updated.shell = shell.to_string();
        }

        if let Some(user) = session.users.get_mut(name) {
            *user = updated;
        }
        session.sync_account_files();
        Ok(String::new())
    }
}

#[async_trait]
impl Command for UserdelCommand {
    fn name(&self) -> &'static str {
        "userdel"
    }

    fn summary(&self) -> &'static str {
        "delete a user account"
    }

    fn usage(&self) -> &'static str {
        "userdel [-rf] NAME"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("rf").min(1).max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        const CMD: &str = "userdel";
        let session = &mut *ctx.session;
        require_root(session, CMD)?;
        let name = &ctx.args.operands[0];
        let removed = session.users.remove_user(name).map_err(|e| account_error(CMD, e))?;

        // The user's private group goes too when nobody else relies on it.
        let private = session.users.group(name).map_or(false, |g| g.gid == removed.gid);
        if private {
            let _ = session.users.remove_group(name);
        }

        let mut out = String::new();
        if ctx.args.has_flag('r') {
            let mut home = segments_of(&removed.home);
            match home.pop() {
                Some(last) if session.vfs.exists(&segments_of(&removed.home)) => {
                    session.vfs.remove(&home, &last);
                }
                _ => out.push_str(&format!("{}: {} home directory ({}) not found\n", CMD, name, removed.home)),
            }
        }
        session.sync_account_files();
        log::info!("userdel {}", name);
        Ok(out)
    }
}

#[async_trait]
impl Command for GroupaddCommand {
    fn name(&self) -> &'static str {
        "groupadd"
    }

    fn summary(&self) -> &'static str {
        "create a new group"
    }

    fn usage(&self) -> &'static str {
        "groupadd [-g GID] NAME"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("g").values("g").min(1).max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        const CMD: &str = "groupadd";
        let session = &mut *ctx.session;
        require_root(session, CMD)?;
        let name = &ctx.args.operands[0];
        if !is_valid_account_name(name) {
            return Err(ShellError::invalid(format!("{}: '{}' is not a valid group name", CMD, name)));
        }
        let gid = ctx.args.value('g').map(|v| parse_id(CMD, "group ID", v)).transpose()?;
        session.users.add_group(name, gid).map_err(|e| account_error(CMD, e))?;
        session.sync_account_files();
        Ok(String::new())
    }
}
