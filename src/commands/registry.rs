// src/commands/registry.rs
use std::collections::HashMap;

use super::args::ParsedArgs;
use super::suggest::suggest;
use super::types::{Command, CommandContext, CommandResult, Invocation};
use crate::interpreter::errors::ShellError;
use crate::session::ShellSession;

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// `command not found`, with typo suggestions.
    pub fn not_found(&self, name: &str) -> ShellError {
        ShellError::CommandNotFound { suggestions: suggest(name, self.names()), name: name.to_string() }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn help_text(command: &dyn Command) -> String {
    format!("Usage: {}\n{}\n", command.usage(), command.summary())
}

/// Look up, validate and run one command.
///
/// `--help` and `--version` are answered here. For commands with an
/// [`ArgSpec`](super::args::ArgSpec) they are recognised anywhere before
/// `--`; permissive commands only see them as the first argument.
pub async fn dispatch(
    session: &mut ShellSession,
    registry: &CommandRegistry,
    invocation: Invocation,
) -> CommandResult {
    let Invocation { name, args, stdin, background, line } = invocation;
    let command = registry.get(&name).ok_or_else(|| registry.not_found(&name))?;

    let spec = command.spec();
    let asks = |flag: &str| match spec {
        Some(_) => args.iter().take_while(|a| *a != "--").any(|a| a == flag),
        None => args.first().map_or(false, |a| a == flag),
    };
    if asks("--help") {
        return Ok(help_text(command));
    }
    if asks("--version") {
        return Ok(format!("{} (tutor-shell) {}\n", name, env!("CARGO_PKG_VERSION")));
    }

    let parsed = match &spec {
        Some(spec) => ParsedArgs::parse(&name, spec, &args)?,
        None => ParsedArgs::permissive(&args),
    };
    log::debug!("dispatch {} {:?}", name, args);

    command
        .execute(CommandContext {
            name,
            raw_args: args,
            args: parsed,
            stdin,
            session,
            registry,
            background,
            line,
        })
        .await
}

use super::accounts::{GroupaddCommand, UseraddCommand, UserdelCommand, UsermodCommand};
use super::cat::CatCommand;
use super::cd_cmd::CdCommand;
use super::chmod::ChmodCommand;
use super::chown_cmd::ChownCommand;
use super::clear_cmd::ClearCommand;
use super::cp::CpCommand;
use super::date::DateCommand;
use super::echo::EchoCommand;
use super::env::{EnvCommand, ExportCommand, UnsetCommand};
use super::find::FindCommand;
use super::grep::GrepCommand;
use super::head::HeadCommand;
use super::help_cmd::HelpCommand;
use super::history_cmd::HistoryCommand;
use super::hostname_cmd::HostnameCommand;
use super::id_cmd::{GroupsCommand, IdCommand};
use super::jobs_cmd::{BgCommand, FgCommand, JobsCommand};
use super::kill_cmd::KillCommand;
use super::locate_cmd::LocateCommand;
use super::ls::LsCommand;
use super::man_cmd::ManCommand;
use super::mkdir::MkdirCommand;
use super::mv::MvCommand;
use super::nano_cmd::NanoCommand;
use super::pager::{LessCommand, MoreCommand};
use super::ps_cmd::PsCommand;
use super::pwd::PwdCommand;
use super::reset_cmd::ResetCommand;
use super::rm::RmCommand;
use super::rmdir_cmd::RmdirCommand;
use super::search::SearchCommand;
use super::sed::SedCommand;
use super::sleep_cmd::SleepCommand;
use super::sort::SortCommand;
use super::stat_cmd::StatCommand;
use super::su_cmd::{SuCommand, SudoCommand};
use super::tail::TailCommand;
use super::touch::TouchCommand;
use super::umask_cmd::UmaskCommand;
use super::uniq::UniqCommand;
use super::wc::WcCommand;
use super::which_cmd::{WhereisCommand, WhichCommand};
use super::whoami_cmd::WhoamiCommand;

/// Files, navigation and search.
pub fn register_file_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(LsCommand));
    registry.register(Box::new(CdCommand));
    registry.register(Box::new(PwdCommand));
    registry.register(Box::new(CatCommand));
    registry.register(Box::new(EchoCommand));
    registry.register(Box::new(MkdirCommand));
    registry.register(Box::new(RmdirCommand));
    registry.register(Box::new(TouchCommand));
    registry.register(Box::new(RmCommand));
    registry.register(Box::new(CpCommand));
    registry.register(Box::new(MvCommand));
    registry.register(Box::new(StatCommand));
    registry.register(Box::new(FindCommand));
    registry.register(Box::new(LocateCommand));
    registry.register(Box::new(WhichCommand));
    registry.register(Box::new(WhereisCommand));
}

pub fn register_text_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(GrepCommand));
    registry.register(Box::new(HeadCommand));
    registry.register(Box::new(TailCommand));
    registry.register(Box::new(SortCommand));
    registry.register(Box::new(UniqCommand));
    registry.register(Box::new(WcCommand));
    registry.register(Box::new(SedCommand));
    registry.register(Box::new(LessCommand));
    registry.register(Box::new(MoreCommand));
    registry.register(Box::new(NanoCommand));
}

/// Permissions, accounts and environment.
pub fn register_admin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ChmodCommand));
    registry.register(Box::new(ChownCommand));
    registry.register(Box::new(UmaskCommand));
    registry.register(Box::new(WhoamiCommand));
    registry.register(Box::new(IdCommand));
    registry.register(Box::new(GroupsCommand));
    registry.register(Box::new(SuCommand));
    registry.register(Box::new(SudoCommand));
    registry.register(Box::new(UseraddCommand));
    registry.register(Box::new(UsermodCommand));
    registry.register(Box::new(UserdelCommand));
    registry.register(Box::new(GroupaddCommand));
    registry.register(Box::new(ExportCommand));
    registry.register(Box::new(EnvCommand));
    registry.register(Box::new(UnsetCommand));
}

/// Jobs and session housekeeping.
pub fn register_session_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(SleepCommand));
    registry.register(Box::new(JobsCommand));
    registry.register(Box::new(FgCommand));
    registry.register(Box::new(BgCommand));
    registry.register(Box::new(KillCommand));
    registry.register(Box::new(PsCommand));
    registry.register(Box::new(HistoryCommand));
    registry.register(Box::new(HelpCommand));
    registry.register(Box::new(ManCommand));
    registry.register(Box::new(SearchCommand));
    registry.register(Box::new(ClearCommand));
    registry.register(Box::new(DateCommand));
    registry.register(Box::new(HostnameCommand));
    registry.register(Box::new(ResetCommand));
}

pub fn create_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_file_commands(&mut registry);
    register_text_commands(&mut registry);
    register_admin_commands(&mut registry);
    register_session_commands(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{run, session};

    #[tokio::test]
    async fn test_unknown_command_suggests() {
        let mut s = session();
        let err = run(&mut s, "gerp foo").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "bash: gerp: command not found\n\nDid you mean:\n  grep"
        );
        let err = run(&mut s, "qqqqqqqq").await.unwrap_err();
        assert_eq!(err.to_string(), "bash: qqqqqqqq: command not found");
    }

    #[tokio::test]
    async fn test_validation_short_circuits() {
        let mut s = session();
        let err = run(&mut s, "mkdir -z newdir").await.unwrap_err();
        assert!(matches!(err, ShellError::InvalidOption { option: 'z', .. }));
        assert!(!s.vfs.exists(&s.resolve("newdir")));
    }

    #[tokio::test]
    async fn test_help_and_version() {
        let mut s = session();
        let out = run(&mut s, "ls --help").await.unwrap();
        assert!(out.starts_with("Usage: ls"));
        let out = run(&mut s, "rm -r --help").await.unwrap();
        assert!(out.starts_with("Usage: rm"));
        let out = run(&mut s, "cat --version").await.unwrap();
        assert!(out.starts_with("cat (tutor-shell) "));
    }

    #[test]
    fn test_default_registry_is_complete() {
        let registry = create_default_registry();
        for name in [
            "ls", "cd", "pwd", "cat", "echo", "mkdir", "rmdir", "touch", "rm", "cp", "mv",
            "stat", "find", "locate", "which", "whereis", "grep", "head", "tail", "sort",
            "uniq", "wc", "sed", "chmod", "chown", "umask", "whoami", "id", "groups", "su",
            "sudo", "useradd", "usermod", "userdel", "groupadd", "export", "env", "unset",
            "sleep", "jobs", "fg", "bg", "kill", "ps", "history", "help", "clear", "date",
            "hostname", "reset", "man", "search", "less", "more", "nano",
        ] {
            assert!(registry.contains(name), "{} not registered", name);
        }
        let names = registry.names();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }
}
