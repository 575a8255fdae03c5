// src/commands/hostname_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::segments_of;
use crate::interpreter::errors::ShellError;

pub struct HostnameCommand;

fn is_valid_hostname(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && !name.starts_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

#[async_trait]
impl Command for HostnameCommand {
    fn name(&self) -> &'static str {
        "hostname"
    }

    fn summary(&self) -> &'static str {
        "show or set the system's host name"
    }

    fn usage(&self) -> &'static str {
        "hostname [-s] [NAME]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("s").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let session = &mut *ctx.session;
        let Some(name) = ctx.args.operands.first() else {
            let host = &session.config.hostname;
            let shown = if ctx.args.has_flag('s') { host.split('.').next().unwrap_or(host) } else { host };
            return Ok(format!("{}\n", shown));
        };
        if !session.user().is_root() {
            return Err(ShellError::invalid("hostname: you must be root to change the host name"));
        }
        if !is_valid_hostname(name) {
            return Err(ShellError::invalid("hostname: the specified hostname is invalid"));
        }
        log::debug!("hostname changed to {}", name);
        session.config.hostname = name.to_string();
        session.env.set("HOSTNAME", name);
        if let Some(node) = session.vfs.get_node_mut(&segments_of("/etc/hostname")) {
            node.set_content(format!("{}\n", name));
        }
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{content, root_session, run, session};

    #[tokio::test]
    async fn test_hostname_show() {
        let mut s = session();
        assert_eq!(run(&mut s, "hostname").await.unwrap(), "localhost\n");
        s.config.hostname = "web01.example.com".to_string();
        assert_eq!(run(&mut s, "hostname -s").await.unwrap(), "web01\n");
    }

    #[tokio::test]
    async fn test_hostname_set_requires_root() {
        let mut s = session();
        let err = run(&mut s, "hostname box").await.unwrap_err();
        assert_eq!(err.to_string(), "hostname: you must be root to change the host name");

        let mut s = root_session();
        run(&mut s, "hostname box").await.unwrap();
        assert_eq!(s.config.hostname, "box");
        assert_eq!(s.env.get("HOSTNAME"), Some("box"));
        assert_eq!(content(&s, "/etc/hostname").as_deref(), Some("box\n"));
        assert!(s.prompt().starts_with("root@box:"));
        assert!(run(&mut s, "hostname bad_name!").await.is_err());
    }
}
