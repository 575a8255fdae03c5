// src/commands/env/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::environment::{is_valid_name, parse_assignment};
use crate::interpreter::errors::ShellError;

pub struct ExportCommand;
pub struct EnvCommand;
pub struct UnsetCommand;

fn not_an_identifier(command: &str, word: &str) -> ShellError {
    ShellError::invalid(format!("bash: {}: `{}': not a valid identifier", command, word))
}

#[async_trait]
impl Command for ExportCommand {
    fn name(&self) -> &'static str {
        "export"
    }

    fn summary(&self) -> &'static str {
        "set export attribute for shell variables"
    }

    fn usage(&self) -> &'static str {
        "export [-p] [NAME[=VALUE]]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("p"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        if ctx.args.operands.is_empty() {
            let out: String = ctx
                .session
                .env
                .iter()
                .map(|(k, v)| format!("declare -x {}=\"{}\"\n", k, v))
                .collect();
            return Ok(out);
        }

        let mut errors = Vec::new();
        for word in &ctx.args.operands {
            match parse_assignment(word) {
                Some((name, value)) => ctx.session.env.set(&name, &value),
                // A bare valid name is already exported as far as this shell cares.
                None if is_valid_name(word) => {}
                None => errors.push(not_an_identifier("export", word)),
            }
        }
        ShellError::collect(String::new(), errors)
    }
}

#[async_trait]
impl Command for EnvCommand {
    fn name(&self) -> &'static str {
        "env"
    }

    fn summary(&self) -> &'static str {
        "print or remove environment variables"
    }

    fn usage(&self) -> &'static str {
        "env [-u NAME]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("u").values("u").max(0))
    }

    /// `-u NAME` removes the variable from the session; otherwise every
    /// variable is printed as `NAME=value`, sorted.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let unset = ctx.args.all_values('u');
        if !unset.is_empty() {
            for name in unset {
                ctx.session.env.unset(name);
            }
            return Ok(String::new());
        }
        Ok(ctx.session.env.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect())
    }
}

#[async_trait]
impl Command for UnsetCommand {
    fn name(&self) -> &'static str {
        "unset"
    }

    fn summary(&self) -> &'static str {
        "remove shell variables"
    }

    fn usage(&self) -> &'static str {
        "unset [-v] NAME..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("v"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut errors = Vec::new();
        for name in &ctx.args.operands {
            if is_valid_name(name) {
                ctx.session.env.unset(name);
            } else {
                errors.push(not_an_identifier("unset", name));
            }
        }
        ShellError::collect(String::new(), errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_export_sets_and_lists() {
        let mut s = session();
        run(&mut s, "export EDITOR=vim GREETING=\"hi\"").await.unwrap();
        assert_eq!(s.env.get("EDITOR"), Some("vim"));
        assert_eq!(s.env.get("GREETING"), Some("hi"));
        let out = run(&mut s, "export").await.unwrap();
        assert!(out.contains("declare -x EDITOR=\"vim\"\n"));
        let lines: Vec<&str> = out.lines().collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }

    #[tokio::test]
    async fn test_export_rejects_bad_names() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "export 1X=2").await,
            Err(ShellError::invalid("bash: export: `1X=2': not a valid identifier"))
        );
        let err = run(&mut s, "export OK=1 bad-name=2").await.unwrap_err();
        assert_eq!(err, ShellError::invalid("bash: export: `bad-name=2': not a valid identifier"));
        assert_eq!(s.env.get("OK"), Some("1"));
        assert!(run(&mut s, "export PATH").await.is_ok());
    }

    #[tokio::test]
    async fn test_env_prints_and_unsets() {
        let mut s = session();
        let out = run(&mut s, "env").await.unwrap();
        assert!(out.contains("USER=user\n"));
        assert!(out.contains("HOME=/home/user\n"));
        assert_eq!(run(&mut s, "env -u TERM").await.unwrap(), "");
        assert_eq!(s.env.get("TERM"), None);
        assert!(run(&mut s, "env extra").await.is_err());
    }

    #[tokio::test]
    async fn test_unset() {
        let mut s = session();
        run(&mut s, "unset LANG").await.unwrap();
        assert_eq!(s.env.get("LANG"), None);
        assert!(run(&mut s, "unset NOT_SET").await.is_ok());
        assert_eq!(
            run(&mut s, "unset 9a").await,
            Err(ShellError::invalid("bash: unset: `9a': not a valid identifier"))
        );
    }
}
