// src/commands/pager/mod.rs
//! `less` and `more`. There is no terminal to page on, so both print the
//! whole text at once.
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::{gather_inputs, lines_of};
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct LessCommand;
pub struct MoreCommand;

fn numbered(text: &str) -> String {
    let lines = lines_of(text);
    let width = lines.len().to_string().len().max(6);
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!("{:>width$}  {}\n", i + 1, line, width = width));
    }
    out
}

fn with_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[async_trait]
impl Command for LessCommand {
    fn name(&self) -> &'static str {
        "less"
    }

    fn summary(&self) -> &'static str {
        "view a file, optionally with line numbers"
    }

    fn usage(&self) -> &'static str {
        "less [-N] [FILE]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("N").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let (inputs, errors) = gather_inputs(&ctx, &ctx.args.operands)?;
        let mut out = String::new();
        for input in inputs {
            if ctx.args.has_flag('N') {
                out.push_str(&numbered(&input.text));
            } else {
                out.push_str(&with_newline(input.text));
            }
        }
        ShellError::collect(out, errors)
    }
}

#[async_trait]
impl Command for MoreCommand {
    fn name(&self) -> &'static str {
        "more"
    }

    fn summary(&self) -> &'static str {
        "view files one after another"
    }

    fn usage(&self) -> &'static str {
        "more [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags(""))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let headers = ctx.args.operands.len() > 1;
        let (inputs, errors) = gather_inputs(&ctx, &ctx.args.operands)?;
        let mut out = String::new();
        for input in inputs {
            if headers {
                let name = input.name.as_deref().unwrap_or("-");
                out.push_str(&format!("::::::::::::::\n{}\n::::::::::::::\n", name));
            }
            out.push_str(&with_newline(input.text));
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, run_with_stdin, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_less_prints_file() {
        let mut s = session();
        let out = run(&mut s, "less projects/my_blog/style.css").await.unwrap();
        assert_eq!(out, "body { color: blue; }\n");
        let out = run_with_stdin(&mut s, "less -N", Some("one\ntwo")).await.unwrap();
        assert_eq!(out, "     1  one\n     2  two\n");
        assert_eq!(run_with_stdin(&mut s, "less", Some("one\ntwo")).await.unwrap(), "one\ntwo\n");
    }

    #[tokio::test]
    async fn test_less_errors() {
        let mut s = session();
        let err = run(&mut s, "less documents").await.unwrap_err();
        assert!(matches!(err, ShellError::IsADirectory { .. }));
        assert_eq!(err.to_string(), "less: documents: Is a directory");
        let err = run(&mut s, "less nosuch").await.unwrap_err();
        assert!(matches!(err, ShellError::NoSuchFile { .. }));
        assert_eq!(run(&mut s, "less").await, Err(ShellError::missing_operand("less")));
        assert!(run(&mut s, "less a b").await.is_err());
    }

    #[tokio::test]
    async fn test_more_headers_and_stdin() {
        let mut s = session();
        let css = "projects/my_blog/style.css";
        let js = "projects/my_blog/script.js";
        assert_eq!(run(&mut s, &format!("more {}", css)).await.unwrap(), "body { color: blue; }\n");
        let out = run(&mut s, &format!("more {} {}", css, js)).await.unwrap();
        assert_eq!(
            out,
            format!(
                "::::::::::::::\n{}\n::::::::::::::\nbody {{ color: blue; }}\n::::::::::::::\n{}\n::::::::::::::\n// JavaScript code\n",
                css, js
            )
        );
        assert_eq!(run_with_stdin(&mut s, "more", Some("piped")).await.unwrap(), "piped\n");
    }
}
