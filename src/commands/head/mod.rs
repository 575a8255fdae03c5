// src/commands/head/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::{get_head, run_head_tail, HeadTailOptions, HEAD_TAIL_SPEC};
use crate::commands::{Command, CommandContext, CommandResult};

pub struct HeadCommand;

#[async_trait]
impl Command for HeadCommand {
    fn name(&self) -> &'static str {
        "head"
    }

    fn summary(&self) -> &'static str {
        "output the first part of files"
    }

    fn usage(&self) -> &'static str {
        "head [-n LINES | -c BYTES] [-qv] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(HEAD_TAIL_SPEC)
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let opts = HeadTailOptions::from_context(&ctx)?;
        let (lines, bytes) = (opts.lines, opts.bytes);
        run_head_tail(&ctx, &opts, |content| get_head(content, lines, bytes))
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, run_with_stdin, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_head_default_and_count() {
        let mut s = session();
        let text: String = (1..=15).map(|i| format!("{}\n", i)).collect();
        let out = run_with_stdin(&mut s, "head", Some(&text)).await.unwrap();
        assert_eq!(out.lines().count(), 10);
        let out = run_with_stdin(&mut s, "head -n 2", Some(&text)).await.unwrap();
        assert_eq!(out, "1\n2\n");
        let out = run_with_stdin(&mut s, "head -n3", Some(&text)).await.unwrap();
        assert_eq!(out, "1\n2\n3\n");
    }

    #[tokio::test]
    async fn test_head_headers() {
        let mut s = session();
        let out = run(&mut s, "head -n 1 documents/report.txt documents/notes.md").await.unwrap();
        assert_eq!(
            out,
            "==> documents/report.txt <==\nThis is a sample report file.\n\n==> documents/notes.md <==\n# My Notes\n"
        );
        let out = run(&mut s, "head -q -n 1 documents/report.txt documents/notes.md").await.unwrap();
        assert_eq!(out, "This is a sample report file.\n# My Notes\n");
    }

    #[tokio::test]
    async fn test_head_bytes_and_errors() {
        let mut s = session();
        assert_eq!(run(&mut s, "head -c 4 documents/report.txt").await.unwrap(), "This");
        assert_eq!(
            run(&mut s, "head -n x documents/report.txt").await,
            Err(ShellError::invalid("head: invalid number of lines: 'x'"))
        );
        assert!(matches!(
            run(&mut s, "head -n").await,
            Err(ShellError::OptionRequiresArgument { option: 'n', .. })
        ));
        assert!(matches!(run(&mut s, "head").await, Err(ShellError::MissingOperand { .. })));
    }
}
