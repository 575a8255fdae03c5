// src/commands/tail/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::{get_tail, run_head_tail, HeadTailOptions, HEAD_TAIL_SPEC};
use crate::commands::{Command, CommandContext, CommandResult};

pub struct TailCommand;

#[async_trait]
impl Command for TailCommand {
    fn name(&self) -> &'static str {
        "tail"
    }

    fn summary(&self) -> &'static str {
        "output the last part of files"
    }

    fn usage(&self) -> &'static str {
        "tail [-n [+]LINES | -c BYTES | +LINES] [-qv] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(HEAD_TAIL_SPEC)
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let opts = HeadTailOptions::from_context(&ctx)?;
        let (lines, bytes, from_line) = (opts.lines, opts.bytes, opts.from_line);
        run_head_tail(&ctx, &opts, |content| get_tail(content, lines, bytes, from_line))
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, run_with_stdin, session};

    const TEXT: &str = "a\nb\nc\nd\ne\n";

    #[tokio::test]
    async fn test_tail_counts() {
        let mut s = session();
        assert_eq!(run_with_stdin(&mut s, "tail -n 2", Some(TEXT)).await.unwrap(), "d\ne\n");
        assert_eq!(run_with_stdin(&mut s, "tail -n +4", Some(TEXT)).await.unwrap(), "d\ne\n");
        assert_eq!(run_with_stdin(&mut s, "tail +2", Some(TEXT)).await.unwrap(), "b\nc\nd\ne\n");
        assert_eq!(run_with_stdin(&mut s, "tail -c 2", Some(TEXT)).await.unwrap(), "e\n");
    }

    #[tokio::test]
    async fn test_tail_file() {
        let mut s = session();
        let out = run(&mut s, "tail -n 1 documents/notes.md").await.unwrap();
        assert_eq!(out, "- Idea 3\n");
    }
}
