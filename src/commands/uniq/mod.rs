// src/commands/uniq/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::gather_inputs;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct UniqCommand;

/// Runs of adjacent equal lines, with their lengths.
fn runs<'a>(lines: impl Iterator<Item = &'a str>, ignore_case: bool) -> Vec<(&'a str, usize)> {
    let mut out: Vec<(&str, usize)> = Vec::new();
    for line in lines {
        match out.last_mut() {
            Some((prev, count))
                if *prev == line || (ignore_case && prev.eq_ignore_ascii_case(line)) =>
            {
                *count += 1
            }
            _ => out.push((line, 1)),
        }
    }
    out
}

#[async_trait]
impl Command for UniqCommand {
    fn name(&self) -> &'static str {
        "uniq"
    }

    fn summary(&self) -> &'static str {
        "report or omit repeated lines"
    }

    fn usage(&self) -> &'static str {
        "uniq [-cdui] [INPUT]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("cdui").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let count = ctx.args.has_flag('c');
        let repeated = ctx.args.has_flag('d');
        let unique = ctx.args.has_flag('u');
        let (inputs, errors) = gather_inputs(&ctx, &ctx.args.operands)?;

        let mut out = String::new();
        for input in &inputs {
            for (line, n) in runs(input.text.lines(), ctx.args.has_flag('i')) {
                if (repeated && n < 2) || (unique && n > 1) {
                    continue;
                }
                if count {
                    out.push_str(&format!("{:>7} ", n));
                }
                out.push_str(line);
                out.push('\n');
            }
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run_with_stdin, session};

    const TEXT: &str = "a\na\nb\nc\nc\nc\na\n";

    #[tokio::test]
    async fn test_uniq_adjacent() {
        let mut s = session();
        assert_eq!(run_with_stdin(&mut s, "uniq", Some(TEXT)).await.unwrap(), "a\nb\nc\na\n");
    }

    #[tokio::test]
    async fn test_uniq_modes() {
        let mut s = session();
        assert_eq!(
            run_with_stdin(&mut s, "uniq -c", Some(TEXT)).await.unwrap(),
            "      2 a\n      1 b\n      3 c\n      1 a\n"
        );
        assert_eq!(run_with_stdin(&mut s, "uniq -d", Some(TEXT)).await.unwrap(), "a\nc\n");
        assert_eq!(run_with_stdin(&mut s, "uniq -u", Some(TEXT)).await.unwrap(), "b\na\n");
        assert_eq!(run_with_stdin(&mut s, "uniq -i", Some("A\na\nb\n")).await.unwrap(), "A\nb\n");
    }
}
