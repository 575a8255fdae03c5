// src/commands/wc/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::gather_inputs;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct WcCommand;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    bytes: usize,
}

impl Counts {
    fn of(text: &str) -> Self {
        Self {
            lines: text.matches('\n').count(),
            words: text.split_whitespace().count(),
            bytes: text.len(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }
}

struct Columns {
    lines: bool,
    words: bool,
    bytes: bool,
}

impl Columns {
    fn selected(&self) -> usize {
        [self.lines, self.words, self.bytes].iter().filter(|c| **c).count()
    }
}

fn render(counts: Counts, cols: &Columns, label: Option<&str>) -> String {
    // GNU wc prints a lone count from stdin without padding
    if label.is_none() && cols.selected() == 1 {
        let n = if cols.lines {
            counts.lines
        } else if cols.words {
            counts.words
        } else {
            counts.bytes
        };
        return format!("{}\n", n);
    }
    let mut fields = Vec::new();
    if cols.lines {
        fields.push(format!("{:>7}", counts.lines));
    }
    if cols.words {
        fields.push(format!("{:>7}", counts.words));
    }
    if cols.bytes {
        fields.push(format!("{:>7}", counts.bytes));
    }
    let mut line = fields.join(" ");
    if let Some(label) = label {
        line.push(' ');
        line.push_str(label);
    }
    line.push('\n');
    line
}

#[async_trait]
impl Command for WcCommand {
    fn name(&self) -> &'static str {
        "wc"
    }

    fn summary(&self) -> &'static str {
        "print newline, word, and byte counts for each file"
    }

    fn usage(&self) -> &'static str {
        "wc [-lwc] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("lwcm"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let any = ctx.args.has_any("lwcm");
        let cols = Columns {
            lines: !any || ctx.args.has_flag('l'),
            words: !any || ctx.args.has_flag('w'),
            bytes: !any || ctx.args.has_any("cm"),
        };
        let (inputs, errors) = gather_inputs(&ctx, &ctx.args.operands)?;

        let mut out = String::new();
        let mut total = Counts::default();
        for input in &inputs {
            let counts = Counts::of(&input.text);
            total.add(counts);
            out.push_str(&render(counts, &cols, input.name.as_deref()));
        }
        if inputs.len() > 1 {
            out.push_str(&render(total, &cols, Some("total")));
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, run_with_stdin, session};

    #[tokio::test]
    async fn test_wc_stdin() {
        let mut s = session();
        let out = run_with_stdin(&mut s, "wc", Some("one two\nthree\n")).await.unwrap();
        assert_eq!(out, "      2       3      14\n");
        let out = run_with_stdin(&mut s, "wc -l", Some("one two\nthree\n")).await.unwrap();
        assert_eq!(out, "2\n");
        let out = run_with_stdin(&mut s, "wc -lw", Some("one two\nthree\n")).await.unwrap();
        assert_eq!(out, "      2       3\n");
    }

    #[tokio::test]
    async fn test_wc_files_with_total() {
        let mut s = session();
        let out = run(&mut s, "wc -l documents/report.txt documents/notes.md").await.unwrap();
        assert_eq!(
            out,
            "      2 documents/report.txt\n      5 documents/notes.md\n      7 total\n"
        );
    }
}
