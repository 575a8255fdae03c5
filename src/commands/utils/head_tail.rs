// src/commands/utils/head_tail.rs
use super::gather_inputs;
use crate::commands::args::ArgSpec;
use crate::commands::{CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub const HEAD_TAIL_SPEC: ArgSpec = ArgSpec::flags("ncqv").values("nc");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTailOptions {
    pub lines: usize,
    pub bytes: Option<usize>,
    pub quiet: bool,
    pub verbose: bool,
    pub files: Vec<String>,
    pub from_line: bool, // tail +N
}

impl Default for HeadTailOptions {
    fn default() -> Self {
        Self {
            lines: 10,
            bytes: None,
            quiet: false,
            verbose: false,
            files: Vec::new(),
            from_line: false,
        }
    }
}

pub fn parse_count(value: &str, command: &str, what: &str) -> Result<usize, ShellError> {
    value
        .parse()
        .map_err(|_| ShellError::invalid(format!("{}: invalid number of {}: '{}'", command, what, value)))
}

impl HeadTailOptions {
    pub fn from_context(ctx: &CommandContext<'_>) -> Result<Self, ShellError> {
        let cmd = ctx.name.as_str();
        let is_tail = cmd == "tail";
        let mut opts = HeadTailOptions {
            quiet: ctx.args.has_flag('q'),
            verbose: ctx.args.has_flag('v'),
            ..Default::default()
        };

        if let Some(n) = ctx.args.value('n') {
            match n.strip_prefix('+') {
                Some(rest) if is_tail => {
                    opts.from_line = true;
                    opts.lines = parse_count(rest, cmd, "lines")?;
                }
                _ => opts.lines = parse_count(n, cmd, "lines")?,
            }
        }
        if let Some(c) = ctx.args.value('c') {
            opts.bytes = Some(parse_count(c, cmd, "bytes")?);
        }

        let mut operands = ctx.args.operands.iter().peekable();
        if is_tail {
            // `tail +3 file`
            if let Some(rest) = operands.peek().and_then(|o| o.strip_prefix('+')) {
                if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                    opts.from_line = true;
                    opts.lines = parse_count(rest, cmd, "lines")?;
                    operands.next();
                }
            }
        }
        opts.files = operands.cloned().collect();
        Ok(opts)
    }
}

/// Shared driver: apply `processor` to every input, adding `==> name <==`
/// headers when more than one file is shown (or `-v`).
pub fn run_head_tail<F>(ctx: &CommandContext<'_>, opts: &HeadTailOptions, processor: F) -> CommandResult
where
    F: Fn(&str) -> String,
{
    let (inputs, errors) = gather_inputs(ctx, &opts.files)?;
    let show_headers = opts.verbose || (!opts.quiet && opts.files.len() > 1);

    let mut stdout = String::new();
    for (i, input) in inputs.iter().enumerate() {
        if show_headers {
            if i > 0 {
                stdout.push('\n');
            }
            let name = input.name.as_deref().unwrap_or("standard input");
            stdout.push_str(&format!("==> {} <==\n", name));
        }
        stdout.push_str(&processor(&input.text));
    }
    ShellError::collect(stdout, errors)
}

pub fn get_head(content: &str, lines: usize, bytes: Option<usize>) -> String {
    if let Some(b) = bytes {
        return content.chars().take(b).collect();
    }
    content.split_inclusive('\n').take(lines).collect()
}

pub fn get_tail(content: &str, lines: usize, bytes: Option<usize>, from_line: bool) -> String {
    if let Some(b) = bytes {
        let chars: Vec<char> = content.chars().collect();
        let start = chars.len().saturating_sub(b);
        return chars[start..].iter().collect();
    }

    let all: Vec<&str> = content.split_inclusive('\n').collect();
    let start = if from_line {
        lines.saturating_sub(1)
    } else {
        all.len().saturating_sub(lines)
    };
    let mut out: String = all.iter().skip(start).copied().collect();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
