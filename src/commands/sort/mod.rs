// src/commands/sort/mod.rs
pub mod comparator;

use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::{gather_inputs, join_lines};
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use comparator::{compare_lines, same_key, SortOptions};

pub struct SortCommand;

fn options(ctx: &CommandContext<'_>) -> Result<SortOptions, ShellError> {
    let key = match ctx.args.value('k') {
        Some(k) => {
            let field = k.split(|c: char| c == ',' || c == '.').next().unwrap_or(k);
            match field.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => return Err(ShellError::invalid(format!("sort: invalid number at field start: invalid count at start of '{}'", k))),
            }
        }
        None => None,
    };
    let separator = match ctx.args.value('t') {
        Some(t) => {
            let mut chars = t.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => return Err(ShellError::invalid("sort: multi-character tab")),
            }
        }
        None => None,
    };
    Ok(SortOptions {
        reverse: ctx.args.has_flag('r'),
        numeric: ctx.args.has_flag('n'),
        unique: ctx.args.has_flag('u'),
        ignore_case: ctx.args.has_flag('f'),
        ignore_leading_blanks: ctx.args.has_flag('b'),
        key,
        separator,
    })
}

#[async_trait]
impl Command for SortCommand {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn summary(&self) -> &'static str {
        "sort lines of text files"
    }

    fn usage(&self) -> &'static str {
        "sort [-rnufb] [-k FIELD] [-t SEP] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("rnufbkt").values("kt"))
    }

    /// Blank lines are dropped before sorting.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let opts = options(&ctx)?;
        let (inputs, errors) = gather_inputs(&ctx, &ctx.args.operands)?;

        let mut lines: Vec<&str> = inputs
            .iter()
            .flat_map(|input| input.text.lines())
            .filter(|line| !line.trim().is_empty())
            .collect();
        lines.sort_by(|a, b| compare_lines(a, b, &opts));
        if opts.unique {
            lines.dedup_by(|a, b| same_key(a, b, &opts));
        }
        if opts.reverse {
            lines.reverse();
        }
        ShellError::collect(join_lines(&lines), errors)
    }
}
