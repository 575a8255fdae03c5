// src/commands/sed/mod.rs
pub mod executor;
pub mod parser;
pub mod types;

use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::{gather_inputs, join_lines, read_file, write_file};
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use executor::run_script;
use parser::parse_script;
use types::SedExpr;

pub struct SedCommand;

#[async_trait]
impl Command for SedCommand {
    fn name(&self) -> &'static str {
        "sed"
    }

    fn summary(&self) -> &'static str {
        "stream editor for filtering and transforming text"
    }

    fn usage(&self) -> &'static str {
        "sed [-niE] [-e SCRIPT]... [SCRIPT] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("nieEr").values("e"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let quiet = ctx.args.has_flag('n');
        let in_place = ctx.args.has_flag('i');
        let extended = ctx.args.has_any("Er");

        let scripts = ctx.args.all_values('e');
        let (scripts, files): (Vec<String>, &[String]) = if scripts.is_empty() {
            let Some((script, files)) = ctx.args.operands.split_first() else {
                return Err(ShellError::missing_operand("sed"));
            };
            (vec![script.clone()], files)
        } else {
            (scripts.into_iter().map(String::from).collect(), &ctx.args.operands[..])
        };

        let mut exprs: Vec<SedExpr> = Vec::new();
        for (i, script) in scripts.iter().enumerate() {
            exprs.extend(parse_script(script, i + 1, extended)?);
        }

        if in_place {
            if files.is_empty() {
                return Err(ShellError::invalid("sed: no input files"));
            }
            let mut errors = Vec::new();
            for file in files {
                let edited = read_file(ctx.session, file, "sed")
                    .map(|text| join_lines(&run_script(&text, &exprs, quiet)))
                    .and_then(|text| write_file(&mut *ctx.session, file, &text, false, "sed"));
                if let Err(e) = edited {
                    errors.push(e);
                }
            }
            return ShellError::collect(String::new(), errors);
        }

        let (inputs, errors) = gather_inputs(&ctx, files)?;
        let text: String = inputs.iter().map(|input| input.text.as_str()).collect();
        let out = if inputs.is_empty() { String::new() } else { join_lines(&run_script(&text, &exprs, quiet)) };
        ShellError::collect(out, errors)
    }
}
