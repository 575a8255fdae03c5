// src/commands/sleep_cmd/mod.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct SleepCommand;

/// `N`, `Ns`, `Nm`, `Nh` or `Nd` in milliseconds; N may have a fraction.
pub fn parse_duration(arg: &str) -> Result<u64, ShellError> {
    let invalid = || ShellError::invalid(format!("sleep: invalid time interval '{}'", arg));
    let (number, scale) = match arg.chars().last() {
        Some('s') => (&arg[..arg.len() - 1], 1_000.0),
        Some('m') => (&arg[..arg.len() - 1], 60_000.0),
        Some('h') => (&arg[..arg.len() - 1], 3_600_000.0),
        Some('d') => (&arg[..arg.len() - 1], 86_400_000.0),
        _ => (arg, 1_000.0),
    };
    let value: f64 = number.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok((value * scale).round() as u64)
}

#[async_trait]
impl Command for SleepCommand {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn summary(&self) -> &'static str {
        "delay for a specified amount of time"
    }

    fn usage(&self) -> &'static str {
        "sleep NUMBER[smhd]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").min(1))
    }

    /// In the background this only registers a job whose timer completes it;
    /// in the foreground it waits on the session clock.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut total = 0u64;
        for arg in &ctx.args.operands {
            total = total.saturating_add(parse_duration(arg)?);
        }
        if ctx.background {
            let now = ctx.session.clock.now_ms();
            let job = ctx.session.jobs.spawn(&ctx.line, now, Some(total));
            return Ok(format!("[{}] {}\n", job.job_id, job.pid));
        }
        ctx.session.clock.sleep(total).await;
        Ok(String::new())
    }
}
