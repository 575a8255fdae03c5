// src/commands/kill_cmd.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::jobs::Signal;
use crate::session::ShellSession;

pub struct KillCommand;

const INIT_PID: u32 = 1;
pub const SHELL_PID: u32 = 100;
const USAGE: &str =
    "kill: usage: kill [-s sigspec | -n signum | -sigspec] pid | jobspec ... or kill -l [sigspec]";

fn signal_list() -> String {
    [Signal::Kill, Signal::Term, Signal::Cont, Signal::Stop]
        .iter()
        .map(|s| format!("{:>2}) SIG{}", s.number(), s.name()))
        .collect::<Vec<_>>()
        .join("\t")
        + "\n"
}

fn parse_signal(spec: &str) -> Result<Signal, ShellError> {
    Signal::parse(spec)
        .ok_or_else(|| ShellError::invalid(format!("bash: kill: {}: invalid signal specification", spec)))
}

fn kill_target(session: &mut ShellSession, target: &str, signal: Signal) -> Result<String, ShellError> {
    let now = session.clock.now_ms();
    let job_id = if target.starts_with('%') {
        session.jobs.resolve(target).ok_or_else(|| ShellError::NoSuchJob {
            command: "kill".into(),
            spec: target.to_string(),
        })?
    } else {
        let pid: u32 = target.parse().map_err(|_| {
            ShellError::invalid(format!("bash: kill: {}: arguments must be process or job IDs", target))
        })?;
        match pid {
            INIT_PID => return Err(ShellError::not_permitted(format!("bash: kill: ({})", pid))),
            SHELL_PID => {
                return Err(ShellError::invalid(format!("bash: kill: ({}) - Cannot kill current shell", pid)));
            }
            _ => {}
        }
        session
            .jobs
            .get_by_pid(pid)
            .filter(|j| j.status.is_live())
            .map(|j| j.job_id)
            .ok_or_else(|| ShellError::NoSuchProcess { command: "kill".into(), pid: pid.to_string() })?
    };

    let status = session.jobs.signal(job_id, signal, now).ok_or_else(|| ShellError::NoSuchProcess {
        command: "kill".into(),
        pid: target.to_string(),
    })?;
    let job = session.jobs.get(job_id).cloned();
    Ok(match job {
        Some(job) if matches!(signal, Signal::Cont) => format!("{} &\n", session.jobs.format(&job, false)),
        Some(job) => format!("{}\n", session.jobs.format(&job, false)),
        None => format!("{}\n", status),
    })
}

#[async_trait]
impl Command for KillCommand {
    fn name(&self) -> &'static str {
        "kill"
    }

    fn summary(&self) -> &'static str {
        "send a signal to a job or process"
    }

    fn usage(&self) -> &'static str {
        "kill [-s SIGNAL | -SIGNAL] PID|%JOB... or kill -l"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut signal = Signal::Term;
        let mut args = ctx.raw_args.iter();
        let mut targets = Vec::new();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-l" | "-L" => return Ok(signal_list()),
                "-s" | "-n" => {
                    let spec = args.next().ok_or_else(|| ShellError::OptionRequiresArgument {
                        command: "kill".into(),
                        option: arg.chars().nth(1).unwrap_or('s'),
                    })?;
                    signal = parse_signal(spec)?;
                }
                "--" => targets.extend(args.by_ref().cloned()),
                flag if flag.starts_with('-') && targets.is_empty() && flag.len() > 1 => {
                    signal = parse_signal(&flag[1..])?;
                }
                _ => targets.push(arg.clone()),
            }
        }
        if targets.is_empty() {
            return Err(ShellError::invalid(USAGE));
        }

        let mut out = String::new();
        let mut errors = Vec::new();
        for target in &targets {
            match kill_target(&mut *ctx.session, target, signal) {
                Ok(line) => out.push_str(&line),
                Err(e) => errors.push(e),
            }
        }
        ShellError::collect(out, errors)
    }
}
