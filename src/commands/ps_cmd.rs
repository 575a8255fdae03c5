// src/commands/ps_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::kill_cmd::SHELL_PID;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::jobs::JobStatus;

pub struct PsCommand;

struct Process {
    pid: u32,
    user: String,
    stat: char,
    command: String,
}

#[async_trait]
impl Command for PsCommand {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn summary(&self) -> &'static str {
        "report a snapshot of the current processes"
    }

    fn usage(&self) -> &'static str {
        "ps [-auxef]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("auxef").max(1))
    }

    /// `init`, the shell, then background jobs. Stopped jobs only appear
    /// with `-a`, `-x` or `-e`.
    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        // BSD style `ps aux` arrives as an operand.
        let bsd = ctx.args.operands.first().map(String::as_str).unwrap_or("");
        let has = |c: char| ctx.args.has_flag(c) || bsd.contains(c);
        let show_all = has('a') || has('x') || has('e');
        let long = has('u') || has('f');

        let user = ctx.session.users.current_name().to_string();
        let mut procs = vec![
            Process { pid: 1, user: "root".into(), stat: 'S', command: "/sbin/init".into() },
            Process { pid: SHELL_PID, user: user.clone(), stat: 'S', command: "bash".into() },
        ];
        for job in ctx.session.jobs.jobs() {
            let stat = match job.status {
                JobStatus::Running => 'S',
                JobStatus::Stopped => 'T',
                _ => continue,
            };
            if stat == 'T' && !show_all {
                continue;
            }
            procs.push(Process { pid: job.pid, user: user.clone(), stat, command: job.command.clone() });
        }

        let mut out = String::new();
        if long {
            out.push_str("USER         PID STAT COMMAND\n");
            for p in &procs {
                out.push_str(&format!("{:<10} {:>5} {:<4} {}\n", p.user, p.pid, p.stat, p.command));
            }
        } else {
            out.push_str("  PID TTY          TIME CMD\n");
            for p in &procs {
                out.push_str(&format!("{:>5} pts/0    00:00:00 {}\n", p.pid, p.command));
            }
        }
        Ok(out)
    }
}
