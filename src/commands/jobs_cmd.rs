// src/commands/jobs_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;
use crate::jobs::{JobStatus, JobTable, Signal};

pub struct JobsCommand;
pub struct FgCommand;
pub struct BgCommand;

/// Job id for an optional `%N`-style operand, defaulting to the current job.
fn select_job(table: &JobTable, command: &str, spec: Option<&String>) -> Result<u32, ShellError> {
    let spec = spec.map_or("%+", |s| s.as_str());
    table.resolve(spec).ok_or_else(|| ShellError::NoSuchJob {
        command: command.to_string(),
        spec: if spec == "%+" { "current".to_string() } else { spec.to_string() },
    })
}

#[async_trait]
impl Command for JobsCommand {
    fn name(&self) -> &'static str {
        "jobs"
    }

    fn summary(&self) -> &'static str {
        "display status of jobs"
    }

    fn usage(&self) -> &'static str {
        "jobs [-l]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("lp").max(0))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let table = &mut ctx.session.jobs;
        table.cleanup();
        if ctx.args.has_flag('p') {
            return Ok(table.jobs().iter().map(|j| format!("{}\n", j.pid)).collect());
        }
        let show_pid = ctx.args.has_flag('l');
        Ok(table.jobs().iter().map(|j| format!("{}\n", table.format(j, show_pid))).collect())
    }
}

#[async_trait]
impl Command for FgCommand {
    fn name(&self) -> &'static str {
        "fg"
    }

    fn summary(&self) -> &'static str {
        "move a job to the foreground"
    }

    fn usage(&self) -> &'static str {
        "fg [%N]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let now = ctx.session.clock.now_ms();
        let table = &mut ctx.session.jobs;
        table.cleanup();
        let id = select_job(table, "fg", ctx.args.operands.first())?;
        table.signal(id, Signal::Cont, now);
        let job = table
            .remove(id)
            .ok_or_else(|| ShellError::NoSuchJob { command: "fg".into(), spec: format!("%{}", id) })?;
        Ok(format!("{}\n(Job brought to foreground - simulated)\n", job.command))
    }
}

#[async_trait]
impl Command for BgCommand {
    fn name(&self) -> &'static str {
        "bg"
    }

    fn summary(&self) -> &'static str {
        "resume a stopped job in the background"
    }

    fn usage(&self) -> &'static str {
        "bg [%N]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let now = ctx.session.clock.now_ms();
        let table = &mut ctx.session.jobs;
        table.cleanup();
        if table.is_empty() && ctx.args.operands.is_empty() {
            return Err(ShellError::invalid("bash: bg: no current job"));
        }
        let id = select_job(table, "bg", ctx.args.operands.first())?;
        if table.get(id).map(|j| j.status) == Some(JobStatus::Running) {
            return Err(ShellError::invalid(format!("bash: bg: job {} already in background", id)));
        }
        table.signal(id, Signal::Cont, now);
        let marker = table.marker(id);
        let command = table.get(id).map(|j| j.command.clone()).unwrap_or_default();
        Ok(format!("[{}]{} {} &\n", id, marker, command))
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{run, session};
    use crate::interpreter::errors::ShellError;
    use crate::jobs::{JobStatus, Signal};
    use crate::session::ShellSession;

    fn with_jobs() -> ShellSession {
        let mut s = session();
        s.jobs.spawn("sleep 5", 0, Some(5000));
        s.jobs.spawn("sleep 30", 0, Some(30_000));
        s
    }

    #[tokio::test]
    async fn test_jobs_lists_and_purges() {
        let mut s = with_jobs();
        assert_eq!(
            run(&mut s, "jobs").await.unwrap(),
            "[1]-   Running    sleep 5\n[2]+   Running    sleep 30\n"
        );
        assert_eq!(run(&mut s, "jobs -l").await.unwrap().lines().next(), Some("[1]-   Running    1000 sleep 5"));
        s.jobs.fire_due(5000);
        assert_eq!(run(&mut s, "jobs").await.unwrap(), "[2]+   Running    sleep 30\n");
        assert_eq!(run(&mut s, "jobs -p").await.unwrap(), "1001\n");
    }

    #[tokio::test]
    async fn test_fg_removes_job() {
        let mut s = with_jobs();
        s.jobs.signal(1, Signal::Stop, 100);
        let out = run(&mut s, "fg %1").await.unwrap();
        assert_eq!(out, "sleep 5\n(Job brought to foreground - simulated)\n");
        assert!(s.jobs.get(1).is_none());
        run(&mut s, "fg").await.unwrap();
        assert!(s.jobs.is_empty());
        assert_eq!(run(&mut s, "fg").await.unwrap_err().to_string(), "bash: fg: current: no such job");
        assert_eq!(run(&mut s, "fg %7").await.unwrap_err().to_string(), "bash: fg: %7: no such job");
    }

    #[tokio::test]
    async fn test_bg_resumes_stopped_job() {
        let mut s = with_jobs();
        s.jobs.signal(2, Signal::Stop, 1000);
        assert_eq!(run(&mut s, "bg").await.unwrap(), "[2]+ sleep 30 &\n");
        assert_eq!(s.jobs.get(2).map(|j| j.status), Some(JobStatus::Running));
        assert_eq!(
            run(&mut s, "bg %1").await,
            Err(ShellError::invalid("bash: bg: job 1 already in background"))
        );
    }

    #[tokio::test]
    async fn test_bg_without_jobs() {
        let mut s = session();
        assert_eq!(run(&mut s, "bg").await, Err(ShellError::invalid("bash: bg: no current job")));
    }
}
