//! Job Control
//!
//! Background jobs are entries in a table, not processes. A job may carry a
//! deadline on the session clock; `fire_due` turns every job whose deadline
//! has passed from Running into Done. Nothing runs concurrently, so callers
//! fire timers at well-defined points (before each command line).
//!
//! ```text
//! Running --STOP--> Stopped --CONT/bg--> Running (no timer)
//! Running --timer--> Done
//! Running/Stopped --KILL/TERM--> Terminated
//! ```

pub mod clock;

pub use clock::Clock;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Stopped,
    Done,
    Terminated,
}

impl JobStatus {
    pub fn is_live(self) -> bool {
        matches!(self, JobStatus::Running | JobStatus::Stopped)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Running => "Running",
            JobStatus::Stopped => "Stopped",
            JobStatus::Done => "Done",
            JobStatus::Terminated => "Terminated",
        };
        // Honor width flags so job listings can pad the column.
        f.pad(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Kill,
    Term,
    Stop,
    Cont,
}

impl Signal {
    /// Accepts `9`, `KILL`, `SIGKILL` and the same forms for TERM (15),
    /// STOP (19) and CONT (18).
    pub fn parse(s: &str) -> Option<Signal> {
        let name = s.strip_prefix("SIG").unwrap_or(s);
        match name.to_ascii_uppercase().as_str() {
            "9" | "KILL" => Some(Signal::Kill),
            "15" | "TERM" => Some(Signal::Term),
            "19" | "STOP" => Some(Signal::Stop),
            "18" | "CONT" => Some(Signal::Cont),
            _ => None,
        }
    }

    pub fn number(self) -> u32 {
        match self {
            Signal::Kill => 9,
            Signal::Term => 15,
            Signal::Stop => 19,
            Signal::Cont => 18,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Signal::Kill => "KILL",
            Signal::Term => "TERM",
            Signal::Stop => "STOP",
            Signal::Cont => "CONT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub job_id: u32,
    pub pid: u32,
    pub command: String,
    pub status: JobStatus,
    pub start_time: u64,
    pub end_time: Option<u64>,
    deadline: Option<u64>,
}

impl Job {
    pub fn has_timer(&self) -> bool {
        self.deadline.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct JobTable {
    jobs: Vec<Job>,
    next_job_id: u32,
    next_pid: u32,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self { jobs: Vec::new(), next_job_id: 1, next_pid: 1000 }
    }

    /// Add a running job. With `duration_ms` it completes on its own.
    pub fn spawn(&mut self, command: &str, now: u64, duration_ms: Option<u64>) -> Job {
        let job = Job {
            job_id: self.next_job_id,
            pid: self.next_pid,
            command: command.to_string(),
            status: JobStatus::Running,
            start_time: now,
            end_time: None,
            deadline: duration_ms.map(|d| now + d),
        };
        self.next_job_id += 1;
        self.next_pid += 1;
        log::debug!("job [{}] pid {} started: {}", job.job_id, job.pid, job.command);
        self.jobs.push(job.clone());
        job
    }

    /// Complete every timer that is due at `now`.
    pub fn fire_due(&mut self, now: u64) -> Vec<Job> {
        let mut finished = Vec::new();
        for job in &mut self.jobs {
            if job.status == JobStatus::Running && job.deadline.map_or(false, |d| d <= now) {
                job.status = JobStatus::Done;
                job.end_time = Some(now);
                job.deadline = None;
                log::debug!("job [{}] done", job.job_id);
                finished.push(job.clone());
            }
        }
        finished
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, job_id: u32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.job_id == job_id)
    }

    pub fn get_by_pid(&self, pid: u32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.pid == pid)
    }

    fn get_mut(&mut self, job_id: u32) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.job_id == job_id)
    }

    /// Most recently started job still in the table.
    pub fn current(&self) -> Option<&Job> {
        self.jobs.last()
    }

    /// Resolve `%N`, `N`, `%+`, `%%`, `%-` or `%prefix` to a job id.
    pub fn resolve(&self, spec: &str) -> Option<u32> {
        let body = spec.strip_prefix('%').unwrap_or(spec);
        match body {
            "" | "+" | "%" => self.current().map(|j| j.job_id),
            "-" => self.jobs.iter().rev().nth(1).map(|j| j.job_id),
            _ => {
                if let Ok(id) = body.parse::<u32>() {
                    return self.get(id).map(|j| j.job_id);
                }
                self.jobs
                    .iter()
                    .rev()
                    .find(|j| j.command.starts_with(body))
                    .map(|j| j.job_id)
            }
        }
    }

    /// Deliver `signal` to a live job. Finished jobs are treated as gone.
    pub fn signal(&mut self, job_id: u32, signal: Signal, now: u64) -> Option<JobStatus> {
        let job = self.get_mut(job_id).filter(|j| j.status.is_live())?;
        match signal {
            Signal::Kill | Signal::Term => {
                job.status = JobStatus::Terminated;
                job.end_time = Some(now);
                job.deadline = None;
            }
            Signal::Stop => {
                // The timer is cancelled for good; a continued job never completes on its own.
                if job.status == JobStatus::Running {
                    job.deadline = None;
                    job.status = JobStatus::Stopped;
                }
            }
            Signal::Cont => {
                if job.status == JobStatus::Stopped {
                    job.status = JobStatus::Running;
                }
            }
        }
        log::debug!("job [{}] got SIG{}, now {}", job.job_id, signal.name(), job.status);
        Some(job.status)
    }

    pub fn remove(&mut self, job_id: u32) -> Option<Job> {
        let index = self.jobs.iter().position(|j| j.job_id == job_id)?;
        Some(self.jobs.remove(index))
    }

    /// Drop Done and Terminated jobs. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.status.is_live());
        before - self.jobs.len()
    }

    /// `+` for the newest entry, `-` for the one before, by table position.
    pub fn marker(&self, job_id: u32) -> char {
        let mut ids = self.jobs.iter().rev().map(|j| j.job_id);
        match (ids.next(), ids.next()) {
            (Some(first), _) if first == job_id => '+',
            (_, Some(second)) if second == job_id => '-',
            _ => ' ',
        }
    }

    pub fn format(&self, job: &Job, show_pid: bool) -> String {
        let id = format!("[{}]{}", job.job_id, self.marker(job.job_id));
        let pid = if show_pid { format!(" {}", job.pid) } else { String::new() };
        format!("{:<6} {:<10}{} {}", id, job.status, pid, job.command)
    }
}
