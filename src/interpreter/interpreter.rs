//! Interpreter
//!
//! `Shell` is the outer boundary: it takes one raw line, runs it against its
//! session and returns the text a terminal should show. Errors are rendered
//! here and nowhere else.

use std::time::Duration;

use tokio::time::Instant;

use crate::commands::{create_default_registry, dispatch, CommandRegistry, CommandResult, Invocation};
use crate::config::ShellConfig;
use crate::fs::persistence::{self, AutoSave, BlobStore, FileStore, PersistError};
use crate::interpreter::errors::ShellError;
use crate::interpreter::redirections::{deliver, open_output, read_input};
use crate::interpreter::word_expansion::expand_word;
use crate::jobs::Clock;
use crate::parser::{parse, CommandList, Connector, ParsedLine};
use crate::permissions::{can_access, Access};
use crate::session::ShellSession;

/// Scripts may run scripts, up to this depth.
const MAX_SCRIPT_DEPTH: usize = 16;

pub struct Shell {
    session: ShellSession,
    registry: CommandRegistry,
    store: Option<Box<dyn BlobStore>>,
    autosave: AutoSave,
}

impl Shell {
    /// A shell without persistence.
    pub fn new(session: ShellSession) -> Self {
        let delay = Duration::from_millis(session.config.autosave_delay_ms);
        Self { session, registry: create_default_registry(), store: None, autosave: AutoSave::new(delay) }
    }

    /// Restore from `store` and save back to it.
    pub fn with_store(config: ShellConfig, clock: Clock, store: Box<dyn BlobStore>) -> Self {
        let session = ShellSession::restore(config, clock, store.as_ref());
        let mut shell = Self::new(session);
        shell.store = Some(store);
        shell
    }

    /// Persist under `config.state_dir` when it is set.
    pub fn open(config: ShellConfig) -> Self {
        match config.state_dir.clone() {
            Some(dir) => {
                log::info!("using state directory {}", dir.display());
                Self::with_store(config, Clock::system(), Box::new(FileStore::new(dir)))
            }
            None => Self::new(ShellSession::new(config)),
        }
    }

    pub fn session(&self) -> &ShellSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ShellSession {
        &mut self.session
    }

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    /// Run one line and return everything it printed.
    ///
    /// History designators are expanded first; when they change the line,
    /// the expanded text is echoed before its output.
    pub async fn execute(&mut self, line: &str) -> String {
        let mut out = self.poll_jobs();
        let line = line.trim();
        if line.is_empty() {
            return out;
        }

        let expanded = match self.session.history.expand(line) {
            Ok((text, changed)) => {
                if changed {
                    out.push_str(&text);
                    out.push('\n');
                }
                text
            }
            Err(e) => {
                out.push_str(&format!("bash: {}\n", e));
                return out;
            }
        };
        self.session.history.add(&expanded);
        self.session.history.reset_cursor();
        log::debug!("execute: {}", expanded);

        let before = self.saved_fingerprint();
        let (text, _) = self.run_line(&expanded, 0).await;
        out.push_str(&text);
        if self.saved_fingerprint() != before {
            self.schedule_save();
        }
        out
    }

    /// Fire due job timers and report the jobs that finished.
    pub fn poll_jobs(&mut self) -> String {
        let now = self.session.clock.now_ms();
        let finished = self.session.jobs.fire_due(now);
        finished
            .iter()
            .map(|job| format!("{}\n", self.session.jobs.format(job, false)))
            .collect()
    }

    /// Candidates for tab completion of the last word in `partial`.
    ///
    /// The first word of a command completes to command names, anything else
    /// to entries of the directory it names. Directories get a trailing `/`.
    pub fn complete(&self, partial: &str) -> Vec<String> {
        let (head, word) = match partial.rfind(char::is_whitespace) {
            Some(i) => (&partial[..i], &partial[i + 1..]),
            None => ("", partial),
        };
        let head = head.trim_end();
        let command_position = head.is_empty() || head.ends_with(['|', ';', '&']);
        if command_position && !word.contains('/') {
            return self
                .registry
                .names()
                .into_iter()
                .filter(|n| n.starts_with(word))
                .map(String::from)
                .collect();
        }

        let (dir, prefix) = match word.rfind('/') {
            Some(i) => (&word[..=i], &word[i + 1..]),
            None => ("", word),
        };
        let segments = self.session.resolve(if dir.is_empty() { "." } else { dir });
        let Ok(node) = self.session.check_walk(&segments, "") else {
            return Vec::new();
        };
        if !can_access(node, self.session.user(), Access::Read) {
            return Vec::new();
        }
        let Some(children) = node.children() else {
            return Vec::new();
        };
        children
            .iter()
            .filter(|(name, _)| name.starts_with(prefix) && (prefix.starts_with('.') || !name.starts_with('.')))
            .map(|(name, child)| {
                let slash = if child.is_dir() { "/" } else { "" };
                format!("{}{}{}", dir, name, slash)
            })
            .collect()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// When the pending autosave should run, if one is pending.
    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    /// Save now, whether or not a save is pending.
    pub fn save(&mut self) -> Result<usize, PersistError> {
        self.autosave.clear();
        let Some(store) = self.store.as_mut() else {
            return Ok(0);
        };
        let session = &mut self.session;
        let bytes = persistence::save_state(store.as_mut(), session.vfs.root(), &session.cwd, session.history.entries())?;
        session.last_saved_bytes = Some(bytes);
        Ok(bytes)
    }

    /// Save if the debounce deadline has passed. Failures are logged.
    pub fn save_if_due(&mut self, now: Instant) {
        if self.autosave.is_due(now) {
            if let Err(e) = self.save() {
                log::warn!("autosave failed: {}", e);
            }
        }
    }

    /// Changes to these mean the stored snapshot is stale.
    fn saved_fingerprint(&self) -> (u64, Vec<String>) {
        (self.session.vfs.revision(), self.session.cwd.clone())
    }

    fn schedule_save(&mut self) {
        if self.store.is_some() {
            self.autosave.schedule(Instant::now());
        }
    }

    /// Parse and run a line. Returns the rendered text and whether the last
    /// pipeline that ran succeeded.
    async fn run_line(&mut self, line: &str, depth: usize) -> (String, bool) {
        match parse(line) {
            Ok(list) => self.run_list(&list, depth).await,
            Err(e) => (format!("{}\n", ShellError::Syntax(e.to_string())), false),
        }
    }

    async fn run_list(&mut self, list: &CommandList, depth: usize) -> (String, bool) {
        let mut out = String::new();
        let mut ok = true;
        for (connector, pipeline) in &list.items {
            let runs = match connector {
                Connector::Always => true,
                Connector::OnSuccess => ok,
                Connector::OnFailure => !ok,
            };
            if !runs {
                continue;
            }
            match self.run_pipeline(pipeline, depth).await {
                Ok(text) => {
                    out.push_str(&text);
                    ok = true;
                }
                Err(e) => {
                    out.push_str(&e.to_string());
                    out.push('\n');
                    ok = false;
                }
            }
        }
        (out, ok)
    }

    async fn run_pipeline(&mut self, pipeline: &ParsedLine, depth: usize) -> CommandResult {
        if let Some(result) = self.try_assignment(pipeline) {
            return result;
        }

        let mut stages = Vec::with_capacity(pipeline.commands.len());
        for stage in &pipeline.commands {
            let mut words = expand_word(&stage.name, &self.session);
            for arg in &stage.args {
                words.extend(expand_word(arg, &self.session));
            }
            if words.is_empty() {
                continue;
            }
            let name = words.remove(0);
            if !name.contains('/') && !self.registry.contains(&name) {
                return Err(self.registry.not_found(&name));
            }
            stages.push((name, words));
        }
        if stages.is_empty() {
            return Ok(String::new());
        }

        let redirections = &pipeline.redirections;
        let mut input = match &redirections.input {
            Some(word) => Some(read_input(&self.session, &word.expand(&self.session.env))?),
            None => None,
        };
        let target = match &redirections.output {
            Some(word) => {
                let path = word.expand(&self.session.env);
                Some(open_output(&mut self.session, &path, redirections.append)?)
            }
            None => None,
        };

        let jobs_before = self.session.jobs.jobs().len();
        let mut errors = Vec::new();
        let mut output = String::new();
        for (i, (name, args)) in stages.iter().enumerate() {
            let stdin = if i == 0 {
                input.take()
            } else if self.session.config.pipe_input.accepts(name) {
                Some(std::mem::take(&mut output))
            } else {
                None
            };
            let result = if name.contains('/') {
                self.run_script(name, depth).await
            } else {
                let invocation = Invocation::new(name.clone(), args.clone())
                    .with_stdin(stdin)
                    .in_background(pipeline.is_background);
                dispatch(&mut self.session, &self.registry, invocation).await
            };
            output = match result {
                Ok(text) => text,
                Err(ShellError::Partial { output, errors: failed }) => {
                    errors.extend(failed);
                    output
                }
                Err(other) => {
                    errors.push(other);
                    String::new()
                }
            };
        }

        let mut prefix = String::new();
        if pipeline.is_background && self.session.jobs.jobs().len() == jobs_before {
            // Anything but `sleep` finishes at once; it still gets a job entry.
            let text: Vec<String> = stages.iter().map(|(n, a)| format_stage(n, a)).collect();
            let now = self.session.clock.now_ms();
            let job = self.session.jobs.spawn(&text.join(" | "), now, Some(0));
            prefix = format!("[{}] {}\n", job.job_id, job.pid);
        }

        if let Some(target) = &target {
            deliver(&mut self.session, target, &output)?;
            output.clear();
        }
        ShellError::collect(format!("{}{}", prefix, output), errors)
    }

    /// A lone `NAME=value` word sets a variable.
    fn try_assignment(&mut self, pipeline: &ParsedLine) -> Option<CommandResult> {
        let [stage] = pipeline.commands.as_slice() else {
            return None;
        };
        if !stage.args.is_empty() || !stage.name.is_assignment() {
            return None;
        }
        let text = stage.name.expand(&self.session.env);
        let (name, value) = text.split_once('=')?;
        self.session.env.set(name, value);
        Some(Ok(String::new()))
    }

    /// Run each non-comment line of an executable file.
    async fn run_script(&mut self, path: &str, depth: usize) -> CommandResult {
        let context = format!("bash: {}", path);
        if depth >= MAX_SCRIPT_DEPTH {
            return Err(ShellError::invalid(format!("{}: maximum script depth exceeded", context)));
        }
        let segments = self.session.resolve(path);
        let node = self.session.check_walk(&segments, &context)?;
        if node.is_dir() {
            return Err(ShellError::is_a_directory(context));
        }
        let user = self.session.user();
        if !can_access(node, user, Access::Read) || !can_access(node, user, Access::Execute) {
            return Err(ShellError::permission_denied(context));
        }
        let script = node.content().unwrap_or_default().to_string();
        log::info!("running script {}", path);

        let mut out = String::new();
        let mut ok = true;
        for line in script.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (text, line_ok) = Box::pin(self.run_line(line, depth + 1)).await;
            out.push_str(&text);
            ok = line_ok;
        }
        if ok {
            Ok(out)
        } else {
            Err(ShellError::invalid(out.trim_end_matches('\n')))
        }
    }
}

fn format_stage(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, args.join(" "))
    }
}
