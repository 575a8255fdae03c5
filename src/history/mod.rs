//! Command history with bash-style event designators.

use thiserror::Error;

pub const MAX_HISTORY_SIZE: usize = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}: event not found")]
pub struct EventNotFound(pub String);

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: Vec<String>,
    limit: usize,
    // Position for up/down recall; `entries.len()` means "below the newest".
    cursor: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self { entries: Vec::new(), limit: limit.max(1), cursor: 0 }
    }

    pub fn with_entries(limit: usize, entries: Vec<String>) -> Self {
        let mut history = Self::new(limit);
        for entry in entries {
            history.add(&entry);
        }
        history
    }

    /// Record a command. Empty lines and repeats of the newest entry are skipped.
    pub fn add(&mut self, command: &str) {
        let trimmed = command.trim();
        if trimmed.is_empty() || self.entries.last().map(|s| s.as_str()) == Some(trimmed) {
            self.cursor = self.entries.len();
            return;
        }
        self.entries.push(trimmed.to_string());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len();
    }

    /// 0-based lookup.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|s| s.as_str())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Step back (up arrow). Stays on the oldest entry once reached.
    pub fn previous(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.get(self.cursor)
    }

    /// Step forward (down arrow). Moving past the newest entry yields an
    /// empty line; further calls yield nothing.
    pub fn next(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.get(self.cursor)
        } else if self.cursor + 1 == self.entries.len() {
            self.cursor = self.entries.len();
            Some("")
        } else {
            None
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    fn resolve_event(&self, designator: &str) -> Option<&str> {
        if designator == "!" {
            return self.entries.last().map(|s| s.as_str());
        }
        if let Some(n) = designator.strip_prefix('-') {
            let n: usize = n.parse().ok()?;
            let index = self.entries.len().checked_sub(n)?;
            return self.get(index);
        }
        if let Ok(n) = designator.parse::<usize>() {
            return self.get(n.checked_sub(1)?);
        }
        self.entries
            .iter()
            .rev()
            .find(|e| e.starts_with(designator))
            .map(|s| s.as_str())
    }

    /// Expand `!!`, `!n`, `!-n` and `!prefix` outside single quotes.
    ///
    /// Returns the new line and whether anything was substituted.
    pub fn expand(&self, line: &str) -> Result<(String, bool), EventNotFound> {
        let chars: Vec<char> = line.chars().collect();
        let mut out = String::with_capacity(line.len());
        let mut in_single = false;
        let mut in_double = false;
        let mut changed = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match c {
                '\\' if !in_single => {
                    out.push(c);
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(next);
                    }
                    i += 2;
                    continue;
                }
                '\'' if !in_double => in_single = !in_single,
                '"' if !in_single => in_double = !in_double,
                '!' if !in_single => {
                    if let Some(len) = designator_len(&chars[i + 1..]) {
                        let designator: String = chars[i + 1..i + 1 + len].iter().collect();
                        let event = self
                            .resolve_event(&designator)
                            .ok_or_else(|| EventNotFound(format!("!{}", designator)))?;
                        out.push_str(event);
                        changed = true;
                        i += 1 + len;
                        continue;
                    }
                }
                _ => {}
            }
            out.push(c);
            i += 1;
        }
        Ok((out, changed))
    }
}

/// Length of the event designator after a `!`, if it starts one.
fn designator_len(rest: &[char]) -> Option<usize> {
    match rest.first()? {
        '!' => Some(1),
        '-' => {
            let digits = rest[1..].iter().take_while(|c| c.is_ascii_digit()).count();
            (digits > 0).then_some(1 + digits)
        }
        c if c.is_ascii_digit() => Some(rest.iter().take_while(|c| c.is_ascii_digit()).count()),
        c if c.is_ascii_alphabetic() => Some(
            rest.iter()
                .take_while(|c| !c.is_whitespace() && !matches!(c, ';' | '|' | '&' | '<' | '>' | '"' | '\''))
                .count(),
        ),
        _ => None,
    }
}

/// `history` listing: 1-based numbers right-aligned to five columns.
pub fn format_history(history: &CommandHistory, limit: Option<usize>) -> String {
    let entries = history.entries();
    let start = limit.map_or(0, |n| entries.len().saturating_sub(n));
    entries[start..]
        .iter()
        .enumerate()
        .map(|(i, cmd)| format!("{:5}  {}\n", start + i + 1, cmd))
        .collect()
}
