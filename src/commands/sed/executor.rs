// src/commands/sed/executor.rs
use regex_lite::Regex;

use super::types::{Action, Address, AddressRange, SedExpr};

/// Tracks an address range across the lines of one pass.
struct RangeState<'a> {
    range: &'a AddressRange,
    active: bool,
}

fn address_matches(address: &Address, line: &str, number: usize, last: usize) -> bool {
    match address {
        Address::Line(n) => *n == number,
        Address::Last => number == last,
        Address::Pattern(re) => re.is_match(line),
    }
}

impl RangeState<'_> {
    fn selects(&mut self, line: &str, number: usize, last: usize) -> bool {
        let hit = match &self.range.end {
            None => address_matches(&self.range.start, line, number, last),
            Some(end) => {
                if self.active {
                    let closes = match end {
                        Address::Line(n) => number >= *n,
                        other => address_matches(other, line, number, last),
                    };
                    if closes {
                        self.active = false;
                    }
                    true
                } else if address_matches(&self.range.start, line, number, last) {
                    // A line-number end at or before the start closes the range at once.
                    self.active = match end {
                        Address::Line(n) => *n > number,
                        Address::Last => number != last,
                        Address::Pattern(_) => true,
                    };
                    true
                } else {
                    false
                }
            }
        };
        hit != self.range.negated
    }
}

/// Replace matches of `regex` in `line`, starting from the `occurrence`-th,
/// every later one too when `global` is set.
pub fn substitute(line: &str, regex: &Regex, replacement: &str, global: bool, occurrence: usize) -> Option<String> {
    let mut out = String::new();
    let mut last = 0;
    let mut replaced = false;
    for (i, caps) in regex.captures_iter(line).enumerate() {
        let Some(m) = caps.get(0) else { continue };
        let index = i + 1;
        if index < occurrence {
            continue;
        }
        out.push_str(&line[last..m.start()]);
        caps.expand(replacement, &mut out);
        last = m.end();
        replaced = true;
        if !global {
            break;
        }
    }
    if !replaced {
        return None;
    }
    out.push_str(&line[last..]);
    Some(out)
}

/// Run one command over every line. In quiet mode `p` keeps only the lines
/// it selects; otherwise it doubles them.
pub fn apply_expr(lines: Vec<String>, expr: &SedExpr, quiet: bool) -> Vec<String> {
    let last = lines.len();
    let mut state = expr.address.as_ref().map(|range| RangeState { range, active: false });
    let mut out = Vec::with_capacity(lines.len());

    for (i, line) in lines.into_iter().enumerate() {
        let selected = state.as_mut().map_or(true, |s| s.selects(&line, i + 1, last));
        match &expr.action {
            Action::Delete if selected => {}
            Action::Print if selected => {
                if !quiet {
                    out.push(line.clone());
                }
                out.push(line);
            }
            Action::Print if quiet => {}
            Action::Substitute { regex, replacement, global, occurrence } if selected => {
                out.push(substitute(&line, regex, replacement, *global, *occurrence).unwrap_or(line));
            }
            _ => out.push(line),
        }
    }
    out
}

/// Commands applied in order, each over the output of the one before.
pub fn run_script(text: &str, exprs: &[SedExpr], quiet: bool) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(String::from).collect();
    for expr in exprs {
        lines = apply_expr(lines, expr, quiet);
    }
    if quiet && !exprs.iter().any(|e| matches!(e.action, Action::Print)) {
        lines.clear();
    }
    lines
}
