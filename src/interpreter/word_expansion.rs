//! Word Expansion
//!
//! Turns parsed words into argument strings: variables first, then pathname
//! patterns matched against the virtual filesystem.

use glob::{MatchOptions, Pattern};

use crate::parser::{Word, WordPart};
use crate::permissions::{can_access, Access};
use crate::session::ShellSession;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand one word into zero or more arguments.
///
/// An unquoted word that expands to nothing is dropped. A pattern with no
/// matches is passed through unchanged.
pub fn expand_word(word: &Word, session: &ShellSession) -> Vec<String> {
    let text = word.expand(&session.env);
    if word.has_glob() {
        let matches = glob_paths(session, &word.glob_pattern(&session.env));
        if !matches.is_empty() {
            return matches;
        }
    }
    let all_unquoted = word.parts.iter().all(|p| matches!(p, WordPart::Unquoted(_)));
    if text.is_empty() && all_unquoted {
        return Vec::new();
    }
    vec![text]
}

pub fn expand_words(words: &[Word], session: &ShellSession) -> Vec<String> {
    words.iter().flat_map(|w| expand_word(w, session)).collect()
}

fn has_meta(component: &str) -> bool {
    component.contains(['*', '?', '['])
}

struct Candidate {
    shown: String,
    segments: Vec<String>,
}

impl Candidate {
    fn child(&self, name: &str) -> Candidate {
        let shown = match self.shown.as_str() {
            "" => name.to_string(),
            s if s.ends_with('/') => format!("{}{}", s, name),
            s => format!("{}/{}", s, name),
        };
        let mut segments = self.segments.clone();
        match name {
            "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(name.to_string()),
        }
        Candidate { shown, segments }
    }
}

/// Paths matching `pattern`, sorted, spelled the way the pattern was.
pub fn glob_paths(session: &ShellSession, pattern: &str) -> Vec<String> {
    let user = session.user();
    let mut components = pattern.split('/').peekable();
    let mut candidates = if pattern.starts_with('/') {
        components.next();
        vec![Candidate { shown: "/".to_string(), segments: Vec::new() }]
    } else if components.peek() == Some(&"~") {
        components.next();
        vec![Candidate { shown: "~".to_string(), segments: session.home_segments() }]
    } else {
        vec![Candidate { shown: String::new(), segments: session.cwd.clone() }]
    };

    for component in components {
        if component.is_empty() {
            continue;
        }
        let mut next = Vec::new();
        if !has_meta(component) || component == "." || component == ".." {
            for candidate in &candidates {
                next.push(candidate.child(component));
            }
        } else {
            let Ok(matcher) = Pattern::new(component) else {
                return Vec::new();
            };
            for candidate in &candidates {
                let Some(dir) = session.node(&candidate.segments) else {
                    continue;
                };
                let Some(children) = dir.children() else {
                    continue;
                };
                if !can_access(dir, user, Access::Read) || !can_access(dir, user, Access::Execute) {
                    continue;
                }
                for name in children.keys() {
                    if matcher.matches_with(name, MATCH_OPTIONS) {
                        next.push(candidate.child(name));
                    }
                }
            }
            if next.is_empty() {
                return Vec::new();
            }
        }
        candidates = next;
    }

    let mut found: Vec<String> = candidates
        .into_iter()
        .filter(|c| session.node(&c.segments).is_some())
        .map(|c| c.shown)
        .collect();
    found.sort();
    found.dedup();
    found
}
