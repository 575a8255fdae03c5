use crate::environment::{expand_variables, Environment};

/// One quoting region of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted text: variables and pathname patterns expand.
    Unquoted(String),
    /// Inside double quotes: variables expand, patterns do not.
    DoubleQuoted(String),
    /// Single-quoted or backslash-escaped text: never expands.
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    pub fn unquoted(text: &str) -> Self {
        Self { parts: vec![WordPart::Unquoted(text.to_string())] }
    }

    pub(crate) fn push(&mut self, part: WordPart) {
        match (self.parts.last_mut(), part) {
            (Some(WordPart::Unquoted(a)), WordPart::Unquoted(b)) => a.push_str(&b),
            (Some(WordPart::DoubleQuoted(a)), WordPart::DoubleQuoted(b)) => a.push_str(&b),
            (Some(WordPart::Literal(a)), WordPart::Literal(b)) => a.push_str(&b),
            (_, part) => self.parts.push(part),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Text with quotes removed and nothing expanded.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| match p {
                WordPart::Unquoted(s) | WordPart::DoubleQuoted(s) | WordPart::Literal(s) => s.as_str(),
            })
            .collect()
    }

    /// Text after variable expansion.
    pub fn expand(&self, env: &Environment) -> String {
        self.parts
            .iter()
            .map(|p| match p {
                WordPart::Unquoted(s) | WordPart::DoubleQuoted(s) => expand_variables(s, env),
                WordPart::Literal(s) => s.clone(),
            })
            .collect()
    }

    /// Whether an unquoted region holds a pathname pattern character.
    pub fn has_glob(&self) -> bool {
        self.parts.iter().any(|p| match p {
            WordPart::Unquoted(s) => s.contains(['*', '?', '[']),
            _ => false,
        })
    }

    /// The expanded word as a glob pattern, with quoted regions escaped.
    pub fn glob_pattern(&self, env: &Environment) -> String {
        self.parts
            .iter()
            .map(|p| match p {
                WordPart::Unquoted(s) => expand_variables(s, env),
                WordPart::DoubleQuoted(s) => glob::Pattern::escape(&expand_variables(s, env)),
                WordPart::Literal(s) => glob::Pattern::escape(s),
            })
            .collect()
    }

    /// Whether the word is an unquoted `NAME=value` assignment.
    pub fn is_assignment(&self) -> bool {
        match self.parts.first() {
            Some(WordPart::Unquoted(s)) => s
                .split_once('=')
                .map_or(false, |(name, _)| crate::environment::is_valid_name(name)),
            _ => false,
        }
    }
}

/// One stage of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStage {
    pub name: Word,
    pub args: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Redirections {
    pub input: Option<Word>,
    pub output: Option<Word>,
    pub append: bool,
}

/// A pipeline with its redirections and background flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub commands: Vec<CommandStage>,
    pub redirections: Redirections,
    pub has_pipes: bool,
    pub is_background: bool,
}

/// How a pipeline is joined to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// First pipeline, or after `;` / `&`.
    Always,
    /// After `&&`.
    OnSuccess,
    /// After `||`.
    OnFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandList {
    pub items: Vec<(Connector, ParsedLine)>,
}

impl CommandList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
