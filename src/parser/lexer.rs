//! Lexer for command lines
//!
//! Splits a raw line into words and operators in one pass:
//! - unquoted whitespace separates words
//! - `'...'` is literal, `"..."` keeps `$` live, `\` escapes one character
//! - `#` at the start of a word begins a comment that runs to end of line
//! - `|`, `||`, `&`, `&&`, `;`, `>`, `>>`, `<` are operators when unquoted

use thiserror::Error;

use super::types::{Word, WordPart};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(Word),
    Pipe,
    OrIf,
    Amp,
    AndIf,
    Semi,
    Great,
    DGreat,
    Less,
}

impl Token {
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Word(_) => "word",
            Token::Pipe => "|",
            Token::OrIf => "||",
            Token::Amp => "&",
            Token::AndIf => "&&",
            Token::Semi => ";",
            Token::Great => ">",
            Token::DGreat => ">>",
            Token::Less => "<",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected EOF while looking for matching `{0}'")]
    UnterminatedQuote(char),
    #[error("syntax error near unexpected token `{0}'")]
    UnexpectedToken(String),
    #[error("syntax error: unexpected end of file")]
    UnexpectedEof,
}

pub fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut word = Word::default();
    // Set once the current word has started, even if only with `''`.
    let mut in_word = false;
    let mut pending = String::new();
    let mut i = 0;

    fn flush_text(word: &mut Word, pending: &mut String) {
        if !pending.is_empty() {
            word.push(WordPart::Unquoted(std::mem::take(pending)));
        }
    }

    macro_rules! finish_word {
        () => {
            flush_text(&mut word, &mut pending);
            if in_word {
                tokens.push(Token::Word(std::mem::take(&mut word)));
                in_word = false;
            }
        };
    }

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                finish_word!();
                i += 1;
            }
            '#' if !in_word => break,
            '\'' => {
                flush_text(&mut word, &mut pending);
                let rest = &chars[i + 1..];
                let end = rest.iter().position(|&c| c == '\'').ok_or(ParseError::UnterminatedQuote('\''))?;
                word.push(WordPart::Literal(rest[..end].iter().collect()));
                in_word = true;
                i += end + 2;
            }
            '"' => {
                flush_text(&mut word, &mut pending);
                in_word = true;
                i += 1;
                let mut text = String::new();
                let mut closed = false;
                while i < chars.len() {
                    match chars[i] {
                        '"' => {
                            closed = true;
                            i += 1;
                            break;
                        }
                        '\\' if matches!(chars.get(i + 1), Some('"' | '\\' | '$' | '`')) => {
                            if !text.is_empty() {
                                word.push(WordPart::DoubleQuoted(std::mem::take(&mut text)));
                            }
                            word.push(WordPart::Literal(chars[i + 1].to_string()));
                            i += 2;
                        }
                        other => {
                            text.push(other);
                            i += 1;
                        }
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedQuote('"'));
                }
                // `""` still yields an (empty) argument.
                word.push(WordPart::DoubleQuoted(text));
            }
            '\\' => {
                flush_text(&mut word, &mut pending);
                let escaped = chars.get(i + 1).copied().unwrap_or('\\');
                word.push(WordPart::Literal(escaped.to_string()));
                in_word = true;
                i += 2;
            }
            '|' | '&' | ';' | '>' | '<' => {
                finish_word!();
                let next = chars.get(i + 1).copied();
                let (token, width) = match (c, next) {
                    ('|', Some('|')) => (Token::OrIf, 2),
                    ('|', _) => (Token::Pipe, 1),
                    ('&', Some('&')) => (Token::AndIf, 2),
                    ('&', _) => (Token::Amp, 1),
                    (';', _) => (Token::Semi, 1),
                    ('>', Some('>')) => (Token::DGreat, 2),
                    ('>', _) => (Token::Great, 1),
                    _ => (Token::Less, 1),
                };
                tokens.push(token);
                i += width;
            }
            other => {
                pending.push(other);
                in_word = true;
                i += 1;
            }
        }
    }
    flush_text(&mut word, &mut pending);
    if in_word {
        tokens.push(Token::Word(word));
    }
    Ok(tokens)
}
