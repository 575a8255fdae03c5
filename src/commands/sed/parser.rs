//! Sed script parser
//!
//! Scripts are one or more commands separated by `;` or newlines. Each
//! command is `[ADDR[,ADDR]][!]CMD` where CMD is `s`, `d` or `p`.

use regex_lite::Regex;

use super::types::{Action, Address, AddressRange, SedExpr};
use crate::commands::grep::basic_to_extended;
use crate::interpreter::errors::ShellError;

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    expr_index: usize,
    extended: bool,
    source: &'a str,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> ShellError {
        ShellError::invalid(format!(
            "sed: -e expression #{}, char {}: {}",
            self.expr_index,
            self.pos.max(1),
            message
        ))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn compile(&self, pattern: &str, ignore_case: bool) -> Result<Regex, ShellError> {
        let mut source = if self.extended { pattern.to_string() } else { basic_to_extended(pattern) };
        if ignore_case {
            source = format!("(?i){}", source);
        }
        Regex::new(&source).map_err(|_| self.error("Invalid preceding regular expression"))
    }

    /// Text up to the next unescaped `delim`. `\delim` yields the delimiter
    /// itself; other escapes are kept for the regex or replacement.
    fn delimited(&mut self, delim: char, unterminated: &str) -> Result<String, ShellError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(unterminated)),
                Some(c) if c == delim => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(c) if c == delim => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error(unterminated)),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn address(&mut self) -> Result<Option<Address>, ShellError> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                let mut n = 0usize;
                while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
                    n = n * 10 + d as usize;
                    self.pos += 1;
                }
                if n == 0 {
                    return Err(self.error("invalid usage of line address 0"));
                }
                Ok(Some(Address::Line(n)))
            }
            Some('$') => {
                self.pos += 1;
                Ok(Some(Address::Last))
            }
            Some('/') => {
                self.pos += 1;
                let pattern = self.delimited('/', "unterminated address regex")?;
                Ok(Some(Address::Pattern(self.compile(&pattern, false)?)))
            }
            _ => Ok(None),
        }
    }

    fn range(&mut self) -> Result<Option<AddressRange>, ShellError> {
        let Some(start) = self.address()? else {
            return Ok(None);
        };
        let end = if self.peek() == Some(',') {
            self.pos += 1;
            Some(self.address()?.ok_or_else(|| self.error("unexpected `,'"))?)
        } else {
            None
        };
        self.skip_blanks();
        let negated = self.peek() == Some('!');
        if negated {
            self.pos += 1;
            self.skip_blanks();
        }
        Ok(Some(AddressRange { start, end, negated }))
    }

    fn substitute(&mut self) -> Result<Action, ShellError> {
        let delim = match self.bump() {
            Some(c) if c != '\\' && c != '\n' => c,
            _ => return Err(self.error("unterminated `s' command")),
        };
        let pattern = self.delimited(delim, "unterminated `s' command")?;
        let replacement = self.delimited(delim, "unterminated `s' command")?;

        let mut global = false;
        let mut ignore_case = false;
        let mut occurrence = 0usize;
        while let Some(c) = self.peek() {
            match c {
                'g' => global = true,
                'i' | 'I' => ignore_case = true,
                '0'..='9' => occurrence = occurrence * 10 + c.to_digit(10).unwrap_or(0) as usize,
                ';' | '\n' | ' ' | '\t' | '}' => break,
                _ => return Err(self.error("unknown option to `s'")),
            }
            self.pos += 1;
        }
        Ok(Action::Substitute {
            regex: self.compile(&pattern, ignore_case)?,
            replacement: translate_replacement(&replacement),
            global,
            occurrence: occurrence.max(1),
        })
    }

    fn command(&mut self) -> Result<SedExpr, ShellError> {
        let address = self.range()?;
        let action = match self.bump() {
            Some('s') => self.substitute()?,
            Some('d') => Action::Delete,
            Some('p') => Action::Print,
            Some(c) => return Err(self.error(&format!("unknown command: `{}'", c))),
            None => return Err(self.error("missing command")),
        };
        Ok(SedExpr { address, action })
    }
}

/// Rewrite a sed replacement for `Captures::expand`: `&` and `\N` become
/// group references and a literal `$` is doubled.
pub fn translate_replacement(replacement: &str) -> String {
    let mut out = String::new();
    let mut chars = replacement.chars();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("${0}"),
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                Some(d @ '0'..='9') => {
                    out.push_str("${");
                    out.push(d);
                    out.push('}');
                }
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('$') => out.push_str("$$"),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    out
}

/// Parse one `-e` script (the `expr_index`-th) into commands.
pub fn parse_script(script: &str, expr_index: usize, extended: bool) -> Result<Vec<SedExpr>, ShellError> {
    let mut parser = Parser { chars: script.chars().collect(), pos: 0, expr_index, extended, source: script };
    let mut exprs = Vec::new();
    loop {
        while matches!(parser.peek(), Some(' ' | '\t' | '\n' | ';')) {
            parser.pos += 1;
        }
        if parser.peek().is_none() {
            break;
        }
        exprs.push(parser.command()?);
        parser.skip_blanks();
        match parser.peek() {
            None | Some(';') | Some('\n') => {}
            Some(_) => return Err(parser.error("extra characters after command")),
        }
    }
    if exprs.is_empty() {
        log::debug!("empty sed script {:?}", parser.source);
    }
    Ok(exprs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_replacement() {
        assert_eq!(translate_replacement("[&]"), "[${0}]");
        assert_eq!(translate_replacement(r"\2-\1"), "${2}-${1}");
        assert_eq!(translate_replacement(r"a\&b"), "a&b");
        assert_eq!(translate_replacement("$5"), "$$5");
    }

    #[test]
    fn test_parse_forms() {
        let exprs = parse_script("s/a/b/g; 3d; /x/d; 2,4p", 1, false).unwrap();
        assert_eq!(exprs.len(), 4);
        assert!(matches!(exprs[0].action, Action::Substitute { global: true, .. }));
        assert!(matches!(exprs[1].address.as_ref().map(|a| &a.start), Some(Address::Line(3))));
        assert!(matches!(exprs[2].address.as_ref().map(|a| &a.start), Some(Address::Pattern(_))));
        assert!(matches!(exprs[3].address.as_ref().and_then(|a| a.end.as_ref()), Some(Address::Line(4))));
    }

    #[test]
    fn test_custom_delimiter_and_negation() {
        let exprs = parse_script("s|/usr|/opt|", 1, false).unwrap();
        assert!(matches!(exprs[0].action, Action::Substitute { .. }));
        let exprs = parse_script("$!d", 1, false).unwrap();
        assert!(exprs[0].address.as_ref().map_or(false, |a| a.negated));
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_script("s/a/b", 1, false).unwrap_err();
        assert_eq!(err.to_string(), "sed: -e expression #1, char 5: unterminated `s' command");
        assert!(parse_script("k", 2, false).unwrap_err().to_string().contains("unknown command: `k'"));
        assert!(parse_script("s/a/b/z", 1, false).is_err());
        assert!(parse_script("0d", 1, false).is_err());
    }
}
