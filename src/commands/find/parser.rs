// src/commands/find/parser.rs
use glob::{MatchOptions, Pattern};

use crate::fs::FsNode;
use crate::interpreter::errors::ShellError;
use crate::permissions::parse_octal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOp {
    Greater,
    Less,
    Exactly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeFilter {
    pub op: SizeOp,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermFilter {
    /// `-perm 644`: the rwx and special bits match exactly.
    Exact(u32),
    /// `-perm -644`: every listed bit is set.
    AllOf(u32),
    /// `-perm /644`: at least one listed bit is set.
    AnyOf(u32),
}

/// Tests combined with AND. Unset fields accept everything.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub kind: Option<char>,
    pub name: Option<Pattern>,
    pub ignore_case: bool,
    pub size: Option<SizeFilter>,
    pub perm: Option<PermFilter>,
    pub user: Option<String>,
    pub group: Option<String>,
    pub empty: bool,
    pub max_depth: Option<usize>,
    pub min_depth: usize,
}

fn invalid(message: String) -> ShellError {
    ShellError::invalid(format!("find: {}", message))
}

fn parse_size(arg: &str) -> Result<SizeFilter, ShellError> {
    let (op, rest) = match arg.chars().next() {
        Some('+') => (SizeOp::Greater, &arg[1..]),
        Some('-') => (SizeOp::Less, &arg[1..]),
        _ => (SizeOp::Exactly, arg),
    };
    let (digits, unit) = match rest.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&rest[..i], Some(c)),
        _ => (rest, None),
    };
    let n: u64 = digits
        .parse()
        .map_err(|_| invalid(format!("invalid argument `{}' to `-size'", arg)))?;
    let scale = match unit {
        None | Some('c') => 1,
        Some('k') => 1024,
        Some('M') => 1024 * 1024,
        Some('G') => 1024 * 1024 * 1024,
        Some(_) => return Err(invalid(format!("invalid argument `{}' to `-size'", arg))),
    };
    let bytes = n
        .checked_mul(scale)
        .ok_or_else(|| invalid(format!("invalid argument `{}' to `-size'", arg)))?;
    Ok(SizeFilter { op, bytes })
}

fn parse_perm(arg: &str) -> Result<PermFilter, ShellError> {
    let bad = || invalid(format!("invalid mode '{}'", arg));
    let octal = |s: &str| {
        let padded = if s.len() < 3 { format!("{:0>3}", s) } else { s.to_string() };
        parse_octal(&padded).map_err(|_| bad())
    };
    match arg.chars().next() {
        Some('-') => Ok(PermFilter::AllOf(octal(&arg[1..])?)),
        Some('/') => Ok(PermFilter::AnyOf(octal(&arg[1..])?)),
        _ => Ok(PermFilter::Exact(octal(arg)?)),
    }
}

/// Split `find` arguments into starting points and filters.
pub fn parse_arguments(args: &[String]) -> Result<(Vec<String>, Filters), ShellError> {
    let split = args.iter().position(|a| a.starts_with('-')).unwrap_or(args.len());
    let mut paths: Vec<String> = args[..split].to_vec();
    if paths.is_empty() {
        paths.push(".".to_string());
    }

    let mut filters = Filters::default();
    let mut iter = args[split..].iter();
    while let Some(test) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| invalid(format!("missing argument to `{}'", test)))
        };
        match test.as_str() {
            "-type" => {
                let kind = value()?;
                match kind.as_str() {
                    "f" | "d" => filters.kind = kind.chars().next(),
                    _ => return Err(invalid(format!("Unknown argument to -type: {}", kind))),
                }
            }
            "-name" | "-iname" => {
                let raw = value()?;
                let pattern = Pattern::new(raw.trim_matches(|c| c == '"' || c == '\''))
                    .map_err(|_| invalid(format!("invalid pattern '{}'", raw)))?;
                filters.name = Some(pattern);
                filters.ignore_case = test == "-iname";
            }
            "-size" => filters.size = Some(parse_size(&value()?)?),
            "-perm" => filters.perm = Some(parse_perm(&value()?)?),
            "-user" => filters.user = Some(value()?),
            "-group" => filters.group = Some(value()?),
            "-empty" => filters.empty = true,
            "-maxdepth" | "-mindepth" => {
                let raw = value()?;
                let depth: usize = raw.parse().map_err(|_| {
                    invalid(format!("Expected a positive decimal integer argument to {}, but got '{}'", test, raw))
                })?;
                if test == "-maxdepth" {
                    filters.max_depth = Some(depth);
                } else {
                    filters.min_depth = depth;
                }
            }
            other => return Err(invalid(format!("unknown predicate `{}'", other))),
        }
    }
    Ok((paths, filters))
}

impl Filters {
    pub fn matches(&self, name: &str, node: &FsNode) -> bool {
        if let Some(kind) = self.kind {
            if (kind == 'd') != node.is_dir() {
                return false;
            }
        }
        if let Some(pattern) = &self.name {
            let options = MatchOptions {
                case_sensitive: !self.ignore_case,
                require_literal_separator: false,
                require_literal_leading_dot: false,
            };
            if !pattern.matches_with(name, options) {
                return false;
            }
        }
        if let Some(size) = &self.size {
            let ok = match size.op {
                SizeOp::Greater => node.size > size.bytes,
                SizeOp::Less => node.size < size.bytes,
                SizeOp::Exactly => node.size == size.bytes,
            };
            if !ok {
                return false;
            }
        }
        if let Some(perm) = &self.perm {
            let mode = node.permissions & 0o7777;
            let ok = match *perm {
                PermFilter::Exact(m) => mode == m,
                PermFilter::AllOf(m) => mode & m == m,
                PermFilter::AnyOf(m) => m == 0 || mode & m != 0,
            };
            if !ok {
                return false;
            }
        }
        if self.user.as_ref().map_or(false, |u| *u != node.owner) {
            return false;
        }
        if self.group.as_ref().map_or(false, |g| *g != node.group) {
            return false;
        }
        !self.empty || node.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_paths_before_tests() {
        let (paths, filters) = parse_arguments(&args("/etc /tmp -type d")).unwrap();
        assert_eq!(paths, vec!["/etc", "/tmp"]);
        assert_eq!(filters.kind, Some('d'));
        let (paths, _) = parse_arguments(&args("-empty")).unwrap();
        assert_eq!(paths, vec!["."]);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("+100").unwrap(), SizeFilter { op: SizeOp::Greater, bytes: 100 });
        assert_eq!(parse_size("-2k").unwrap(), SizeFilter { op: SizeOp::Less, bytes: 2048 });
        assert_eq!(parse_size("10c").unwrap(), SizeFilter { op: SizeOp::Exactly, bytes: 10 });
        assert!(parse_size("+x").is_err());
        assert_eq!(
            parse_size("+99999999999999G"),
            Err(ShellError::invalid("find: invalid argument `+99999999999999G' to `-size'"))
        );
    }

    #[test]
    fn test_parse_perm() {
        assert_eq!(parse_perm("644").unwrap(), PermFilter::Exact(0o644));
        assert_eq!(parse_perm("-4000").unwrap(), PermFilter::AllOf(0o4000));
        assert_eq!(parse_perm("/111").unwrap(), PermFilter::AnyOf(0o111));
        assert!(parse_perm("9x").is_err());
    }

    #[test]
    fn test_errors() {
        assert!(parse_arguments(&args(". -type")).is_err());
        assert!(parse_arguments(&args(". -type l")).is_err());
        assert!(parse_arguments(&args(". -bogus")).is_err());
    }

    #[test]
    fn test_matches_combines_with_and() {
        let (_, filters) = parse_arguments(&args(". -type f -name *.txt -user user")).unwrap();
        let file = FsNode::file("user", "user", 0o644, "hello");
        assert!(filters.matches("a.txt", &file));
        assert!(!filters.matches("a.md", &file));
        let theirs = FsNode::file("root", "root", 0o644, "");
        assert!(!filters.matches("a.txt", &theirs));
        let dir = FsNode::directory("user", "user", 0o755);
        assert!(!filters.matches("b.txt", &dir));
    }

    #[test]
    fn test_iname_and_empty() {
        let (_, filters) = parse_arguments(&args(". -iname README* -empty")).unwrap();
        assert!(filters.matches("readme.md", &FsNode::file("u", "u", 0o644, "")));
        assert!(!filters.matches("readme.md", &FsNode::file("u", "u", 0o644, "x")));
    }
}
