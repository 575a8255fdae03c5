//! Argument validation
//!
//! Each command may declare an [`ArgSpec`]. Dispatch validates the raw words
//! against it before the handler runs, so handlers only ever see well-formed
//! flags and an operand count inside the declared bounds. Commands without a
//! spec get a permissive split instead.

use crate::interpreter::errors::ShellError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArgSpec {
    /// Every accepted short flag, e.g. `"laRhtr1Ad"`.
    pub flags: &'static str,
    /// Flags among `flags` that take a value (`-n 5` or `-n5`).
    pub value_flags: &'static str,
    pub min_args: Option<usize>,
    pub max_args: Option<usize>,
}

impl ArgSpec {
    pub const fn flags(flags: &'static str) -> Self {
        Self { flags, value_flags: "", min_args: None, max_args: None }
    }

    pub const fn values(mut self, value_flags: &'static str) -> Self {
        self.value_flags = value_flags;
        self
    }

    pub const fn min(mut self, n: usize) -> Self {
        self.min_args = Some(n);
        self
    }

    pub const fn max(mut self, n: usize) -> Self {
        self.max_args = Some(n);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Short flags in the order given, bundles split apart.
    pub flags: Vec<char>,
    /// `--help` / `--version` style options, without the dashes.
    pub long_flags: Vec<String>,
    /// Values of value-taking flags; repeated flags keep every value.
    pub values: Vec<(char, String)>,
    pub operands: Vec<String>,
}

impl ParsedArgs {
    pub fn parse(command: &str, spec: &ArgSpec, args: &[String]) -> Result<Self, ShellError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        let mut options_done = false;

        while let Some(arg) = iter.next() {
            if options_done || arg == "-" || !arg.starts_with('-') {
                parsed.operands.push(arg.clone());
                continue;
            }
            if arg == "--" {
                options_done = true;
                continue;
            }
            if let Some(long) = arg.strip_prefix("--") {
                if long == "help" || long == "version" {
                    parsed.long_flags.push(long.to_string());
                    continue;
                }
                return Err(ShellError::UnrecognizedOption {
                    command: command.to_string(),
                    option: arg.clone(),
                });
            }

            let chars: Vec<char> = arg[1..].chars().collect();
            for (i, &c) in chars.iter().enumerate() {
                if !spec.flags.contains(c) {
                    return Err(ShellError::InvalidOption { command: command.to_string(), option: c });
                }
                if spec.value_flags.contains(c) {
                    let rest: String = chars[i + 1..].iter().collect();
                    let value = if !rest.is_empty() {
                        rest
                    } else {
                        iter.next().cloned().ok_or(ShellError::OptionRequiresArgument {
                            command: command.to_string(),
                            option: c,
                        })?
                    };
                    parsed.flags.push(c);
                    parsed.values.push((c, value));
                    break;
                }
                parsed.flags.push(c);
            }
        }

        if let Some(min) = spec.min_args {
            if parsed.operands.len() < min {
                return Err(ShellError::missing_operand(command));
            }
        }
        if let Some(max) = spec.max_args {
            if let Some(extra) = parsed.operands.get(max) {
                return Err(ShellError::extra_operand(command, extra));
            }
        }
        Ok(parsed)
    }

    /// Split without validation: anything starting with `-` is a flag word.
    pub fn permissive(args: &[String]) -> Self {
        let mut parsed = ParsedArgs::default();
        for arg in args {
            if let Some(long) = arg.strip_prefix("--") {
                parsed.long_flags.push(long.to_string());
            } else if arg.len() > 1 && arg.starts_with('-') {
                parsed.flags.extend(arg[1..].chars());
            } else {
                parsed.operands.push(arg.clone());
            }
        }
        parsed
    }

    pub fn has_flag(&self, c: char) -> bool {
        self.flags.contains(&c)
    }

    pub fn has_any(&self, chars: &str) -> bool {
        chars.chars().any(|c| self.has_flag(c))
    }

    /// Last value given for a value-taking flag.
    pub fn value(&self, c: char) -> Option<&str> {
        self.values.iter().rev().find(|(f, _)| *f == c).map(|(_, v)| v.as_str())
    }

    pub fn all_values(&self, c: char) -> Vec<&str> {
        self.values.iter().filter(|(f, _)| *f == c).map(|(_, v)| v.as_str()).collect()
    }

    pub fn has_long(&self, name: &str) -> bool {
        self.long_flags.iter().any(|l| l == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    const LS: ArgSpec = ArgSpec::flags("laRhtr1Ad");
    const HEAD: ArgSpec = ArgSpec::flags("ncqv").values("nc");

    #[test]
    fn test_bundled_flags_split() {
        let p = ParsedArgs::parse("ls", &LS, &args(&["-la", "/home"])).unwrap();
        assert!(p.has_flag('l'));
        assert!(p.has_flag('a'));
        assert!(!p.has_flag('R'));
        assert_eq!(p.operands, vec!["/home"]);
    }

    #[test]
    fn test_invalid_option_names_the_char() {
        let err = ParsedArgs::parse("ls", &LS, &args(&["-lz"])).unwrap_err();
        assert_eq!(err, ShellError::InvalidOption { command: "ls".into(), option: 'z' });
    }

    #[test]
    fn test_long_options() {
        let p = ParsedArgs::parse("ls", &LS, &args(&["--help"])).unwrap();
        assert!(p.has_long("help"));
        let err = ParsedArgs::parse("ls", &LS, &args(&["--all"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ls: unrecognized option '--all'\nTry 'ls --help' for more information."
        );
    }

    #[test]
    fn test_arity() {
        let spec = ArgSpec::flags("p").min(1);
        assert_eq!(
            ParsedArgs::parse("mkdir", &spec, &[]).unwrap_err(),
            ShellError::missing_operand("mkdir")
        );
        let spec = ArgSpec::flags("LP").max(1);
        assert_eq!(
            ParsedArgs::parse("cd", &spec, &args(&["a", "b"])).unwrap_err(),
            ShellError::extra_operand("cd", "b")
        );
    }

    #[test]
    fn test_value_flags() {
        let p = ParsedArgs::parse("head", &HEAD, &args(&["-n", "5", "file"])).unwrap();
        assert_eq!(p.value('n'), Some("5"));
        assert_eq!(p.operands, vec!["file"]);
        let p = ParsedArgs::parse("head", &HEAD, &args(&["-n3"])).unwrap();
        assert_eq!(p.value('n'), Some("3"));
        let p = ParsedArgs::parse("head", &HEAD, &args(&["-qn", "2"])).unwrap();
        assert!(p.has_flag('q'));
        assert_eq!(p.value('n'), Some("2"));
        assert_eq!(
            ParsedArgs::parse("head", &HEAD, &args(&["-n"])).unwrap_err(),
            ShellError::OptionRequiresArgument { command: "head".into(), option: 'n' }
        );
    }

    #[test]
    fn test_double_dash_and_lone_dash() {
        let p = ParsedArgs::parse("ls", &LS, &args(&["-l", "--", "-weird", "-"])).unwrap();
        assert_eq!(p.operands, vec!["-weird", "-"]);
    }

    #[test]
    fn test_permissive() {
        let p = ParsedArgs::permissive(&args(&["-9", "1000", "--force"]));
        assert!(p.has_flag('9'));
        assert!(p.has_long("force"));
        assert_eq!(p.operands, vec!["1000"]);
    }
}
