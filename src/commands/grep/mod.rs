// src/commands/grep/mod.rs
use async_trait::async_trait;
use regex_lite::Regex;

use crate::commands::args::{ArgSpec, ParsedArgs};
use crate::commands::utils::{gather_inputs, Input};
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::FsNode;
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, Access};
use crate::session::ShellSession;

pub struct GrepCommand;

const MATCH_COLOR: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

struct GrepOptions {
    invert: bool,
    line_numbers: bool,
    files_only: bool,
    count: bool,
    color: bool,
}

/// Rewrite a basic regular expression into regex syntax: `\(`, `\)`, `\{`,
/// `\}`, `\|`, `\+` and `\?` become operators, their bare forms literals.
pub(crate) fn basic_to_extended(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(op @ ('(' | ')' | '{' | '}' | '|' | '+' | '?')) => out.push(op),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push_str("\\\\"),
            },
            '(' | ')' | '{' | '}' | '|' | '+' | '?' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn build_regex(pattern: &str, args: &ParsedArgs) -> Result<Regex, ShellError> {
    let mut source = if args.has_flag('F') {
        regex_lite::escape(pattern)
    } else if args.has_flag('E') {
        pattern.to_string()
    } else {
        basic_to_extended(pattern)
    };
    if args.has_flag('w') {
        source = format!(r"\b(?:{})\b", source);
    }
    if args.has_flag('i') {
        source = format!("(?i){}", source);
    }
    Regex::new(&source).map_err(|_| ShellError::invalid(format!("grep: Invalid regular expression '{}'", pattern)))
}

/// Readable files under `node`, depth first, named relative to `path`.
fn collect_tree(
    session: &ShellSession,
    node: &FsNode,
    path: &str,
    inputs: &mut Vec<Input>,
    errors: &mut Vec<ShellError>,
) {
    let user = session.user();
    match node.children() {
        None => {
            if can_access(node, user, Access::Read) {
                let text = node.content().unwrap_or_default().to_string();
                inputs.push(Input { name: Some(path.to_string()), text });
            } else {
                errors.push(ShellError::permission_denied(format!("grep: {}", path)));
            }
        }
        Some(children) => {
            if !can_access(node, user, Access::Read) || !can_access(node, user, Access::Execute) {
                errors.push(ShellError::permission_denied(format!("grep: {}", path)));
                return;
            }
            for (name, child) in children {
                let child_path = if path.ends_with('/') {
                    format!("{}{}", path, name)
                } else {
                    format!("{}/{}", path, name)
                };
                collect_tree(session, child, &child_path, inputs, errors);
            }
        }
    }
}

fn recursive_inputs(session: &ShellSession, files: &[String]) -> (Vec<Input>, Vec<ShellError>) {
    let roots = if files.is_empty() { vec![".".to_string()] } else { files.to_vec() };
    let mut inputs = Vec::new();
    let mut errors = Vec::new();
    for root in &roots {
        let segments = session.resolve(root);
        match session.check_walk(&segments, &format!("grep: {}", root)) {
            Ok(node) => collect_tree(session, node, root, &mut inputs, &mut errors),
            Err(e) => errors.push(e),
        }
    }
    (inputs, errors)
}

fn highlight(line: &str, regex: &Regex) -> String {
    let mut out = String::new();
    let mut last = 0;
    for m in regex.find_iter(line) {
        if m.start() == m.end() {
            continue;
        }
        out.push_str(&line[last..m.start()]);
        out.push_str(MATCH_COLOR);
        out.push_str(m.as_str());
        out.push_str(RESET);
        last = m.end();
    }
    out.push_str(&line[last..]);
    out
}

fn search(input: &Input, regex: &Regex, opts: &GrepOptions, prefix: bool, out: &mut String) {
    let label = input.name.as_deref().unwrap_or("(standard input)");
    let mut matched = 0;
    for (i, line) in input.text.lines().enumerate() {
        if regex.is_match(line) == opts.invert {
            continue;
        }
        matched += 1;
        if opts.files_only || opts.count {
            continue;
        }
        if prefix {
            out.push_str(label);
            out.push(':');
        }
        if opts.line_numbers {
            out.push_str(&format!("{}:", i + 1));
        }
        if opts.color && !opts.invert {
            out.push_str(&highlight(line, regex));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    if opts.count {
        if prefix {
            out.push_str(label);
            out.push(':');
        }
        out.push_str(&format!("{}\n", matched));
    } else if opts.files_only && matched > 0 {
        out.push_str(label);
        out.push('\n');
    }
}

#[async_trait]
impl Command for GrepCommand {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn summary(&self) -> &'static str {
        "print lines that match patterns"
    }

    fn usage(&self) -> &'static str {
        "grep [-ivrnlcwEF] PATTERN [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("ivrnlcwEF").min(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some((pattern, files)) = ctx.args.operands.split_first() else {
            return Err(ShellError::missing_operand("grep"));
        };
        let regex = build_regex(pattern, &ctx.args)?;
        let opts = GrepOptions {
            invert: ctx.args.has_flag('v'),
            line_numbers: ctx.args.has_flag('n'),
            files_only: ctx.args.has_flag('l'),
            count: ctx.args.has_flag('c'),
            color: ctx.session.config.color,
        };
        let recursive = ctx.args.has_flag('r');

        let (inputs, errors) = if recursive {
            recursive_inputs(ctx.session, files)
        } else {
            gather_inputs(&ctx, files)?
        };

        let prefix = recursive || files.len() > 1;
        let mut out = String::new();
        for input in &inputs {
            search(input, &regex, &opts, prefix, &mut out);
        }
        ShellError::collect(out, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{run, run_with_stdin, session};

    #[test]
    fn test_basic_regex_translation() {
        assert_eq!(basic_to_extended(r"a\(b\)c"), "a(b)c");
        assert_eq!(basic_to_extended("a+b?"), r"a\+b\?");
        assert_eq!(basic_to_extended(r"x\|y"), "x|y");
        assert_eq!(basic_to_extended(r"\.txt$"), r"\.txt$");
    }

    #[tokio::test]
    async fn test_grep_file() {
        let mut s = session();
        let out = run(&mut s, "grep Idea documents/notes.md").await.unwrap();
        assert_eq!(out, "- Idea 1\n- Idea 2\n- Idea 3\n");
    }

    #[tokio::test]
    async fn test_grep_flags() {
        let mut s = session();
        let out = run(&mut s, "grep -in IDEA.2 documents/notes.md").await.unwrap();
        assert_eq!(out, "4:- Idea 2\n");
        let out = run(&mut s, "grep -c Idea documents/notes.md").await.unwrap();
        assert_eq!(out, "3\n");
        let out = run(&mut s, "grep -v Idea documents/notes.md").await.unwrap();
        assert_eq!(out, "# My Notes\n\n");
        let out = run(&mut s, "grep -E Idea.(1|3) documents/notes.md").await.unwrap();
        assert_eq!(out, "- Idea 1\n- Idea 3\n");
    }

    #[tokio::test]
    async fn test_grep_word() {
        let mut s = session();
        let text = "cat\ncatalog\nthe cat sat\n";
        let out = run_with_stdin(&mut s, "grep -w cat", Some(text)).await.unwrap();
        assert_eq!(out, "cat\nthe cat sat\n");
    }

    #[tokio::test]
    async fn test_grep_multiple_files_prefix() {
        let mut s = session();
        let out = run(&mut s, "grep -l information documents/report.txt documents/notes.md").await.unwrap();
        assert_eq!(out, "documents/report.txt\n");
        let out = run(&mut s, "grep -c Idea documents/report.txt documents/notes.md").await.unwrap();
        assert_eq!(out, "documents/report.txt:0\ndocuments/notes.md:3\n");
    }

    #[tokio::test]
    async fn test_grep_recursive() {
        let mut s = session();
        let out = run(&mut s, "grep -r blog projects").await.unwrap();
        assert_eq!(out, "projects/my_blog/index.html:  <h1>Welcome to my blog</h1>\n");
        let out = run(&mut s, "grep -rl Hello .").await.unwrap();
        assert_eq!(out, "./projects/game_dev/main.py\n");
    }

    #[tokio::test]
    async fn test_grep_errors() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "grep x documents").await,
            Err(ShellError::is_a_directory("grep: documents"))
        );
        assert_eq!(
            run(&mut s, "grep x missing").await,
            Err(ShellError::no_such_file("grep: missing"))
        );
        assert!(matches!(run(&mut s, "grep").await, Err(ShellError::MissingOperand { .. })));
        assert!(matches!(run(&mut s, "grep -E (").await, Err(ShellError::InvalidArgument(_))));
    }
}
