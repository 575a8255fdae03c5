// src/commands/ls/mod.rs
use async_trait::async_trait;

use crate::commands::args::{ArgSpec, ParsedArgs};
use crate::commands::utils::{format_time, human_size};
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{FsNode, Vfs};
use crate::interpreter::errors::ShellError;
use crate::permissions::{can_access, format_mode, Access};
use crate::session::ShellSession;

pub struct LsCommand;

const BLUE: &str = "\x1b[1;34m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

struct Options {
    all: bool,
    almost_all: bool,
    long: bool,
    human: bool,
    recursive: bool,
    by_time: bool,
    reverse: bool,
    directory: bool,
    color: bool,
}

impl Options {
    fn from_args(args: &ParsedArgs, color: bool) -> Self {
        Self {
            all: args.has_flag('a'),
            almost_all: args.has_flag('A'),
            long: args.has_flag('l'),
            human: args.has_flag('h'),
            recursive: args.has_flag('R'),
            by_time: args.has_flag('t'),
            reverse: args.has_flag('r'),
            directory: args.has_flag('d'),
            color,
        }
    }

    fn shows(&self, name: &str) -> bool {
        self.all || self.almost_all || !name.starts_with('.')
    }
}

fn sort_entries(entries: &mut [(String, &FsNode)], opts: &Options) {
    if opts.by_time {
        entries.sort_by(|a, b| b.1.modified.cmp(&a.1.modified).then_with(|| a.0.cmp(&b.0)));
    } else {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
    }
    if opts.reverse {
        entries.reverse();
    }
}

fn paint(name: &str, node: &FsNode, opts: &Options) -> String {
    if !opts.color {
        return name.to_string();
    }
    if node.is_dir() {
        format!("{}{}{}", BLUE, name, RESET)
    } else if node.permissions & 0o111 != 0 {
        format!("{}{}{}", GREEN, name, RESET)
    } else {
        name.to_string()
    }
}

fn long_line(name: &str, node: &FsNode, opts: &Options) -> String {
    let size = if opts.human { human_size(node.size) } else { node.size.to_string() };
    format!(
        "{} 1 {} {} {:>6} {} {}",
        format_mode(node.permissions, node.is_dir()),
        node.owner,
        node.group,
        size,
        format_time(node.modified, "%b %e %H:%M"),
        paint(name, node, opts)
    )
}

fn render(entries: &[(String, &FsNode)], opts: &Options, with_total: bool) -> String {
    let mut out = String::new();
    if opts.long && with_total {
        let blocks: u64 = entries.iter().map(|(_, n)| n.size.div_ceil(1024)).sum();
        out.push_str(&format!("total {}\n", blocks));
    }
    for (name, node) in entries {
        if opts.long {
            out.push_str(&long_line(name, node, opts));
        } else {
            out.push_str(&paint(name, node, opts));
        }
        out.push('\n');
    }
    out
}

/// List one directory, then (with `-R`) every readable subdirectory below it.
fn list_directory(
    session: &ShellSession,
    segments: &[String],
    display: &str,
    opts: &Options,
    header: bool,
    blocks: &mut Vec<String>,
    errors: &mut Vec<ShellError>,
) {
    let Some(dir) = session.node(segments) else {
        return;
    };
    if !can_access(dir, session.user(), Access::Read) {
        errors.push(ShellError::permission_denied(format!(
            "ls: cannot open directory '{}'",
            display
        )));
        return;
    }

    let mut entries: Vec<(String, &FsNode)> = dir
        .children()
        .map(|c| {
            c.iter()
                .filter(|(name, _)| opts.shows(name))
                .map(|(name, node)| (name.clone(), node))
                .collect()
        })
        .unwrap_or_default();
    sort_entries(&mut entries, opts);

    if opts.all {
        let parent_segments = Vfs::resolve_path("..", segments, &[]);
        let parent = session.node(&parent_segments).unwrap_or(dir);
        let mut dots = vec![(".".to_string(), dir), ("..".to_string(), parent)];
        if opts.reverse {
            dots.reverse();
            entries.extend(dots);
        } else {
            dots.extend(entries);
            entries = dots;
        }
    }

    let mut block = String::new();
    if header {
        block.push_str(&format!("{}:\n", display));
    }
    block.push_str(&render(&entries, opts, true));
    blocks.push(block);

    if opts.recursive {
        for (name, node) in &entries {
            if !node.is_dir() || name == "." || name == ".." {
                continue;
            }
            let mut child = segments.to_vec();
            child.push(name.clone());
            let child_display = if display.ends_with('/') {
                format!("{}{}", display, name)
            } else {
                format!("{}/{}", display, name)
            };
            list_directory(session, &child, &child_display, opts, true, blocks, errors);
        }
    }
}

#[async_trait]
impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn summary(&self) -> &'static str {
        "list directory contents"
    }

    fn usage(&self) -> &'static str {
        "ls [-laRhtr1Ad] [FILE]..."
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("laRhtr1Ad"))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let session = &*ctx.session;
        let opts = Options::from_args(&ctx.args, session.config.color);
        let mut targets = ctx.args.operands.clone();
        if targets.is_empty() {
            targets.push(".".to_string());
        }

        let mut errors = Vec::new();
        let mut files: Vec<(String, &FsNode)> = Vec::new();
        let mut dirs: Vec<(String, Vec<String>)> = Vec::new();

        for target in &targets {
            let context = format!("ls: cannot access '{}'", target);
            let segments = session.resolve(target);
            match session.check_walk(&segments, &context) {
                Ok(node) if node.is_dir() && !opts.directory => dirs.push((target.clone(), segments)),
                Ok(node) => files.push((target.clone(), node)),
                Err(e) => errors.push(e),
            }
        }

        sort_entries(&mut files, &opts);
        dirs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut blocks = Vec::new();
        if !files.is_empty() {
            blocks.push(render(&files, &opts, false));
        }
        let header = opts.recursive || targets.len() > 1;
        for (display, segments) in &dirs {
            list_directory(session, segments, display, &opts, header, &mut blocks, &mut errors);
        }

        ShellError::collect(blocks.join("\n"), errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{root_session, run, session};
    use crate::interpreter::errors::ShellError;

    #[tokio::test]
    async fn test_ls_home() {
        let mut s = session();
        let out = run(&mut s, "ls").await.unwrap();
        assert_eq!(out, "README.txt\ndocuments\ndownloads\nprojects\n");
    }

    #[tokio::test]
    async fn test_ls_hidden_and_dots() {
        let mut s = session();
        run(&mut s, "touch .secret").await.unwrap();
        let plain = run(&mut s, "ls").await.unwrap();
        assert!(!plain.contains(".secret"));
        let almost = run(&mut s, "ls -A").await.unwrap();
        assert!(almost.starts_with(".secret\n"));
        let all = run(&mut s, "ls -a").await.unwrap();
        assert!(all.starts_with(".\n..\n.secret\n"));
    }

    #[tokio::test]
    async fn test_ls_long_format() {
        let mut s = session();
        let out = run(&mut s, "ls -l documents").await.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("total "));
        assert!(lines[1].starts_with("-rw-r--r-- 1 user user "));
        assert!(lines[1].ends_with(" notes.md"));
        assert!(lines[2].ends_with(" report.txt"));
    }

    #[tokio::test]
    async fn test_ls_file_and_directory_operands() {
        let mut s = session();
        let out = run(&mut s, "ls README.txt documents").await.unwrap();
        assert_eq!(out, "README.txt\n\ndocuments:\nnotes.md\nreport.txt\n");
    }

    #[tokio::test]
    async fn test_ls_directory_itself() {
        let mut s = session();
        let out = run(&mut s, "ls -ld documents").await.unwrap();
        assert!(out.starts_with("drwxr-xr-x 1 user user   4096 "));
        assert!(out.trim_end().ends_with("documents"));
    }

    #[tokio::test]
    async fn test_ls_recursive() {
        let mut s = session();
        let out = run(&mut s, "ls -R projects").await.unwrap();
        assert!(out.starts_with("projects:\ngame_dev\nmy_blog\n"));
        assert!(out.contains("\nprojects/game_dev:\nassets\nmain.py\n"));
        assert!(out.contains("\nprojects/game_dev/assets:\n"));
    }

    #[tokio::test]
    async fn test_ls_reverse() {
        let mut s = session();
        let out = run(&mut s, "ls -r documents").await.unwrap();
        assert_eq!(out, "report.txt\nnotes.md\n");
    }

    #[tokio::test]
    async fn test_ls_errors_accumulate() {
        let mut s = session();
        let err = run(&mut s, "ls nope documents").await.unwrap_err();
        assert_eq!(err.partial_output(), "documents:\nnotes.md\nreport.txt\n");
        assert_eq!(err.error_text(), "ls: cannot access 'nope': No such file or directory");

        let err = run(&mut s, "ls /root").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "ls: cannot open directory '/root': Permission denied"
        );
        let mut r = root_session();
        assert!(run(&mut r, "ls /root").await.is_ok());
    }

    #[tokio::test]
    async fn test_ls_invalid_flag() {
        let mut s = session();
        let err = run(&mut s, "ls -z").await.unwrap_err();
        assert_eq!(err, ShellError::InvalidOption { command: "ls".into(), option: 'z' });
    }
}
