// src/commands/nano_cmd.rs
use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::utils::read_file;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct NanoCommand;

/// Text columns inside the box.
const INNER: usize = 59;
const SHOWN_LINES: usize = 10;
const EMPTY_ROWS: usize = 12;

const KEYS: &str = concat!(
    "nano is a simple text editor. Key commands:\n",
    "  ^S  (Ctrl+S)    Save current file\n",
    "  ^O  (Ctrl+O)    Write Out (save as)\n",
    "  ^X  (Ctrl+X)    Exit nano\n",
    "  ^K  (Ctrl+K)    Cut current line\n",
    "  ^U  (Ctrl+U)    Paste cut text\n",
    "  ^W  (Ctrl+W)    Search\n",
    "  ^\\  (Ctrl+\\)    Replace\n",
    "  ^G  (Ctrl+G)    Display help",
);

fn rule(left: char, right: char) -> String {
    format!("{}{}{}\n", left, "─".repeat(INNER + 2), right)
}

fn row(text: &str) -> String {
    format!("│ {:<width$} │\n", text, width = INNER)
}

fn clip(line: &str) -> String {
    if line.chars().count() > INNER {
        let head: String = line.chars().take(INNER - 3).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

fn frame(title: &str, body: &[String]) -> String {
    let mut out = rule('┌', '┐');
    out.push_str(&row(&clip(title)));
    out.push_str(&rule('├', '┤'));
    out.push_str(&row(""));
    for line in body {
        out.push_str(&row(line));
    }
    out.push_str(&rule('├', '┤'));
    out.push_str(&row("^G Help   ^O Write Out ^W Where Is ^K Cut      ^T To Spell"));
    out.push_str(&row("^X Exit   ^R Read File ^\\ Replace  ^U Paste    ^J Justify"));
    out.push_str(&rule('└', '┘'));
    out
}

fn existing(file: &str, content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut body: Vec<String> = lines.iter().take(SHOWN_LINES).map(|l| clip(l)).collect();
    body.resize(SHOWN_LINES, String::new());
    if lines.len() > SHOWN_LINES {
        body.push(format!("... ({} more lines) ...", lines.len() - SHOWN_LINES));
    }
    body.push(String::new());
    let mut out = frame(&format!(" GNU nano 7.2               {}", file), &body);
    out.push_str(&format!(
        "\nFile: {} | Lines: {} | Characters: {}\n",
        file,
        lines.len(),
        content.chars().count()
    ));
    out.push_str(&format!("\nTo view the full file, use: cat {}\n", file));
    out.push_str(&format!("To change it here, use: echo \"content\" > {}\n", file));
    out
}

fn new_file(file: &str) -> String {
    let body = vec![String::new(); EMPTY_ROWS];
    let mut out = frame(" GNU nano 7.2           [ New File ]", &body);
    out.push_str(&format!("\nFile: {} [ New File ]\n", file));
    out.push_str(&format!("\nTo create it here, use:\n  echo \"your content\" > {}\n  touch {}\n", file, file));
    out
}

#[async_trait]
impl Command for NanoCommand {
    fn name(&self) -> &'static str {
        "nano"
    }

    fn summary(&self) -> &'static str {
        "show a file the way the nano editor would"
    }

    fn usage(&self) -> &'static str {
        "nano FILE"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some(file) = ctx.args.operands.first() else {
            return Err(ShellError::invalid(format!("nano: missing filename\nUsage: nano FILE\n\n{}", KEYS)));
        };
        match read_file(ctx.session, file, "nano") {
            Ok(content) => Ok(existing(file, &content)),
            Err(ShellError::NoSuchFile { .. }) => Ok(new_file(file)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{run, session};

    #[test]
    fn test_rows_are_aligned() {
        assert_eq!(row("").chars().count(), rule('┌', '┐').chars().count());
        assert_eq!(row(&clip(&"x".repeat(80))).chars().count(), rule('├', '┤').chars().count());
        assert_eq!(clip(&"x".repeat(80)), format!("{}...", "x".repeat(56)));
        assert_eq!(clip("short"), "short");
        let framed = frame(&"t".repeat(90), &[]);
        assert!(framed.lines().all(|l| l.chars().count() == INNER + 4));
    }

    #[tokio::test]
    async fn test_nano_existing_file() {
        let mut s = session();
        let out = run(&mut s, "nano projects/my_blog/style.css").await.unwrap();
        assert!(out.starts_with("┌"));
        assert!(out.contains("│ body { color: blue; }"));
        assert!(out.contains("File: projects/my_blog/style.css | Lines: 2 | Characters: 22\n"));
        assert!(!out.contains("more lines"));
    }

    #[test]
    fn test_nano_long_file_is_cut() {
        let content: String = (1..=15).map(|i| format!("line {}\n", i)).collect();
        let out = existing("big.txt", &content);
        assert!(out.contains("│ line 10"));
        assert!(!out.contains("│ line 11"));
        assert!(out.contains("... (6 more lines) ..."));
    }

    #[tokio::test]
    async fn test_nano_new_file_and_errors() {
        let mut s = session();
        let out = run(&mut s, "nano fresh.txt").await.unwrap();
        assert!(out.contains("[ New File ]"));
        assert!(out.contains("File: fresh.txt [ New File ]\n"));
        assert!(!s.vfs.exists(&s.resolve("fresh.txt")));

        let err = run(&mut s, "nano documents").await.unwrap_err();
        assert_eq!(err.to_string(), "nano: documents: Is a directory");
        let err = run(&mut s, "nano").await.unwrap_err();
        assert!(err.to_string().starts_with("nano: missing filename\nUsage: nano FILE"));
        assert!(err.to_string().contains("\n  ^X  (Ctrl+X)    Exit nano\n"));
    }
}
