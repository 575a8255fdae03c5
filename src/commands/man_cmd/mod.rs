// src/commands/man_cmd/mod.rs
mod pages;

use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::search::catalog;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

use pages::ManPage;

pub struct ManCommand;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

struct Writer {
    out: String,
    color: bool,
}

impl Writer {
    fn heading(&mut self, text: &str) {
        if self.color {
            self.out.push_str(&format!("{}{}{}\n", BOLD, text, RESET));
        } else {
            self.out.push_str(text);
            self.out.push('\n');
        }
    }

    fn line(&mut self, indent: usize, text: &str) {
        self.out.push_str(&format!("{:indent$}{}\n", "", text, indent = indent));
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

fn render(page: &ManPage, color: bool) -> String {
    let mut w = Writer { out: String::new(), color };
    w.heading(&format!("{}(1)", page.name.to_uppercase()));
    w.blank();
    w.heading("NAME");
    w.line(4, &format!("{} - {}", page.name, page.description));
    w.blank();
    w.heading("SYNOPSIS");
    w.line(4, page.synopsis);
    w.blank();
    w.heading("DESCRIPTION");
    w.line(4, page.description);
    w.blank();
    if !page.options.is_empty() {
        w.heading("OPTIONS");
        for (flag, desc) in page.options {
            w.line(4, flag);
            w.line(8, desc);
            w.blank();
        }
    }
    if !page.examples.is_empty() {
        w.heading("EXAMPLES");
        for example in page.examples {
            w.line(4, example);
        }
        w.blank();
    }
    w.out
}

/// A page for a command that has no hand-written one.
fn generated(command: &dyn Command) -> ManPage {
    let description = catalog::get(command.name()).map_or(command.summary(), |e| e.description);
    ManPage {
        name: command.name(),
        synopsis: command.usage(),
        description,
        options: &[],
        examples: &[],
    }
}

fn apropos(keyword: &str) -> CommandResult {
    let found = catalog::search(keyword);
    if found.is_empty() {
        return Err(ShellError::invalid(format!("{}: nothing appropriate.", keyword)));
    }
    let width = found.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for e in found {
        out.push_str(&format!("{:<width$} (1) - {}\n", e.name, e.description, width = width));
    }
    Ok(out)
}

#[async_trait]
impl Command for ManCommand {
    fn name(&self) -> &'static str {
        "man"
    }

    fn summary(&self) -> &'static str {
        "display the manual page of a command"
    }

    fn usage(&self) -> &'static str {
        "man [-k] COMMAND"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("k").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let Some(topic) = ctx.args.operands.first() else {
            return Err(ShellError::invalid("What manual page do you want?\nFor example, try 'man man'."));
        };
        if ctx.args.has_flag('k') {
            return apropos(topic);
        }
        let topic = topic.to_lowercase();
        let color = ctx.session.config.color;
        if let Some(page) = pages::find(&topic) {
            return Ok(render(page, color));
        }
        match ctx.registry.get(&topic) {
            Some(command) => Ok(render(&generated(command), color)),
            None => Err(ShellError::invalid(format!("No manual entry for {}", topic))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_default_registry;
    use crate::commands::testing::{run, session};

    #[test]
    fn test_pages_name_real_commands() {
        let registry = create_default_registry();
        for page in pages::PAGES {
            assert!(registry.contains(page.name), "page for unknown command {}", page.name);
            assert!(!page.options.is_empty());
        }
    }

    #[tokio::test]
    async fn test_man_written_page() {
        let mut s = session();
        let out = run(&mut s, "man ls").await.unwrap();
        assert!(out.starts_with("LS(1)\n\nNAME\n    ls - List information about files and directories.\n"));
        assert!(out.contains("\nSYNOPSIS\n    ls [OPTION]... [FILE]...\n"));
        assert!(out.contains("\nOPTIONS\n    -a\n        Do not ignore entries starting with .\n"));
        assert!(out.contains("\nEXAMPLES\n    ls              # List files in current directory\n"));
        assert!(out.contains("\n    ls -la          # List all files with details\n"));
        assert!(!out.contains('\x1b'));
        assert_eq!(run(&mut s, "man LS").await.unwrap(), out);
    }

    #[tokio::test]
    async fn test_man_generated_page() {
        let mut s = session();
        let out = run(&mut s, "man umask").await.unwrap();
        let registry = create_default_registry();
        let umask = registry.get("umask").unwrap();
        assert!(out.starts_with("UMASK(1)\n\nNAME\n    umask - Set the default permission mask\n"));
        assert!(out.contains(&format!("\nSYNOPSIS\n    {}\n", umask.usage())));
        assert!(!out.contains("OPTIONS"));
    }

    #[tokio::test]
    async fn test_man_color_headings() {
        let mut s = session();
        s.config.color = true;
        let out = run(&mut s, "man cd").await.unwrap();
        assert!(out.starts_with("\x1b[1mCD(1)\x1b[0m\n"));
        assert!(out.contains("\x1b[1mNAME\x1b[0m\n"));
    }

    #[tokio::test]
    async fn test_man_errors() {
        let mut s = session();
        let err = run(&mut s, "man").await.unwrap_err();
        assert_eq!(err.to_string(), "What manual page do you want?\nFor example, try 'man man'.");
        let err = run(&mut s, "man nosuch").await.unwrap_err();
        assert_eq!(err.to_string(), "No manual entry for nosuch");
    }

    #[tokio::test]
    async fn test_man_apropos() {
        let mut s = session();
        let out = run(&mut s, "man -k copy").await.unwrap();
        assert!(out.starts_with("cp"));
        assert!(out.lines().next().unwrap().ends_with("(1) - Copy files and directories"));
        let err = run(&mut s, "man -k zzzzqqq").await.unwrap_err();
        assert_eq!(err.to_string(), "zzzzqqq: nothing appropriate.");
    }
}
