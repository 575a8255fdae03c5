// src/commands/search/mod.rs
pub mod catalog;

use async_trait::async_trait;

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

use catalog::Entry;

pub struct SearchCommand;

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}

fn all_commands(style: &Style) -> String {
    let mut out = style.paint(BOLD, "All Available Commands");
    out.push_str("\n\n");
    for (category, entries) in catalog::by_category() {
        out.push_str(&style.paint(BOLD, &format!("{}:", category)));
        out.push('\n');
        for e in entries {
            out.push_str(&format!("  {} {}\n", style.paint(GREEN, &format!("{:<12}", e.name)), e.description));
        }
        out.push('\n');
    }
    out.push_str(&format!("Total: {} commands\n", catalog::ENTRIES.len()));
    out.push_str("Use 'search KEYWORD' to find specific commands.\n");
    out
}

fn one_category(style: &Style, wanted: &str) -> CommandResult {
    let groups = catalog::by_category();
    let Some((category, entries)) = groups.iter().find(|(c, _)| c.eq_ignore_ascii_case(wanted)) else {
        let available: Vec<&str> = groups.keys().copied().collect();
        return Err(ShellError::invalid(format!(
            "Category \"{}\" not found.\n\nAvailable categories:\n  {}",
            wanted,
            available.join(", ")
        )));
    };
    let mut out = style.paint(BOLD, &format!("{} Commands:", category));
    out.push_str("\n\n");
    for e in entries {
        out.push_str(&format!("{}\n  {}\n", style.paint(GREEN, e.name), e.description));
    }
    Ok(out)
}

fn results(style: &Style, query: &str, found: &[&Entry]) -> String {
    let mut out = style.paint(BOLD, &format!("Search results for \"{}\":", query));
    out.push_str("\n\n");
    for (i, e) in found.iter().enumerate() {
        out.push_str(&format!("{}. {} ({})\n   {}\n", i + 1, style.paint(GREEN, e.name), e.category, e.description));
    }
    if let Some(best) = found.first() {
        out.push_str(&format!("\nTip: use 'man {}' for details.\n", best.name));
    }
    out
}

#[async_trait]
impl Command for SearchCommand {
    fn name(&self) -> &'static str {
        "search"
    }

    fn summary(&self) -> &'static str {
        "find commands by keyword or category"
    }

    fn usage(&self) -> &'static str {
        "search [--all | --category NAME | KEYWORD...]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        None
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let style = Style { color: ctx.session.config.color };
        let args = &ctx.raw_args;
        if args.is_empty() || args.iter().any(|a| a == "--all") {
            return Ok(all_commands(&style));
        }
        if let Some(pos) = args.iter().position(|a| a == "--category") {
            return match args.get(pos + 1) {
                Some(name) => one_category(&style, name),
                None => Err(ShellError::invalid("search: option '--category' requires an argument")),
            };
        }
        let query = args.join(" ");
        let found = catalog::search(&query);
        if found.is_empty() {
            return Err(ShellError::invalid(format!(
                "No commands found for: \"{}\"\n\nTry:\n  search --all    show every command\n  help            list commands",
                query
            )));
        }
        Ok(results(&style, &query, &found))
    }
}

#[cfg(test)]
mod tests {
    use super::catalog;
    use crate::commands::create_default_registry;
    use crate::commands::testing::{run, session};

    #[test]
    fn test_catalog_matches_registry() {
        let registry = create_default_registry();
        for name in registry.names() {
            assert!(catalog::get(name).is_some(), "{} missing from catalog", name);
        }
        for e in catalog::ENTRIES {
            assert!(registry.contains(e.name), "{} is not a command", e.name);
        }
    }

    #[tokio::test]
    async fn test_search_keyword() {
        let mut s = session();
        let out = run(&mut s, "search copy").await.unwrap();
        assert!(out.starts_with("Search results for \"copy\":\n\n1. cp (File Operations)\n   Copy files"));
        assert!(out.ends_with("Tip: use 'man cp' for details.\n"));
    }

    #[tokio::test]
    async fn test_search_no_match() {
        let mut s = session();
        let err = run(&mut s, "search zzzzqqq").await.unwrap_err();
        assert!(err.to_string().starts_with("No commands found for: \"zzzzqqq\""));
    }

    #[tokio::test]
    async fn test_search_all_and_category() {
        let mut s = session();
        let out = run(&mut s, "search").await.unwrap();
        assert!(out.contains("Viewers:\n"));
        assert!(out.contains(&format!("Total: {} commands\n", catalog::ENTRIES.len())));

        let out = run(&mut s, "search --category viewers").await.unwrap();
        assert_eq!(out, "Viewers Commands:\n\nless\n  View a file with line numbers on request\nmore\n  Simple file viewer\n");

        let err = run(&mut s, "search --category nope").await.unwrap_err();
        assert!(err.to_string().starts_with("Category \"nope\" not found."));
        assert!(run(&mut s, "search --category").await.is_err());
    }
}
