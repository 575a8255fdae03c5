// src/commands/echo/mod.rs
use async_trait::async_trait;

use crate::commands::{Command, CommandContext, CommandResult};

pub struct EchoCommand;

/// Interpret backslash escapes as `echo -e` does. Returns the text and
/// whether `\c` cut the output short.
pub fn interpret_escapes(text: &str) -> (String, bool) {
    let mut out = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('e') => out.push('\x1b'),
            Some('v') => out.push('\x0b'),
            Some('f') => out.push('\x0c'),
            Some('\\') => out.push('\\'),
            Some('c') => return (out, true),
            Some('0') => {
                let mut value = 0u32;
                for _ in 0..3 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if let Some(ch) = char::from_u32(value) {
                    out.push(ch);
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    (out, false)
}

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn summary(&self) -> &'static str {
        "display a line of text"
    }

    fn usage(&self) -> &'static str {
        "echo [-neE] [STRING]..."
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut newline = true;
        let mut escapes = false;
        let mut words = ctx.raw_args.as_slice();

        // Only leading words made purely of n/e/E are options.
        while let Some(first) = words.first() {
            let Some(flags) = first.strip_prefix('-') else { break };
            if flags.is_empty() || !flags.chars().all(|c| matches!(c, 'n' | 'e' | 'E')) {
                break;
            }
            for c in flags.chars() {
                match c {
                    'n' => newline = false,
                    'e' => escapes = true,
                    _ => escapes = false,
                }
            }
            words = &words[1..];
        }

        let joined = words.join(" ");
        let (mut text, cut) = if escapes { interpret_escapes(&joined) } else { (joined, false) };
        if newline && !cut {
            text.push('\n');
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{run, session};

    #[tokio::test]
    async fn test_echo_joins_words() {
        let mut s = session();
        assert_eq!(run(&mut s, "echo hello   world").await.unwrap(), "hello world\n");
        assert_eq!(run(&mut s, "echo").await.unwrap(), "\n");
    }

    #[tokio::test]
    async fn test_echo_flags() {
        let mut s = session();
        assert_eq!(run(&mut s, "echo -n hi").await.unwrap(), "hi");
        assert_eq!(run(&mut s, "echo -e a\\tb").await.unwrap(), "a\tb\n");
        assert_eq!(run(&mut s, "echo -x hi").await.unwrap(), "-x hi\n");
        assert_eq!(run(&mut s, "echo hi -n").await.unwrap(), "hi -n\n");
    }

    #[test]
    fn test_interpret_escapes() {
        assert_eq!(interpret_escapes("a\\nb"), ("a\nb".to_string(), false));
        assert_eq!(interpret_escapes("stop\\cnot"), ("stop".to_string(), true));
        assert_eq!(interpret_escapes("\\0101"), ("A".to_string(), false));
        assert_eq!(interpret_escapes("\\q"), ("\\q".to_string(), false));
    }
}
