//! Shell grammar
//!
//! A line is a list of pipelines joined by `;`, `&`, `&&` or `||`. Each
//! pipeline is one or more stages joined by `|`, plus at most one input and
//! one output redirection that apply to the pipeline as a whole (a later
//! redirection of the same kind replaces an earlier one).

pub mod lexer;
pub mod types;

pub use lexer::{tokenize, ParseError, Token};
pub use types::{CommandList, CommandStage, Connector, ParsedLine, Redirections, Word, WordPart};

pub fn parse(line: &str) -> Result<CommandList, ParseError> {
    let tokens = tokenize(line)?;
    let mut list = CommandList::default();
    let mut connector = Connector::Always;
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        let (next, background) = match token {
            Token::Semi => (Connector::Always, false),
            Token::Amp => (Connector::Always, true),
            Token::AndIf => (Connector::OnSuccess, false),
            Token::OrIf => (Connector::OnFailure, false),
            other => {
                current.push(other);
                continue;
            }
        };
        if current.is_empty() {
            return Err(ParseError::UnexpectedToken(token_text(background, next)));
        }
        let mut pipeline = parse_pipeline_tokens(std::mem::take(&mut current))?;
        pipeline.is_background = background;
        list.items.push((connector, pipeline));
        connector = next;
    }

    if current.is_empty() {
        if connector != Connector::Always {
            return Err(ParseError::UnexpectedEof);
        }
    } else {
        list.items.push((connector, parse_pipeline_tokens(current)?));
    }
    Ok(list)
}

/// Parse a line that must hold exactly one pipeline.
pub fn parse_line(line: &str) -> Result<ParsedLine, ParseError> {
    let mut list = parse(line)?;
    match list.items.len() {
        0 => Err(ParseError::UnexpectedEof),
        1 => Ok(list.items.remove(0).1),
        _ => Err(ParseError::UnexpectedToken(";".to_string())),
    }
}

fn token_text(background: bool, connector: Connector) -> String {
    match (background, connector) {
        (true, _) => "&",
        (false, Connector::OnSuccess) => "&&",
        (false, Connector::OnFailure) => "||",
        (false, Connector::Always) => ";",
    }
    .to_string()
}

fn parse_pipeline_tokens(tokens: Vec<Token>) -> Result<ParsedLine, ParseError> {
    let mut commands = Vec::new();
    let mut redirections = Redirections::default();
    let mut stage: Vec<Word> = Vec::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Word(w) => stage.push(w),
            Token::Pipe => {
                commands.push(finish_stage(&mut stage, "|")?);
            }
            Token::Great | Token::DGreat | Token::Less => {
                let target = match iter.next() {
                    Some(Token::Word(w)) => w,
                    Some(other) => return Err(ParseError::UnexpectedToken(other.as_str().to_string())),
                    None => return Err(ParseError::UnexpectedToken("newline".to_string())),
                };
                match token {
                    Token::Less => redirections.input = Some(target),
                    Token::DGreat => {
                        redirections.output = Some(target);
                        redirections.append = true;
                    }
                    _ => {
                        redirections.output = Some(target);
                        redirections.append = false;
                    }
                }
            }
            other => return Err(ParseError::UnexpectedToken(other.as_str().to_string())),
        }
    }

    if stage.is_empty() {
        // `ls |` or a line made only of redirections
        return Err(if commands.is_empty() {
            ParseError::UnexpectedToken("newline".to_string())
        } else {
            ParseError::UnexpectedEof
        });
    }
    commands.push(finish_stage(&mut stage, "|")?);

    Ok(ParsedLine {
        has_pipes: commands.len() > 1,
        commands,
        redirections,
        is_background: false,
    })
}

fn finish_stage(words: &mut Vec<Word>, op: &str) -> Result<CommandStage, ParseError> {
    if words.is_empty() {
        return Err(ParseError::UnexpectedToken(op.to_string()));
    }
    let mut words = std::mem::take(words).into_iter();
    let name = words.next().unwrap_or_default();
    Ok(CommandStage { name, args: words.collect() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(line: &ParsedLine) -> Vec<String> {
        line.commands.iter().map(|c| c.name.text()).collect()
    }

    fn args(stage: &CommandStage) -> Vec<String> {
        stage.args.iter().map(|a| a.text()).collect()
    }

    #[test]
    fn test_single_command() {
        let line = parse_line("ls -la /home").unwrap();
        assert_eq!(names(&line), vec!["ls"]);
        assert_eq!(args(&line.commands[0]), vec!["-la", "/home"]);
        assert!(!line.has_pipes);
        assert!(!line.is_background);
        assert_eq!(line.redirections, Redirections::default());
    }

    #[test]
    fn test_pipes() {
        let line = parse_line("cat notes.md | grep Idea | wc -l").unwrap();
        assert_eq!(names(&line), vec!["cat", "grep", "wc"]);
        assert!(line.has_pipes);
        assert_eq!(args(&line.commands[2]), vec!["-l"]);
    }

    #[test]
    fn test_redirections() {
        let line = parse_line("echo hello > out.txt").unwrap();
        assert_eq!(line.redirections.output.as_ref().map(|w| w.text()), Some("out.txt".into()));
        assert!(!line.redirections.append);

        let line = parse_line("echo world >> out.txt").unwrap();
        assert!(line.redirections.append);
        assert_eq!(args(&line.commands[0]), vec!["world"]);

        let line = parse_line("sort < names.txt > sorted.txt").unwrap();
        assert_eq!(line.redirections.input.as_ref().map(|w| w.text()), Some("names.txt".into()));
        assert_eq!(line.redirections.output.as_ref().map(|w| w.text()), Some("sorted.txt".into()));
    }

    #[test]
    fn test_quoted_redirect_is_an_argument() {
        let line = parse_line("echo 'a > b'").unwrap();
        assert_eq!(args(&line.commands[0]), vec!["a > b"]);
        assert!(line.redirections.output.is_none());
    }

    #[test]
    fn test_background() {
        let line = parse_line("sleep 5 &").unwrap();
        assert!(line.is_background);
        assert_eq!(args(&line.commands[0]), vec!["5"]);

        let line = parse_line("echo 'a &'").unwrap();
        assert!(!line.is_background);
    }

    #[test]
    fn test_comment_before_redirect() {
        let line = parse_line("echo hi # > ignored.txt").unwrap();
        assert!(line.redirections.output.is_none());
    }

    #[test]
    fn test_lists() {
        let list = parse("mkdir foo && cd foo; ls || echo failed").unwrap();
        let connectors: Vec<Connector> = list.items.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            connectors,
            vec![Connector::Always, Connector::OnSuccess, Connector::Always, Connector::OnFailure]
        );
        let list = parse("sleep 10 & jobs").unwrap();
        assert!(list.items[0].1.is_background);
        assert!(!list.items[1].1.is_background);
        assert!(parse("ls;").unwrap().items.len() == 1);
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse("| ls"), Err(ParseError::UnexpectedToken("|".into())));
        assert_eq!(parse("ls |"), Err(ParseError::UnexpectedEof));
        assert_eq!(parse("ls >"), Err(ParseError::UnexpectedToken("newline".into())));
        assert_eq!(parse("ls > | wc"), Err(ParseError::UnexpectedToken("|".into())));
        assert_eq!(parse("; ls"), Err(ParseError::UnexpectedToken(";".into())));
        assert_eq!(parse("ls &&"), Err(ParseError::UnexpectedEof));
    }
}
