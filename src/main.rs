use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tutor_shell::config::ShellConfig;
use tutor_shell::interpreter::Shell;

#[derive(Parser)]
#[command(name = "tutor-shell")]
#[command(about = "A simulated Linux shell for practising system administration")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Run one line and exit
    #[arg(short = 'c')]
    line: Option<String>,

    /// Directory for saved state (overrides the config file)
    #[arg(long = "state-dir")]
    state_dir: Option<PathBuf>,

    /// Do not load or save any state
    #[arg(long = "no-persist")]
    no_persist: bool,

    /// Highlight matches and listings with ANSI colors
    #[arg(long = "color")]
    color: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.init();
}

fn load_config(cli: &Cli) -> Result<ShellConfig, tutor_shell::config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    if let Some(dir) = &cli.state_dir {
        config.state_dir = Some(dir.clone());
    }
    if cli.no_persist {
        config.state_dir = None;
    }
    if cli.color {
        config.color = true;
    }
    Ok(config)
}

fn show(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

fn save(shell: &mut Shell) {
    if let Err(e) = shell.save() {
        log::warn!("could not save state: {}", e);
    }
}

async fn repl(shell: &mut Shell) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show(&shell.poll_jobs());
    show(&shell.prompt());
    loop {
        let deadline = shell.autosave_deadline();
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if matches!(line.trim(), "exit" | "logout") {
                            break;
                        }
                        show(&shell.execute(&line).await);
                        show(&shell.poll_jobs());
                        show(&shell.prompt());
                    }
                    Ok(None) => {
                        println!();
                        break;
                    }
                    Err(e) => {
                        log::error!("reading input failed: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                shell.save_if_due(Instant::now());
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tutor-shell: {}", e);
            std::process::exit(2);
        }
    };

    let mut shell = Shell::open(config);
    match &cli.line {
        Some(line) => show(&shell.execute(line).await),
        None => repl(&mut shell).await,
    }
    if shell.has_store() {
        save(&mut shell);
    }
}
