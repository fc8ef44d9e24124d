// shellgate - a shell front end where plugins get the first look at every command
//
// Parses CLI args, builds a session from ~/.shellgate/config.json and either
// runs one command or reads commands from stdin until EOF.

use shellgate_lib::{
    core::DispatchOptions,
    plugins::{default_enhancers, default_plugins},
    shell::{ShellDetector, ShellRunner},
    Config, ExecutionResult, Result, Session, SessionOutcome,
};
use std::env;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "run" => handle_run(&args[2..]).await,
        "repl" => handle_repl().await,
        "plugins" => handle_plugins(),
        "version" | "-v" | "--version" => {
            println!("shellgate v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

/// Logs go to stderr so they never mix with command output.
/// `SHELLGATE_LOG=debug` shows every dispatch decision.
fn init_logging() {
    let filter = EnvFilter::try_from_env("SHELLGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_session(config: &Config, runner: ShellRunner) -> Result<Session> {
    let manager = default_plugins(config, runner)?;
    let mut options = DispatchOptions::new();
    if let Some(timeout) = config.dispatch_timeout() {
        options = options.with_timeout(timeout);
    }

    Ok(Session::with_enhancers(manager, default_enhancers(config), env::current_dir()?)
        .with_options(options))
}

async fn handle_run(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: No command provided");
        return Ok(());
    }

    let config = load_config();
    let runner = ShellRunner::new(ShellDetector::detect_or_sh());
    let mut session = build_session(&config, runner)?;

    let code = submit(&mut session, &runner, &args.join(" ")).await?;
    std::process::exit(code);
}

async fn handle_repl() -> Result<()> {
    let config = load_config();
    let runner = ShellRunner::new(ShellDetector::detect_or_sh());
    let mut session = build_session(&config, runner)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_code = 0;

    loop {
        print_prompt(session.cwd(), last_code);

        let line = match read_prompt(&mut lines, tokio::signal::ctrl_c()).await? {
            PromptInput::Line(line) => line,
            PromptInput::Interrupted => {
                println!();
                last_code = ExecutionResult::cancelled().exit_code;
                continue;
            }
            PromptInput::Eof => break,
        };

        match line.trim() {
            "exit" | "quit" => break,
            _ => {}
        }

        last_code = submit(&mut session, &runner, &line).await?;
    }

    println!();
    Ok(())
}

#[derive(Debug, PartialEq)]
enum PromptInput {
    Line(String),
    Interrupted,
    Eof,
}

/// Next line from the prompt, unless `interrupt` fires first.
///
/// Once a command has run, SIGINT no longer kills the process, so the prompt
/// has to listen for it too. Ctrl-C drops the line, like a shell does.
async fn read_prompt<R, F>(lines: &mut Lines<R>, interrupt: F) -> Result<PromptInput>
where
    R: AsyncBufRead + Unpin,
    F: Future,
{
    tokio::select! {
        line = lines.next_line() => Ok(match line? {
            Some(line) => PromptInput::Line(line),
            None => PromptInput::Eof,
        }),
        _ = interrupt => Ok(PromptInput::Interrupted),
    }
}

/// Run one line through the session and, if nothing claimed it, the shell.
/// Ctrl-C cancels whichever of the two is running.
async fn submit(session: &mut Session, runner: &ShellRunner, line: &str) -> Result<i32> {
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let options = session.options().clone().with_cancel(token.clone());

    let code = match session.submit_with(line, &options).await {
        SessionOutcome::Empty => 0,
        SessionOutcome::Handled(result) => {
            print_result(&result);
            result.exit_code
        }
        SessionOutcome::Fallthrough(command) => {
            tokio::select! {
                status = runner.run_interactive(&command, session.cwd()) => status?,
                _ = token.cancelled() => {
                    print_result(&ExecutionResult::cancelled());
                    ExecutionResult::cancelled().exit_code
                }
            }
        }
    };

    watcher.abort();
    Ok(code)
}

fn print_result(result: &ExecutionResult) {
    if !result.output.is_empty() {
        print!("{}", result.output);
        if !result.output.ends_with('\n') && !result.output.starts_with('\x1b') {
            println!();
        }
    }
    if !result.error.is_empty() {
        eprintln!("{}", result.error.trim_end());
    }
}

fn print_prompt(cwd: &Path, last_code: i32) {
    let marker = if last_code == 0 { "$" } else { "!" };
    print!("[{}] {} ", display_path(cwd), marker);
    let _ = std::io::stdout().flush();
}

/// `~/x` for paths under home, the full path otherwise
fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rel) = path.strip_prefix(&home) {
            if rel.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", rel.display());
        }
    }
    path.display().to_string()
}

fn handle_plugins() -> Result<()> {
    let config = load_config();
    let runner = ShellRunner::new(ShellDetector::detect_or_sh());
    let manager = default_plugins(&config, runner)?;
    let enhancers = default_enhancers(&config);

    println!("\nPlugins (in dispatch order):");
    println!("{}", "=".repeat(60));
    for (i, name) in manager.names().iter().enumerate() {
        println!("{:3}. {}", i + 1, name);
    }

    println!("\nEnhancers:");
    if enhancers.is_empty() {
        println!("  (none)");
    }
    for name in enhancers.names() {
        println!("  - {}", name);
    }
    println!("\nFallthrough shell: {}", runner.shell());
    println!("{}", "=".repeat(60));

    Ok(())
}

/// Broken config shouldn't lock anyone out of their shell; fall back to
/// defaults and say why.
fn load_config() -> Config {
    match Config::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("shellgate: {}", e.user_message());
            Config::default()
        }
    }
}

fn print_usage() {
    println!(
        r#"shellgate v{} - plugins first, shell second

USAGE:
    shellgate <COMMAND> [ARGS]

COMMANDS:
    run <command>     Run one command through the plugin chain
    repl              Read commands from stdin until EOF or `exit`
                      (Ctrl-C cancels the running command or clears the prompt)
    plugins           List plugins and enhancers in dispatch order
    version           Show version
    help              Show this help

BUILT-IN PLUGINS:
    cd, .., ..., -, ~          directory navigation
    bm [add|rm|go] <name>, g   bookmarks
    alias [name]               configured aliases
    clear, cls                 clear the screen

CONFIG:
    ~/.shellgate/config.json   aliases, bookmarks, allow/deny lists, timeout

LOGGING:
    SHELLGATE_LOG=debug shellgate repl
"#,
        env!("CARGO_PKG_VERSION")
    );
}
