//! Purpose: `jsonsift` CLI entry point.
//! Role: Binary crate root; parses args, runs extraction, emits JSON on stdout.
//! Invariants: Successful extractions emit exactly one JSON document per line
//! (or one pretty document) on stdout; nothing else is written there.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `core::error::to_exit_code`.
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use jsonsift::core::error::{Error, ErrorKind, to_exit_code};
use jsonsift::core::extract::extract;
use jsonsift::core::stream::split_sse_messages;

#[derive(Parser, Debug)]
#[command(
    name = "jsonsift",
    version,
    about = "Recover JSON payloads from noisy text",
    long_about = "Reads free-form text (model output, logs, SSE chunks) and recovers the\nJSON payload inside it, tolerating code fences, surrounding prose, bare\nkeys, single quotes, and trailing commas.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[arg(help = "Input file ('-' or absent reads stdin)")]
    file: Option<PathBuf>,
    #[arg(long, help = "Emit the recovered value on a single line")]
    compact: bool,
    #[arg(long, help = "Split input into SSE messages and extract from each")]
    sse: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(0);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(err.to_string().trim_end().to_string())
                    .with_hint("run with --help for usage"));
            }
        },
    };

    if let Some(Command::Completion { shell }) = cli.command {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "jsonsift", &mut io::stdout());
        return Ok(0);
    }

    let input = read_input(cli.file.as_deref())?;

    if cli.sse {
        return run_sse(&input);
    }

    if let Some(value) = extract(&input)? {
        emit_value(&value, cli.compact);
    }
    Ok(0)
}

fn run_sse(input: &str) -> Result<i32, Error> {
    let mut recovered = 0usize;
    for message in split_sse_messages(input) {
        if let Ok(Some(value)) = extract(message) {
            emit_value(&value, true);
            recovered += 1;
        }
    }
    if recovered == 0 && !input.is_empty() {
        return Err(Error::json_not_found()
            .with_hint("no SSE message contained a recoverable JSON payload"));
    }
    Ok(0)
}

fn read_input(path: Option<&Path>) -> Result<String, Error> {
    match path {
        None => read_stdin(),
        Some(path) if path.as_os_str() == "-" => read_stdin(),
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(input)
}

fn emit_value(value: &Value, compact: bool) {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(_) => println!("null"),
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,
}

fn error_body(err: &Error) -> ErrorBody<'_> {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    ErrorBody {
        kind: format!("{:?}", err.kind()),
        message: err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?} error", err.kind())),
        hint: err.hint(),
        causes,
    }
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let envelope = ErrorEnvelope {
        error: error_body(err),
    };
    let json = serde_json::to_string(&envelope).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
