//! Command-line access to the Sable grammar: load checks and artifact dumps.

use facet::Facet;
use std::fmt::Write as _;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tree_sitter_sable::{load_and_check, LanguageFn, LoadError, GRAMMAR_JSON, LANGUAGE};

const COMMANDS: &str = "check, node-types, grammar, symbols";

#[derive(Facet)]
struct Args {
    /// One of `check`, `node-types`, `grammar` or `symbols`.
    #[facet(positional)]
    command: String,

    /// Log at debug level.
    #[facet(named, short = 'v', default)]
    verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("unknown command '{0}', expected one of: {commands}", commands = COMMANDS)]
    Unknown(String),
}

impl CommandError {
    fn exit_status(&self) -> u8 {
        match self {
            Self::Load(_) => 1,
            Self::Unknown(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let raw: Vec<&str> = raw.iter().map(String::as_str).collect();
    let args: Args = match facet_args::from_slice(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: tree-sitter-sable [-v] <{}>", COMMANDS.replace(", ", "|"));
            return ExitCode::from(2);
        }
    };

    init_logging(args.verbose);

    match run(&args.command, LANGUAGE) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_status())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs `command` against the tables behind `language` and returns what to print.
fn run(command: &str, language: LanguageFn) -> Result<String, CommandError> {
    match command {
        "check" => {
            let language = load_and_check(language)?;
            Ok(format!(
                "{}: ok (abi {}, {} node kinds)",
                language.name(),
                language.abi_version(),
                language.node_kind_count()
            ))
        }
        "node-types" => Ok(load_and_check(language)?.node_types_json()),
        "grammar" => Ok(GRAMMAR_JSON.clone()),
        "symbols" => {
            let language = load_and_check(language)?;
            let mut out = String::new();
            for (id, symbol) in language.tables().symbols.iter().enumerate() {
                let named = if symbol.named { "named" } else { "anonymous" };
                let _ = writeln!(out, "{id}\t{}\t{named}", symbol.name);
            }
            Ok(out.trim_end().to_string())
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
