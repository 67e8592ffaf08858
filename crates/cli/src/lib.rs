pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use panelquote_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use panelquote_core::OperatingMode;

#[derive(Debug, Parser)]
#[command(
    name = "panelquote",
    about = "Panelquote operator CLI",
    long_about = "Turn free-text panel construction requests into structured quotations, \
                  run batches, and operate the reference catalog.",
    after_help = "Examples:\n  panelquote quote \"techo isodec 100mm, 6 paneles de 6.5m\"\n  panelquote batch --file requests.txt\n  panelquote catalog check --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a panelquote.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Quote a single free-text request and print the quotation as JSON")]
    Quote {
        #[arg(help = "Request text; omitted reads the request from stdin")]
        text: Option<String>,
        #[arg(long, value_enum, help = "Force the operating mode instead of detecting it")]
        mode: Option<ModeArg>,
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    #[command(about = "Quote every request in a file independently and print a JSON array")]
    Batch {
        #[arg(long, help = "Input file: one request per line, or a JSON array of strings")]
        file: PathBuf,
        #[arg(long, value_enum, help = "Force the operating mode for every item")]
        mode: Option<ModeArg>,
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    #[command(subcommand, about = "Inspect or reload the reference catalog")]
    Catalog(CatalogCommand),
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    #[command(about = "Load and validate the reference tables, reporting entry counts")]
    Check {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Rebuild the in-memory catalog snapshot from the table files")]
    Reload,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Informativo,
    PreCotizacion,
    Formal,
}

impl From<ModeArg> for OperatingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Informativo => OperatingMode::Informativo,
            ModeArg::PreCotizacion => OperatingMode::PreCotizacion,
            ModeArg::Formal => OperatingMode::Formal,
        }
    }
}

fn init_logging(config: &AppConfig) {
    use panelquote_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
        Pretty => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .pretty()
                .init();
        }
        Json => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { log_level: cli.log_level.clone(), ..Default::default() },
    }) {
        Ok(config) => config,
        Err(error) => {
            let result =
                commands::CommandResult::failure("config", "config_load", error.to_string(), 2);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Quote { text, mode, pretty } => {
            commands::quote::run(&config, text, mode.map(Into::into), pretty)
        }
        Command::Batch { file, mode, pretty } => {
            commands::batch::run(&config, &file, mode.map(Into::into), pretty)
        }
        Command::Catalog(CatalogCommand::Check { json }) => commands::catalog::check(&config, json),
        Command::Catalog(CatalogCommand::Reload) => commands::catalog::reload(&config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
