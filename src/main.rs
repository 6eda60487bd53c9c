use clap::{Arg, ArgAction, Command};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod completion;
mod config;
mod database;
mod error;

use cli::Cli;
use config::{setup_signal_handler, Settings, DEFAULT_HISTORY_FILE, DEFAULT_URL, LOG_ENV, VERSION};
use database::Connection;

fn build_command() -> Command {
    Command::new("resql-cli")
        .version(VERSION)
        .about("Interactive SQL shell for resql")
        .disable_version_flag(true)
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Server url, e.g. tcp://127.0.0.1:7600")
                .default_value(DEFAULT_URL),
        )
        .arg(
            Arg::new("command")
                .short('c')
                .long("command")
                .value_name("COMMAND")
                .help("Run the command and exit, may be repeated")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::Version),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("PATH")
                .help("History file")
                .default_value(DEFAULT_HISTORY_FILE),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    let settings = Settings::from_matches(&matches);

    init_logging(settings.verbose);

    let shutdown = match setup_signal_handler() {
        Ok(token) => token,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Trying to connect to server at {} ", settings.url);

    let connection = match Connection::new(&settings.url) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!(url = %settings.url, error = %e, "connection failed");
            println!("Failed to connect to server at {} ", settings.url);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        url = connection.url(),
        one_shot = settings.is_one_shot(),
        "connected"
    );

    let mut cli = Cli::new(connection, &settings, shutdown);
    match cli.run() {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Settings {
        let matches = build_command()
            .try_get_matches_from(std::iter::once("resql-cli").chain(args.iter().copied()))
            .unwrap();
        Settings::from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&[]);
        assert_eq!(settings.url, DEFAULT_URL);
        assert!(settings.commands.is_empty());
        assert!(!settings.is_one_shot());
        assert_eq!(settings.history_path, PathBuf::from(DEFAULT_HISTORY_FILE));
        assert!(!settings.verbose);
    }

    #[test]
    fn test_repeated_commands_keep_order() {
        let settings = parse(&[
            "-u=:memory:",
            "-c",
            "SELECT 1",
            "--command=SELECT 2",
            "--verbose",
            "--history",
            "/tmp/h.txt",
        ]);
        assert_eq!(settings.url, ":memory:");
        assert_eq!(settings.commands, vec!["SELECT 1", "SELECT 2"]);
        assert!(settings.is_one_shot());
        assert!(settings.verbose);
        assert_eq!(settings.history_path, PathBuf::from("/tmp/h.txt"));
    }

    #[test]
    fn test_version_and_unknown_flags() {
        let err = build_command()
            .try_get_matches_from(["resql-cli", "-v"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let err = build_command()
            .try_get_matches_from(["resql-cli", "--bogus"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_command_definition() {
        build_command().debug_assert();
    }
}
