//! Command-line interface for rehabtrack.
//!
//! This module provides the CLI structure for the `rehabctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DoctorArgs, GenderArg, InjuryArg, LoginCommand, OutputFormat, PatientArgs,
    PatientsCommand, RegisterCommand, ShowCommand, StatusCommand,
};

/// rehabctl - Manage the shoulder-rehabilitation account registry
///
/// Register doctors and the patients attached to them, check logins, and
/// review each doctor's patient roster.
#[derive(Debug, Parser)]
#[command(name = "rehabctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new account
    #[command(subcommand)]
    Register(RegisterCommand),

    /// Check a username and password
    Login(LoginCommand),

    /// List a doctor's patients
    Patients(PatientsCommand),

    /// Show an account
    Show(ShowCommand),

    /// Show registry status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "rehabctl");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["rehabctl", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(
            parse(&["rehabctl", "-v", "status"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(
            parse(&["rehabctl", "-vv", "status"]).verbosity(),
            Verbosity::Trace
        );
        assert_eq!(
            parse(&["rehabctl", "-q", "status"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_register_doctor() {
        let cli = parse(&[
            "rehabctl", "register", "doctor", "dr1", "--password", "pw1", "--doctor-id", "D100",
        ]);
        match cli.command {
            Command::Register(RegisterCommand::Doctor(args)) => {
                assert_eq!(args.username, "dr1");
                assert_eq!(args.password, "pw1");
                assert_eq!(args.doctor_id, "D100");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_register_patient() {
        let cli = parse(&[
            "rehabctl",
            "register",
            "patient",
            "pat1",
            "-p",
            "pw2",
            "-d",
            "D100",
            "--injury",
            "frozen-shoulder",
            "--age",
            "34",
            "--gender",
            "female",
            "--start-date",
            "2024-03-01",
        ]);
        match cli.command {
            Command::Register(RegisterCommand::Patient(args)) => {
                assert_eq!(args.username, "pat1");
                assert_eq!(args.injury, InjuryArg::FrozenShoulder);
                assert_eq!(args.age, 34);
                assert_eq!(args.gender, GenderArg::Female);
                assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_register_patient_without_start_date() {
        let cli = parse(&[
            "rehabctl", "register", "patient", "pat1", "-p", "pw", "-d", "D1", "-i",
            "dislocation", "-a", "50", "-g", "other",
        ]);
        assert!(matches!(
            cli.command,
            Command::Register(RegisterCommand::Patient(PatientArgs {
                start_date: None,
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_date_and_age() {
        let bad_date = Cli::try_parse_from([
            "rehabctl", "register", "patient", "p", "-p", "pw", "-d", "D1", "-i",
            "dislocation", "-a", "50", "-g", "male", "-s", "03/01/2024",
        ]);
        assert!(bad_date.is_err());

        let bad_age = Cli::try_parse_from([
            "rehabctl", "register", "patient", "p", "-p", "pw", "-d", "D1", "-i",
            "dislocation", "-a", "300", "-g", "male",
        ]);
        assert!(bad_age.is_err());
    }

    #[test]
    fn test_parse_login() {
        let cli = parse(&["rehabctl", "login", "alice", "--password", "secret", "--json"]);
        match cli.command {
            Command::Login(cmd) => {
                assert_eq!(cmd.username, "alice");
                assert_eq!(cmd.password, "secret");
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_patients_default_format() {
        let cli = parse(&["rehabctl", "patients", "dr1"]);
        match cli.command {
            Command::Patients(cmd) => {
                assert_eq!(cmd.doctor, "dr1");
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["rehabctl", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["rehabctl", "config", "validate", "--file", "/tmp/x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
