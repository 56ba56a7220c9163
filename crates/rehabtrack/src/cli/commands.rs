//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::account::{Gender, InjuryType, NewAccount, NewPatient};

/// Registration commands.
#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    /// Register a doctor
    Doctor(DoctorArgs),

    /// Register a patient under an existing doctor id
    Patient(PatientArgs),
}

/// Doctor registration arguments.
#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Username for the new account
    pub username: String,

    /// Password for the new account
    #[arg(short, long)]
    pub password: String,

    /// Doctor id patients will register against
    #[arg(short, long)]
    pub doctor_id: String,
}

/// Patient registration arguments.
#[derive(Debug, Args)]
pub struct PatientArgs {
    /// Username for the new account
    pub username: String,

    /// Password for the new account
    #[arg(short, long)]
    pub password: String,

    /// Doctor id of the treating doctor
    #[arg(short, long)]
    pub doctor_id: String,

    /// Injury being rehabilitated
    #[arg(short, long, value_enum)]
    pub injury: InjuryArg,

    /// Age in years
    #[arg(short, long)]
    pub age: u8,

    /// Gender
    #[arg(short, long, value_enum)]
    pub gender: GenderArg,

    /// Rehabilitation start date (YYYY-MM-DD); defaults to today
    #[arg(short, long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,
}

impl From<RegisterCommand> for NewAccount {
    fn from(cmd: RegisterCommand) -> Self {
        match cmd {
            RegisterCommand::Doctor(args) => {
                NewAccount::doctor(args.username, args.password, args.doctor_id)
            }
            RegisterCommand::Patient(args) => NewAccount::patient(
                args.username,
                args.password,
                args.doctor_id,
                NewPatient {
                    injury_type: args.injury.into(),
                    age: args.age,
                    gender: args.gender.into(),
                    start_date: args.start_date,
                },
            ),
        }
    }
}

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account username
    pub username: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Patient roster command arguments.
#[derive(Debug, Args)]
pub struct PatientsCommand {
    /// Username of the doctor
    pub doctor: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Account username
    pub username: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Injury type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InjuryArg {
    /// Rotator cuff tear
    RotatorCuffTear,
    /// Frozen shoulder
    FrozenShoulder,
    /// Shoulder dislocation
    Dislocation,
}

impl From<InjuryArg> for InjuryType {
    fn from(arg: InjuryArg) -> Self {
        match arg {
            InjuryArg::RotatorCuffTear => Self::RotatorCuffTear,
            InjuryArg::FrozenShoulder => Self::FrozenShoulder,
            InjuryArg::Dislocation => Self::Dislocation,
        }
    }
}

/// Gender argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    /// Male
    Male,
    /// Female
    Female,
    /// Other
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
            GenderArg::Other => Self::Other,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::NewAccountDetails;

    #[test]
    fn test_injury_arg_conversion() {
        assert_eq!(
            InjuryType::from(InjuryArg::RotatorCuffTear),
            InjuryType::RotatorCuffTear
        );
        assert_eq!(
            InjuryType::from(InjuryArg::FrozenShoulder),
            InjuryType::FrozenShoulder
        );
        assert_eq!(
            InjuryType::from(InjuryArg::Dislocation),
            InjuryType::Dislocation
        );
    }

    #[test]
    fn test_gender_arg_conversion() {
        assert_eq!(Gender::from(GenderArg::Male), Gender::Male);
        assert_eq!(Gender::from(GenderArg::Female), Gender::Female);
        assert_eq!(Gender::from(GenderArg::Other), Gender::Other);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_doctor_command_into_request() {
        let cmd = RegisterCommand::Doctor(DoctorArgs {
            username: "dr1".to_string(),
            password: "pw1".to_string(),
            doctor_id: "D100".to_string(),
        });
        let request = NewAccount::from(cmd);

        assert_eq!(request, NewAccount::doctor("dr1", "pw1", "D100"));
    }

    #[test]
    fn test_patient_command_into_request() {
        let cmd = RegisterCommand::Patient(PatientArgs {
            username: "pat1".to_string(),
            password: "pw2".to_string(),
            doctor_id: "D100".to_string(),
            injury: InjuryArg::FrozenShoulder,
            age: 34,
            gender: GenderArg::Female,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        });
        let request = NewAccount::from(cmd);

        assert_eq!(request.username, "pat1");
        match request.details {
            NewAccountDetails::Patient(patient) => {
                assert_eq!(patient.injury_type, InjuryType::FrozenShoulder);
                assert_eq!(patient.age, 34);
                assert_eq!(patient.gender, Gender::Female);
                assert_eq!(patient.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
            }
            NewAccountDetails::Doctor => panic!("expected a patient request"),
        }
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
