//! `rehabctl` - CLI for rehabtrack
//!
//! This binary provides the command-line interface for registering doctors and
//! patients, checking logins, and reviewing patient rosters.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use rehabtrack::account::{Account, PatientProfile, Profile};
use rehabtrack::cli::{
    Cli, Command, ConfigCommand, LoginCommand, OutputFormat, PatientsCommand, RegisterCommand,
    ShowCommand,
};
use rehabtrack::registry::RosterEntry;
use rehabtrack::{init_logging, Config, JsonFileStore, NewAccount, Registry, RegistrationPolicy};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Register(register_cmd) => {
            handle_register(&mut open_registry(&config), register_cmd)
        }
        Command::Login(login_cmd) => handle_login(&open_registry(&config), &login_cmd),
        Command::Patients(patients_cmd) => {
            handle_patients(&open_registry(&config), &patients_cmd)
        }
        Command::Show(show_cmd) => handle_show(&open_registry(&config), &show_cmd),
        Command::Status(status_cmd) => handle_status(&open_registry(&config), status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_registry(config: &Config) -> Registry<JsonFileStore> {
    Registry::load(JsonFileStore::new(config.registry_path()))
        .with_policy(RegistrationPolicy::from(config))
}

fn handle_register(
    registry: &mut Registry<JsonFileStore>,
    cmd: RegisterCommand,
) -> anyhow::Result<()> {
    let request = NewAccount::from(cmd);
    let username = request.username.clone();
    let role = request.role();

    registry
        .register(request)
        .with_context(|| format!("registering {role} '{username}'"))?;
    println!("Registration successful! '{username}' can now log in.");
    Ok(())
}

fn handle_login(registry: &Registry<JsonFileStore>, cmd: &LoginCommand) -> anyhow::Result<()> {
    let account = registry.authenticate(&cmd.username, &cmd.password)?;

    if cmd.json {
        let view = account.view(&cmd.username);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Login successful! Welcome, {}.", cmd.username);
    println!();
    match &account.profile {
        Profile::Doctor { .. } => {
            println!("Role:       Doctor");
            println!("Doctor ID:  {}", account.doctor_id);
            println!();
            let roster = registry.patients_of(&cmd.username)?;
            print_roster(&roster, OutputFormat::Plain)?;
        }
        Profile::Patient(profile) => {
            println!("Role:       Patient");
            println!("Doctor ID:  {}", account.doctor_id);
            print_profile(profile);
        }
    }
    Ok(())
}

fn handle_patients(
    registry: &Registry<JsonFileStore>,
    cmd: &PatientsCommand,
) -> anyhow::Result<()> {
    let roster = registry.patients_of(&cmd.doctor)?;
    print_roster(&roster, cmd.format)
}

fn handle_show(registry: &Registry<JsonFileStore>, cmd: &ShowCommand) -> anyhow::Result<()> {
    let account = registry
        .get(&cmd.username)
        .ok_or_else(|| rehabtrack::Error::account_not_found(&cmd.username))?;

    if cmd.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&account.view(&cmd.username))?
        );
        return Ok(());
    }

    println!("Account:    {}", cmd.username);
    print_account(account);
    Ok(())
}

fn handle_status(registry: &Registry<JsonFileStore>, json: bool) -> anyhow::Result<()> {
    let stats = registry.stats();
    let path = registry.store().path();

    if json {
        let status = serde_json::json!({
            "registry_path": path,
            "registry_exists": path.exists(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("rehabctl status");
        println!("---------------");
        println!("Registry:            {}", path.display());
        println!(
            "Exists:              {}",
            if path.exists() { "yes" } else { "no" }
        );
        println!("Accounts:            {}", stats.total_accounts);
        println!("  Doctors:           {}", stats.doctors);
        println!("  Patients:          {}", stats.patients);
        println!("Dangling references: {}", stats.dangling_references);
        println!("Unreadable records:  {}", stats.unreadable_records);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Registry]");
                println!("  Path:               {}", config.registry_path().display());
                println!(
                    "  Unique doctor ids:  {}",
                    config.registry.unique_doctor_ids
                );
                println!();
                println!("[Patients]");
                println!("  Min age:            {}", config.patients.min_age);
                println!("  Max age:            {}", config.patients.max_age);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_account(account: &Account) {
    println!("Role:       {}", account.role());
    println!("Doctor ID:  {}", account.doctor_id);
    match &account.profile {
        Profile::Doctor { patients } => {
            if patients.is_empty() {
                println!("Patients:   (none)");
            } else {
                println!("Patients:   {}", patients.join(", "));
            }
        }
        Profile::Patient(profile) => print_profile(profile),
    }
}

fn print_profile(profile: &PatientProfile) {
    println!("Injury:     {}", profile.injury_type);
    println!("Age:        {}", profile.age);
    println!("Gender:     {}", profile.gender);
    println!("Start date: {}", format_date(profile));
}

fn format_date(profile: &PatientProfile) -> String {
    profile
        .start_date
        .map_or_else(|| "-".to_string(), |date| date.to_string())
}

fn print_roster(roster: &[RosterEntry<'_>], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(roster)?);
        return Ok(());
    }

    if roster.is_empty() {
        println!("No patients are associated with this doctor yet.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => {
            println!(
                "{:<16} {:<18} {:>4} {:<7} {:<10}",
                "PATIENT", "INJURY", "AGE", "GENDER", "START"
            );
            for entry in roster {
                match entry.profile {
                    Some(profile) => println!(
                        "{:<16} {:<18} {:>4} {:<7} {:<10}",
                        entry.username,
                        profile.injury_type.to_string(),
                        profile.age,
                        profile.gender.to_string(),
                        format_date(profile)
                    ),
                    None => println!("{:<16} ({})", entry.username, entry.account.role()),
                }
            }
        }
        OutputFormat::Plain | OutputFormat::Json => {
            for entry in roster {
                println!("### Patient: {}", entry.username);
                match entry.profile {
                    Some(profile) => print_profile(profile),
                    None => println!("Role:       {}", entry.account.role()),
                }
                println!();
            }
        }
    }
    Ok(())
}
