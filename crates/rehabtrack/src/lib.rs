//! `rehabtrack` - Account registry for a shoulder-rehabilitation tracker
//!
//! This library keeps the doctor and patient accounts of the tracker: it
//! registers accounts, attaches patients to their doctor's roster, checks
//! logins, and persists everything as a single JSON document.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod account;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use account::{Account, Gender, InjuryType, NewAccount, NewPatient, PatientProfile, Role};
pub use config::Config;
pub use error::{Error, RegistrationError, Result};
pub use logging::init_logging;
pub use registry::{
    Document, JsonFileStore, MemoryStore, Registry, RegistrationPolicy, RegistryStats,
    SharedRegistry, Store,
};
