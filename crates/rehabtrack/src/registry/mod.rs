//! The user registry.
//!
//! This module owns every account in the system. A [`Registry`] is loaded
//! once from a [`Store`], answers authentication and roster queries from
//! memory, and writes the whole document back after each registration.
//!
//! Registrations are all-or-nothing: the change is applied to a copy of the
//! accounts, the copy is saved, and only a successful save makes it current.

mod shared;
mod store;

pub use shared::SharedRegistry;
pub use store::{
    from_document, to_document, Accounts, Document, JsonFileStore, MemoryStore, RawRecords, Store,
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::account::{Account, NewAccount, NewAccountDetails, PatientProfile, Role};
use crate::config::Config;
use crate::error::{Error, RegistrationError, Result};

/// Rules applied to registration requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Reject a doctor whose doctor id another doctor already uses.
    pub unique_doctor_ids: bool,
    /// Youngest accepted patient age.
    pub min_age: u8,
    /// Oldest accepted patient age.
    pub max_age: u8,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            unique_doctor_ids: false,
            min_age: 10,
            max_age: 100,
        }
    }
}

impl From<&Config> for RegistrationPolicy {
    fn from(config: &Config) -> Self {
        Self {
            unique_doctor_ids: config.registry.unique_doctor_ids,
            min_age: config.patients.min_age,
            max_age: config.patients.max_age,
        }
    }
}

/// A patient on a doctor's roster, resolved against the registry.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry<'a> {
    /// The patient's username.
    pub username: &'a str,
    /// The patient's account.
    #[serde(skip)]
    pub account: &'a Account,
    /// The patient's rehabilitation details.
    #[serde(flatten)]
    pub profile: Option<&'a PatientProfile>,
}

/// Summary counts over the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Number of accounts.
    pub total_accounts: usize,
    /// Number of doctor accounts.
    pub doctors: usize,
    /// Number of patient accounts.
    pub patients: usize,
    /// Roster entries that do not name an existing account.
    pub dangling_references: usize,
    /// Stored records that could not be read as accounts.
    pub unreadable_records: usize,
}

/// In-memory registry of accounts backed by a [`Store`].
#[derive(Debug)]
pub struct Registry<S: Store> {
    store: S,
    document: Document,
    policy: RegistrationPolicy,
}

impl<S: Store> Registry<S> {
    /// Load the registry from `store`.
    ///
    /// Never fails: a missing or malformed document gives an empty registry.
    /// Records that are not valid accounts are held back and saved unchanged.
    pub fn load(store: S) -> Self {
        let document = store.load();
        info!(
            "Registry loaded from {} with {} accounts",
            store.location(),
            document.accounts.len()
        );
        if !document.unreadable.is_empty() {
            warn!(
                "{} unreadable records in {} will be preserved but ignored",
                document.unreadable.len(),
                store.location()
            );
        }
        Self {
            store,
            document,
            policy: RegistrationPolicy::default(),
        }
    }

    /// Replace the registration policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The registration policy in effect.
    #[must_use]
    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the full registry to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.document)
    }

    /// Re-read the registry from the store, discarding in-memory state.
    pub fn reload(&mut self) {
        self.document = self.store.load();
        debug!(
            "Registry reloaded with {} accounts",
            self.document.accounts.len()
        );
    }

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] if the username is unknown or
    /// the password does not match. The two cases are not distinguished.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&Account> {
        match self.document.accounts.get(username) {
            Some(account) if account.password_matches(password) => {
                debug!("Authenticated {}", username);
                Ok(account)
            }
            _ => {
                debug!("Authentication failed for {}", username);
                Err(Error::AuthenticationFailed)
            }
        }
    }

    /// Register a new account and persist the registry.
    ///
    /// A patient is added to the roster of every doctor registered under the
    /// requested doctor id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registration`] if the request is rejected, or a storage
    /// error if the registry cannot be saved. In both cases the registry is
    /// left unchanged.
    pub fn register(&mut self, request: NewAccount) -> Result<&Account> {
        self.validate(&request)?;

        let NewAccount {
            username,
            password,
            doctor_id,
            details,
        } = request;

        let mut next = self.document.clone();
        match details {
            NewAccountDetails::Doctor => {
                next.accounts.insert(username.clone(), Account::doctor(password, doctor_id));
            }
            NewAccountDetails::Patient(patient) => {
                let mut attached = 0_usize;
                for doctor in next
                    .accounts
                    .values_mut()
                    .filter(|a| a.is_doctor_with_id(&doctor_id))
                {
                    doctor.push_patient(&username);
                    attached += 1;
                }
                if attached > 1 {
                    info!(
                        "Doctor id {} is shared by {} doctors; {} added to each roster",
                        doctor_id, attached, username
                    );
                }
                next.accounts.insert(
                    username.clone(),
                    Account::patient(password, doctor_id, patient.into_profile()),
                );
            }
        }

        self.store.save(&next)?;
        self.document = next;
        info!("Registered {}", username);

        self.document.accounts
            .get(&username)
            .ok_or_else(|| Error::account_not_found(username))
    }

    fn validate(&self, request: &NewAccount) -> std::result::Result<(), RegistrationError> {
        if request.username.is_empty() {
            return Err(RegistrationError::EmptyUsername);
        }
        if request.password.is_empty() {
            return Err(RegistrationError::EmptyPassword);
        }
        // Unreadable records still own their usernames.
        if self.document.contains(&request.username) {
            return Err(RegistrationError::UsernameTaken(request.username.clone()));
        }

        match &request.details {
            NewAccountDetails::Doctor => {
                if self.policy.unique_doctor_ids
                    && self.doctors_with_id(&request.doctor_id).next().is_some()
                {
                    return Err(RegistrationError::DoctorIdTaken(request.doctor_id.clone()));
                }
            }
            NewAccountDetails::Patient(patient) => {
                if !(self.policy.min_age..=self.policy.max_age).contains(&patient.age) {
                    return Err(RegistrationError::AgeOutOfRange {
                        age: patient.age,
                        min: self.policy.min_age,
                        max: self.policy.max_age,
                    });
                }
                if self.doctors_with_id(&request.doctor_id).next().is_none() {
                    return Err(RegistrationError::UnknownDoctorId(
                        request.doctor_id.clone(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Resolve a doctor's roster, in registration order.
    ///
    /// Roster entries that no longer name an account are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] if there is no such account and
    /// [`Error::NotADoctor`] if the account is a patient.
    pub fn patients_of(&self, doctor_username: &str) -> Result<Vec<RosterEntry<'_>>> {
        let doctor = self
            .document
            .accounts
            .get(doctor_username)
            .ok_or_else(|| Error::account_not_found(doctor_username))?;
        if !doctor.is_doctor() {
            return Err(Error::not_a_doctor(doctor_username));
        }

        let entries = doctor
            .patients()
            .iter()
            .filter_map(|name| match self.document.accounts.get_key_value(name.as_str()) {
                Some((username, account)) => Some(RosterEntry {
                    username: username.as_str(),
                    account,
                    profile: account.patient_profile(),
                }),
                None => {
                    debug!("Skipping unknown roster entry {} for {}", name, doctor_username);
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    /// Doctors registered under `doctor_id`, with their usernames.
    pub fn doctors_with_id<'a>(
        &'a self,
        doctor_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Account)> + 'a {
        self.document.accounts
            .iter()
            .filter(move |(_, account)| account.is_doctor_with_id(doctor_id))
            .map(|(username, account)| (username.as_str(), account))
    }

    /// Look up an account by username.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<&Account> {
        self.document.accounts.get(username)
    }

    /// Check if a username is registered.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.document.accounts.contains_key(username)
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document.accounts.len()
    }

    /// Check if the registry has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.accounts.is_empty()
    }

    /// Iterate over all accounts in username order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Account)> {
        self.document.accounts
            .iter()
            .map(|(username, account)| (username.as_str(), account))
    }

    /// Borrow all accounts.
    #[must_use]
    pub fn accounts(&self) -> &Accounts {
        &self.document.accounts
    }

    /// Records in the store that could not be read as accounts.
    #[must_use]
    pub fn unreadable(&self) -> &RawRecords {
        &self.document.unreadable
    }

    /// Compute summary counts.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total_accounts: self.document.accounts.len(),
            unreadable_records: self.document.unreadable.len(),
            ..RegistryStats::default()
        };
        for account in self.document.accounts.values() {
            match account.role() {
                Role::Doctor => {
                    stats.doctors += 1;
                    stats.dangling_references += account
                        .patients()
                        .iter()
                        .filter(|name| !self.document.accounts.contains_key(name.as_str()))
                        .count();
                }
                Role::Patient => stats.patients += 1,
            }
        }
        stats
    }
}
