//! Account types for rehabtrack.
//!
//! This module defines the records kept in the registry: one [`Account`] per
//! username, carrying credentials, the doctor id, and either a doctor's patient
//! roster or a patient's rehabilitation profile.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// The role an account was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A doctor who owns a roster of patients.
    Doctor,
    /// A patient attached to a doctor.
    Patient,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Doctor => write!(f, "Doctor"),
            Self::Patient => write!(f, "Patient"),
        }
    }
}

/// The shoulder injury a patient is rehabilitating from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryType {
    /// Rotator cuff tear.
    #[serde(rename = "Rotator Cuff Tear", alias = "RotatorCuffTear")]
    RotatorCuffTear,
    /// Frozen shoulder (adhesive capsulitis).
    #[serde(rename = "Frozen Shoulder", alias = "FrozenShoulder")]
    FrozenShoulder,
    /// Shoulder dislocation.
    Dislocation,
}

impl std::fmt::Display for InjuryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RotatorCuffTear => write!(f, "Rotator Cuff Tear"),
            Self::FrozenShoulder => write!(f, "Frozen Shoulder"),
            Self::Dislocation => write!(f, "Dislocation"),
        }
    }
}

/// A patient's gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Rehabilitation details recorded for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    /// The injury being treated.
    #[serde(alias = "injury_type")]
    pub injury_type: InjuryType,

    /// Age in years.
    pub age: u8,

    /// Gender.
    pub gender: Gender,

    /// When rehabilitation started. Always written, as `null` when absent.
    #[serde(default, alias = "start_date")]
    pub start_date: Option<NaiveDate>,
}

/// Role-specific part of an account, tagged by `"role"` in the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Profile {
    /// A doctor and the usernames of their patients, in registration order.
    Doctor {
        /// The doctor's roster.
        #[serde(default)]
        patients: Vec<String>,
    },
    /// A patient and their rehabilitation details.
    Patient(PatientProfile),
}

/// A registered user.
///
/// The username is not part of the record; it is the key the registry stores
/// the record under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stored credential, compared verbatim on login.
    pub password: String,

    /// For a doctor, the id patients register against. For a patient, the id
    /// of the doctor they registered under.
    #[serde(default, alias = "doctor_id")]
    pub doctor_id: String,

    /// Role and role-specific attributes.
    #[serde(flatten)]
    pub profile: Profile,
}

impl Account {
    /// Create a doctor account with an empty roster.
    #[must_use]
    pub fn doctor(password: impl Into<String>, doctor_id: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            doctor_id: doctor_id.into(),
            profile: Profile::Doctor {
                patients: Vec::new(),
            },
        }
    }

    /// Create a patient account.
    #[must_use]
    pub fn patient(
        password: impl Into<String>,
        doctor_id: impl Into<String>,
        profile: PatientProfile,
    ) -> Self {
        Self {
            password: password.into(),
            doctor_id: doctor_id.into(),
            profile: Profile::Patient(profile),
        }
    }

    /// The role this account was registered with.
    #[must_use]
    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Doctor { .. } => Role::Doctor,
            Profile::Patient(_) => Role::Patient,
        }
    }

    /// Check if this is a doctor account.
    #[must_use]
    pub fn is_doctor(&self) -> bool {
        self.role() == Role::Doctor
    }

    /// Check if this is a doctor account registered under `doctor_id`.
    #[must_use]
    pub fn is_doctor_with_id(&self, doctor_id: &str) -> bool {
        self.is_doctor() && self.doctor_id == doctor_id
    }

    /// The doctor's roster. Empty for patients.
    #[must_use]
    pub fn patients(&self) -> &[String] {
        match &self.profile {
            Profile::Doctor { patients } => patients,
            Profile::Patient(_) => &[],
        }
    }

    /// The patient's profile, if this is a patient account.
    #[must_use]
    pub fn patient_profile(&self) -> Option<&PatientProfile> {
        match &self.profile {
            Profile::Patient(profile) => Some(profile),
            Profile::Doctor { .. } => None,
        }
    }

    /// Compare a supplied password against the stored one.
    #[must_use]
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }

    /// Append a patient to this doctor's roster. No-op for patient accounts.
    pub(crate) fn push_patient(&mut self, username: &str) {
        if let Profile::Doctor { patients } = &mut self.profile {
            patients.push(username.to_string());
        }
    }

    /// A serializable view of the account that leaves out the password.
    #[must_use]
    pub fn view<'a>(&'a self, username: &'a str) -> AccountView<'a> {
        AccountView {
            username,
            doctor_id: &self.doctor_id,
            profile: &self.profile,
        }
    }
}

/// An account as shown to users: everything except the password.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView<'a> {
    /// The account's username.
    pub username: &'a str,
    /// The account's doctor id.
    pub doctor_id: &'a str,
    /// Role and role-specific attributes.
    #[serde(flatten)]
    pub profile: &'a Profile,
}

/// Patient details supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    /// The injury being treated.
    pub injury_type: InjuryType,
    /// Age in years.
    pub age: u8,
    /// Gender.
    pub gender: Gender,
    /// Rehabilitation start date. Defaults to the registration date.
    pub start_date: Option<NaiveDate>,
}

impl NewPatient {
    /// Resolve into a stored profile, filling in today's date when no start
    /// date was given.
    #[must_use]
    pub fn into_profile(self) -> PatientProfile {
        PatientProfile {
            injury_type: self.injury_type,
            age: self.age,
            gender: self.gender,
            start_date: Some(self.start_date.unwrap_or_else(|| Local::now().date_naive())),
        }
    }
}

/// Role-specific registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewAccountDetails {
    /// Register a doctor.
    Doctor,
    /// Register a patient under the doctor id on the request.
    Patient(NewPatient),
}

/// A registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Requested username.
    pub username: String,
    /// Requested password.
    pub password: String,
    /// The doctor id to register as (doctors) or under (patients).
    pub doctor_id: String,
    /// Role-specific details.
    pub details: NewAccountDetails,
}

impl NewAccount {
    /// Build a doctor registration request.
    #[must_use]
    pub fn doctor(
        username: impl Into<String>,
        password: impl Into<String>,
        doctor_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            doctor_id: doctor_id.into(),
            details: NewAccountDetails::Doctor,
        }
    }

    /// Build a patient registration request.
    #[must_use]
    pub fn patient(
        username: impl Into<String>,
        password: impl Into<String>,
        doctor_id: impl Into<String>,
        patient: NewPatient,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            doctor_id: doctor_id.into(),
            details: NewAccountDetails::Patient(patient),
        }
    }

    /// The role this request registers.
    #[must_use]
    pub fn role(&self) -> Role {
        match self.details {
            NewAccountDetails::Doctor => Role::Doctor,
            NewAccountDetails::Patient(_) => Role::Patient,
        }
    }
}
