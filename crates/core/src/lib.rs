//! # Pathway Core
//!
//! Core business logic for the cardiac-monitoring eligibility pathway.
//!
//! This crate contains pure decision logic plus the seams it needs:
//! - Eligibility classification against a localized instruction table
//! - Booking pathway screening and the insurer catalogue
//! - Date-of-birth and field validation, and the contact form session
//! - Referral code verification for the doctor portal
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and `cli`.

pub mod age;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod error;
pub mod insurers;
pub mod pathway;
pub mod ports;
pub mod referral;
pub mod selection;
pub mod session;
pub mod validation;

pub use age::{check_date_of_birth, Age, DateOfBirthError};
pub use config::CoreConfig;
pub use eligibility::{classify, CoverageOutcome, Eligibility, EligibilityInput};
pub use error::{
    ConfigError, ConfigResult, FieldError, FieldResult, ReferralError, ReferralResult,
};
pub use pathway::{screen, Contraindications, Pathway, EMERGENCY_PHONE};
pub use ports::{Clock, EmailVerifier, FixedClock, LocaleProvider, ReferralStore, SystemClock};
pub use referral::{
    InMemoryReferralStore, ReferralRecord, ReferralStatus, ReferralVerifier, VerifiedReferral,
};
pub use selection::{
    InsuranceModel, RiskFactor, RiskFactorSelection, SelectionError, Symptom, SymptomSelection,
};
pub use session::{FieldState, FormSession, SessionStatus};
pub use validation::{Consents, FieldId, GpChoice, InsuranceAnswers};

/// Health check service. Reports whether the core can serve requests.
#[derive(Default, Clone)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    pub fn check_health(&self) -> bool {
        true
    }
}
