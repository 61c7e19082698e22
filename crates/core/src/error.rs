use crate::age::DateOfBirthError;
use crate::ports::PortError;

/// Field-level validation failures.
///
/// Every variant is something the user can fix; none of them end the form session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0}")]
    InvalidDate(#[from] DateOfBirthError),
    #[error("this field is required")]
    MissingRequiredField,
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("please choose an insurance model from the list")]
    UnknownInsuranceModel,
    #[error("referral code not found")]
    ReferralNotFound,
    #[error("code has expired")]
    ReferralExpired,
    #[error("referral code must be 6 letters or digits")]
    ReferralMalformed,
    #[error("verification failed")]
    VerificationFailed,
}

impl FieldError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::InvalidDate(_) => "invalid-date",
            FieldError::MissingRequiredField => "missing-required-field",
            FieldError::InvalidEmail => "invalid-email",
            FieldError::UnknownInsuranceModel => "unknown-insurance-model",
            FieldError::ReferralNotFound => "referral-not-found",
            FieldError::ReferralExpired => "referral-expired",
            FieldError::ReferralMalformed => "referral-malformed",
            FieldError::VerificationFailed => "verification-failed",
        }
    }
}

pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Referral verification failures.
///
/// `NotFound` and `Expired` are kept apart so the doctor sees why a code was refused.
#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    #[error("referral code must be 6 letters or digits")]
    Malformed,
    #[error("referral code not found")]
    NotFound,
    #[error("referral code has expired")]
    Expired,
    #[error("referral store error: {0}")]
    Store(#[from] PortError),
}

impl ReferralError {
    /// The field error shown next to the code input, if this is a user-facing failure.
    pub fn as_field_error(&self) -> Option<FieldError> {
        match self {
            ReferralError::Malformed => Some(FieldError::ReferralMalformed),
            ReferralError::NotFound => Some(FieldError::ReferralNotFound),
            ReferralError::Expired => Some(FieldError::ReferralExpired),
            ReferralError::Store(_) => None,
        }
    }
}

pub type ReferralResult<T> = std::result::Result<T, ReferralError>;

/// Startup configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("locale error: {0}")]
    Locale(#[from] pathway_locale::LocaleError),
    #[error("failed to read {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
