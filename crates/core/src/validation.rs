//! Input validation for the intake form.
//!
//! Each validator is a pure function of the field value (and `today` for the date of birth).
//! [`required_fields`] decides which fields gate submission for the current insurance answers.

use crate::age::{check_date_of_birth, DateOfBirthError};
use crate::error::{FieldError, FieldResult};
use crate::selection::{InsuranceModel, SelectionError};
use chrono::NaiveDate;
use pathway_types::{EmailAddress, NonEmptyText, ReferralCode, TextError};
use serde::{Deserialize, Serialize};

/// Fields the form can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldId {
    FirstName,
    LastName,
    Email,
    DateOfBirth,
    InsuranceModel,
    GpName,
    PracticeName,
    HinEmail,
}

impl FieldId {
    pub const ALL: [FieldId; 8] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Email,
        FieldId::DateOfBirth,
        FieldId::InsuranceModel,
        FieldId::GpName,
        FieldId::PracticeName,
        FieldId::HinEmail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::FirstName => "first-name",
            FieldId::LastName => "last-name",
            FieldId::Email => "email",
            FieldId::DateOfBirth => "date-of-birth",
            FieldId::InsuranceModel => "insurance-model",
            FieldId::GpName => "gp-name",
            FieldId::PracticeName => "practice-name",
            FieldId::HinEmail => "hin-email",
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the patient sees their own GP or a partner practice (standard model only).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpChoice {
    Own,
    Partner,
}

impl std::str::FromStr for GpChoice {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "own" => Ok(GpChoice::Own),
            "partner" => Ok(GpChoice::Partner),
            _ => Err(SelectionError::Unknown {
                kind: "gp choice",
                value: s.to_string(),
            }),
        }
    }
}

/// The insurance answers that decide which extra fields are required.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceAnswers {
    pub has_insurance: bool,
    pub model: Option<InsuranceModel>,
    pub gp_choice: Option<GpChoice>,
}

impl InsuranceAnswers {
    /// GP gatekeeper models need the referring practice on file.
    pub fn requires_gp_details(&self) -> bool {
        if !self.has_insurance {
            return false;
        }
        match self.model {
            Some(InsuranceModel::GpModel) | Some(InsuranceModel::Hmo) => true,
            Some(InsuranceModel::Standard) => self.gp_choice == Some(GpChoice::Own),
            _ => false,
        }
    }
}

/// The three declarations a patient confirms before submitting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Consents {
    /// The answers are truthful and complete.
    pub truthfulness: bool,
    /// The patient understands this is not an emergency service.
    pub emergency: bool,
    pub data_processing: bool,
}

impl Consents {
    pub const NAMES: [&'static str; 3] = ["truthfulness", "emergency", "data-processing"];

    pub fn all() -> Self {
        Self {
            truthfulness: true,
            emergency: true,
            data_processing: true,
        }
    }

    pub fn all_given(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of the consents not yet given, in display order.
    pub fn missing(&self) -> Vec<&'static str> {
        [self.truthfulness, self.emergency, self.data_processing]
            .into_iter()
            .zip(Self::NAMES)
            .filter_map(|(given, name)| (!given).then_some(name))
            .collect()
    }
}

const CONTACT_FIELDS: [FieldId; 4] = [
    FieldId::FirstName,
    FieldId::LastName,
    FieldId::Email,
    FieldId::DateOfBirth,
];

const GP_FIELDS: [FieldId; 3] = [FieldId::GpName, FieldId::PracticeName, FieldId::HinEmail];

/// Fields that must be non-empty and valid before the form can be submitted.
pub fn required_fields(insurance: &InsuranceAnswers) -> Vec<FieldId> {
    let mut fields = CONTACT_FIELDS.to_vec();
    if insurance.has_insurance {
        fields.push(FieldId::InsuranceModel);
    }
    if insurance.requires_gp_details() {
        fields.extend(GP_FIELDS);
    }
    fields
}

/// Checks that a value is present.
pub fn validate_required(value: &str) -> FieldResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| FieldError::MissingRequiredField)
}

/// Checks presence and the basic `local@domain.tld` shape.
pub fn validate_email(value: &str) -> FieldResult<EmailAddress> {
    EmailAddress::parse(value).map_err(|e| match e {
        TextError::Empty => FieldError::MissingRequiredField,
        _ => FieldError::InvalidEmail,
    })
}

/// Checks the date of birth against the age bounds as of `today`.
pub fn validate_date_of_birth(value: &str, today: NaiveDate) -> FieldResult<u32> {
    match check_date_of_birth(value, today) {
        Ok(age) => Ok(age.years.unsigned_abs()),
        Err(DateOfBirthError::Empty) => Err(FieldError::MissingRequiredField),
        Err(e) => Err(FieldError::InvalidDate(e)),
    }
}

/// Checks that the insurance model is one of the known identifiers.
pub fn validate_insurance_model(value: &str) -> FieldResult<InsuranceModel> {
    if value.trim().is_empty() {
        return Err(FieldError::MissingRequiredField);
    }
    value
        .parse::<InsuranceModel>()
        .map_err(|_| FieldError::UnknownInsuranceModel)
}

/// Normalises a referral code and checks its shape. No store lookup happens here.
pub fn validate_referral_code_shape(value: &str) -> FieldResult<ReferralCode> {
    ReferralCode::parse(value).map_err(|_| FieldError::ReferralMalformed)
}

/// Runs the validator that belongs to `field`.
pub fn validate_field(field: FieldId, value: &str, today: NaiveDate) -> FieldResult<()> {
    match field {
        FieldId::FirstName | FieldId::LastName | FieldId::GpName | FieldId::PracticeName => {
            validate_required(value).map(drop)
        }
        FieldId::Email | FieldId::HinEmail => validate_email(value).map(drop),
        FieldId::DateOfBirth => validate_date_of_birth(value, today).map(drop),
        FieldId::InsuranceModel => validate_insurance_model(value).map(drop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn contact_fields_are_always_required() {
        let fields = required_fields(&InsuranceAnswers::default());
        assert_eq!(fields, CONTACT_FIELDS.to_vec());
    }

    #[test]
    fn gatekeeper_models_require_gp_details() {
        for model in [InsuranceModel::GpModel, InsuranceModel::Hmo] {
            let answers = InsuranceAnswers {
                has_insurance: true,
                model: Some(model),
                gp_choice: None,
            };
            let fields = required_fields(&answers);
            assert!(fields.contains(&FieldId::InsuranceModel));
            assert!(fields.contains(&FieldId::HinEmail), "{model} needs HIN email");
        }
    }

    #[test]
    fn standard_needs_gp_details_only_with_own_gp() {
        let mut answers = InsuranceAnswers {
            has_insurance: true,
            model: Some(InsuranceModel::Standard),
            gp_choice: Some(GpChoice::Partner),
        };
        assert!(!required_fields(&answers).contains(&FieldId::GpName));

        answers.gp_choice = Some(GpChoice::Own);
        assert!(required_fields(&answers).contains(&FieldId::GpName));
    }

    #[test]
    fn gp_choice_parses_case_insensitively() {
        assert_eq!(" Own ".parse::<GpChoice>(), Ok(GpChoice::Own));
        assert!("mine".parse::<GpChoice>().is_err());
    }

    #[test]
    fn telmed_and_uninsured_add_no_gp_fields() {
        let telmed = InsuranceAnswers {
            has_insurance: true,
            model: Some(InsuranceModel::Telmed),
            gp_choice: Some(GpChoice::Own),
        };
        assert!(!required_fields(&telmed).contains(&FieldId::GpName));

        let uninsured = InsuranceAnswers {
            has_insurance: false,
            model: Some(InsuranceModel::Hmo),
            gp_choice: None,
        };
        assert_eq!(required_fields(&uninsured), CONTACT_FIELDS.to_vec());
    }

    #[test]
    fn email_errors_distinguish_missing_from_malformed() {
        assert_eq!(validate_email(""), Err(FieldError::MissingRequiredField));
        assert_eq!(validate_email("anna@"), Err(FieldError::InvalidEmail));
        assert!(validate_email("anna@example.ch").is_ok());
    }

    #[test]
    fn date_of_birth_maps_to_field_errors() {
        assert_eq!(
            validate_date_of_birth("", today()),
            Err(FieldError::MissingRequiredField)
        );
        let err = validate_date_of_birth("not-a-date", today()).unwrap_err();
        assert_eq!(err.code(), "invalid-date");
        assert_eq!(err.to_string(), "please enter a valid date");
        assert_eq!(validate_date_of_birth("1990-10-18", today()), Ok(36));
    }

    #[test]
    fn referral_shape_is_checked_locally() {
        assert_eq!(
            validate_referral_code_shape("AB12C"),
            Err(FieldError::ReferralMalformed)
        );
        assert_eq!(
            validate_referral_code_shape("ab12cd").unwrap().as_str(),
            "AB12CD"
        );
    }

    #[test]
    fn insurance_model_must_be_known() {
        assert_eq!(
            validate_insurance_model("telmed"),
            Ok(InsuranceModel::Telmed)
        );
        assert_eq!(
            validate_insurance_model(" "),
            Err(FieldError::MissingRequiredField)
        );
    }

    #[test]
    fn unlisted_insurance_model_is_not_reported_missing() {
        let err = validate_insurance_model("flex").unwrap_err();
        assert_eq!(err, FieldError::UnknownInsuranceModel);
        assert_eq!(err.code(), "unknown-insurance-model");
    }

    #[test]
    fn consents_report_what_is_missing() {
        assert!(Consents::all().all_given());
        assert_eq!(Consents::default().missing(), Consents::NAMES.to_vec());

        let consents = Consents {
            emergency: false,
            ..Consents::all()
        };
        assert!(!consents.all_given());
        assert_eq!(consents.missing(), vec!["emergency"]);
    }
}
