//! JSON request and response bodies.
//!
//! Identifiers arrive as plain strings and are parsed into the core's closed enums inside the
//! handlers, so an unknown value becomes a 400 rather than a deserialisation error.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContraindicationsDto {
    #[serde(default)]
    pub pregnant: bool,
    #[serde(default)]
    pub pacemaker: bool,
    #[serde(default)]
    pub recent_hospitalization: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EligibilityReq {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// `standard`, `gp-model`, `hmo`, `telmed` or `unsure`. Missing means `unsure`.
    #[serde(default)]
    pub insurance_model: Option<String>,
    #[serde(default = "default_true")]
    pub has_insurance: bool,
    #[serde(default)]
    pub contraindications: ContraindicationsDto,
    /// Language tag such as `de` or `fr-CH`.
    #[serde(default)]
    pub locale: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmergencyNotice {
    pub symptom: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EligibilityRes {
    pub outcome: String,
    pub title: String,
    pub badge: String,
    pub next_steps: Vec<String>,
    pub insurance_info: Option<String>,
    pub emergency: Option<EmergencyNotice>,
    pub requires_medical_review: bool,
    pub pathway: String,
    pub locale: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// ISO `YYYY-MM-DD`.
    pub date_of_birth: Option<String>,
    pub has_insurance: bool,
    pub insurance_model: Option<String>,
    /// `own` or `partner`; only meaningful for the standard model.
    pub gp_choice: Option<String>,
    pub gp_name: Option<String>,
    pub practice_name: Option<String>,
    pub hin_email: Option<String>,
    /// Insurer code from `GET /insurers`, when the patient picked one.
    pub insurer: Option<String>,
    /// Outcome of the one-time-code check, when it has run.
    pub email_verified: Option<bool>,
    pub consents: ConsentsDto,
}

/// Declarations confirmed before submission. All three are needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ConsentsDto {
    pub truthfulness: bool,
    pub emergency: bool,
    pub data_processing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDto {
    pub field: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactRes {
    pub can_submit: bool,
    pub required: Vec<String>,
    pub errors: Vec<FieldErrorDto>,
    /// `truthfulness`, `emergency` or `data-processing`.
    pub missing_consents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferralVerifyReq {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferralVerifyRes {
    pub patient_name: String,
    pub eligibility_pathway: Option<String>,
    /// RFC 3339 timestamp.
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsurerDto {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsurersRes {
    pub insurers: Vec<InsurerDto>,
}
