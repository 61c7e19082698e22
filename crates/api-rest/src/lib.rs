//! # API REST
//!
//! REST API for the eligibility pathway.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! All decisions are delegated to `pathway-core`; handlers only parse, call and map.

#![warn(rust_2018_idioms)]

pub mod dto;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dto::{
    ConsentsDto, ContactReq, ContactRes, ContraindicationsDto, EligibilityReq, EligibilityRes,
    EmergencyNotice, FieldErrorDto, HealthRes, InsurerDto, InsurersRes, ReferralVerifyReq,
    ReferralVerifyRes,
};
use pathway_core::{
    classify, insurers, screen, Clock, ConfigResult, Consents, Contraindications, CoreConfig,
    EligibilityInput, FieldId, FormSession, GpChoice, HealthService, InsuranceModel,
    LocaleProvider, ReferralError, ReferralStore, ReferralVerifier, RiskFactorSelection,
    SymptomSelection, SystemClock, EMERGENCY_PHONE,
};
use pathway_locale::Locale;

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    locales: Arc<dyn LocaleProvider>,
    fallback_locale: Locale,
    referrals: Arc<ReferralVerifier<Arc<dyn ReferralStore>>>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        locales: Arc<dyn LocaleProvider>,
        fallback_locale: Locale,
        referral_store: Arc<dyn ReferralStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            locales,
            fallback_locale,
            referrals: Arc::new(ReferralVerifier::new(referral_store)),
            clock,
        }
    }

    /// Loads locale tables and the referral store named by `cfg`, using the system clock.
    pub fn from_config(cfg: &CoreConfig) -> ConfigResult<Self> {
        let catalogue = cfg.load_catalogue()?;
        let store = cfg.load_referral_store()?;
        Ok(Self::new(
            Arc::new(catalogue),
            cfg.default_locale(),
            Arc::new(store),
            Arc::new(SystemClock),
        ))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, eligibility, validate_contact, verify_referral, list_insurers),
    components(schemas(
        HealthRes,
        EligibilityReq,
        EligibilityRes,
        ContraindicationsDto,
        EmergencyNotice,
        ContactReq,
        ContactRes,
        ConsentsDto,
        FieldErrorDto,
        ReferralVerifyReq,
        ReferralVerifyRes,
        InsurerDto,
        InsurersRes,
    ))
)]
struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/eligibility", post(eligibility))
        .route("/validation/contact", post(validate_contact))
        .route("/referral/verify", post(verify_referral))
        .route("/insurers", get(list_insurers))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: HealthService::new().check_health(),
        message: "Pathway REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/eligibility",
    request_body = EligibilityReq,
    responses(
        (status = 200, description = "Coverage outcome, next steps and booking pathway", body = EligibilityRes),
        (status = 400, description = "Unknown symptom, risk factor or insurance model"),
        (status = 500, description = "Internal server error")
    )
)]
/// Classify a questionnaire and screen the booking pathway.
///
/// Emergency symptoms never change the outcome; they come back as a separate notice carrying
/// the emergency number.
#[axum::debug_handler]
async fn eligibility(
    State(state): State<AppState>,
    Json(req): Json<EligibilityReq>,
) -> Result<Json<EligibilityRes>, (StatusCode, &'static str)> {
    let input = match eligibility_input(&req) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Invalid eligibility request: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Unknown selection identifier"));
        }
    };

    let locale = req
        .locale
        .as_deref()
        .and_then(|tag| tag.parse::<Locale>().ok())
        .unwrap_or(state.fallback_locale);
    let Some(table) = state.locales.table_or(locale, state.fallback_locale) else {
        tracing::error!("No locale table for {}", locale);
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
    };

    let result = classify(&input, table);
    let contraindications = Contraindications {
        pregnant: req.contraindications.pregnant,
        pacemaker: req.contraindications.pacemaker,
        recent_hospitalization: req.contraindications.recent_hospitalization,
    };
    let pathway = screen(req.has_insurance, &contraindications, Some(&result));

    Ok(Json(EligibilityRes {
        outcome: result.outcome.to_string(),
        title: result.title,
        badge: result.badge,
        next_steps: result.next_steps,
        insurance_info: result.insurance_info,
        emergency: result.emergency.map(|symptom| EmergencyNotice {
            symptom: symptom.to_string(),
            phone: EMERGENCY_PHONE.into(),
        }),
        requires_medical_review: result.requires_medical_review,
        pathway: pathway.to_string(),
        locale: locale.to_string(),
    }))
}

fn eligibility_input(req: &EligibilityReq) -> Result<EligibilityInput, pathway_core::SelectionError> {
    Ok(EligibilityInput::new(
        SymptomSelection::parse_all(&req.symptoms)?,
        RiskFactorSelection::parse_all(&req.risk_factors)?,
        parse_optional::<InsuranceModel>(req.insurance_model.as_deref())?.unwrap_or_default(),
    ))
}

#[utoipa::path(
    post,
    path = "/validation/contact",
    request_body = ContactReq,
    responses(
        (status = 200, description = "Field errors and whether the form can be submitted", body = ContactRes),
        (status = 400, description = "Unknown insurance model, GP choice or insurer")
    )
)]
/// Validate the contact form against today's date.
///
/// Absent fields are treated as blank, so every missing required field is reported.
async fn validate_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactReq>,
) -> Result<Json<ContactRes>, (StatusCode, &'static str)> {
    let model = parse_optional::<InsuranceModel>(req.insurance_model.as_deref()).map_err(|e| {
        tracing::error!("Invalid insurance model: {:?}", e);
        (StatusCode::BAD_REQUEST, "Unknown insurance model")
    })?;
    let gp_choice = parse_optional::<GpChoice>(req.gp_choice.as_deref()).map_err(|e| {
        tracing::error!("Invalid GP choice: {:?}", e);
        (StatusCode::BAD_REQUEST, "Unknown GP choice")
    })?;
    if let Some(code) = req.insurer.as_deref().filter(|c| !c.trim().is_empty()) {
        if insurers::find(code).is_none() {
            tracing::error!("Invalid insurer: {:?}", code);
            return Err((StatusCode::BAD_REQUEST, "Unknown insurer"));
        }
    }

    let mut session = FormSession::new(Arc::clone(&state.clock));
    session.set_insurance(req.has_insurance, model, gp_choice);
    for (field, value) in [
        (FieldId::FirstName, req.first_name),
        (FieldId::LastName, req.last_name),
        (FieldId::Email, req.email),
        (FieldId::DateOfBirth, req.date_of_birth),
        (FieldId::GpName, req.gp_name),
        (FieldId::PracticeName, req.practice_name),
        (FieldId::HinEmail, req.hin_email),
    ] {
        session.set_field(field, value.unwrap_or_default());
    }
    if let Some(verified) = req.email_verified {
        session.verification_completed(verified);
    }
    session.set_consents(Consents {
        truthfulness: req.consents.truthfulness,
        emergency: req.consents.emergency,
        data_processing: req.consents.data_processing,
    });

    Ok(Json(ContactRes {
        can_submit: session.can_submit(),
        required: session.required().iter().map(ToString::to_string).collect(),
        errors: session
            .errors()
            .into_iter()
            .map(|(field, e)| FieldErrorDto {
                field: field.to_string(),
                code: e.code().into(),
                message: e.to_string(),
            })
            .collect(),
        missing_consents: session
            .consents()
            .missing()
            .into_iter()
            .map(String::from)
            .collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/referral/verify",
    request_body = ReferralVerifyReq,
    responses(
        (status = 200, description = "Referral is valid", body = ReferralVerifyRes),
        (status = 400, description = "referral-malformed: code is not 6 letters or digits"),
        (status = 404, description = "referral-not-found: unknown, used or expired code"),
        (status = 410, description = "referral-expired: code passed its expiry on this lookup"),
        (status = 500, description = "Referral store unavailable")
    )
)]
/// Verify a referral code typed by a doctor.
///
/// Refusals carry the field error code as their body, the same code the contact form uses.
#[axum::debug_handler]
async fn verify_referral(
    State(state): State<AppState>,
    Json(req): Json<ReferralVerifyReq>,
) -> Result<Json<ReferralVerifyRes>, (StatusCode, &'static str)> {
    match state.referrals.verify(&req.code, state.clock.now()).await {
        Ok(verified) => Ok(Json(ReferralVerifyRes {
            patient_name: verified.patient_name,
            eligibility_pathway: verified.eligibility_pathway.map(|p| p.to_string()),
            expires_at: verified.expires_at.to_rfc3339(),
        })),
        Err(e) => {
            let status = match &e {
                ReferralError::Malformed => StatusCode::BAD_REQUEST,
                ReferralError::NotFound => StatusCode::NOT_FOUND,
                ReferralError::Expired => StatusCode::GONE,
                ReferralError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            match e.as_field_error() {
                Some(field_error) => Err((status, field_error.code())),
                None => {
                    tracing::error!("Verify referral error: {:?}", e);
                    Err((status, "Internal error"))
                }
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/insurers",
    responses(
        (status = 200, description = "Insurers offered in the contact form", body = InsurersRes)
    )
)]
async fn list_insurers() -> Json<InsurersRes> {
    Json(InsurersRes {
        insurers: insurers::INSURERS
            .iter()
            .map(|i| InsurerDto {
                code: i.code.into(),
                label: i.label.into(),
            })
            .collect(),
    })
}

/// Parses an optional identifier; blank counts as absent.
fn parse_optional<T: FromStr>(value: Option<&str>) -> Result<Option<T>, T::Err> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().map(Some),
        None => Ok(None),
    }
}
