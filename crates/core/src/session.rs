//! Contact form session.
//!
//! [`FormSession`] holds the values a patient has typed and re-evaluates every field on each
//! event. The date of birth depends on today's date, so the clock is read once per evaluation
//! and never cached between events. A session left open across midnight picks up the new date
//! on its next event or on [`FormSession::refresh`].
//!
//! Field errors are values, not failures. No event can end the session.

use crate::error::FieldError;
use crate::ports::{Clock, EmailVerifier, PortError};
use crate::selection::InsuranceModel;
use crate::validation::{
    required_fields, validate_field, Consents, FieldId, GpChoice, InsuranceAnswers,
};
use pathway_types::EmailAddress;
use std::collections::BTreeMap;

/// Where a single field stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldState {
    /// Never touched.
    Empty,
    /// Holds a value that is not currently required, so it is not judged.
    Editing,
    Valid,
    Invalid(FieldError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Editing,
    ReadyToSubmit,
}

pub struct FormSession<C> {
    clock: C,
    values: BTreeMap<FieldId, String>,
    insurance: InsuranceAnswers,
    email_verified: Option<bool>,
    consents: Consents,
    states: BTreeMap<FieldId, FieldState>,
    required: Vec<FieldId>,
}

impl<C: Clock> FormSession<C> {
    pub fn new(clock: C) -> Self {
        let mut session = Self {
            clock,
            values: BTreeMap::new(),
            insurance: InsuranceAnswers::default(),
            email_verified: None,
            consents: Consents::default(),
            states: BTreeMap::new(),
            required: Vec::new(),
        };
        session.evaluate();
        session
    }

    /// Records a typed value. Setting the insurance model this way also updates the answers.
    ///
    /// An unlisted model leaves the answers without a model, but the typed text is kept so the
    /// field reports [`FieldError::UnknownInsuranceModel`] rather than a missing value.
    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        let value = value.into();
        if field == FieldId::Email && self.values.get(&field) != Some(&value) {
            self.email_verified = None;
        }
        if field == FieldId::InsuranceModel {
            self.insurance.model = value.parse::<InsuranceModel>().ok();
        }
        self.states.insert(field, FieldState::Editing);
        self.values.insert(field, value);
        self.evaluate();
    }

    pub fn set_insurance(
        &mut self,
        has_insurance: bool,
        model: Option<InsuranceModel>,
        gp_choice: Option<GpChoice>,
    ) {
        self.insurance = InsuranceAnswers {
            has_insurance,
            model,
            gp_choice,
        };
        let model_text = model.map(|m| m.as_str().to_owned()).unwrap_or_default();
        self.values.insert(FieldId::InsuranceModel, model_text);
        self.evaluate();
    }

    pub fn set_consents(&mut self, consents: Consents) {
        self.consents = consents;
        self.evaluate();
    }

    /// Stores the outcome of the one-time-code check for the current email address.
    pub fn verification_completed(&mut self, verified: bool) {
        self.email_verified = Some(verified);
        self.evaluate();
    }

    /// Checks a one-time code for the current email address and records the outcome.
    ///
    /// A malformed address is not sent to the verifier and counts as a failed verification.
    ///
    /// # Errors
    ///
    /// Returns the [`PortError`] when the verifier cannot be reached. The session keeps its
    /// previous verification state in that case.
    pub async fn verify_email<V>(&mut self, verifier: &V, code: &str) -> Result<bool, PortError>
    where
        V: EmailVerifier + ?Sized,
    {
        let email = self.values.get(&FieldId::Email).map(EmailAddress::parse);
        let verified = match email {
            Some(Ok(address)) => verifier.verify(&address, code).await?,
            _ => false,
        };
        self.verification_completed(verified);
        Ok(verified)
    }

    /// Re-evaluates with a fresh reading of the clock.
    pub fn refresh(&mut self) {
        self.evaluate();
    }

    pub fn value(&self, field: FieldId) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn insurance(&self) -> &InsuranceAnswers {
        &self.insurance
    }

    pub fn state(&self, field: FieldId) -> &FieldState {
        self.states.get(&field).unwrap_or(&FieldState::Empty)
    }

    pub fn required(&self) -> &[FieldId] {
        &self.required
    }

    pub fn consents(&self) -> &Consents {
        &self.consents
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified == Some(true)
    }

    /// Current field errors. A failed email verification is reported on the email field.
    pub fn errors(&self) -> BTreeMap<FieldId, FieldError> {
        self.states
            .iter()
            .filter_map(|(field, state)| match state {
                FieldState::Invalid(e) => Some((*field, e.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn status(&self) -> SessionStatus {
        let all_valid = self
            .required
            .iter()
            .all(|field| self.state(*field) == &FieldState::Valid);
        if all_valid && self.is_verified() && self.consents.all_given() {
            SessionStatus::ReadyToSubmit
        } else {
            SessionStatus::Editing
        }
    }

    pub fn can_submit(&self) -> bool {
        self.status() == SessionStatus::ReadyToSubmit
    }

    fn evaluate(&mut self) {
        let today = self.clock.today();
        self.required = required_fields(&self.insurance);

        for field in FieldId::ALL {
            let Some(value) = self.values.get(&field) else {
                self.states.insert(field, FieldState::Empty);
                continue;
            };
            let state = if !self.required.contains(&field) {
                FieldState::Editing
            } else {
                match validate_field(field, value, today) {
                    Ok(()) if field == FieldId::Email && self.email_verified == Some(false) => {
                        FieldState::Invalid(FieldError::VerificationFailed)
                    }
                    Ok(()) => FieldState::Valid,
                    Err(e) => FieldState::Invalid(e),
                }
            };
            self.states.insert(field, state);
        }

        tracing::debug!(
            %today,
            required = self.required.len(),
            errors = self.errors().len(),
            verified = self.is_verified(),
            consents = self.consents.all_given(),
            "evaluated contact form"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, StaticEmailVerifier};
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use std::sync::{Arc, Mutex};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// A clock the test can move forward while the session holds it.
    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

    impl ManualClock {
        fn on(day: NaiveDate) -> Self {
            Self(Arc::new(Mutex::new(FixedClock::on(day).0)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn filled<C: Clock>(clock: C) -> FormSession<C> {
        let mut session = FormSession::new(clock);
        session.set_field(FieldId::FirstName, "Anna");
        session.set_field(FieldId::LastName, "Muster");
        session.set_field(FieldId::Email, "anna@example.ch");
        session.set_field(FieldId::DateOfBirth, "1990-05-04");
        session.set_consents(Consents::all());
        session
    }

    #[test]
    fn new_session_is_empty_and_not_submittable() {
        let session = FormSession::new(FixedClock::on(date(2026, 10, 18)));
        assert_eq!(session.state(FieldId::Email), &FieldState::Empty);
        assert!(session.errors().is_empty());
        assert_eq!(session.status(), SessionStatus::Editing);
    }

    #[test]
    fn valid_fields_still_need_verification() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        assert!(session.errors().is_empty());
        assert!(!session.can_submit());

        session.verification_completed(true);
        assert!(session.can_submit());
    }

    #[test]
    fn each_consent_is_needed_to_submit() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.verification_completed(true);
        assert!(session.can_submit());

        session.set_consents(Consents {
            data_processing: false,
            ..Consents::all()
        });
        assert!(session.errors().is_empty());
        assert_eq!(session.status(), SessionStatus::Editing);

        session.set_consents(Consents {
            truthfulness: false,
            ..Consents::all()
        });
        assert!(!session.can_submit());

        session.set_consents(Consents::all());
        assert!(session.can_submit());
    }

    #[test]
    fn failed_verification_is_an_email_error() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.verification_completed(false);
        assert_eq!(
            session.errors().get(&FieldId::Email),
            Some(&FieldError::VerificationFailed)
        );
        assert!(!session.can_submit());
    }

    #[tokio::test]
    async fn verify_email_goes_through_the_port() {
        let verifier = StaticEmailVerifier::new("424242");
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));

        assert!(!session.verify_email(&verifier, "000000").await.unwrap());
        assert!(session.errors().contains_key(&FieldId::Email));

        assert!(session.verify_email(&verifier, "424242").await.unwrap());
        assert!(session.can_submit());
    }

    #[test]
    fn changing_the_email_drops_verification() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.verification_completed(true);
        session.set_field(FieldId::Email, "anna.muster@example.ch");
        assert!(!session.is_verified());
        assert!(!session.can_submit());
    }

    #[test]
    fn clearing_a_required_field_reports_it_missing() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.set_field(FieldId::LastName, "  ");
        assert_eq!(
            session.errors().get(&FieldId::LastName),
            Some(&FieldError::MissingRequiredField)
        );
    }

    #[test]
    fn malformed_date_of_birth_blocks_submission() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.verification_completed(true);
        session.set_field(FieldId::DateOfBirth, "2023-02-30");

        let err = session.errors().remove(&FieldId::DateOfBirth).expect("date error");
        assert_eq!(err.to_string(), "please enter a valid date");
        assert!(!session.can_submit());
    }

    #[test]
    fn gp_model_requires_practice_details() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.verification_completed(true);
        assert!(session.can_submit());

        session.set_insurance(true, Some(InsuranceModel::GpModel), None);
        assert!(session.required().contains(&FieldId::HinEmail));
        assert!(!session.can_submit());

        session.set_field(FieldId::GpName, "Dr. Keller");
        session.set_field(FieldId::PracticeName, "Praxis am See");
        session.set_field(FieldId::HinEmail, "keller@hin");
        assert_eq!(
            session.errors().get(&FieldId::HinEmail),
            Some(&FieldError::InvalidEmail)
        );

        session.set_field(FieldId::HinEmail, "keller@praxis.hin.ch");
        assert!(session.can_submit());
    }

    #[test]
    fn gp_fields_are_not_judged_once_no_longer_required() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.set_insurance(true, Some(InsuranceModel::Hmo), None);
        session.set_field(FieldId::HinEmail, "broken");
        assert!(session.errors().contains_key(&FieldId::HinEmail));

        session.set_insurance(true, Some(InsuranceModel::Telmed), None);
        assert_eq!(session.state(FieldId::HinEmail), &FieldState::Editing);
        assert!(!session.errors().contains_key(&FieldId::HinEmail));
    }

    #[test]
    fn insured_without_a_model_is_missing_the_model() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.set_insurance(true, None, None);
        assert_eq!(
            session.errors().get(&FieldId::InsuranceModel),
            Some(&FieldError::MissingRequiredField)
        );
    }

    #[test]
    fn typed_unknown_model_is_reported_as_unknown() {
        let mut session = filled(FixedClock::on(date(2026, 10, 18)));
        session.verification_completed(true);
        session.set_insurance(true, Some(InsuranceModel::Telmed), None);
        assert!(session.can_submit());

        session.set_field(FieldId::InsuranceModel, "flex");
        assert_eq!(session.insurance().model, None);
        assert_eq!(session.value(FieldId::InsuranceModel), Some("flex"));
        assert_eq!(
            session.errors().get(&FieldId::InsuranceModel),
            Some(&FieldError::UnknownInsuranceModel)
        );
        assert!(!session.can_submit());
    }

    #[test]
    fn refresh_after_midnight_picks_up_the_birthday() {
        let clock = ManualClock::on(date(2026, 10, 17));
        let mut session = FormSession::new(clock.clone());
        session.set_field(FieldId::DateOfBirth, "2008-10-18");
        assert!(matches!(
            session.state(FieldId::DateOfBirth),
            FieldState::Invalid(FieldError::InvalidDate(_))
        ));

        clock.advance(Duration::days(1));
        session.refresh();
        assert_eq!(session.state(FieldId::DateOfBirth), &FieldState::Valid);
    }
}
