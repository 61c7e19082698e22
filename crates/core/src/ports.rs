//! Seams to the outside world.
//!
//! The core never talks to the managed backend directly. Hosts plug in adapters for:
//! - the clock (so "today" is injectable and re-read on every evaluation)
//! - one-time-code email verification
//! - the referral-code store
//! - localized copy

use crate::referral::ReferralRecord;
use chrono::{DateTime, NaiveDate, Utc};
use pathway_locale::{Catalogue, Locale, LocaleTable};
use pathway_types::{EmailAddress, ReferralCode};
use uuid::Uuid;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for age checks.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reads the system clock on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for tests and replays.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to noon UTC on the given day.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Failure talking to an external collaborator.
#[derive(Debug, thiserror::Error)]
#[error("{service} unavailable: {message}")]
pub struct PortError {
    pub service: &'static str,
    pub message: String,
}

impl PortError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// One-time-code email verification, owned by the identity provider.
///
/// The core only consumes the boolean outcome.
#[async_trait::async_trait]
pub trait EmailVerifier: Send + Sync {
    async fn verify(&self, email: &EmailAddress, code: &str) -> Result<bool, PortError>;
}

/// Accepts a single fixed code for every address. Development and tests only.
#[derive(Clone, Debug)]
pub struct StaticEmailVerifier {
    code: String,
}

impl StaticEmailVerifier {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[async_trait::async_trait]
impl EmailVerifier for StaticEmailVerifier {
    async fn verify(&self, email: &EmailAddress, code: &str) -> Result<bool, PortError> {
        let ok = code.trim() == self.code;
        tracing::debug!("static verification for {email}: {ok}");
        Ok(ok)
    }
}

/// Read access to referral codes plus the single expiry write.
#[async_trait::async_trait]
pub trait ReferralStore: Send + Sync {
    async fn find_by_code(&self, code: &ReferralCode) -> Result<Option<ReferralRecord>, PortError>;

    /// Sets the record's status to expired. Must be idempotent.
    async fn mark_expired(&self, id: Uuid) -> Result<(), PortError>;
}

/// Per-locale instruction tables.
pub trait LocaleProvider: Send + Sync {
    fn table(&self, locale: Locale) -> Option<&LocaleTable>;

    /// The table for `locale`, or for `fallback` when `locale` has none.
    fn table_or(&self, locale: Locale, fallback: Locale) -> Option<&LocaleTable> {
        self.table(locale).or_else(|| self.table(fallback))
    }
}

impl LocaleProvider for Catalogue {
    fn table(&self, locale: Locale) -> Option<&LocaleTable> {
        Some(Catalogue::table(self, locale))
    }
}
