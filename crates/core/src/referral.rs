//! Referral code verification for the doctor portal.
//!
//! A doctor types the code printed on a patient's referral. [`ReferralVerifier::verify`] checks
//! the shape locally, looks the code up once, and lazily moves an active but overdue code to
//! `expired` before reporting it.
//!
//! Codes are a bearer credential for a patient's name and booking pathway. Nothing in this module
//! logs the patient name.

use crate::error::{ConfigError, ConfigResult, ReferralError, ReferralResult};
use crate::pathway::Pathway;
use crate::ports::{PortError, ReferralStore};
use crate::validation::validate_referral_code_shape;
use chrono::{DateTime, Utc};
use pathway_types::ReferralCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Active,
    Used,
    Expired,
}

/// A stored referral code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferralRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub code: ReferralCode,
    pub status: ReferralStatus,
    pub expires_at: DateTime<Utc>,
    pub patient_name: String,
    #[serde(default)]
    pub eligibility_pathway: Option<Pathway>,
}

/// What the doctor sees after a successful lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifiedReferral {
    pub patient_name: String,
    pub eligibility_pathway: Option<Pathway>,
    pub expires_at: DateTime<Utc>,
}

/// Verifies referral codes against a [`ReferralStore`].
pub struct ReferralVerifier<S> {
    store: S,
}

impl<S: ReferralStore> ReferralVerifier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Verifies `raw` as of `now`.
    ///
    /// # Errors
    ///
    /// - [`ReferralError::Malformed`] when the code is not 6 alphanumeric characters. The store
    ///   is not consulted.
    /// - [`ReferralError::NotFound`] when no record matches or the record is not active.
    /// - [`ReferralError::Expired`] when an active record's expiry has passed. The record is
    ///   moved to `expired` first, so later lookups report `NotFound`.
    /// - [`ReferralError::Store`] when the lookup or the expiry write fails.
    pub async fn verify(&self, raw: &str, now: DateTime<Utc>) -> ReferralResult<VerifiedReferral> {
        let code = validate_referral_code_shape(raw).map_err(|_| ReferralError::Malformed)?;

        let record = self
            .store
            .find_by_code(&code)
            .await
            .inspect_err(|e| tracing::warn!("referral lookup failed: {e}"))?
            .ok_or(ReferralError::NotFound)?;

        match record.status {
            ReferralStatus::Used | ReferralStatus::Expired => {
                tracing::info!(referral = %record.id, status = ?record.status, "referral code no longer active");
                Err(ReferralError::NotFound)
            }
            ReferralStatus::Active if record.expires_at < now => {
                self.store
                    .mark_expired(record.id)
                    .await
                    .inspect_err(|e| tracing::warn!("marking referral {} expired failed: {e}", record.id))?;
                tracing::info!(referral = %record.id, "referral code expired on lookup");
                Err(ReferralError::Expired)
            }
            ReferralStatus::Active => {
                tracing::info!(referral = %record.id, "referral code verified");
                Ok(VerifiedReferral {
                    patient_name: record.patient_name,
                    eligibility_pathway: record.eligibility_pathway,
                    expires_at: record.expires_at,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReferralSeed {
    referrals: Vec<ReferralRecord>,
}

/// Referral store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryReferralStore {
    records: RwLock<HashMap<ReferralCode, ReferralRecord>>,
}

impl InMemoryReferralStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = ReferralRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.code.clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Parses a YAML seed of the form `referrals: [ {code, status, expires_at, ...} ]`.
    pub fn from_yaml(yaml_text: &str) -> ConfigResult<Self> {
        let seed: ReferralSeed = serde_yaml::from_str(yaml_text)?;
        Ok(Self::with_records(seed.referrals))
    }

    /// Loads a YAML seed file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_yaml(&text)?;
        tracing::info!("seeded referral store from {}", path.display());
        Ok(store)
    }

    pub async fn insert(&self, record: ReferralRecord) {
        self.records.write().await.insert(record.code.clone(), record);
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait::async_trait]
impl ReferralStore for InMemoryReferralStore {
    async fn find_by_code(&self, code: &ReferralCode) -> Result<Option<ReferralRecord>, PortError> {
        Ok(self.records.read().await.get(code).cloned())
    }

    async fn mark_expired(&self, id: Uuid) -> Result<(), PortError> {
        let mut records = self.records.write().await;
        match records.values_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = ReferralStatus::Expired;
                Ok(())
            }
            None => Err(PortError::new("referral store", format!("no referral with id {id}"))),
        }
    }
}

#[async_trait::async_trait]
impl<S: ReferralStore + ?Sized> ReferralStore for std::sync::Arc<S> {
    async fn find_by_code(&self, code: &ReferralCode) -> Result<Option<ReferralRecord>, PortError> {
        (**self).find_by_code(code).await
    }

    async fn mark_expired(&self, id: Uuid) -> Result<(), PortError> {
        (**self).mark_expired(id).await
    }
}
