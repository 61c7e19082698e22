//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing reads process-wide environment variables while handling a request, which keeps
//! behaviour consistent across threads and test harnesses.

use crate::constants::{
    DEFAULT_LOCALE_ENV, DEFAULT_REST_ADDR, LOCALE_DIR_ENV, REFERRAL_SEED_ENV, REST_ADDR_ENV,
};
use crate::error::{ConfigError, ConfigResult};
use crate::referral::InMemoryReferralStore;
use pathway_locale::{Catalogue, Locale};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rest_addr: String,
    default_locale: Locale,
    locale_dir: Option<PathBuf>,
    referral_seed: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `locale_dir`, when given, must be an existing directory. `referral_seed` is checked
    /// when the store is loaded.
    pub fn new(
        rest_addr: String,
        default_locale: Locale,
        locale_dir: Option<PathBuf>,
        referral_seed: Option<PathBuf>,
    ) -> ConfigResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(ConfigError::InvalidInput("rest_addr cannot be empty".into()));
        }
        if let Some(dir) = &locale_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidInput(format!(
                    "{LOCALE_DIR_ENV} is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            rest_addr,
            default_locale,
            locale_dir,
            referral_seed,
        })
    }

    /// Builds the configuration from a variable lookup, usually `std::env::var`.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rest_addr = get(REST_ADDR_ENV).unwrap_or_else(|| DEFAULT_REST_ADDR.to_owned());
        let default_locale = match get(DEFAULT_LOCALE_ENV) {
            Some(code) => code.parse::<Locale>()?,
            None => Locale::default(),
        };

        Self::new(
            rest_addr,
            default_locale,
            get(LOCALE_DIR_ENV).map(PathBuf::from),
            get(REFERRAL_SEED_ENV).map(PathBuf::from),
        )
    }

    /// Reads the process environment. Call once at startup.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    pub fn locale_dir(&self) -> Option<&Path> {
        self.locale_dir.as_deref()
    }

    pub fn referral_seed(&self) -> Option<&Path> {
        self.referral_seed.as_deref()
    }

    /// Loads the bundled locale tables plus any overrides.
    pub fn load_catalogue(&self) -> ConfigResult<Catalogue> {
        let catalogue = match &self.locale_dir {
            Some(dir) => Catalogue::with_overrides(self.default_locale, dir)?,
            None => Catalogue::bundled(self.default_locale)?,
        };
        Ok(catalogue)
    }

    /// Builds the referral store, seeded when a seed file is configured.
    pub fn load_referral_store(&self) -> ConfigResult<InMemoryReferralStore> {
        match &self.referral_seed {
            Some(path) => InMemoryReferralStore::load(path),
            None => Ok(InMemoryReferralStore::new()),
        }
    }
}
