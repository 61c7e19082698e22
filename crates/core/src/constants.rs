//! Constants used throughout the pathway core crate.

/// Address the REST host binds to when `PATHWAY_REST_ADDR` is not set.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Environment variable for the REST bind address.
pub const REST_ADDR_ENV: &str = "PATHWAY_REST_ADDR";

/// Environment variable for the locale used when a request names none.
pub const DEFAULT_LOCALE_ENV: &str = "PATHWAY_DEFAULT_LOCALE";

/// Environment variable for a directory of `<locale>.yaml` overrides.
pub const LOCALE_DIR_ENV: &str = "PATHWAY_LOCALE_DIR";

/// Environment variable for a YAML file that seeds the in-memory referral store.
pub const REFERRAL_SEED_ENV: &str = "PATHWAY_REFERRAL_SEED";
