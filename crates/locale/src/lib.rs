//! Localized copy for the eligibility pathway.
//!
//! This crate provides **wire models** and **loading helpers** for the per-locale instruction
//! tables the eligibility classifier selects from:
//! - YAML tables, one per locale, bundled into the binary
//! - optional on-disk overrides loaded once at startup
//!
//! This crate focuses on:
//! - strict deserialisation (unknown keys and empty strings are rejected)
//! - translation between the YAML wire shape and the domain-level [`LocaleTable`]
//!
//! Every string is fully pre-translated. Nothing in here interpolates or formats text; callers
//! only ever pick whole strings by key.

pub mod catalogue;
pub mod table;

pub use catalogue::{Catalogue, Locale};
pub use table::{InstructionSet, LocaleTable, NextSteps, ResultCopy, Results};

/// Errors returned by the `pathway-locale` crate.
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("unknown locale: {0}")]
    UnknownLocale(String),
}

/// Type alias for Results that can fail with a [`LocaleError`].
pub type LocaleResult<T> = Result<T, LocaleError>;
