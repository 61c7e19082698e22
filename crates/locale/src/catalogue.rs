//! The set of locale tables available to a running process.
//!
//! Tables are resolved once at startup (bundled copies, optionally replaced by files from an
//! override directory) and then passed into the classifier by reference. Nothing reads the
//! catalogue from ambient state.

use crate::{LocaleError, LocaleResult, LocaleTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Languages the site is published in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    De,
    Fr,
    It,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::De, Locale::Fr, Locale::It];

    fn index(self) -> usize {
        match self {
            Locale::En => 0,
            Locale::De => 1,
            Locale::Fr => 2,
            Locale::It => 3,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::It => "it",
        }
    }

    fn bundled_yaml(self) -> &'static str {
        match self {
            Locale::En => include_str!("../locales/en.yaml"),
            Locale::De => include_str!("../locales/de.yaml"),
            Locale::Fr => include_str!("../locales/fr.yaml"),
            Locale::It => include_str!("../locales/it.yaml"),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Accepts bare codes and region-tagged forms such as `de-CH` or `fr_CH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            "fr" => Ok(Locale::Fr),
            "it" => Ok(Locale::It),
            _ => Err(LocaleError::UnknownLocale(s.to_string())),
        }
    }
}

/// Locale tables keyed by [`Locale`], with a fallback locale.
///
/// A catalogue always holds a table for every [`Locale`]; overrides only ever replace one.
#[derive(Clone, Debug)]
pub struct Catalogue {
    tables: Vec<LocaleTable>,
    fallback: Locale,
}

impl Catalogue {
    /// Builds a catalogue from the tables compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] if a bundled table fails to parse. This only happens when a
    /// `locales/*.yaml` file was edited into an invalid state.
    pub fn bundled(fallback: Locale) -> LocaleResult<Self> {
        let tables = Locale::ALL
            .iter()
            .map(|locale| LocaleTable::parse(locale.bundled_yaml()))
            .collect::<LocaleResult<Vec<_>>>()?;
        Ok(Self { tables, fallback })
    }

    /// Builds the bundled catalogue and replaces any locale for which `dir` contains a
    /// `<code>.yaml` file.
    ///
    /// Files for unknown locales are ignored with a warning; an override that fails to parse is
    /// an error so a broken deploy is caught at startup.
    pub fn with_overrides(fallback: Locale, dir: &Path) -> LocaleResult<Self> {
        let mut catalogue = Self::bundled(fallback)?;

        if !dir.is_dir() {
            return Err(LocaleError::InvalidInput(format!(
                "locale override path is not a directory: {}",
                dir.display()
            )));
        }

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let locale = match stem.parse::<Locale>() {
                Ok(locale) => locale,
                Err(_) => {
                    tracing::warn!("ignoring locale override for unknown locale: {}", path.display());
                    continue;
                }
            };

            let text = std::fs::read_to_string(&path)?;
            let table = LocaleTable::parse(&text)?;
            tracing::info!("loaded locale override {} from {}", locale, path.display());
            catalogue.tables[locale.index()] = table;
        }

        Ok(catalogue)
    }

    pub fn fallback(&self) -> Locale {
        self.fallback
    }

    pub fn table(&self, locale: Locale) -> &LocaleTable {
        &self.tables[locale.index()]
    }

    /// Resolves a requested language tag, using the fallback locale when it is missing or
    /// not one the site is published in.
    pub fn resolve(&self, requested: Option<&str>) -> Locale {
        match requested.map(str::parse::<Locale>) {
            Some(Ok(locale)) => locale,
            Some(Err(_)) => {
                tracing::debug!("unsupported locale requested, using {}", self.fallback);
                self.fallback
            }
            None => self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bundled_catalogue_has_every_locale() {
        let catalogue = Catalogue::bundled(Locale::De).expect("bundled tables parse");
        for locale in Locale::ALL {
            assert!(!catalogue.table(locale).next_steps.standard.steps.is_empty());
        }
        assert_eq!(
            catalogue.table(Locale::De).next_steps.hmo.steps[0],
            "Wenden Sie sich an Ihr HMO-Zentrum"
        );
    }

    #[test]
    fn locale_parses_region_tags() {
        assert_eq!("de-CH".parse::<Locale>().unwrap(), Locale::De);
        assert_eq!("fr_CH".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!(" IT ".parse::<Locale>().unwrap(), Locale::It);
        assert!(matches!(
            "rm".parse::<Locale>(),
            Err(LocaleError::UnknownLocale(_))
        ));
    }

    #[test]
    fn resolve_falls_back_for_unknown_locales() {
        let catalogue = Catalogue::bundled(Locale::De).expect("bundled tables parse");
        assert_eq!(catalogue.resolve(Some("fr-CH")), Locale::Fr);
        assert_eq!(catalogue.resolve(Some("ja")), Locale::De);
        assert_eq!(catalogue.resolve(None), Locale::De);
    }

    #[test]
    fn overrides_replace_bundled_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let custom = include_str!("../locales/en.yaml")
            .replace("Call your Telemedicine hotline", "Ring the telemed line");
        fs::write(temp_dir.path().join("en.yaml"), custom).expect("write override");
        fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("write stray file");

        let catalogue =
            Catalogue::with_overrides(Locale::En, temp_dir.path()).expect("overrides load");
        let table = catalogue.table(Locale::En);
        assert_eq!(table.next_steps.telmed.steps[0], "Ring the telemed line");
        assert_eq!(
            catalogue.table(Locale::Fr).results.covered.title,
            "Excellent! SKIIN est couvert"
        );
    }

    #[test]
    fn broken_override_fails_startup() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("de.yaml"), "results: [[[").expect("write override");

        let err = Catalogue::with_overrides(Locale::De, temp_dir.path())
            .expect_err("broken override must fail");
        assert!(matches!(err, LocaleError::Translation(_)));
    }

    #[test]
    fn override_path_must_be_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope");
        let err = Catalogue::with_overrides(Locale::De, &missing).expect_err("missing dir");
        assert!(matches!(err, LocaleError::InvalidInput(_)));
    }
}
