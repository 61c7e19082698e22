//! Questionnaire selections.
//!
//! Symptoms, risk factors and the insurance model are closed enumerations. The form's "none"
//! answer is the empty selection, never a member, so "none plus palpitations" cannot be
//! represented.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Literal the form sends for "no symptoms" / "no risk factors".
pub const NONE_LITERAL: &str = "none";

/// Errors raised when turning external identifiers into selections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// Lower-cases and drops separators so `chest-pain`, `chest_pain` and `chestPain` compare equal.
fn fold_identifier(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! kebab_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = SelectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = fold_identifier(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| fold_identifier(v.as_str()) == needle || v.aliases().contains(&needle.as_str()))
                    .ok_or_else(|| SelectionError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

/// Symptoms offered on the questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symptom {
    Palpitations,
    Dizziness,
    #[serde(alias = "chestPain")]
    ChestPain,
    #[serde(alias = "shortness")]
    ShortnessOfBreath,
}

kebab_enum!(Symptom, "symptom", {
    Palpitations => "palpitations",
    Dizziness => "dizziness",
    ChestPain => "chest-pain",
    ShortnessOfBreath => "shortness-of-breath",
});

impl Symptom {
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Symptom::ShortnessOfBreath => &["shortness"],
            _ => &[],
        }
    }

    /// Symptoms that warrant an urgent-care notice before anything else.
    pub fn is_emergency(self) -> bool {
        matches!(self, Symptom::ChestPain)
    }
}

/// Cardiac risk factors offered on the questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFactor {
    #[serde(alias = "familyHistory")]
    FamilyHistory,
    Hypertension,
    Diabetes,
    #[serde(alias = "ageOver50")]
    AgeOver50,
}

kebab_enum!(RiskFactor, "risk factor", {
    FamilyHistory => "family-history",
    Hypertension => "hypertension",
    Diabetes => "diabetes",
    AgeOver50 => "age-over-50",
});

impl RiskFactor {
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }
}

/// Swiss basic insurance plan types. Decides who the patient must see first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsuranceModel {
    /// Free choice of doctor.
    Standard,
    /// Family doctor gatekeeper.
    #[serde(alias = "gpModel")]
    GpModel,
    Hmo,
    /// Telemedicine hotline first.
    Telmed,
    #[default]
    Unsure,
}

kebab_enum!(InsuranceModel, "insurance model", {
    Standard => "standard",
    GpModel => "gp-model",
    Hmo => "hmo",
    Telmed => "telmed",
    Unsure => "unsure",
});

impl InsuranceModel {
    fn aliases(self) -> &'static [&'static str] {
        match self {
            InsuranceModel::Standard => &["standardflex"],
            InsuranceModel::GpModel => &["hausarzt", "hmohausarzt"],
            _ => &[],
        }
    }

    /// True for every model the patient actually named.
    pub fn is_declared(self) -> bool {
        !matches!(self, InsuranceModel::Unsure)
    }
}

/// An ordered set of items, where an empty set means "none".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord + Copy> Selection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: T) -> bool {
        self.0.insert(item)
    }

    pub fn remove(&mut self, item: T) -> bool {
        self.0.remove(&item)
    }

    /// Adds `item` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, item: T) -> bool {
        if self.0.remove(&item) {
            false
        } else {
            self.0.insert(item);
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, item: T) -> bool {
        self.0.contains(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }
}

impl<T: Ord + Copy + FromStr<Err = SelectionError>> Selection<T> {
    /// Parses form identifiers, treating the `none` literal as "nothing selected".
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Unknown`] for the first identifier that is neither `none`
    /// nor a known member.
    pub fn parse_all<I, S>(values: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for value in values {
            let value = value.as_ref();
            if value.trim().eq_ignore_ascii_case(NONE_LITERAL) {
                continue;
            }
            selection.insert(value.parse()?);
        }
        Ok(selection)
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub type SymptomSelection = Selection<Symptom>;
pub type RiskFactorSelection = Selection<RiskFactor>;

impl Selection<Symptom> {
    /// The emergency symptom in this selection, if any. At most one symptom is an emergency.
    pub fn emergency(&self) -> Option<Symptom> {
        self.iter().find(|s| s.is_emergency())
    }
}
