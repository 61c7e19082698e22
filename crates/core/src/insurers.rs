//! Swiss health insurers offered in the contact form.
//!
//! Informational only. The insurer is optional and never feeds into classification.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Insurer {
    pub code: &'static str,
    pub label: &'static str,
}

pub const INSURERS: [Insurer; 8] = [
    Insurer { code: "css", label: "CSS" },
    Insurer { code: "helsana", label: "Helsana" },
    Insurer { code: "swica", label: "Swica" },
    Insurer { code: "sanitas", label: "Sanitas" },
    Insurer { code: "groupe-mutuel", label: "Groupe Mutuel" },
    Insurer { code: "visana", label: "Visana" },
    Insurer { code: "concordia", label: "Concordia" },
    Insurer { code: "other", label: "Other" },
];

/// Looks up an insurer by code, ignoring case and surrounding whitespace.
pub fn find(code: &str) -> Option<&'static Insurer> {
    let code = code.trim();
    INSURERS.iter().find(|i| i.code.eq_ignore_ascii_case(code))
}
