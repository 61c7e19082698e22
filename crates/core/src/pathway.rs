//! Booking pathway screening.
//!
//! The coverage outcome says what insurance will pay for. Whether the patient can book at all
//! also depends on contraindications and on whether they have Swiss basic insurance.

use crate::eligibility::{CoverageOutcome, Eligibility};
use serde::{Deserialize, Serialize};

/// Swiss emergency medical number, shown next to every emergency notice.
pub const EMERGENCY_PHONE: &str = "144";

/// Conditions under which the wearable must not be fitted without a physician.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contraindications {
    pub pregnant: bool,
    pub pacemaker: bool,
    pub recent_hospitalization: bool,
}

impl Contraindications {
    pub fn any(&self) -> bool {
        self.pregnant || self.pacemaker || self.recent_hospitalization
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pathway {
    Insured,
    SelfPay,
    Blocked,
}

impl Pathway {
    pub fn as_str(self) -> &'static str {
        match self {
            Pathway::Insured => "insured",
            Pathway::SelfPay => "self-pay",
            Pathway::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for Pathway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the booking pathway.
///
/// Contraindications block booking outright. Without basic insurance the only option is
/// self-pay. Otherwise a `self-pay` classification stays self-pay and everything else,
/// including a missing classification, goes through insurance.
pub fn screen(
    has_insurance: bool,
    contraindications: &Contraindications,
    eligibility: Option<&Eligibility>,
) -> Pathway {
    let pathway = if contraindications.any() {
        Pathway::Blocked
    } else if !has_insurance {
        Pathway::SelfPay
    } else {
        match eligibility.map(|e| e.outcome) {
            Some(CoverageOutcome::SelfPay) => Pathway::SelfPay,
            _ => Pathway::Insured,
        }
    };
    tracing::debug!(pathway = %pathway, has_insurance, "screened booking pathway");
    pathway
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::{classify, EligibilityInput};
    use crate::selection::{InsuranceModel, Symptom};
    use pathway_locale::{Catalogue, Locale};

    fn eligibility(model: InsuranceModel, symptoms: &[Symptom]) -> Eligibility {
        let catalogue = Catalogue::bundled(Locale::En).expect("bundled tables parse");
        let input = EligibilityInput::new(
            symptoms.iter().copied().collect(),
            Default::default(),
            model,
        );
        classify(&input, catalogue.table(Locale::En))
    }

    #[test]
    fn any_contraindication_blocks() {
        let covered = eligibility(InsuranceModel::Telmed, &[Symptom::Palpitations]);
        for flags in [
            Contraindications { pregnant: true, ..Default::default() },
            Contraindications { pacemaker: true, ..Default::default() },
            Contraindications { recent_hospitalization: true, ..Default::default() },
        ] {
            assert_eq!(screen(true, &flags, Some(&covered)), Pathway::Blocked);
        }
    }

    #[test]
    fn uninsured_patients_self_pay() {
        let covered = eligibility(InsuranceModel::Hmo, &[Symptom::Dizziness]);
        assert_eq!(
            screen(false, &Contraindications::default(), Some(&covered)),
            Pathway::SelfPay
        );
    }

    #[test]
    fn insured_pathway_follows_the_outcome() {
        let none = Contraindications::default();
        let covered = eligibility(InsuranceModel::Standard, &[Symptom::Palpitations]);
        let self_pay = eligibility(InsuranceModel::Standard, &[]);
        let consult = eligibility(InsuranceModel::Unsure, &[]);

        assert_eq!(screen(true, &none, Some(&covered)), Pathway::Insured);
        assert_eq!(screen(true, &none, Some(&self_pay)), Pathway::SelfPay);
        assert_eq!(screen(true, &none, Some(&consult)), Pathway::Insured);
        assert_eq!(screen(true, &none, None), Pathway::Insured);
    }

    #[test]
    fn pathway_serialises_in_kebab_case() {
        let yaml = serde_yaml::to_string(&Pathway::SelfPay).expect("serialise");
        assert_eq!(yaml.trim(), "self-pay");
    }
}
