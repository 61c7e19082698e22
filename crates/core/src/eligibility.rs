//! Coverage classification for the eligibility questionnaire.
//!
//! [`classify`] maps the patient's symptom and risk-factor selections plus their declared
//! insurance model to exactly one [`CoverageOutcome`], and picks the localized next steps for
//! it from a [`LocaleTable`] supplied by the caller.
//!
//! The function is pure and total. It performs no I/O, keeps no state, and is cheap enough to
//! run on every selection change.
//!
//! ## Decision table
//!
//! | insurance model | symptoms or risks | outcome         |
//! |-----------------|-------------------|-----------------|
//! | `unsure`        | any               | `consult-first` |
//! | declared        | at least one      | `covered`       |
//! | declared        | none              | `self-pay`      |
//!
//! An emergency symptom never changes the outcome. It is reported separately so the host can
//! render an urgent-care notice.

use crate::selection::{InsuranceModel, RiskFactorSelection, Symptom, SymptomSelection};
use pathway_locale::{InstructionSet, LocaleTable, ResultCopy};
use serde::{Deserialize, Serialize};

/// The three coverage statements the site can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageOutcome {
    /// A prescribed monitoring path exists under basic insurance.
    Covered,
    /// The patient has to establish their insurance model before a statement can be made.
    ConsultFirst,
    /// Preventive screening without a medical indication.
    SelfPay,
}

impl CoverageOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverageOutcome::Covered => "covered",
            CoverageOutcome::ConsultFirst => "consult-first",
            CoverageOutcome::SelfPay => "self-pay",
        }
    }
}

impl std::fmt::Display for CoverageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityInput {
    #[serde(default)]
    pub symptoms: SymptomSelection,
    #[serde(default)]
    pub risk_factors: RiskFactorSelection,
    #[serde(default)]
    pub insurance_model: InsuranceModel,
}

impl EligibilityInput {
    pub fn new(
        symptoms: SymptomSelection,
        risk_factors: RiskFactorSelection,
        insurance_model: InsuranceModel,
    ) -> Self {
        Self {
            symptoms,
            risk_factors,
            insurance_model,
        }
    }

    /// True when at least one symptom or risk factor is selected.
    pub fn has_indication(&self) -> bool {
        !self.symptoms.is_empty() || !self.risk_factors.is_empty()
    }
}

/// A classification result with its localized copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub outcome: CoverageOutcome,
    pub title: String,
    pub badge: String,
    pub next_steps: Vec<String>,
    pub insurance_info: Option<String>,
    /// Emergency symptom the host must surface with an urgent-care notice.
    pub emergency: Option<Symptom>,
    pub requires_medical_review: bool,
}

/// Decides the coverage outcome without touching any copy.
pub fn outcome_for(input: &EligibilityInput) -> CoverageOutcome {
    if !input.insurance_model.is_declared() {
        CoverageOutcome::ConsultFirst
    } else if input.has_indication() {
        CoverageOutcome::Covered
    } else {
        CoverageOutcome::SelfPay
    }
}

/// Classifies `input` and selects next steps from `instructions`.
pub fn classify(input: &EligibilityInput, instructions: &LocaleTable) -> Eligibility {
    let outcome = outcome_for(input);
    let model_set = instructions_for_model(instructions, input.insurance_model);

    let (next_steps, insurance_info) = match outcome {
        CoverageOutcome::Covered => (model_set.steps.clone(), model_set.info.clone()),
        CoverageOutcome::SelfPay => {
            let self_pay = &instructions.next_steps.self_pay;
            let mut steps = self_pay.steps.clone();
            // Routing caveat: patients who later develop symptoms still go through their model.
            if let Some(caveat) = &model_set.info {
                steps.push(caveat.clone());
            }
            (steps, self_pay.info.clone())
        }
        CoverageOutcome::ConsultFirst => {
            let unsure = &instructions.next_steps.unsure;
            (unsure.steps.clone(), unsure.info.clone())
        }
    };

    let copy = result_copy(instructions, outcome);
    let emergency = input.symptoms.emergency();

    tracing::debug!(
        outcome = %outcome,
        model = %input.insurance_model,
        symptoms = input.symptoms.len(),
        risk_factors = input.risk_factors.len(),
        emergency = emergency.is_some(),
        "classified eligibility"
    );

    Eligibility {
        outcome,
        title: copy.title.clone(),
        badge: copy.badge.clone(),
        next_steps,
        insurance_info,
        emergency,
        requires_medical_review: emergency.is_some(),
    }
}

fn instructions_for_model(table: &LocaleTable, model: InsuranceModel) -> &InstructionSet {
    let steps = &table.next_steps;
    match model {
        InsuranceModel::Standard => &steps.standard,
        InsuranceModel::GpModel => &steps.gp_model,
        InsuranceModel::Hmo => &steps.hmo,
        InsuranceModel::Telmed => &steps.telmed,
        InsuranceModel::Unsure => &steps.unsure,
    }
}

fn result_copy(table: &LocaleTable, outcome: CoverageOutcome) -> &ResultCopy {
    match outcome {
        CoverageOutcome::Covered => &table.results.covered,
        CoverageOutcome::ConsultFirst => &table.results.consult_first,
        CoverageOutcome::SelfPay => &table.results.self_pay,
    }
}
