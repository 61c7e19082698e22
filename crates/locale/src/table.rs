//! Instruction table wire model and translation helpers.
//!
//! Responsibilities:
//! - Define the domain-level [`LocaleTable`] handed to the classifier
//! - Define a strict wire model for the YAML files under `locales/`
//! - Reject tables with unknown keys, missing sections or blank strings
//!
//! Notes:
//! - Step lists are ordered; the order in the YAML is the order shown to the patient
//! - `info` lines are optional because the `unsure` set has none in any locale

use crate::{LocaleError, LocaleResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Title and badge shown on the result card for one coverage outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultCopy {
    pub title: String,
    pub badge: String,
}

/// Result card copy for each coverage outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Results {
    pub covered: ResultCopy,
    pub consult_first: ResultCopy,
    pub self_pay: ResultCopy,
}

/// An ordered list of next steps plus an optional explanatory line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionSet {
    pub steps: Vec<String>,
    pub info: Option<String>,
}

/// Instruction sets keyed by insurance model, plus the self-pay set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextSteps {
    pub standard: InstructionSet,
    pub gp_model: InstructionSet,
    pub hmo: InstructionSet,
    pub telmed: InstructionSet,
    pub unsure: InstructionSet,
    pub self_pay: InstructionSet,
}

/// The complete, fully translated copy for one locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleTable {
    pub results: Results,
    pub next_steps: NextSteps,
}

impl LocaleTable {
    /// Parse a locale table from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface the path (e.g. `next_steps.hmo.steps`) of the
    /// failing field when the YAML does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Translation`] if:
    /// - the YAML does not match the schema or contains unknown keys,
    /// - a title, badge, step or info line is blank,
    /// - a step list is empty.
    pub fn parse(yaml_text: &str) -> LocaleResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, LocaleTableWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(LocaleError::Translation(format!(
                    "Locale table schema mismatch at {path}: {source}"
                )));
            }
        };

        wire_to_domain(wire)
    }

    /// Render the table back to YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Translation`] if serialisation fails.
    pub fn render(&self) -> LocaleResult<String> {
        let wire = domain_to_wire(self);
        serde_yaml::to_string(&wire)
            .map_err(|e| LocaleError::Translation(format!("Failed to serialize locale table: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct LocaleTableWire {
    results: ResultsWire,
    next_steps: NextStepsWire,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ResultsWire {
    covered: ResultCopyWire,
    consult_first: ResultCopyWire,
    self_pay: ResultCopyWire,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ResultCopyWire {
    title: String,
    badge: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct NextStepsWire {
    standard: InstructionSetWire,
    gp_model: InstructionSetWire,
    hmo: InstructionSetWire,
    telmed: InstructionSetWire,
    unsure: InstructionSetWire,
    self_pay: InstructionSetWire,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct InstructionSetWire {
    steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    info: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn require_text(path: &str, value: String) -> LocaleResult<String> {
    if value.trim().is_empty() {
        return Err(LocaleError::Translation(format!("{path} must not be blank")));
    }
    Ok(value)
}

fn result_copy(path: &str, wire: ResultCopyWire) -> LocaleResult<ResultCopy> {
    Ok(ResultCopy {
        title: require_text(&format!("{path}.title"), wire.title)?,
        badge: require_text(&format!("{path}.badge"), wire.badge)?,
    })
}

fn instruction_set(path: &str, wire: InstructionSetWire) -> LocaleResult<InstructionSet> {
    if wire.steps.is_empty() {
        return Err(LocaleError::Translation(format!(
            "{path}.steps must list at least one step"
        )));
    }

    let steps = wire
        .steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| require_text(&format!("{path}.steps[{i}]"), step))
        .collect::<LocaleResult<Vec<_>>>()?;

    let info = wire
        .info
        .map(|info| require_text(&format!("{path}.info"), info))
        .transpose()?;

    Ok(InstructionSet { steps, info })
}

fn wire_to_domain(wire: LocaleTableWire) -> LocaleResult<LocaleTable> {
    let results = Results {
        covered: result_copy("results.covered", wire.results.covered)?,
        consult_first: result_copy("results.consult_first", wire.results.consult_first)?,
        self_pay: result_copy("results.self_pay", wire.results.self_pay)?,
    };

    let n = wire.next_steps;
    let next_steps = NextSteps {
        standard: instruction_set("next_steps.standard", n.standard)?,
        gp_model: instruction_set("next_steps.gp_model", n.gp_model)?,
        hmo: instruction_set("next_steps.hmo", n.hmo)?,
        telmed: instruction_set("next_steps.telmed", n.telmed)?,
        unsure: instruction_set("next_steps.unsure", n.unsure)?,
        self_pay: instruction_set("next_steps.self_pay", n.self_pay)?,
    };

    Ok(LocaleTable {
        results,
        next_steps,
    })
}

fn domain_to_wire(table: &LocaleTable) -> LocaleTableWire {
    fn copy(c: &ResultCopy) -> ResultCopyWire {
        ResultCopyWire {
            title: c.title.clone(),
            badge: c.badge.clone(),
        }
    }

    fn set(s: &InstructionSet) -> InstructionSetWire {
        InstructionSetWire {
            steps: s.steps.clone(),
            info: s.info.clone(),
        }
    }

    LocaleTableWire {
        results: ResultsWire {
            covered: copy(&table.results.covered),
            consult_first: copy(&table.results.consult_first),
            self_pay: copy(&table.results.self_pay),
        },
        next_steps: NextStepsWire {
            standard: set(&table.next_steps.standard),
            gp_model: set(&table.next_steps.gp_model),
            hmo: set(&table.next_steps.hmo),
            telmed: set(&table.next_steps.telmed),
            unsure: set(&table.next_steps.unsure),
            self_pay: set(&table.next_steps.self_pay),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: &str = include_str!("../locales/en.yaml");

    #[test]
    fn parses_bundled_english_table() {
        let table = LocaleTable::parse(EN).expect("bundled table should parse");
        assert_eq!(table.results.covered.title, "Great! SKIIN is covered");
        assert_eq!(table.next_steps.telmed.steps.len(), 3);
        assert_eq!(table.next_steps.telmed.steps[0], "Call your Telemedicine hotline");
        assert!(table.next_steps.unsure.info.is_none());
        assert!(table.next_steps.standard.info.is_some());
    }

    #[test]
    fn render_then_parse_preserves_table() {
        let table = LocaleTable::parse(EN).expect("parse");
        let yaml = table.render().expect("render");
        assert_eq!(LocaleTable::parse(&yaml).expect("reparse"), table);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = EN.replace("next_steps:", "extra_key: true\nnext_steps:");
        let err = LocaleTable::parse(&input).expect_err("should reject unknown key");
        match err {
            LocaleError::Translation(msg) => assert!(msg.contains("extra_key")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_model_section_names_the_path() {
        let input = EN.replace("  hmo:\n", "  hmo_typo:\n");
        let err = LocaleTable::parse(&input).expect_err("should reject renamed section");
        match err {
            LocaleError::Translation(msg) => assert!(msg.contains("next_steps"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_step_is_rejected_with_index() {
        let input = EN.replace("\"Contact your HMO center\"", "\"  \"");
        let err = LocaleTable::parse(&input).expect_err("should reject blank step");
        match err {
            LocaleError::Translation(msg) => {
                assert!(msg.contains("next_steps.hmo.steps[0]"), "{msg}")
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_step_list_is_rejected() {
        let input = r#"results:
  covered: { title: a, badge: b }
  consult_first: { title: a, badge: b }
  self_pay: { title: a, badge: b }
next_steps:
  standard: { steps: [] }
  gp_model: { steps: [x] }
  hmo: { steps: [x] }
  telmed: { steps: [x] }
  unsure: { steps: [x] }
  self_pay: { steps: [x] }
"#;
        let err = LocaleTable::parse(input).expect_err("should reject empty steps");
        match err {
            LocaleError::Translation(msg) => assert!(msg.contains("next_steps.standard.steps")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }
}
