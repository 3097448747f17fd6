use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::input_descriptor::ConstraintsField;
use super::path::PathEvaluation;
use super::presentation::Presentation;
use super::presentation_submission::DescriptorMap;

/// The outcome of evaluating one constraint field against one candidate.
///
/// Exactly one of the two cases holds: either a single path alternative
/// matched (its evaluation is the result, failed siblings are discarded), or
/// no alternative matched and the full ordered trail of failed attempts is
/// retained for audit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldMatch {
    /// The first path alternative that resolved to a satisfying value.
    Matched(PathEvaluation),
    /// Every path alternative, in declaration order, each a non-match.
    Unmatched(Vec<PathEvaluation>),
}

/// One constraint field together with its evaluation outcome.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConstraintsFieldEvaluation {
    field: ConstraintsField,
    outcome: FieldMatch,
}

impl ConstraintsFieldEvaluation {
    /// A field satisfied by `evaluation`, the first matching path alternative.
    pub fn matched(field: ConstraintsField, evaluation: PathEvaluation) -> Self {
        Self {
            field,
            outcome: FieldMatch::Matched(evaluation),
        }
    }

    /// A field no path alternative satisfied; `trail` holds every attempt.
    pub fn unmatched(field: ConstraintsField, trail: Vec<PathEvaluation>) -> Self {
        Self {
            field,
            outcome: FieldMatch::Unmatched(trail),
        }
    }

    /// Return the constraint field that was evaluated.
    pub fn field(&self) -> &ConstraintsField {
        &self.field
    }

    /// Return the evaluation outcome.
    pub fn outcome(&self) -> &FieldMatch {
        &self.outcome
    }

    /// Return the winning path evaluation, if any alternative matched.
    pub fn matched_path(&self) -> Option<&PathEvaluation> {
        match &self.outcome {
            FieldMatch::Matched(evaluation) => Some(evaluation),
            FieldMatch::Unmatched(_) => None,
        }
    }

    /// Return the ordered failure trail, empty if an alternative matched.
    pub fn trail(&self) -> &[PathEvaluation] {
        match &self.outcome {
            FieldMatch::Matched(_) => &[],
            FieldMatch::Unmatched(trail) => trail,
        }
    }

    /// Return whether some path alternative satisfied the field.
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, FieldMatch::Matched(_))
    }
}

/// One candidate credential together with its ordered constraint-field
/// evaluations for a given input descriptor.
///
/// Evaluation is all-or-nothing with short-circuit: the list stops at the
/// first failed field, so later fields of a failing candidate are absent
/// rather than present as "skipped" placeholders.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CredentialResults {
    credential: Json,
    evaluations: Vec<ConstraintsFieldEvaluation>,
}

impl CredentialResults {
    /// Record the evaluations produced for `credential`.
    pub fn new(credential: Json, evaluations: Vec<ConstraintsFieldEvaluation>) -> Self {
        Self {
            credential,
            evaluations,
        }
    }

    /// A candidate evaluated against a descriptor with no constraints.
    ///
    /// The empty evaluation list is the unconditional pass marker.
    pub fn unconditional(credential: Json) -> Self {
        Self::new(credential, Vec::new())
    }

    /// Return the candidate credential.
    pub fn credential(&self) -> &Json {
        &self.credential
    }

    /// Return the constraint-field evaluations, in declaration order.
    pub fn evaluations(&self) -> &[ConstraintsFieldEvaluation] {
        &self.evaluations
    }

    /// Return whether the candidate satisfied the descriptor: every recorded
    /// evaluation is a match (vacuously true for an unconstrained
    /// descriptor).
    pub fn is_satisfied(&self) -> bool {
        self.evaluations
            .iter()
            .all(ConstraintsFieldEvaluation::is_match)
    }
}

/// The evaluations of every candidate credential considered for one input
/// descriptor.
///
/// An empty result list means no candidate credential of a matching schema
/// was available; interpreting that (and an all-failing list) as acceptance
/// or rejection is the caller's policy decision.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationCheck {
    descriptor_id: String,
    results: Vec<CredentialResults>,
}

impl ValidationCheck {
    /// Record the candidate results produced for the descriptor.
    pub fn new(descriptor_id: String, results: Vec<CredentialResults>) -> Self {
        Self {
            descriptor_id,
            results,
        }
    }

    /// Return the id of the input descriptor this check belongs to.
    pub fn descriptor_id(&self) -> &str {
        self.descriptor_id.as_str()
    }

    /// Return the per-candidate results, in candidate order.
    pub fn results(&self) -> &[CredentialResults] {
        &self.results
    }

    /// Return whether some candidate satisfied the descriptor.
    pub fn is_satisfied(&self) -> bool {
        self.results.iter().any(CredentialResults::is_satisfied)
    }
}

/// The durable audit artifact of one verification call: the decoded
/// presentation, the full ordered evaluation report, and the submission's
/// descriptor map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProcessedVerificationSubmission {
    presentation: Presentation,
    evaluations: Vec<ValidationCheck>,
    descriptor_map: Vec<DescriptorMap>,
}

impl ProcessedVerificationSubmission {
    /// Assemble the processing result.
    pub fn new(
        presentation: Presentation,
        evaluations: Vec<ValidationCheck>,
        descriptor_map: Vec<DescriptorMap>,
    ) -> Self {
        Self {
            presentation,
            evaluations,
            descriptor_map,
        }
    }

    /// Return the decoded presentation.
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Return the validation checks, in definition order.
    pub fn evaluations(&self) -> &[ValidationCheck] {
        &self.evaluations
    }

    /// Return the submission's descriptor map, in declaration order.
    pub fn descriptor_map(&self) -> &[DescriptorMap] {
        &self.descriptor_map
    }
}
