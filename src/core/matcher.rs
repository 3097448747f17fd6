use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as Json;

use super::evaluation::{ConstraintsFieldEvaluation, CredentialResults, ValidationCheck};
use super::filter::{FilterValidator, SchemaFilter};
use super::input_descriptor::{ConstraintsField, InputDescriptor};
use super::path::{PathEvaluator, PathQuery};

/// Evaluates a single constraint field against a candidate credential.
///
/// The field's path alternatives are tried in declaration order; the first
/// one that resolves to a value satisfying the field's filter (if any) wins
/// and evaluation stops. If every alternative fails, the full ordered trail
/// of attempts is the result.
#[derive(Clone)]
pub struct FieldConstraintEvaluator {
    paths: PathEvaluator,
    filter: Arc<dyn FilterValidator>,
}

impl Default for FieldConstraintEvaluator {
    fn default() -> Self {
        Self {
            paths: PathEvaluator::default(),
            filter: Arc::new(SchemaFilter),
        }
    }
}

impl FieldConstraintEvaluator {
    /// Create a new evaluator over the given query engine and filter
    /// validator.
    pub fn new(query: Arc<dyn PathQuery>, filter: Arc<dyn FilterValidator>) -> Self {
        Self {
            paths: PathEvaluator::new(query),
            filter,
        }
    }

    /// Evaluate `field` against `candidate`.
    pub fn evaluate(&self, candidate: &Json, field: &ConstraintsField) -> ConstraintsFieldEvaluation {
        let mut trail = Vec::new();

        for path in field.path().iter() {
            let evaluation = self.paths.evaluate(candidate, path);

            if !evaluation.is_match() {
                trail.push(evaluation);
                continue;
            }

            let satisfied = match (field.filter(), evaluation.value()) {
                (None, _) => true,
                (Some(filter), Some(value)) => self.filter.is_valid(filter, value),
                (Some(_), None) => false,
            };

            if satisfied {
                return ConstraintsFieldEvaluation::matched(field.clone(), evaluation);
            }

            trail.push(evaluation.reject());
        }

        ConstraintsFieldEvaluation::unmatched(field.clone(), trail)
    }
}

/// Applies an input descriptor's constraint fields to one candidate
/// credential, all-or-nothing.
///
/// Evaluation short-circuits: the first field that no path alternative
/// satisfies ends the candidate's evaluation, and later fields are not
/// evaluated at all.
#[derive(Clone, Default)]
pub struct DescriptorEvaluator {
    fields: FieldConstraintEvaluator,
}

impl DescriptorEvaluator {
    /// Create a new evaluator over the given field-constraint evaluator.
    pub fn new(fields: FieldConstraintEvaluator) -> Self {
        Self { fields }
    }

    /// Evaluate `candidate` against `descriptor`.
    ///
    /// A descriptor with no constraints (or no constraint fields) is
    /// trivially satisfied: the returned result has an empty evaluation
    /// list, the unconditional pass marker.
    pub fn evaluate(&self, candidate: &Json, descriptor: &InputDescriptor) -> CredentialResults {
        let fields = match descriptor.constraints() {
            Some(constraints) if !constraints.is_empty() => constraints.fields(),
            _ => return CredentialResults::unconditional(candidate.clone()),
        };

        let mut evaluations = Vec::with_capacity(fields.len());

        for field in fields {
            let evaluation = self.fields.evaluate(candidate, field);
            let failed = !evaluation.is_match();
            evaluations.push(evaluation);

            if failed {
                break;
            }
        }

        CredentialResults::new(candidate.clone(), evaluations)
    }
}

/// Orchestrates descriptor evaluation over every input descriptor of a
/// presentation definition against a pool of schema-bucketed credentials.
#[derive(Clone, Default)]
pub struct InputDescriptorMatcher {
    descriptors: DescriptorEvaluator,
}

impl InputDescriptorMatcher {
    /// Create a new matcher over the given descriptor evaluator.
    pub fn new(descriptors: DescriptorEvaluator) -> Self {
        Self { descriptors }
    }

    /// Evaluate every descriptor, in definition order, against the
    /// credentials bucketed under its declared schema URIs.
    ///
    /// A descriptor none of whose schema URIs has candidates in the pool
    /// produces a [ValidationCheck] with an empty result list; "no
    /// satisfying credential found" is data for the caller, not an error.
    pub fn match_credentials(
        &self,
        credentials_by_schema: &HashMap<String, Vec<Json>>,
        descriptors: &[InputDescriptor],
    ) -> Vec<ValidationCheck> {
        descriptors
            .iter()
            .map(|descriptor| {
                let results = descriptor
                    .schema()
                    .iter()
                    .filter_map(|schema| credentials_by_schema.get(schema.uri()))
                    .flatten()
                    .map(|candidate| self.descriptors.evaluate(candidate, descriptor))
                    .collect();

                ValidationCheck::new(descriptor.id().to_string(), results)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_descriptor::{Constraints, SchemaRef};
    use crate::core::path::QueryError;
    use crate::utils::NonEmptyVec;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Query engine wrapper counting every path resolution.
    struct CountingQuery {
        inner: crate::core::path::JsonPathQuery,
        calls: Arc<AtomicUsize>,
    }

    impl PathQuery for CountingQuery {
        fn query(&self, document: &Json, expression: &str) -> Result<Vec<Json>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.query(document, expression)
        }
    }

    fn counting_evaluator() -> (FieldConstraintEvaluator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let evaluator = FieldConstraintEvaluator::new(
            Arc::new(CountingQuery {
                inner: crate::core::path::JsonPathQuery,
                calls: calls.clone(),
            }),
            Arc::new(SchemaFilter),
        );
        (evaluator, calls)
    }

    fn age_credential(age: u64) -> Json {
        json!({ "credentialSubject": { "age": age } })
    }

    #[test]
    fn first_matching_alternative_wins() {
        let field = ConstraintsField::new("$.credentialSubject.yearsOld".into())
            .add_path("$.credentialSubject.age".into())
            .add_path("$.credentialSubject.ageInYears".into());

        let (evaluator, calls) = counting_evaluator();
        let evaluation = evaluator.evaluate(&age_credential(25), &field);

        assert!(evaluation.is_match());
        assert_eq!(
            evaluation.matched_path().unwrap().path(),
            "$.credentialSubject.age"
        );
        // The third alternative is never resolved.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn exhausted_alternatives_produce_a_full_trail() {
        let field = ConstraintsField::new("$.a".into())
            .add_path("$.b".into())
            .add_path("$.c".into());

        let evaluation = FieldConstraintEvaluator::default().evaluate(&json!({}), &field);

        assert!(!evaluation.is_match());
        assert_eq!(evaluation.trail().len(), 3);
        assert!(evaluation.trail().iter().all(|path| !path.is_match()));
    }

    #[test]
    fn filter_rejection_keeps_the_resolved_value_in_the_trail() {
        let field = ConstraintsField::new("$.credentialSubject.age".into())
            .set_filter(json!({ "type": "number", "minimum": 18 }));

        let evaluation = FieldConstraintEvaluator::default().evaluate(&age_credential(15), &field);

        assert!(!evaluation.is_match());
        assert_eq!(evaluation.trail().len(), 1);
        assert_eq!(evaluation.trail()[0].value(), Some(&json!(15)));
    }

    fn descriptor_with_fields(fields: Vec<ConstraintsField>) -> InputDescriptor {
        let mut constraints = Constraints::new();
        for field in fields {
            constraints = constraints.add_constraint(field);
        }
        InputDescriptor::new(
            "d1".into(),
            NonEmptyVec::new(SchemaRef::new("https://schema.example.com/T1")),
        )
        .set_constraints(constraints)
    }

    #[test]
    fn descriptor_without_constraints_passes_unconditionally() {
        let descriptor = InputDescriptor::new(
            "d1".into(),
            NonEmptyVec::new(SchemaRef::new("https://schema.example.com/T1")),
        );

        let results = DescriptorEvaluator::default().evaluate(&age_credential(15), &descriptor);
        assert!(results.evaluations().is_empty());
        assert!(results.is_satisfied());
    }

    #[test]
    fn descriptor_evaluation_short_circuits_on_first_failed_field() {
        let descriptor = descriptor_with_fields(vec![
            ConstraintsField::new("$.credentialSubject.missing".into()),
            ConstraintsField::new("$.credentialSubject.age".into()),
            ConstraintsField::new("$.credentialSubject.age".into()),
        ]);

        let (fields, calls) = counting_evaluator();
        let results =
            DescriptorEvaluator::new(fields).evaluate(&age_credential(25), &descriptor);

        // Only the failing first field is recorded; its single path is the
        // only resolution that happened.
        assert_eq!(results.evaluations().len(), 1);
        assert!(!results.is_satisfied());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn all_passing_fields_are_recorded() {
        let descriptor = descriptor_with_fields(vec![
            ConstraintsField::new("$.credentialSubject.age".into()),
            ConstraintsField::new("$.credentialSubject.age".into()),
        ]);

        let results =
            DescriptorEvaluator::default().evaluate(&age_credential(25), &descriptor);

        assert_eq!(results.evaluations().len(), 2);
        assert!(results.is_satisfied());
    }

    #[test]
    fn matcher_preserves_definition_and_candidate_order() {
        let d1 = descriptor_with_fields(vec![ConstraintsField::new(
            "$.credentialSubject.age".into(),
        )]);
        let d2 = InputDescriptor::new(
            "d2".into(),
            NonEmptyVec::new(SchemaRef::new("https://schema.example.com/T2")),
        );

        let mut pool = HashMap::new();
        pool.insert(
            "https://schema.example.com/T1".to_string(),
            vec![age_credential(25), age_credential(30)],
        );

        let checks = InputDescriptorMatcher::default()
            .match_credentials(&pool, &[d1, d2]);

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].descriptor_id(), "d1");
        assert_eq!(checks[0].results().len(), 2);
        assert_eq!(
            checks[0].results()[0].credential()["credentialSubject"]["age"],
            json!(25)
        );
        assert_eq!(
            checks[0].results()[1].credential()["credentialSubject"]["age"],
            json!(30)
        );

        // No candidates of schema T2: empty check, not an error.
        assert_eq!(checks[1].descriptor_id(), "d2");
        assert!(checks[1].results().is_empty());
    }

    #[test]
    fn no_descriptors_is_vacuous_success() {
        let checks =
            InputDescriptorMatcher::default().match_credentials(&HashMap::new(), &[]);
        assert!(checks.is_empty());
    }
}
