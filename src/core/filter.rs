use jsonschema::JSONSchema;
use serde_json::Value as Json;

/// Structural filter validation collaborator.
///
/// A filter is a JSON Schema descriptor applied to the value resolved from a
/// constraint field's path. The validator is pluggable so reimplementations
/// may use any conformant schema validator; failures are reported as a
/// non-match, never as an error.
pub trait FilterValidator: Send + Sync {
    /// Returns whether `value` satisfies the `filter` schema.
    fn is_valid(&self, filter: &Json, value: &Json) -> bool;
}

/// The default filter validator, backed by the `jsonschema` crate.
///
/// A filter that is not itself a valid schema is logged and treated as
/// unsatisfied, keeping one bad filter from aborting evaluation of the
/// remaining path alternatives.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaFilter;

impl FilterValidator for SchemaFilter {
    fn is_valid(&self, filter: &Json, value: &Json) -> bool {
        let schema = match JSONSchema::compile(filter) {
            Ok(schema) => schema,
            Err(error) => {
                tracing::debug!(%error, "filter is not a valid schema, treating as unsatisfied");
                return false;
            }
        };

        let valid = match schema.validate(value) {
            Ok(()) => true,
            Err(errors) => {
                for error in errors {
                    tracing::debug!("value did not pass filter validation: {error}");
                }
                false
            }
        };
        valid
    }
}
