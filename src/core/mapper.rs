use std::collections::HashMap;

use serde_json::Value as Json;

use super::presentation_definition::PresentationDefinition;
use super::presentation_submission::PresentationSubmission;

/// Buckets a submission's credentials by schema URI for descriptor matching.
///
/// Each descriptor-map entry names an input descriptor and the location of
/// its credential within the submission document; the mapper resolves those
/// locations and files the results under the schema URI the descriptor
/// declares.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubmissionMapper;

impl SubmissionMapper {
    /// Resolve `submission`'s descriptor map against `document` (the object
    /// the submission is embedded within) and bucket the located credentials
    /// under the first schema URI of the descriptor each entry names.
    ///
    /// Returns an empty mapping when no definition is supplied or the
    /// descriptor map is empty. An entry naming a descriptor absent from the
    /// definition is skipped; it is not an error at this layer. When two
    /// entries target the same schema URI the last write wins.
    pub fn map(
        &self,
        document: &Json,
        submission: &PresentationSubmission,
        definition: Option<&PresentationDefinition>,
    ) -> HashMap<String, Vec<Json>> {
        let mut credentials_by_schema = HashMap::new();

        let Some(definition) = definition else {
            return credentials_by_schema;
        };

        for entry in submission.descriptor_map() {
            let Some(descriptor) = definition.input_descriptor(entry.id()) else {
                tracing::debug!(
                    id = entry.id(),
                    "descriptor map entry names no input descriptor in the definition, skipping"
                );
                continue;
            };

            let credentials: Vec<Json> =
                entry.resolve(document).into_iter().cloned().collect();

            credentials_by_schema.insert(descriptor.schema().first().uri().to_string(), credentials);
        }

        credentials_by_schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_descriptor::{InputDescriptor, SchemaRef};
    use crate::utils::NonEmptyVec;
    use serde_json::json;
    use serde_json_path::JsonPath;
    use uuid::Uuid;

    use crate::core::presentation_submission::DescriptorMap;

    fn definition() -> PresentationDefinition {
        PresentationDefinition::new(
            "def-1".into(),
            InputDescriptor::new(
                "banking_input".into(),
                NonEmptyVec::new(SchemaRef::new("https://schema.example.com/Bank")),
            ),
        )
    }

    fn submission(entries: Vec<DescriptorMap>) -> PresentationSubmission {
        PresentationSubmission::new(Uuid::nil(), "def-1".into(), entries)
    }

    fn document() -> Json {
        json!({
            "presentation": {
                "verifiableCredential": [
                    { "credentialSubject": { "accountNumber": "1234" } }
                ]
            }
        })
    }

    #[test]
    fn buckets_by_first_schema_uri() {
        let entries = vec![DescriptorMap::new(
            "banking_input",
            "ldp_vc",
            JsonPath::parse("$.presentation.verifiableCredential[0]").unwrap(),
        )];

        let buckets = SubmissionMapper.map(&document(), &submission(entries), Some(&definition()));

        let bucket = &buckets["https://schema.example.com/Bank"];
        assert_eq!(bucket.len(), 1);
        assert_eq!(
            bucket[0]["credentialSubject"]["accountNumber"],
            json!("1234")
        );
    }

    #[test]
    fn stray_descriptor_map_entry_is_skipped() {
        let entries = vec![DescriptorMap::new(
            "unknown_input",
            "ldp_vc",
            JsonPath::parse("$.presentation.verifiableCredential[0]").unwrap(),
        )];

        let buckets = SubmissionMapper.map(&document(), &submission(entries), Some(&definition()));
        assert!(buckets.is_empty());
    }

    #[test]
    fn missing_definition_yields_empty_mapping() {
        let entries = vec![DescriptorMap::new(
            "banking_input",
            "ldp_vc",
            JsonPath::parse("$.presentation.verifiableCredential[0]").unwrap(),
        )];

        let buckets = SubmissionMapper.map(&document(), &submission(entries), None);
        assert!(buckets.is_empty());
    }

    #[test]
    fn last_write_wins_on_duplicate_schema_uris() {
        let definition = definition().add_input_descriptor(InputDescriptor::new(
            "backup_input".into(),
            NonEmptyVec::new(SchemaRef::new("https://schema.example.com/Bank")),
        ));

        let document = json!({
            "presentation": {
                "verifiableCredential": [
                    { "credentialSubject": { "accountNumber": "first" } },
                    { "credentialSubject": { "accountNumber": "second" } }
                ]
            }
        });

        let entries = vec![
            DescriptorMap::new(
                "banking_input",
                "ldp_vc",
                JsonPath::parse("$.presentation.verifiableCredential[0]").unwrap(),
            ),
            DescriptorMap::new(
                "backup_input",
                "ldp_vc",
                JsonPath::parse("$.presentation.verifiableCredential[1]").unwrap(),
            ),
        ];

        let buckets = SubmissionMapper.map(&document, &submission(entries), Some(&definition));

        let bucket = &buckets["https://schema.example.com/Bank"];
        assert_eq!(bucket.len(), 1);
        assert_eq!(
            bucket[0]["credentialSubject"]["accountNumber"],
            json!("second")
        );
    }
}
