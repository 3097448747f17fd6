use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use serde_json_path::JsonPath;

/// A DescriptorMapId is a unique identifier for a DescriptorMap.
pub type DescriptorMapId = String;

/// Presentation Submissions are objects embedded within target claim
/// negotiation formats that express how the inputs presented as proofs to a
/// verifier are provided in accordance with the requirements specified in a
/// presentation definition.
///
/// Embedded Presentation Submission objects MUST be located within target data format as
/// the value of a `presentation_submission` property.
///
/// For more information, see: [https://identity.foundation/presentation-exchange/spec/v1.0.0/#presentation-submission](https://identity.foundation/presentation-exchange/spec/v1.0.0/#presentation-submission)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationSubmission {
    id: uuid::Uuid,
    definition_id: String,
    descriptor_map: Vec<DescriptorMap>,
}

impl PresentationSubmission {
    /// The presentation submission MUST contain an id property. The value of this property MUST be a unique identifier, i.e. a UUID.
    ///
    /// The presentation submission object MUST contain a `definition_id` property. The value of this property MUST be the id value of a valid presentation definition.
    ///
    /// The object MUST include a `descriptor_map` property. The value of this property MUST be an array of Input [DescriptorMap] Objects.
    pub fn new(
        id: uuid::Uuid,
        definition_id: String,
        descriptor_map: Vec<DescriptorMap>,
    ) -> Self {
        Self {
            id,
            definition_id,
            descriptor_map,
        }
    }

    /// Return the id of the presentation submission.
    pub fn id(&self) -> &uuid::Uuid {
        &self.id
    }

    /// Return the definition id of the presentation submission.
    pub fn definition_id(&self) -> &String {
        &self.definition_id
    }

    /// Return the descriptor map of the presentation submission,
    /// in declaration order.
    pub fn descriptor_map(&self) -> &[DescriptorMap] {
        &self.descriptor_map
    }

    /// Returns the descriptor map as a mapping of descriptor map id to descriptor map.
    ///
    /// The descriptor map id is expected to match the id of an input descriptor.
    pub fn descriptor_map_by_id(&self) -> HashMap<DescriptorMapId, &DescriptorMap> {
        self.descriptor_map
            .iter()
            .map(|descriptor_map| (descriptor_map.id.clone(), descriptor_map))
            .collect()
    }
}

/// Descriptor Maps are objects used to describe where in the submission the
/// credential satisfying a given input descriptor is located.
///
/// For more information, see: [https://identity.foundation/presentation-exchange/spec/v1.0.0/#presentation-submission](https://identity.foundation/presentation-exchange/spec/v1.0.0/#presentation-submission)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptorMap {
    id: DescriptorMapId,
    format: String,
    path: JsonPath,
}

impl DescriptorMap {
    /// The descriptor map MUST include an `id` property. The value of this property MUST be a string that matches
    /// the `id` property of an input descriptor in the presentation definition this submission is related to.
    ///
    /// The descriptor map object MUST include a `format` property. The value denotes the claim format of the
    /// credential at the given path, e.g. `jwt_vc`, `ldp_vc`.
    ///
    /// The descriptor map object MUST include a `path` property. The value of this property MUST be a
    /// [JSONPath](https://goessner.net/articles/JsonPath/) string expression, executed against the top-level
    /// of the object the presentation submission is embedded within.
    pub fn new(id: impl Into<DescriptorMapId>, format: impl Into<String>, path: JsonPath) -> Self {
        Self {
            id: id.into(),
            format: format.into(),
            path,
        }
    }

    /// Return the id of the descriptor map entry.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Return the claim format designation of the descriptor map entry.
    pub fn format(&self) -> &str {
        self.format.as_str()
    }

    /// Return the path of the descriptor map entry.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Resolve this entry's path against the document the submission is
    /// embedded within, returning every located value in query order.
    pub fn resolve<'a>(&self, document: &'a Json) -> Vec<&'a Json> {
        self.path.query(document).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_presentation_exchange_submission() {
        let value = json!({
            "id": "a30e3b91-fb77-4d22-95fa-871689c322e2",
            "definition_id": "32f54163-7166-48f1-93d8-ff217bdb0653",
            "descriptor_map": [
                {
                    "id": "banking_input",
                    "format": "ldp_vc",
                    "path": "$.presentation.verifiableCredential[0]"
                }
            ]
        });

        let submission: PresentationSubmission = serde_path_to_error::deserialize(value)
            .map_err(|e| e.path().to_string())
            .unwrap();

        assert_eq!(
            submission.definition_id(),
            "32f54163-7166-48f1-93d8-ff217bdb0653"
        );
        assert_eq!(submission.descriptor_map().len(), 1);
        assert_eq!(submission.descriptor_map()[0].id(), "banking_input");
        assert_eq!(submission.descriptor_map()[0].format(), "ldp_vc");
    }

    #[test]
    fn invalid_path_is_rejected_at_the_boundary() {
        let value = json!({
            "id": "a30e3b91-fb77-4d22-95fa-871689c322e2",
            "definition_id": "d",
            "descriptor_map": [
                { "id": "banking_input", "format": "ldp_vc", "path": "not a json path" }
            ]
        });

        assert!(serde_json::from_value::<PresentationSubmission>(value).is_err());
    }

    #[test]
    fn descriptor_map_resolves_against_embedding_document() {
        let entry = DescriptorMap::new(
            "banking_input",
            "ldp_vc",
            JsonPath::parse("$.presentation.verifiableCredential[0]").unwrap(),
        );

        let document = json!({
            "presentation": {
                "verifiableCredential": [{ "credentialSubject": { "accountNumber": "1234" } }]
            }
        });

        let resolved = entry.resolve(&document);
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0]["credentialSubject"]["accountNumber"],
            json!("1234")
        );
    }
}
